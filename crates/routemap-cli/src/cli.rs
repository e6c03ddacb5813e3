use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "routemap",
    about = "Route maps: single-pass loading, digesting and exhaustive validation",
    version
)]
pub struct Cli {
    /// Increase the verbosity of diagnostic output (repeatable up to 3 times)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load and validate a route map file
    Validate {
        /// Route map file to validate (default: stdin)
        #[arg(long)]
        file: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
