//! Route map CLI: the `routemap` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};
use routemap_core::Verbosity;

fn main() {
    let cli = Cli::parse();
    let verbosity = Verbosity::from_occurrences(cli.verbose);
    support::init_logging(verbosity);

    match cli.command {
        Commands::Validate { file, json } => commands::validate::run(file, json, verbosity),
    }
}
