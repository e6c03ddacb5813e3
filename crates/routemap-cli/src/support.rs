use routemap_core::{LoadedRouteMap, MultiError, RouteMapSummary, ValidationError, Verbosity};
use serde_json::Value;

/// Install the stderr diagnostic subscriber for this process.
pub fn init_logging(verbosity: Verbosity) {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(verbosity.level_filter())
        .with_target(false)
        .without_time()
        .try_init();
}

pub fn print_success(loaded: &LoadedRouteMap, summary: &RouteMapSummary) {
    match loaded.document().meta_version() {
        Some(version) => println!("version: {version}"),
        None => println!("version: <missing>"),
    }
    println!("sha1: {}", loaded.digest_hex());
    println!("size in bytes: {}", loaded.size_in_bytes());
    println!("total networks: {}", summary.num_networks);
    println!("v4 addresses: {}", summary.num_ipv4);
    println!("v6 addresses: {}", summary.num_ipv6);
    println!("total unique labels: {}", summary.unique_labels());
    println!("label histogram: {}", summary.label_histogram().join(", "));
}

/// One `! <error>` line per collected error. Returns how many were printed.
pub fn print_errors(errors: &MultiError<ValidationError>) -> usize {
    for error in errors {
        println!("! {error}");
    }
    errors.len()
}

pub fn print_json_or_exit(payload: &Value, what: &str) {
    let rendered = serde_json::to_string_pretty(payload).unwrap_or_else(|error| {
        eprintln!("error: failed to render {what} payload: {error}");
        std::process::exit(2);
    });
    println!("{rendered}");
}
