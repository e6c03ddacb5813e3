use crate::support::{print_errors, print_json_or_exit, print_success};
use routemap_core::{STDIN_SOURCE_NAME, Validator, ValidatorConfig, Verbosity};
use serde_json::json;
use std::path::Path;
use tracing::info;

const CHECK_KIND: &str = "routemap.validate.v1";

pub fn run(file: Option<String>, json_output: bool, verbosity: Verbosity) {
    let validator = Validator::new(ValidatorConfig {
        verbosity,
        ..ValidatorConfig::default()
    });
    let source = file.clone().unwrap_or_else(|| STDIN_SOURCE_NAME.to_string());

    let (mut loaded, report) = validator
        .load_and_validate(file.as_deref().map(Path::new))
        .unwrap_or_else(|e| {
            eprintln!("error: {e}");
            std::process::exit(1);
        });
    // Validation never looks at the raw bytes again.
    loaded.release_raw();

    let accepted = report.accepted();
    if accepted {
        info!("map is valid");
    } else {
        info!("map is invalid ({} errors)", report.errors.len());
    }

    if json_output {
        let errors: Vec<String> = report.errors.iter().map(ToString::to_string).collect();
        let result = if accepted { "accepted" } else { "rejected" };
        let payload = json!({
            "schema": 1,
            "checkKind": CHECK_KIND,
            "source": source,
            "result": result,
            "fatal": report.is_fatal(),
            "version": loaded.document().meta_version(),
            "sha1": loaded.digest_hex(),
            "sizeInBytes": loaded.size_in_bytes(),
            "errorCount": errors.len(),
            "errors": errors,
            "summary": report.summary,
        });
        print_json_or_exit(&payload, "validate");
        if !accepted {
            std::process::exit(1);
        }
        return;
    }

    if accepted {
        print_success(&loaded, &report.summary);
    } else {
        let count = print_errors(&report.errors);
        eprintln!("error: found {count} errors");
        std::process::exit(1);
    }
}
