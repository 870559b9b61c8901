//! Subcommand implementations.

pub mod analyze;
pub mod config;
pub mod strategies;
pub mod suggest;

use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Serialize;
use taskrank_core::{parse_request, AnalyzeRequest, Config, ItemErrors, ValidationError};
use tracing::debug;

/// Exit status used when the submitted batch fails validation.
pub const EXIT_INVALID_INPUT: i32 = 2;

/// Load config from `path`, or from the default location.
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let config = match path {
        Some(p) => Config::load_from(p)?,
        None => Config::load()?,
    };
    Ok(config)
}

/// Read and validate a request body from a file, or stdin for `None`/`-`.
///
/// Validation failures are reported on stdout and end the process.
pub fn read_request(input: Option<&PathBuf>) -> Result<AnalyzeRequest, Box<dyn std::error::Error>> {
    let body = match input {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)?,
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let value: serde_json::Value = serde_json::from_str(&body)?;

    match parse_request(&value) {
        Ok(request) => {
            debug!(tasks = request.tasks.len(), strategy = ?request.strategy, "request accepted");
            Ok(request)
        }
        Err(ValidationError::NotAnArray) => Err(ValidationError::NotAnArray.into()),
        Err(ValidationError::Items(items)) => {
            debug!(rejected = items.len(), "request failed validation");
            #[derive(Serialize)]
            struct Rejected {
                validation_errors: Vec<ItemErrors>,
            }
            let rejected = Rejected { validation_errors: items };
            println!("{}", serde_json::to_string_pretty(&rejected)?);
            std::process::exit(EXIT_INVALID_INPUT);
        }
    }
}

/// Pick the strategy: flag, then request body, then config default.
pub fn choose_strategy(flag: Option<String>, request: &AnalyzeRequest, config: &Config) -> String {
    flag.or_else(|| request.strategy.clone())
        .unwrap_or_else(|| config.default_strategy.clone())
}

/// Print `value` as pretty or compact JSON.
pub fn print_json<T: Serialize>(value: &T, compact: bool) -> Result<(), Box<dyn std::error::Error>> {
    let text = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{text}");
    Ok(())
}
