//! Strategy listing.

use std::path::Path;

use super::{load_config, print_json};

pub fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let table = config.strategy_table()?;
    print_json(&table, false)
}
