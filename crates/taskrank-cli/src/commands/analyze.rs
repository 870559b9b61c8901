//! Full ranked analysis.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use taskrank_core::{ScoredResult, ScoringEngine};

use super::{choose_strategy, load_config, print_json, read_request};

#[derive(Args)]
pub struct AnalyzeArgs {
    /// JSON file with a task array or {"tasks": [...], "strategy": ...} (stdin if omitted or "-")
    pub input: Option<PathBuf>,
    /// Weighting strategy (unknown names fall back to smart_balance)
    #[arg(long)]
    pub strategy: Option<String>,
    /// Date to score against, YYYY-MM-DD (default: today, UTC)
    #[arg(long)]
    pub today: Option<NaiveDate>,
    /// Print compact JSON
    #[arg(long)]
    pub compact: bool,
}

#[derive(Serialize)]
struct AnalyzeResponse {
    strategy: String,
    results: Vec<ScoredResult>,
}

pub fn run(args: AnalyzeArgs, config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let table = config.strategy_table()?;
    let request = read_request(args.input.as_ref())?;
    let strategy = choose_strategy(args.strategy, &request, &config);

    let results = ScoringEngine::with_strategies(&table).analyze(&request.tasks, &strategy, args.today);
    print_json(&AnalyzeResponse { strategy, results }, args.compact)
}
