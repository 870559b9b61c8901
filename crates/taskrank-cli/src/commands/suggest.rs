//! Top-N suggestion view.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use taskrank_core::{ScoringEngine, Suggestion};

use super::{choose_strategy, load_config, print_json, read_request};

#[derive(Args)]
pub struct SuggestArgs {
    /// JSON file with a task array or {"tasks": [...], "strategy": ...} (stdin if omitted or "-")
    pub input: Option<PathBuf>,
    /// Weighting strategy (unknown names fall back to smart_balance)
    #[arg(long)]
    pub strategy: Option<String>,
    /// Date to score against, YYYY-MM-DD (default: today, UTC)
    #[arg(long)]
    pub today: Option<NaiveDate>,
    /// Number of suggestions (default: config suggestion_count)
    #[arg(long, short = 'n')]
    pub count: Option<usize>,
    /// Print compact JSON
    #[arg(long)]
    pub compact: bool,
}

#[derive(Serialize)]
struct SuggestResponse {
    strategy: String,
    suggestions: Vec<Suggestion>,
}

pub fn run(args: SuggestArgs, config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let table = config.strategy_table()?;
    let request = read_request(args.input.as_ref())?;
    let strategy = choose_strategy(args.strategy, &request, &config);
    let count = args.count.unwrap_or(config.suggestion_count);

    let suggestions =
        ScoringEngine::with_strategies(&table).suggest(&request.tasks, &strategy, args.today, count);
    print_json(&SuggestResponse { strategy, suggestions }, args.compact)
}
