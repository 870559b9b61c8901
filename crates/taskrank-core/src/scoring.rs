//! Composite task scoring.
//!
//! [`analyze`] is the single entry point: it normalizes a batch of
//! records, analyzes the dependency graph, scores every task with the
//! chosen strategy and returns the results ranked best first.
//!
//! ```text
//! score = w_u * urgency + w_i * importance + w_e * effort + w_d * dependency
//! score *= 0.55   if the task sits on a dependency cycle
//! ```
//!
//! Every call is a pure function of its input snapshot and `today`.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::graph::DependencyGraph;
use crate::normalize::normalize_all;
use crate::ranking::rank;
use crate::strategy::{StrategyTable, StrategyWeights};
use crate::subscore::{days_until, effort_score, urgency_score};
use crate::task::{NormalizedTask, TaskKey, TaskRecord};

/// Multiplier applied to tasks on a dependency cycle.
pub const CIRCULAR_PENALTY: f64 = 0.55;

/// Default number of entries in a suggestion view.
pub const DEFAULT_SUGGESTION_COUNT: usize = 3;

/// The four sub-scores of a result, each in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Components {
    pub urgency: f64,
    pub importance: f64,
    pub effort: f64,
    pub dependency: f64,
}

impl Components {
    fn rounded(self) -> Self {
        Self {
            urgency: round4(self.urgency),
            importance: round4(self.importance),
            effort: round4(self.effort),
            dependency: round4(self.dependency),
        }
    }
}

/// One scored task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredResult {
    pub id: TaskKey,
    pub title: String,
    pub raw: TaskRecord,
    /// Composite score rounded to 4 decimals
    pub score: f64,
    pub components: Components,
    pub explanation: String,
    pub circular: bool,
}

/// Condensed view of a top result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub id: TaskKey,
    pub title: String,
    pub score: f64,
    pub why: String,
}

impl From<&ScoredResult> for Suggestion {
    fn from(result: &ScoredResult) -> Self {
        Self {
            id: result.id.clone(),
            title: result.title.clone(),
            score: result.score,
            why: result.explanation.clone(),
        }
    }
}

/// Scores batches against a strategy table.
#[derive(Debug, Clone, Copy)]
pub struct ScoringEngine<'s> {
    strategies: &'s StrategyTable,
}

impl ScoringEngine<'static> {
    /// Engine over the built-in strategies.
    pub fn new() -> Self {
        Self {
            strategies: StrategyTable::shared(),
        }
    }
}

impl Default for ScoringEngine<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'s> ScoringEngine<'s> {
    /// Engine over a custom strategy table.
    pub fn with_strategies(strategies: &'s StrategyTable) -> Self {
        Self { strategies }
    }

    pub fn strategies(&self) -> &StrategyTable {
        self.strategies
    }

    /// Score and rank `tasks`.
    ///
    /// Unknown strategy names fall back to `smart_balance`; `today`
    /// defaults to the current UTC date. Never fails: malformed fields
    /// degrade to their documented defaults.
    pub fn analyze(
        &self,
        tasks: &[TaskRecord],
        strategy: &str,
        today: Option<NaiveDate>,
    ) -> Vec<ScoredResult> {
        let today = today.unwrap_or_else(|| Utc::now().date_naive());
        let weights = self.strategies.resolve(strategy);

        let normalized = normalize_all(tasks, today);
        let graph = DependencyGraph::build(&normalized);
        let cycles = graph.detect_cycles();
        let impact = graph.impact_scores();

        debug!(
            tasks = tasks.len(),
            strategy,
            cycles = cycles.paths.len(),
            %today,
            "analyzing tasks"
        );

        let mut results: Vec<ScoredResult> = normalized
            .iter()
            .map(|task| {
                let key = task.key.as_str();
                let dependency = impact.get(key).copied().unwrap_or(0.0);
                score_task(task, &weights, dependency, cycles.contains(key), today)
            })
            .collect();

        rank(&mut results);
        results
    }

    /// Top `count` results as suggestions.
    pub fn suggest(
        &self,
        tasks: &[TaskRecord],
        strategy: &str,
        today: Option<NaiveDate>,
        count: usize,
    ) -> Vec<Suggestion> {
        suggest(&self.analyze(tasks, strategy, today), count)
    }
}

/// Score and rank `tasks` with the built-in strategies.
pub fn analyze(tasks: &[TaskRecord], strategy: &str, today: Option<NaiveDate>) -> Vec<ScoredResult> {
    ScoringEngine::new().analyze(tasks, strategy, today)
}

/// Map the first `count` ranked results to suggestions.
pub fn suggest(results: &[ScoredResult], count: usize) -> Vec<Suggestion> {
    results.iter().take(count).map(Suggestion::from).collect()
}

/// Score one normalized task given its dependency impact and cycle flag.
pub fn score_task(
    task: &NormalizedTask<'_>,
    weights: &StrategyWeights,
    dependency: f64,
    circular: bool,
    today: NaiveDate,
) -> ScoredResult {
    let components = Components {
        urgency: urgency_score(task.due_date, today),
        importance: task.importance,
        effort: effort_score(task.estimated_hours),
        dependency,
    };

    let mut score = weights.combine(
        components.urgency,
        components.importance,
        components.effort,
        components.dependency,
    );
    if circular {
        score *= CIRCULAR_PENALTY;
    }

    ScoredResult {
        id: task.key.clone(),
        title: task.title.clone(),
        raw: task.raw.clone(),
        score: round4(score),
        components: components.rounded(),
        explanation: explain(task.due_date, today, &components, circular),
        circular,
    }
}

/// Human-readable reasoning behind a score.
pub fn explain(
    due_date: Option<NaiveDate>,
    today: NaiveDate,
    components: &Components,
    circular: bool,
) -> String {
    let mut parts = Vec::with_capacity(5);

    match due_date {
        None => parts.push("No due date provided (treated as low-urgency).".to_string()),
        Some(due) => {
            let days = days_until(due, today);
            if days < 0 {
                parts.push(format!("Past due by {} day(s), urgent.", -days));
            } else {
                parts.push(format!("Due in {days} day(s)."));
            }
        }
    }

    parts.push(format!("Importance normalized={:.2}.", components.importance));
    parts.push(format!(
        "Effort-score={:.2} (lower hours => higher quick-win).",
        components.effort
    ));

    if components.dependency > 0.0 {
        parts.push(format!(
            "Blocks/unlocks other tasks (dependency score={:.2}).",
            components.dependency
        ));
    }
    if circular {
        parts.push("Part of a circular dependency, penalized until resolved.".to_string());
    }

    parts.join(" ")
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
