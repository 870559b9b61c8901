//! # taskrank Core Library
//!
//! This library ranks a batch of tasks by a composite priority score built
//! from four signals: deadline urgency, stated importance, estimated effort
//! and dependency impact. Each call is a pure function of its input batch,
//! the chosen strategy and "today".
//!
//! ## Architecture
//!
//! Data flows strictly forward through one [`analyze`] call:
//!
//! ```text
//! TaskRecord -> normalize -> { subscore, graph } -> scoring -> ranking
//! ```
//!
//! - **Normalizer**: recovers malformed or missing fields with defaults
//! - **Sub-scores**: urgency, importance and effort mapped into [0, 1]
//! - **Graph**: cycle detection and transitive unlock impact
//! - **Scoring**: strategy-weighted composite with a circular penalty
//! - **Ranking**: stable best-first ordering
//!
//! ## Key Components
//!
//! - [`ScoringEngine`]: scores batches against a [`StrategyTable`]
//! - [`DependencyGraph`]: cycle and impact analysis
//! - [`Config`]: TOML configuration with custom strategies
//! - [`validation`]: structural gate for untrusted JSON batches

pub mod config;
pub mod error;
pub mod graph;
pub mod normalize;
pub mod ranking;
pub mod scoring;
pub mod strategy;
pub mod subscore;
pub mod task;
pub mod validation;

pub use config::Config;
pub use error::{ConfigError, CoreError, ItemErrors, ValidationError};
pub use graph::{CycleReport, DependencyGraph};
pub use normalize::{normalize, normalize_all, Coerced};
pub use ranking::rank;
pub use scoring::{analyze, suggest, Components, ScoredResult, ScoringEngine, Suggestion, CIRCULAR_PENALTY};
pub use strategy::{StrategyTable, StrategyWeights, DEFAULT_STRATEGY};
pub use task::{DueDate, NormalizedTask, Scalar, TaskKey, TaskRecord};
pub use validation::{parse_request, validate_batch, AnalyzeRequest};
