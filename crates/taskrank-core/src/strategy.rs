//! Weighting strategies.
//!
//! A strategy is a named set of four non-negative weights used to combine
//! the sub-scores into one composite score. The built-in table is fixed;
//! configuration may layer extra named strategies on top of it once at
//! startup, after which the table is only ever read.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;

/// Strategy used when none is named or the name is unknown.
pub const DEFAULT_STRATEGY: &str = "smart_balance";

/// Weights for each sub-score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyWeights {
    /// Weight for deadline urgency
    pub urgency: f64,
    /// Weight for stated importance
    pub importance: f64,
    /// Weight for the quick-win effort score
    pub effort: f64,
    /// Weight for dependency impact
    pub dependency: f64,
}

impl StrategyWeights {
    /// Balance all four signals, leaning on deadlines and importance.
    pub fn smart_balance() -> Self {
        Self {
            urgency: 0.35,
            importance: 0.30,
            effort: 0.20,
            dependency: 0.15,
        }
    }

    /// Prefer quick wins.
    pub fn fastest_wins() -> Self {
        Self {
            urgency: 0.20,
            importance: 0.15,
            effort: 0.50,
            dependency: 0.15,
        }
    }

    /// Prefer what matters most, regardless of size.
    pub fn high_impact() -> Self {
        Self {
            urgency: 0.15,
            importance: 0.65,
            effort: 0.10,
            dependency: 0.10,
        }
    }

    /// Work the calendar.
    pub fn deadline_driven() -> Self {
        Self {
            urgency: 0.70,
            importance: 0.15,
            effort: 0.05,
            dependency: 0.10,
        }
    }

    pub fn sum(&self) -> f64 {
        self.urgency + self.importance + self.effort + self.dependency
    }

    /// Weighted sum of the four sub-scores.
    pub fn combine(&self, urgency: f64, importance: f64, effort: f64, dependency: f64) -> f64 {
        self.urgency * urgency
            + self.importance * importance
            + self.effort * effort
            + self.dependency * dependency
    }

    /// Check that every weight is finite and non-negative.
    pub fn validate(&self) -> Result<(), String> {
        let weights = [
            ("urgency", self.urgency),
            ("importance", self.importance),
            ("effort", self.effort),
            ("dependency", self.dependency),
        ];

        for (name, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(format!(
                    "Weight '{}' must be a finite non-negative number, got {}",
                    name, weight
                ));
            }
        }

        Ok(())
    }
}

impl Default for StrategyWeights {
    fn default() -> Self {
        Self::smart_balance()
    }
}

/// Immutable name -> weights lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StrategyTable {
    entries: BTreeMap<String, StrategyWeights>,
}

impl StrategyTable {
    /// The four built-in strategies.
    pub fn builtin() -> Self {
        let entries = [
            ("smart_balance", StrategyWeights::smart_balance()),
            ("fastest_wins", StrategyWeights::fastest_wins()),
            ("high_impact", StrategyWeights::high_impact()),
            ("deadline_driven", StrategyWeights::deadline_driven()),
        ]
        .into_iter()
        .map(|(name, w)| (name.to_string(), w))
        .collect();
        Self { entries }
    }

    /// Process-wide shared copy of the built-in table.
    pub fn shared() -> &'static StrategyTable {
        static TABLE: OnceLock<StrategyTable> = OnceLock::new();
        TABLE.get_or_init(StrategyTable::builtin)
    }

    /// Built-ins plus `custom`, where custom entries override same-named
    /// built-ins.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if any custom weight is
    /// negative or not finite.
    pub fn with_custom<I>(custom: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, StrategyWeights)>,
    {
        let mut table = Self::builtin();
        for (name, weights) in custom {
            weights.validate().map_err(|message| ConfigError::InvalidValue {
                key: format!("strategies.{name}"),
                message,
            })?;
            table.entries.insert(name, weights);
        }
        Ok(table)
    }

    pub fn get(&self, name: &str) -> Option<&StrategyWeights> {
        self.entries.get(name)
    }

    /// Weights for `name`, falling back to `smart_balance`.
    pub fn resolve(&self, name: &str) -> StrategyWeights {
        match self.entries.get(name) {
            Some(weights) => *weights,
            None => {
                debug!(strategy = name, fallback = DEFAULT_STRATEGY, "unknown strategy");
                self.entries
                    .get(DEFAULT_STRATEGY)
                    .copied()
                    .unwrap_or_else(StrategyWeights::smart_balance)
            }
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StrategyWeights)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for StrategyTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_sum_to_one() {
        for (name, weights) in StrategyTable::builtin().iter() {
            assert!((weights.sum() - 1.0).abs() < 1e-9, "{name} sums to {}", weights.sum());
            assert!(weights.validate().is_ok());
        }
    }

    #[test]
    fn test_unknown_name_falls_back() {
        let table = StrategyTable::builtin();
        assert_eq!(table.resolve("does_not_exist"), StrategyWeights::smart_balance());
        assert_eq!(table.resolve("high_impact"), StrategyWeights::high_impact());
    }

    #[test]
    fn test_custom_strategy_overrides_builtin() {
        let custom = StrategyWeights {
            urgency: 1.0,
            importance: 0.0,
            effort: 0.0,
            dependency: 0.0,
        };
        let table = StrategyTable::with_custom([
            ("smart_balance".to_string(), custom),
            ("all_urgency".to_string(), custom),
        ])
        .unwrap();
        assert_eq!(table.len(), 5);
        assert_eq!(table.resolve("smart_balance"), custom);
        assert_eq!(table.resolve("unknown"), custom);
    }

    #[test]
    fn test_negative_weight_rejected() {
        let bad = StrategyWeights {
            urgency: -0.1,
            ..StrategyWeights::default()
        };
        let err = StrategyTable::with_custom([("bad".to_string(), bad)]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "strategies.bad"));
    }

    #[test]
    fn test_combine_is_weighted_sum() {
        let w = StrategyWeights::smart_balance();
        let total = w.combine(1.0, 1.0, 1.0, 1.0);
        assert!((total - 1.0).abs() < 1e-12);
        assert_eq!(w.combine(0.0, 0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_shared_table_is_builtin() {
        assert_eq!(StrategyTable::shared(), &StrategyTable::builtin());
    }
}
