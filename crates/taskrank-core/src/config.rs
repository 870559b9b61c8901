//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - The strategy used when a request names none
//! - How many entries the suggestion view returns
//! - Additional named weighting strategies
//!
//! Configuration is stored at `~/.config/taskrank/config.toml`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::scoring::DEFAULT_SUGGESTION_COUNT;
use crate::strategy::{StrategyTable, StrategyWeights, DEFAULT_STRATEGY};

/// Returns `~/.config/taskrank[-dev]/`.
///
/// Set TASKRANK_ENV=dev to use a development config directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn config_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TASKRANK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("taskrank-dev")
    } else {
        base_dir.join("taskrank")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_strategy")]
    pub default_strategy: String,
    #[serde(default = "default_suggestion_count")]
    pub suggestion_count: usize,
    /// Extra strategies merged over the built-in table.
    #[serde(default)]
    pub strategies: BTreeMap<String, StrategyWeights>,
}

fn default_strategy() -> String {
    DEFAULT_STRATEGY.into()
}
fn default_suggestion_count() -> usize {
    DEFAULT_SUGGESTION_COUNT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_strategy: default_strategy(),
            suggestion_count: default_suggestion_count(),
            strategies: BTreeMap::new(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) => serde_json::from_str(value)
                        .map_err(|e| invalid(e.to_string()))?,
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location of the config file.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be created.
    pub fn path() -> Result<PathBuf> {
        Ok(config_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is absent.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.strategy_table()?;
                Ok(cfg)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, writing defaults");
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(err) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: err.to_string(),
            }
            .into()),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    ///
    /// See [`Config::save`].
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key without saving.
    ///
    /// Only keys that already exist can be set; a whole strategy can be
    /// added by setting `strategies` to a JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the result holds invalid strategy weights.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.strategy_table()?;
        *self = updated;
        Ok(())
    }

    /// Built-in strategies with this config's custom ones merged in.
    ///
    /// # Errors
    ///
    /// Returns an error if a custom strategy has invalid weights.
    pub fn strategy_table(&self) -> Result<StrategyTable, ConfigError> {
        StrategyTable::with_custom(
            self.strategies
                .iter()
                .map(|(name, weights)| (name.clone(), *weights)),
        )
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.default_strategy, "smart_balance");
        assert_eq!(parsed.suggestion_count, 3);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            suggestion_count = 5

            [strategies.urgent_only]
            urgency = 1.0
            importance = 0.0
            effort = 0.0
            dependency = 0.0
            "#,
        )
        .unwrap();
        assert_eq!(cfg.default_strategy, "smart_balance");
        assert_eq!(cfg.suggestion_count, 5);
        let table = cfg.strategy_table().unwrap();
        assert_eq!(table.get("urgent_only").unwrap().urgency, 1.0);
        assert!(table.get("fastest_wins").is_some());
    }

    #[test]
    fn get_by_dotted_key() {
        let mut cfg = Config::default();
        cfg.strategies
            .insert("mine".into(), StrategyWeights::fastest_wins());
        assert_eq!(cfg.get("default_strategy").as_deref(), Some("smart_balance"));
        assert_eq!(cfg.get("suggestion_count").as_deref(), Some("3"));
        assert_eq!(cfg.get("strategies.mine.effort").as_deref(), Some("0.5"));
        assert_eq!(cfg.get("nope"), None);
        assert_eq!(cfg.get(""), None);
    }

    #[test]
    fn set_known_keys() {
        let mut cfg = Config::default();
        cfg.set("default_strategy", "high_impact").unwrap();
        cfg.set("suggestion_count", "5").unwrap();
        cfg.set(
            "strategies",
            r#"{"mine": {"urgency": 0.5, "importance": 0.5, "effort": 0.0, "dependency": 0.0}}"#,
        )
        .unwrap();
        cfg.set("strategies.mine.effort", "0.25").unwrap();
        assert_eq!(cfg.default_strategy, "high_impact");
        assert_eq!(cfg.suggestion_count, 5);
        assert_eq!(cfg.strategies["mine"].effort, 0.25);
    }

    #[test]
    fn set_rejects_unknown_and_invalid() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("missing", "1"),
            Err(CoreError::Config(ConfigError::UnknownKey(_)))
        ));
        assert!(cfg.set("suggestion_count", "many").is_err());
        cfg.set(
            "strategies",
            r#"{"mine": {"urgency": 0.5, "importance": 0.5, "effort": 0.0, "dependency": 0.0}}"#,
        )
        .unwrap();
        assert!(cfg.set("strategies.mine.urgency", "-1").is_err());
        assert_eq!(cfg.strategies["mine"].urgency, 0.5);
    }

    #[test]
    fn load_writes_defaults_then_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let first = Config::load_from(&path).unwrap();
        assert_eq!(first, Config::default());
        assert!(path.exists());

        let mut changed = first.clone();
        changed.default_strategy = "deadline_driven".into();
        changed.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), changed);
    }

    #[test]
    fn load_rejects_bad_weights() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[strategies.bad]\nurgency = -1.0\nimportance = 0.0\neffort = 0.0\ndependency = 0.0\n",
        )
        .unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(CoreError::Config(ConfigError::InvalidValue { .. }))
        ));
    }
}
