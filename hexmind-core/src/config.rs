//! Engine configuration

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{HexError, Result};
use crate::eval::EvalConfig;

/// How long a decision may search
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchBudget {
    /// Fixed-depth search; depth counts plies including the root move
    Depth(u32),
    /// Iterative deepening until cancelled, timed out or capped
    Iterative {
        #[serde(default)]
        time_limit_ms: Option<u64>,
        #[serde(default)]
        max_depth: Option<u32>,
    },
}

impl SearchBudget {
    pub fn depth(depth: u32) -> Self {
        SearchBudget::Depth(depth)
    }

    /// Iterative deepening bounded by a wall-clock allowance
    pub fn timed(limit: Duration) -> Self {
        SearchBudget::Iterative {
            time_limit_ms: Some(limit.as_millis() as u64),
            max_depth: None,
        }
    }

    /// Iterative deepening that only stops on an external cancel
    pub fn until_cancelled() -> Self {
        SearchBudget::Iterative {
            time_limit_ms: None,
            max_depth: None,
        }
    }

    pub fn time_limit(&self) -> Option<Duration> {
        match self {
            SearchBudget::Depth(_) => None,
            SearchBudget::Iterative { time_limit_ms, .. } => {
                time_limit_ms.map(Duration::from_millis)
            }
        }
    }

    /// Stops on its own, without anyone calling cancel
    pub fn is_bounded(&self) -> bool {
        match self {
            SearchBudget::Depth(_) => true,
            SearchBudget::Iterative {
                time_limit_ms,
                max_depth,
            } => time_limit_ms.is_some() || max_depth.is_some(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            SearchBudget::Depth(0) | SearchBudget::Iterative { max_depth: Some(0), .. } => Err(
                HexError::InvalidConfig("search depth must be at least 1".to_string()),
            ),
            _ => Ok(()),
        }
    }
}

impl Default for SearchBudget {
    fn default() -> Self {
        SearchBudget::Depth(3)
    }
}

/// Complete engine configuration
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub eval: EvalConfig,
    pub budget: SearchBudget,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        self.eval.validate()?;
        self.budget.validate()
    }

    /// Load from a JSON file and validate
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: EngineConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save to a JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_json_shapes() {
        let depth: SearchBudget = serde_json::from_str(r#"{"depth": 4}"#).unwrap();
        assert_eq!(depth, SearchBudget::Depth(4));

        let timed: SearchBudget =
            serde_json::from_str(r#"{"iterative": {"time_limit_ms": 250}}"#).unwrap();
        assert_eq!(timed, SearchBudget::timed(Duration::from_millis(250)));
        assert_eq!(timed.time_limit(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"eval": {"empty_cell_weight": 3}}"#).unwrap();
        assert_eq!(config.eval.empty_cell_weight, 3);
        assert_eq!(config.eval.bridge_cost, 1);
        assert!(config.eval.use_bridges);
        assert_eq!(config.budget, SearchBudget::default());
    }

    #[test]
    fn test_validate_rejects_zero_depth() {
        let config = EngineConfig {
            budget: SearchBudget::Depth(0),
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(HexError::InvalidConfig(_))));
        assert!(SearchBudget::until_cancelled().validate().is_ok());
    }

    #[test]
    fn test_bounded_budgets() {
        assert!(SearchBudget::depth(2).is_bounded());
        assert!(SearchBudget::timed(Duration::from_millis(10)).is_bounded());
        assert!(!SearchBudget::until_cancelled().is_bounded());

        let capped: SearchBudget =
            serde_json::from_str(r#"{"iterative": {"max_depth": 3}}"#).unwrap();
        assert!(capped.is_bounded());
        let open: SearchBudget = serde_json::from_str(r#"{"iterative": {}}"#).unwrap();
        assert!(!open.is_bounded());
    }

    #[test]
    fn test_save_and_load() {
        let path =
            std::env::temp_dir().join(format!("hexmind-config-{}.json", std::process::id()));
        let config = EngineConfig {
            budget: SearchBudget::timed(Duration::from_secs(2)),
            ..EngineConfig::default()
        };
        config.save(&path).unwrap();
        let loaded = EngineConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }
}
