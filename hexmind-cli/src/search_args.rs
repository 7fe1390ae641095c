//! Engine flags shared by every command

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use hexmind_core::{EngineConfig, SearchBudget};

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Engine config JSON file (flags below override it)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Fixed search depth in plies
    #[arg(long, conflicts_with = "time_ms")]
    pub depth: Option<u32>,

    /// Iterative deepening with this time allowance per move
    #[arg(long)]
    pub time_ms: Option<u64>,

    /// Depth cap for iterative deepening
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Path cost of an empty cell
    #[arg(long)]
    pub weight: Option<u32>,

    /// Ignore bridge patterns when evaluating
    #[arg(long)]
    pub no_bridges: bool,
}

impl SearchArgs {
    /// Config file (or defaults) with command-line overrides applied
    pub fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load(path)?,
            None => EngineConfig::default(),
        };

        if let Some(weight) = self.weight {
            config.eval.empty_cell_weight = weight;
        }
        if self.no_bridges {
            config.eval.use_bridges = false;
        }

        config.budget = match (self.depth, self.time_ms, self.max_depth) {
            (Some(depth), _, _) => SearchBudget::Depth(depth),
            (None, Some(ms), max_depth) => SearchBudget::Iterative {
                time_limit_ms: Some(ms),
                max_depth,
            },
            (None, None, Some(max_depth)) => SearchBudget::Iterative {
                time_limit_ms: None,
                max_depth: Some(max_depth),
            },
            (None, None, None) => config.budget.clone(),
        };

        config.validate()?;
        if !config.budget.is_bounded() {
            bail!("Iterative search needs a limit: pass --time-ms or --max-depth");
        }
        Ok(config)
    }
}
