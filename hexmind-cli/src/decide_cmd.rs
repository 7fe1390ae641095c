//! Decide command - pick one move for a position
//!
//! ## Architecture
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_position(), report_decision()

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use hexmind_core::{BoardState, Decision, DecisionController, Position};

use crate::search_args::SearchArgs;

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct DecideArgs {
    /// Position JSON file (defaults to an empty board)
    #[arg(long, value_name = "FILE")]
    pub position: Option<PathBuf>,

    /// Board size when no position file is given
    #[arg(long, default_value = "7", conflicts_with = "position")]
    pub size: usize,

    #[command(flatten)]
    pub search: SearchArgs,

    /// Output the decision as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run decide command
///
/// 1. Build the engine configuration
/// 2. Load the position
/// 3. Decide and report
pub fn run(args: DecideArgs) -> Result<()> {
    let config = args.search.engine_config()?;
    let state = load_position(&args)?;

    tracing::info!(
        "Deciding for {} on a {}x{} board ({:?})",
        state.current_player(),
        state.size(),
        state.size(),
        config.budget
    );

    let ai = DecisionController::from_config(&config)?;
    let decision = ai.decide(&state, &config.budget)?;

    report_decision(&state, &decision, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_position(args: &DecideArgs) -> Result<BoardState> {
    match &args.position {
        Some(path) => Ok(Position::load(path)?.to_board()?),
        None => Ok(BoardState::new(args.size)?),
    }
}

fn report_decision(state: &BoardState, decision: &Decision, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(decision)?);
        return Ok(());
    }

    let after = state.apply(decision.mv)?;
    println!("{after}");
    println!("{} plays {}", state.current_player(), decision.mv);
    println!(
        "  value={} depth={} nodes={} mode={:?} status={:?}",
        decision.stats.best_value,
        decision.stats.depth_reached,
        decision.stats.nodes_expanded,
        decision.stats.mode,
        decision.stats.status
    );
    Ok(())
}
