//! Play command - engine plays both sides of one game
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_opening(), play_game(), report_game()
//! - Level 3: formatting utilities

use anyhow::Result;
use clap::Args;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use hexmind_core::{BoardState, DecisionController, EngineConfig, Move, Player, SearchStats};

use crate::search_args::SearchArgs;

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Board size
    #[arg(long, default_value = "7")]
    pub size: usize,

    /// Random opening stones placed before the engine takes over
    #[arg(long, default_value = "0")]
    pub openings: usize,

    /// Seed for the random opening
    #[arg(long)]
    pub seed: Option<u64>,

    #[command(flatten)]
    pub search: SearchArgs,

    /// Output the game record as JSON
    #[arg(long)]
    pub json: bool,
}

/// One placed stone
#[derive(Clone, Debug, Serialize)]
struct MoveRecord {
    player: Player,
    cell: Move,
    /// `None` for random opening stones
    stats: Option<SearchStats>,
}

/// Full game record
#[derive(Clone, Debug, Serialize)]
struct GameRecord {
    size: usize,
    winner: Option<Player>,
    total_nodes: u64,
    moves: Vec<MoveRecord>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Build the engine and the empty board
/// 2. Place the random opening
/// 3. Alternate engine decisions until someone connects
/// 4. Report the game
pub fn run(args: PlayArgs) -> Result<()> {
    let config = args.search.engine_config()?;
    let ai = DecisionController::from_config(&config)?;
    let mut rng = create_rng(args.seed);

    let mut state = BoardState::new(args.size)?;
    let mut moves = Vec::new();

    tracing::info!(
        "Self-play on {}x{} ({} opening stones, {:?})",
        args.size,
        args.size,
        args.openings,
        config.budget
    );

    play_opening(&mut state, &mut moves, args.openings, &mut rng)?;
    play_game(&ai, &config, &mut state, &mut moves)?;

    let record = GameRecord {
        size: args.size,
        winner: state.winner(),
        total_nodes: moves
            .iter()
            .filter_map(|m| m.stats.as_ref())
            .map(|s| s.nodes_expanded)
            .sum(),
        moves,
    };

    report_game(&state, &record, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn play_opening(
    state: &mut BoardState,
    moves: &mut Vec<MoveRecord>,
    openings: usize,
    rng: &mut ChaCha8Rng,
) -> Result<()> {
    for _ in 0..openings {
        if state.is_terminal() {
            break;
        }
        let legal = state.legal_moves();
        let Some(&cell) = legal.choose(rng) else { break };
        moves.push(MoveRecord {
            player: state.current_player(),
            cell,
            stats: None,
        });
        *state = state.apply(cell)?;
    }
    Ok(())
}

fn play_game(
    ai: &DecisionController,
    config: &EngineConfig,
    state: &mut BoardState,
    moves: &mut Vec<MoveRecord>,
) -> Result<()> {
    while !state.is_terminal() {
        let player = state.current_player();
        let decision = ai.decide(state, &config.budget)?;
        tracing::debug!("move {}: {} plays {}", moves.len() + 1, player, decision.mv);

        *state = state.apply(decision.mv)?;
        moves.push(MoveRecord {
            player,
            cell: decision.mv,
            stats: Some(decision.stats),
        });
    }
    Ok(())
}

fn report_game(state: &BoardState, record: &GameRecord, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(record)?);
        return Ok(());
    }

    for (i, mv) in record.moves.iter().enumerate() {
        println!("{}", format_move(i + 1, mv));
    }
    println!();
    println!("{state}");
    match record.winner {
        Some(winner) => println!("{} wins after {} moves", winner, record.moves.len()),
        None => println!("No winner after {} moves", record.moves.len()),
    }
    println!("Nodes expanded: {}", record.total_nodes);
    Ok(())
}

// ============================================================================
// LEVEL 3 - UTILITIES
// ============================================================================

fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn format_move(number: usize, mv: &MoveRecord) -> String {
    match &mv.stats {
        Some(stats) => format!(
            "{:>3}. {} {} (value={}, depth={}, nodes={})",
            number, mv.player, mv.cell, stats.best_value, stats.depth_reached, stats.nodes_expanded
        ),
        None => format!("{:>3}. {} {} (opening)", number, mv.player, mv.cell),
    }
}
