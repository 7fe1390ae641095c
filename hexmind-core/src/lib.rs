//! HEXMIND Core - Hex move engine
//!
//! This crate provides the decision engine for the connection game Hex:
//! - Board geometry (axial coordinates, neighbors, bridge patterns)
//! - Board state, move generation and win detection
//! - Shortest-path position evaluation with bridge awareness
//! - Alpha-beta minimax with iterative deepening and cancellation
//! - A decision controller that packages moves with search statistics

pub mod board;
pub mod error;
pub mod game;
pub mod eval;
pub mod search;
pub mod ai;
pub mod config;
pub mod position;

// Re-exports for convenient access
pub use board::{Cell, DIRECTIONS, MAX_BOARD_SIZE};
pub use error::HexError;
pub use game::{BoardState, Move, Player};
pub use eval::{EvalConfig, PathEvaluator, LOSS_SCORE, UNREACHABLE, WIN_SCORE};
pub use search::{CancelToken, SearchContext, SearchEngine};
pub use ai::{Decision, DecisionController, SearchMode, SearchStats, SearchStatus};
pub use config::{EngineConfig, SearchBudget};
pub use position::Position;
