//! Engine error type

use crate::board::Cell;
use crate::game::Player;

/// Errors raised by board construction, move application and decisions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HexError {
    #[error("Illegal move: cell {cell} is already occupied")]
    IllegalMove { cell: Cell },

    #[error("Cell {cell} is outside a {size}x{size} board")]
    OutOfBounds { cell: Cell, size: usize },

    #[error("No legal moves: the board is full")]
    NoLegalMoves,

    #[error("Game is already over: {winner} has won")]
    GameOver { winner: Player },

    #[error("Invalid board size: {0}")]
    InvalidBoardSize(usize),

    #[error("Invalid position: {0}")]
    InvalidPosition(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, HexError>;
