//! Position files

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{HexError, Result};
use crate::game::{BoardState, Player};

/// Serializable board snapshot
///
/// `rows[y]` lists the cells of row `y` from column 0, using `.` for empty,
/// `X` for player one and `O` for player two. Spaces are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub size: usize,
    pub to_move: Player,
    pub rows: Vec<String>,
}

impl Position {
    pub fn from_board(state: &BoardState) -> Self {
        let rows = state
            .to_string()
            .lines()
            .map(|line| line.split_whitespace().collect::<String>())
            .collect();
        Self {
            size: state.size(),
            to_move: state.current_player(),
            rows,
        }
    }

    pub fn to_board(&self) -> Result<BoardState> {
        if self.rows.len() != self.size {
            return Err(HexError::InvalidPosition(format!(
                "size is {} but {} rows were given",
                self.size,
                self.rows.len()
            )));
        }
        BoardState::from_rows(&self.rows, self.to_move)
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read position: {}", path.display()))?;
        let position = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse position: {}", path.display()))?;
        Ok(position)
    }

    /// Save to a JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
