//! Board state, move generation and terminal detection

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::{Cell, MAX_BOARD_SIZE};
use crate::error::{HexError, Result};

// ============================================================================
// CORE TYPES
// ============================================================================

/// Player color
///
/// Player one connects column 0 to column N-1, player two connects row 0 to
/// row N-1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    #[serde(rename = "player1")]
    One,
    #[serde(rename = "player2")]
    Two,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Glyph used by the text board format
    pub fn glyph(self) -> char {
        match self {
            Player::One => 'X',
            Player::Two => 'O',
        }
    }

    /// Is `cell` on the side this player's chains start from
    pub fn is_start_edge(self, cell: Cell) -> bool {
        match self {
            Player::One => cell.x == 0,
            Player::Two => cell.y == 0,
        }
    }

    /// Is `cell` on the side this player must reach
    pub fn is_goal_edge(self, cell: Cell, size: usize) -> bool {
        let last = size as i8 - 1;
        match self {
            Player::One => cell.x == last,
            Player::Two => cell.y == last,
        }
    }

    /// Cells of the starting side, in ascending order
    pub fn start_edge(self, size: usize) -> impl Iterator<Item = Cell> {
        (0..size as i8).map(move |i| match self {
            Player::One => Cell::new(0, i),
            Player::Two => Cell::new(i, 0),
        })
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::One => write!(f, "Player1"),
            Player::Two => write!(f, "Player2"),
        }
    }
}

/// A stone placement
pub type Move = Cell;

// ============================================================================
// BOARD STATE
// ============================================================================

/// N×N Hex position (clone to branch)
///
/// Cells only ever go from empty to owned. The winner is recomputed by a
/// connectivity search whenever a stone is placed, never carried over from
/// outside.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardState {
    size: usize,
    /// Row-major occupancy
    cells: Vec<Option<Player>>,
    current_player: Player,
    winner: Option<Player>,
}

impl BoardState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Empty board with player one to move
    pub fn new(size: usize) -> Result<Self> {
        check_size(size)?;
        Ok(Self {
            size,
            cells: vec![None; size * size],
            current_player: Player::One,
            winner: None,
        })
    }

    /// Position from row-major occupancy
    pub fn from_cells(size: usize, cells: Vec<Option<Player>>, to_move: Player) -> Result<Self> {
        check_size(size)?;
        if cells.len() != size * size {
            return Err(HexError::InvalidPosition(format!(
                "expected {} cells for a {size}x{size} board, got {}",
                size * size,
                cells.len()
            )));
        }

        let mut state = Self {
            size,
            cells,
            current_player: to_move,
            winner: None,
        };

        let one = state.connects(Player::One);
        let two = state.connects(Player::Two);
        state.winner = match (one, two) {
            // Impossible on a real Hex board
            (true, true) => {
                return Err(HexError::InvalidPosition(
                    "both players have a connecting chain".to_string(),
                ))
            }
            (true, false) => Some(Player::One),
            (false, true) => Some(Player::Two),
            (false, false) => None,
        };

        Ok(state)
    }

    /// Position from text rows (`.` empty, `X`/`1` player one, `O`/`2` player two)
    ///
    /// Whitespace inside a row is ignored so indented rhombus drawings parse.
    pub fn from_rows<S: AsRef<str>>(rows: &[S], to_move: Player) -> Result<Self> {
        let size = rows.len();
        check_size(size)?;

        let mut cells = Vec::with_capacity(size * size);
        for (y, row) in rows.iter().enumerate() {
            let before = cells.len();
            for ch in row.as_ref().chars().filter(|c| !c.is_whitespace()) {
                cells.push(parse_glyph(ch)?);
            }
            let width = cells.len() - before;
            if width != size {
                return Err(HexError::InvalidPosition(format!(
                    "row {y} has {width} cells, expected {size}"
                )));
            }
        }

        Self::from_cells(size, cells, to_move)
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn size(&self) -> usize {
        self.size
    }

    /// Player to move next
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Owner of a cell (`None` for empty or off-board cells)
    pub fn cell_owner(&self, cell: Cell) -> Option<Player> {
        if cell.is_valid(self.size) {
            self.cells[cell.index(self.size)]
        } else {
            None
        }
    }

    pub fn is_empty(&self, cell: Cell) -> bool {
        cell.is_valid(self.size) && self.cells[cell.index(self.size)].is_none()
    }

    /// On-board neighbors of a cell (up to six)
    pub fn neighbors(&self, cell: Cell) -> Vec<Cell> {
        cell.neighbors(self.size).collect()
    }

    pub fn stone_count(&self, player: Player) -> usize {
        self.cells.iter().filter(|&&c| c == Some(player)).count()
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    /// Player with a connecting chain, if any
    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    pub fn is_terminal(&self) -> bool {
        self.winner.is_some()
    }

    // ========================================================================
    // MOVE GENERATION
    // ========================================================================

    /// Empty cells in row-major order
    pub fn legal_moves(&self) -> Vec<Move> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_none())
            .map(|(i, _)| Cell::from_index(i, self.size))
            .collect()
    }

    // ========================================================================
    // MOVE APPLICATION
    // ========================================================================

    /// Place the current player's stone and pass the turn (returns a new state)
    pub fn apply(&self, mv: Move) -> Result<Self> {
        if !mv.is_valid(self.size) {
            return Err(HexError::OutOfBounds {
                cell: mv,
                size: self.size,
            });
        }
        let index = mv.index(self.size);
        if self.cells[index].is_some() {
            return Err(HexError::IllegalMove { cell: mv });
        }

        let mut next = self.clone();
        next.cells[index] = Some(self.current_player);
        next.current_player = self.current_player.opponent();
        next.winner = next.find_winner();
        Ok(next)
    }

    // ========================================================================
    // CONNECTIVITY
    // ========================================================================

    fn find_winner(&self) -> Option<Player> {
        [Player::One, Player::Two]
            .into_iter()
            .find(|&p| self.connects(p))
    }

    /// Flood fill from the player's start side through own stones
    pub fn connects(&self, player: Player) -> bool {
        let mut visited = vec![false; self.cells.len()];
        let mut queue = VecDeque::new();

        for cell in player.start_edge(self.size) {
            let index = cell.index(self.size);
            if self.cells[index] == Some(player) {
                visited[index] = true;
                queue.push_back(cell);
            }
        }

        while let Some(cell) = queue.pop_front() {
            if player.is_goal_edge(cell, self.size) {
                return true;
            }
            for next in cell.neighbors(self.size) {
                let index = next.index(self.size);
                if !visited[index] && self.cells[index] == Some(player) {
                    visited[index] = true;
                    queue.push_back(next);
                }
            }
        }

        false
    }
}

fn check_size(size: usize) -> Result<()> {
    if size == 0 || size > MAX_BOARD_SIZE {
        return Err(HexError::InvalidBoardSize(size));
    }
    Ok(())
}

fn parse_glyph(ch: char) -> Result<Option<Player>> {
    match ch {
        '.' | '0' => Ok(None),
        'X' | 'x' | '1' => Ok(Some(Player::One)),
        'O' | 'o' | '2' => Ok(Some(Player::Two)),
        other => Err(HexError::InvalidPosition(format!(
            "unknown cell glyph '{other}'"
        ))),
    }
}

/// Parses text rows; the side to move is inferred from stone counts
impl FromStr for BoardState {
    type Err = HexError;

    fn from_str(s: &str) -> Result<Self> {
        let rows: Vec<&str> = s.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        let board = Self::from_rows(&rows, Player::One)?;

        let ones = board.stone_count(Player::One);
        let twos = board.stone_count(Player::Two);
        let to_move = if ones == twos {
            Player::One
        } else if ones == twos + 1 {
            Player::Two
        } else {
            return Err(HexError::InvalidPosition(format!(
                "cannot infer side to move from {ones} vs {twos} stones"
            )));
        };

        Ok(Self {
            current_player: to_move,
            ..board
        })
    }
}

/// Staggered rhombus, one row per line
impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.size {
            write!(f, "{}", " ".repeat(y))?;
            for x in 0..self.size {
                let glyph = self.cells[y * self.size + x].map_or('.', Player::glyph);
                if x + 1 < self.size {
                    write!(f, "{glyph} ")?;
                } else {
                    write!(f, "{glyph}")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
