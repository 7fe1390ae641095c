//! Hex board geometry with axial coordinates

use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest supported board edge
pub const MAX_BOARD_SIZE: usize = 25;

/// Axial cell coordinates: `x` is the column, `y` the row
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i8,
    pub y: i8,
}

impl Cell {
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// Check if this cell is on an N×N board
    pub fn is_valid(&self, size: usize) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as usize) < size && (self.y as usize) < size
    }

    /// Row-major index on an N×N board (caller guarantees validity)
    pub fn index(&self, size: usize) -> usize {
        self.y as usize * size + self.x as usize
    }

    /// Inverse of [`Cell::index`]
    pub fn from_index(index: usize, size: usize) -> Self {
        Self::new((index % size) as i8, (index / size) as i8)
    }

    /// Cell reached by an axial offset (may be off-board)
    ///
    /// `None` only when a coordinate leaves the `i8` range.
    pub fn offset(&self, (dx, dy): (i8, i8)) -> Option<Cell> {
        Some(Cell::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }

    /// On-board neighbors in `DIRECTIONS` order
    pub fn neighbors(&self, size: usize) -> impl Iterator<Item = Cell> + '_ {
        let origin = *self;
        DIRECTIONS
            .iter()
            .filter_map(move |&d| origin.offset(d))
            .filter(move |c| c.is_valid(size))
    }

    /// On-board bridge partners together with their two carrier cells
    pub fn bridges(&self, size: usize) -> impl Iterator<Item = Bridge> + '_ {
        let origin = *self;
        BRIDGE_PATTERNS.iter().filter_map(move |pattern| {
            let bridge = Bridge {
                partner: origin.offset(pattern.partner)?,
                carriers: [
                    origin.offset(pattern.carriers[0])?,
                    origin.offset(pattern.carriers[1])?,
                ],
            };
            let on_board = bridge.partner.is_valid(size)
                && bridge.carriers.iter().all(|c| c.is_valid(size));
            on_board.then_some(bridge)
        })
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Neighbor offsets (dx, dy)
pub const DIRECTIONS: [(i8, i8); 6] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, 1),
    (1, -1),
];

/// Two-cell virtual connection: partner offset plus the two shared neighbors
#[derive(Clone, Copy, Debug)]
struct BridgePattern {
    partner: (i8, i8),
    carriers: [(i8, i8); 2],
}

/// Each partner sits two steps away and shares exactly two neighbors with the origin
const BRIDGE_PATTERNS: [BridgePattern; 6] = [
    BridgePattern { partner: (1, 1), carriers: [(1, 0), (0, 1)] },
    BridgePattern { partner: (-1, -1), carriers: [(-1, 0), (0, -1)] },
    BridgePattern { partner: (2, -1), carriers: [(1, 0), (1, -1)] },
    BridgePattern { partner: (-2, 1), carriers: [(-1, 0), (-1, 1)] },
    BridgePattern { partner: (1, -2), carriers: [(0, -1), (1, -1)] },
    BridgePattern { partner: (-1, 2), carriers: [(0, 1), (-1, 1)] },
];

/// A bridge anchored at some origin cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bridge {
    pub partner: Cell,
    pub carriers: [Cell; 2],
}
