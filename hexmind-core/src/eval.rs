//! Position evaluation by weighted shortest path
//!
//! A player's distance is the cheapest route between their two sides where
//! own stones cost nothing, empty cells cost the configured weight and
//! opponent stones block. Bridges (two empty carriers between a pair of
//! cells) are crossed at a flat cost because a single reply cannot cut them.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use crate::board::{Cell, MAX_BOARD_SIZE};
use crate::error::{HexError, Result};
use crate::game::{BoardState, Player};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Score of a won position (before the depth bonus)
pub const WIN_SCORE: i32 = 1_000_000_000;

/// Score of a lost position (before the depth penalty)
pub const LOSS_SCORE: i32 = -WIN_SCORE;

/// Heuristic scores are clamped to this magnitude
pub const HEURISTIC_LIMIT: i32 = 10_000_000;

/// Distance reported when the goal side cannot be reached
pub const UNREACHABLE: u32 = u32::MAX;

/// Upper bound for `empty_cell_weight` and `bridge_cost`
pub const MAX_CELL_WEIGHT: u32 = 1_000;

// Largest finite distance stays below the heuristic clamp
const _: () = assert!(
    (MAX_BOARD_SIZE * MAX_BOARD_SIZE) as i64 * (2 * MAX_CELL_WEIGHT as i64) < HEURISTIC_LIMIT as i64
);

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Path weights
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Cost of routing through an empty cell
    pub empty_cell_weight: u32,
    /// Extra cost of crossing a bridge, on top of the partner cell's cost
    pub bridge_cost: u32,
    /// Add bridge edges to the path graph
    pub use_bridges: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            empty_cell_weight: 2,
            bridge_cost: 1,
            use_bridges: true,
        }
    }
}

impl EvalConfig {
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_CELL_WEIGHT).contains(&self.empty_cell_weight) {
            return Err(HexError::InvalidConfig(format!(
                "empty_cell_weight must be in 1..={MAX_CELL_WEIGHT}, got {}",
                self.empty_cell_weight
            )));
        }
        if !(1..=MAX_CELL_WEIGHT).contains(&self.bridge_cost) {
            return Err(HexError::InvalidConfig(format!(
                "bridge_cost must be in 1..={MAX_CELL_WEIGHT}, got {}",
                self.bridge_cost
            )));
        }
        Ok(())
    }
}

// ============================================================================
// PATH EVALUATOR
// ============================================================================

/// Shortest-path position evaluator
#[derive(Clone, Debug, Default)]
pub struct PathEvaluator {
    config: EvalConfig,
}

impl PathEvaluator {
    pub fn new(config: EvalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Cheapest route between the player's two sides, or [`UNREACHABLE`]
    ///
    /// Zero exactly when the player already owns a connecting chain.
    pub fn distance(&self, state: &BoardState, player: Player) -> u32 {
        let size = state.size();
        self.dijkstra(state, player, player.start_edge(size), |cell| {
            player.is_goal_edge(cell, size)
        })
    }

    /// Cheapest route from `from` to `to` for `player`, or [`UNREACHABLE`]
    ///
    /// Both endpoints are charged like any other cell, so two own stones
    /// joined by a bridge cost `bridge_cost`.
    pub fn connection_cost(&self, state: &BoardState, player: Player, from: Cell, to: Cell) -> u32 {
        if !from.is_valid(state.size()) || !to.is_valid(state.size()) {
            return UNREACHABLE;
        }
        self.dijkstra(state, player, std::iter::once(from), |cell| cell == to)
    }

    /// Heuristic score from `perspective`'s point of view (higher is better)
    ///
    /// Opponent distance minus own distance. Unreachable distances count as
    /// one more than any finite route.
    pub fn heuristic(&self, state: &BoardState, perspective: Player) -> i32 {
        let cap = self.distance_cap(state.size());
        let own = self.distance(state, perspective).min(cap) as i64;
        let opponent = self.distance(state, perspective.opponent()).min(cap) as i64;
        let limit = HEURISTIC_LIMIT as i64;
        (opponent - own).clamp(-limit, limit) as i32
    }

    /// Score of any position; decided games get the win/loss sentinels
    pub fn evaluate(&self, state: &BoardState, perspective: Player) -> i32 {
        self.evaluate_with_depth(state, perspective, 0)
    }

    /// Like [`PathEvaluator::evaluate`], preferring faster wins and slower losses
    pub fn evaluate_with_depth(&self, state: &BoardState, perspective: Player, depth: u32) -> i32 {
        match state.winner() {
            Some(winner) => terminal_score(winner, perspective, depth),
            None => self.heuristic(state, perspective),
        }
    }

    // ========================================================================
    // GRAPH SEARCH
    // ========================================================================

    /// Cost of stepping onto a cell (`None` if blocked)
    fn entry_cost(&self, state: &BoardState, cell: Cell, player: Player) -> Option<u32> {
        match state.cell_owner(cell) {
            Some(owner) if owner == player => Some(0),
            Some(_) => None,
            None => Some(self.config.empty_cell_weight),
        }
    }

    fn distance_cap(&self, size: usize) -> u32 {
        let per_cell = self.config.empty_cell_weight + self.config.bridge_cost;
        (size * size) as u32 * per_cell + 1
    }

    fn dijkstra<I, F>(&self, state: &BoardState, player: Player, sources: I, is_target: F) -> u32
    where
        I: IntoIterator<Item = Cell>,
        F: Fn(Cell) -> bool,
    {
        let size = state.size();
        let mut dist = vec![UNREACHABLE; size * size];
        let mut frontier = BinaryHeap::new();

        for cell in sources {
            if let Some(cost) = self.entry_cost(state, cell, player) {
                let index = cell.index(size);
                if cost < dist[index] {
                    dist[index] = cost;
                    frontier.push(Reverse((cost, index)));
                }
            }
        }

        while let Some(Reverse((d, index))) = frontier.pop() {
            if d > dist[index] {
                continue;
            }
            let cell = Cell::from_index(index, size);
            if is_target(cell) {
                return d;
            }

            let mut relax = |next: Cell, step: u32| {
                let next_index = next.index(size);
                let candidate = d + step;
                if candidate < dist[next_index] {
                    dist[next_index] = candidate;
                    frontier.push(Reverse((candidate, next_index)));
                }
            };

            for next in cell.neighbors(size) {
                if let Some(cost) = self.entry_cost(state, next, player) {
                    relax(next, cost);
                }
            }

            if self.config.use_bridges {
                for bridge in cell.bridges(size) {
                    if !bridge.carriers.iter().all(|&c| state.is_empty(c)) {
                        continue;
                    }
                    if let Some(cost) = self.entry_cost(state, bridge.partner, player) {
                        relax(bridge.partner, self.config.bridge_cost + cost);
                    }
                }
            }
        }

        UNREACHABLE
    }
}

/// Win/loss sentinel adjusted by remaining depth
///
/// Depth never exceeds the cell count, so the result stays far outside the
/// heuristic range.
pub fn terminal_score(winner: Player, perspective: Player, depth: u32) -> i32 {
    let bonus = depth.min((MAX_BOARD_SIZE * MAX_BOARD_SIZE) as u32) as i32;
    if winner == perspective {
        WIN_SCORE + bonus
    } else {
        LOSS_SCORE - bonus
    }
}

// ============================================================================
// TESTS
// ============================================================================
