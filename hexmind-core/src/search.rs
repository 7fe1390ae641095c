//! Depth-limited minimax with alpha-beta pruning
//!
//! The engine itself holds no per-search state. Everything a search needs
//! (who is maximizing, the cancellation latch, the deadline, node counts) is
//! carried in a [`SearchContext`] threaded through the recursion.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::error::Result;
use crate::eval::PathEvaluator;
use crate::game::{BoardState, Player};

// ============================================================================
// CANCELLATION
// ============================================================================

/// Shared "cancel requested" latch
///
/// Once set it stays set until the owning controller starts its next
/// decision. Repeated `cancel()` calls are no-ops.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    pub(crate) fn reset(&self) {
        self.flag.store(false, Ordering::Release);
    }
}

// ============================================================================
// SEARCH CONTEXT
// ============================================================================

/// Per-decision search state
#[derive(Debug)]
pub struct SearchContext {
    player: Player,
    cancel: CancelToken,
    deadline: Option<Instant>,
    nodes_expanded: u64,
    interrupted: bool,
}

impl SearchContext {
    /// Context maximizing for `player`
    pub fn new(player: Player, cancel: CancelToken) -> Self {
        Self {
            player,
            cancel,
            deadline: None,
            nodes_expanded: 0,
            interrupted: false,
        }
    }

    /// Latch the cancel token once `deadline` passes
    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn opponent(&self) -> Player {
        self.player.opponent()
    }

    /// Nodes visited so far (diagnostic only)
    pub fn nodes_expanded(&self) -> u64 {
        self.nodes_expanded
    }

    /// Whether some search under this context stopped early
    ///
    /// Set the first time [`SearchContext::is_cancelled`] answers `true`, so a
    /// subtree that finished before the cancel arrived still counts as whole.
    pub fn was_interrupted(&self) -> bool {
        self.interrupted
    }

    /// Has cancellation been requested or the deadline passed
    pub fn is_cancelled(&mut self) -> bool {
        let expired = self.deadline.is_some_and(|deadline| Instant::now() >= deadline);
        if expired {
            self.cancel.cancel();
        }
        if self.cancel.is_cancelled() {
            self.interrupted = true;
        }
        self.interrupted
    }
}

// ============================================================================
// ALPHA-BETA
// ============================================================================

/// Minimax searcher scoring leaves with a [`PathEvaluator`]
#[derive(Clone, Copy, Debug)]
pub struct SearchEngine<'a> {
    evaluator: &'a PathEvaluator,
}

impl<'a> SearchEngine<'a> {
    pub fn new(evaluator: &'a PathEvaluator) -> Self {
        Self { evaluator }
    }

    pub fn evaluator(&self) -> &'a PathEvaluator {
        self.evaluator
    }

    /// Value of `state` from the context player's point of view
    ///
    /// `depth` counts remaining plies. Once cancelled no further moves are
    /// expanded and the best value seen so far is returned; a node that never
    /// got to expand a child returns its static evaluation.
    pub fn alpha_beta(
        &self,
        ctx: &mut SearchContext,
        state: &BoardState,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> Result<i32> {
        ctx.nodes_expanded += 1;

        if ctx.is_cancelled() || depth == 0 || state.is_terminal() {
            return Ok(self.leaf_value(ctx, state, depth));
        }

        let moves = state.legal_moves();
        let mut best: Option<i32> = None;

        if maximizing {
            for mv in moves {
                if ctx.is_cancelled() {
                    break;
                }
                let child = state.apply(mv)?;
                let value = self.alpha_beta(ctx, &child, depth - 1, alpha, beta, false)?;
                let best_value = best.map_or(value, |b| b.max(value));
                best = Some(best_value);
                alpha = alpha.max(best_value);
                if best_value >= beta {
                    break;
                }
            }
        } else {
            for mv in moves {
                if ctx.is_cancelled() {
                    break;
                }
                let child = state.apply(mv)?;
                let value = self.alpha_beta(ctx, &child, depth - 1, alpha, beta, true)?;
                let best_value = best.map_or(value, |b| b.min(value));
                best = Some(best_value);
                beta = beta.min(best_value);
                if best_value <= alpha {
                    break;
                }
            }
        }

        Ok(best.unwrap_or_else(|| self.leaf_value(ctx, state, depth)))
    }

    fn leaf_value(&self, ctx: &SearchContext, state: &BoardState, depth: u32) -> i32 {
        self.evaluator.evaluate_with_depth(state, ctx.player, depth)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;
    use crate::eval::{HEURISTIC_LIMIT, WIN_SCORE};

    fn board(rows: &[&str], to_move: Player) -> BoardState {
        BoardState::from_rows(rows, to_move).unwrap()
    }

    #[test]
    fn test_cancel_token_is_a_latch() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
        token.cancel();
        token.cancel();
        assert!(token.is_cancelled());
        let clone = token.clone();
        assert!(clone.is_cancelled());
        token.reset();
        assert!(!clone.is_cancelled());
    }

    #[test]
    fn test_expired_deadline_latches_token() {
        let token = CancelToken::new();
        let mut ctx =
            SearchContext::new(Player::One, token.clone()).with_deadline(Some(Instant::now()));
        assert!(!ctx.was_interrupted());
        assert!(ctx.is_cancelled());
        assert!(token.is_cancelled());
        assert!(ctx.was_interrupted());
    }

    #[test]
    fn test_cancel_after_search_does_not_mark_interrupted() {
        let evaluator = PathEvaluator::default();
        let engine = SearchEngine::new(&evaluator);
        let state = BoardState::new(3).unwrap();
        let token = CancelToken::new();
        let mut ctx = SearchContext::new(Player::One, token.clone());
        engine.alpha_beta(&mut ctx, &state, 2, i32::MIN, i32::MAX, true).unwrap();
        token.cancel();
        assert!(!ctx.was_interrupted());
    }

    #[test]
    fn test_depth_zero_is_static_evaluation() {
        let evaluator = PathEvaluator::default();
        let engine = SearchEngine::new(&evaluator);
        let state = BoardState::new(3).unwrap();
        let mut ctx = SearchContext::new(Player::One, CancelToken::new());
        let value = engine.alpha_beta(&mut ctx, &state, 0, i32::MIN, i32::MAX, true).unwrap();
        assert_eq!(value, evaluator.heuristic(&state, Player::One));
        assert_eq!(ctx.nodes_expanded(), 1);
    }

    #[test]
    fn test_finds_forced_win() {
        // Player one completes the middle row next move
        let state = board(&["O..", "XX.", "O.."], Player::One);
        let evaluator = PathEvaluator::default();
        let engine = SearchEngine::new(&evaluator);
        let mut ctx = SearchContext::new(Player::One, CancelToken::new());
        let value = engine.alpha_beta(&mut ctx, &state, 2, i32::MIN, i32::MAX, true).unwrap();
        assert!(value >= WIN_SCORE);
    }

    #[test]
    fn test_sees_opponent_threat() {
        // Player two, to move, completes the column at (1,2) or (0,2)
        let state = board(&[".O.", "XO.", "..."], Player::Two);
        let evaluator = PathEvaluator::default();
        let engine = SearchEngine::new(&evaluator);
        let mut ctx = SearchContext::new(Player::One, CancelToken::new());
        let value = engine.alpha_beta(&mut ctx, &state, 1, i32::MIN, i32::MAX, false).unwrap();
        assert!(value < -HEURISTIC_LIMIT);
    }

    #[test]
    fn test_cancelled_search_returns_static_value() {
        let evaluator = PathEvaluator::default();
        let engine = SearchEngine::new(&evaluator);
        let state = BoardState::new(4).unwrap().apply(Cell::new(1, 1)).unwrap();
        let token = CancelToken::new();
        token.cancel();
        let mut ctx = SearchContext::new(Player::Two, token);
        let value = engine.alpha_beta(&mut ctx, &state, 5, i32::MIN, i32::MAX, true).unwrap();
        assert_eq!(value, evaluator.heuristic(&state, Player::Two));
        assert_eq!(ctx.nodes_expanded(), 1);
    }

    #[test]
    fn test_pruning_visits_fewer_nodes() {
        let evaluator = PathEvaluator::default();
        let engine = SearchEngine::new(&evaluator);
        let state = BoardState::new(3).unwrap();

        let mut full = SearchContext::new(Player::One, CancelToken::new());
        let mut narrow = SearchContext::new(Player::One, CancelToken::new());
        let a = engine.alpha_beta(&mut full, &state, 3, i32::MIN, i32::MAX, true).unwrap();
        let b = engine.alpha_beta(&mut narrow, &state, 3, a - 1, a + 1, true).unwrap();
        assert_eq!(a, b);
        assert!(narrow.nodes_expanded() <= full.nodes_expanded());
    }
}
