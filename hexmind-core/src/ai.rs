//! Move decisions: fixed-depth or iterative-deepening alpha-beta

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, SearchBudget};
use crate::error::{HexError, Result};
use crate::eval::{EvalConfig, PathEvaluator, WIN_SCORE};
use crate::game::{BoardState, Move};
use crate::search::{CancelToken, SearchContext, SearchEngine};

// ============================================================================
// RESULT TYPES
// ============================================================================

/// Which search drove a decision
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    FixedDepth,
    IterativeDeepening,
}

/// How a decision's search ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    Completed,
    Cancelled,
}

/// Diagnostics reported alongside a move
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub nodes_expanded: u64,
    /// Deepest depth whose result was used; below the requested depth when
    /// the search was cancelled
    pub depth_reached: u32,
    pub mode: SearchMode,
    pub status: SearchStatus,
    /// Root value of the chosen move, from the mover's point of view
    pub best_value: i32,
}

/// Chosen move plus statistics
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub mv: Move,
    pub stats: SearchStats,
}

/// Outcome of one sweep over the root moves
#[derive(Clone, Copy, Debug)]
struct RootPass {
    best: Option<(Move, i32)>,
    /// Every root move was searched to full depth
    complete: bool,
    /// Root moves whose subtrees finished before any cancel
    finished: usize,
    /// A root move ends the game on the spot
    immediate_win: bool,
}

// ============================================================================
// DECISION CONTROLLER
// ============================================================================

/// Public entry point: picks a move for the side to play
///
/// Holds only configuration and the cancel latch, so one controller can be
/// reused across decisions. [`DecisionController::cancel_handle`] gives a
/// clonable handle that a timer thread can fire.
#[derive(Debug, Default)]
pub struct DecisionController {
    evaluator: PathEvaluator,
    cancel: CancelToken,
}

impl DecisionController {
    pub fn new(eval: EvalConfig) -> Self {
        Self {
            evaluator: PathEvaluator::new(eval),
            cancel: CancelToken::new(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.eval.clone()))
    }

    pub fn evaluator(&self) -> &PathEvaluator {
        &self.evaluator
    }

    /// Handle for requesting cancellation from another thread
    pub fn cancel_handle(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Ask the running decision to wrap up with its best answer
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Choose a move for `state.current_player()` within `budget`
    ///
    /// Clears any earlier cancel request first. Fails when no empty cell is
    /// left or the game already has a winner.
    pub fn decide(&self, state: &BoardState, budget: &SearchBudget) -> Result<Decision> {
        budget.validate()?;
        self.cancel.reset();

        let moves = state.legal_moves();
        let first = *moves.first().ok_or(HexError::NoLegalMoves)?;
        if let Some(winner) = state.winner() {
            return Err(HexError::GameOver { winner });
        }

        let deadline = budget.time_limit().map(|limit| Instant::now() + limit);
        let mut ctx =
            SearchContext::new(state.current_player(), self.cancel.clone()).with_deadline(deadline);

        let decision = match budget {
            SearchBudget::Depth(depth) => self.fixed_depth(&mut ctx, state, &moves, *depth)?,
            SearchBudget::Iterative { max_depth, .. } => {
                self.iterative_deepening(&mut ctx, state, &moves, *max_depth, first)?
            }
        };

        tracing::info!(
            "{} plays {} (value={}, depth={}, nodes={}, {:?})",
            state.current_player(),
            decision.mv,
            decision.stats.best_value,
            decision.stats.depth_reached,
            decision.stats.nodes_expanded,
            decision.stats.status
        );

        Ok(decision)
    }

    // ========================================================================
    // SEARCH MODES
    // ========================================================================

    fn fixed_depth(
        &self,
        ctx: &mut SearchContext,
        state: &BoardState,
        moves: &[Move],
        depth: u32,
    ) -> Result<Decision> {
        let pass = self.search_root(ctx, state, moves, depth)?;
        let (mv, best_value) = match pass.best {
            Some(best) => best,
            None => (moves[0], self.evaluator.evaluate(state, ctx.player())),
        };

        // A cancelled pass only vouches for the ply below the root, and only
        // if at least one root subtree ran to completion
        let depth_reached = match (pass.complete, pass.finished) {
            (true, _) => depth,
            (false, 0) => 0,
            (false, _) => depth - 1,
        };

        Ok(Decision {
            mv,
            stats: SearchStats {
                nodes_expanded: ctx.nodes_expanded(),
                depth_reached,
                mode: SearchMode::FixedDepth,
                status: status_of(pass.complete),
                best_value,
            },
        })
    }

    /// Deepen one ply at a time; keep the result of the deepest full pass
    fn iterative_deepening(
        &self,
        ctx: &mut SearchContext,
        state: &BoardState,
        moves: &[Move],
        max_depth: Option<u32>,
        fallback: Move,
    ) -> Result<Decision> {
        // Past this depth the whole remaining game tree is already covered
        let exhaustive_depth = moves.len() as u32;
        let depth_cap = max_depth.map_or(exhaustive_depth, |d| d.min(exhaustive_depth));

        let mut completed: Option<((Move, i32), u32)> = None;
        let mut partial: Option<(Move, i32)> = None;
        let mut status = SearchStatus::Completed;

        for depth in 1..=depth_cap {
            let pass = self.search_root(ctx, state, moves, depth)?;

            if !pass.complete {
                partial = pass.best;
                status = SearchStatus::Cancelled;
                break;
            }

            let Some(best) = pass.best else { break };
            tracing::debug!(
                "depth {} complete: best={} value={} nodes={}",
                depth,
                best.0,
                best.1,
                ctx.nodes_expanded()
            );
            completed = Some((best, depth));

            if pass.immediate_win || best.1.abs() >= WIN_SCORE {
                break;
            }
        }

        let ((mv, best_value), depth_reached) = match completed {
            Some(done) => done,
            None => {
                let best = partial.unwrap_or_else(|| {
                    (fallback, self.evaluator.evaluate(state, ctx.player()))
                });
                tracing::warn!("cancelled before the first pass completed, playing {}", best.0);
                (best, 0)
            }
        };

        Ok(Decision {
            mv,
            stats: SearchStats {
                nodes_expanded: ctx.nodes_expanded(),
                depth_reached,
                mode: SearchMode::IterativeDeepening,
                status,
                best_value,
            },
        })
    }

    // ========================================================================
    // ROOT SEARCH
    // ========================================================================

    /// Search every root move to `depth` plies (the root move included)
    ///
    /// Ties keep the earliest move in generation order.
    fn search_root(
        &self,
        ctx: &mut SearchContext,
        state: &BoardState,
        moves: &[Move],
        depth: u32,
    ) -> Result<RootPass> {
        let depth = depth.max(1);
        let engine = SearchEngine::new(&self.evaluator);
        let mut best: Option<(Move, i32)> = None;
        let mut finished = 0;

        for &mv in moves {
            if ctx.is_cancelled() {
                break;
            }

            let child = state.apply(mv)?;
            if child.is_terminal() {
                let value = self.evaluator.evaluate_with_depth(&child, ctx.player(), depth - 1);
                return Ok(RootPass {
                    best: Some((mv, value)),
                    complete: true,
                    finished: finished + 1,
                    immediate_win: true,
                });
            }

            let alpha = best.map_or(i32::MIN, |(_, value)| value);
            let value = engine.alpha_beta(ctx, &child, depth - 1, alpha, i32::MAX, false)?;
            if best.map_or(true, |(_, b)| value > b) {
                best = Some((mv, value));
            }
            if ctx.was_interrupted() {
                break;
            }
            finished += 1;
        }

        Ok(RootPass {
            best,
            complete: finished == moves.len(),
            finished,
            immediate_win: false,
        })
    }
}

fn status_of(complete: bool) -> SearchStatus {
    if complete {
        SearchStatus::Completed
    } else {
        SearchStatus::Cancelled
    }
}

// ============================================================================
// TESTS
// ============================================================================
