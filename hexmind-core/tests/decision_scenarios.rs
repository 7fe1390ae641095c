//! End-to-end decision scenarios

use std::thread;
use std::time::{Duration, Instant};

use hexmind_core::{
    BoardState, Cell, DecisionController, HexError, Player, Position, SearchBudget, SearchMode,
    SearchStatus,
};

#[test]
fn test_empty_board_fixed_depth() {
    let state = BoardState::new(5).unwrap();
    let ai = DecisionController::default();
    let decision = ai.decide(&state, &SearchBudget::depth(2)).unwrap();

    assert!(state.legal_moves().contains(&decision.mv));
    assert_eq!(decision.stats.mode, SearchMode::FixedDepth);
    assert_eq!(decision.stats.depth_reached, 2);
}

#[test]
fn test_one_move_from_win() {
    // Player one needs (4,2) to finish the middle row
    let state = BoardState::from_rows(
        &[
            "O....",
            ".O...",
            "XXXX.",
            "O....",
            ".O...",
        ],
        Player::One,
    )
    .unwrap();
    let ai = DecisionController::default();

    for depth in 1..=3 {
        let decision = ai.decide(&state, &SearchBudget::depth(depth)).unwrap();
        let after = state.apply(decision.mv).unwrap();
        assert!(after.is_terminal());
        assert_eq!(after.winner(), Some(Player::One));
    }

    let timed = ai
        .decide(&state, &SearchBudget::timed(Duration::from_millis(500)))
        .unwrap();
    assert_eq!(state.apply(timed.mv).unwrap().winner(), Some(Player::One));
}

#[test]
fn test_player_two_takes_win() {
    let state = BoardState::from_rows(&["XO..", "X...", ".O..", ".O.."], Player::Two).unwrap();
    let ai = DecisionController::default();
    let decision = ai.decide(&state, &SearchBudget::depth(2)).unwrap();
    assert_eq!(decision.mv, Cell::new(1, 1));
}

#[test]
fn test_cancel_before_first_pass_completes() {
    let state = BoardState::new(7).unwrap();
    let ai = DecisionController::default();
    let decision = ai.decide(&state, &SearchBudget::timed(Duration::ZERO)).unwrap();

    assert!(state.is_empty(decision.mv));
    assert_eq!(decision.stats.status, SearchStatus::Cancelled);
    assert_eq!(decision.stats.mode, SearchMode::IterativeDeepening);
}

#[test]
fn test_cancel_from_timer_thread() {
    let state = BoardState::new(7).unwrap();
    let ai = DecisionController::default();
    let handle = ai.cancel_handle();

    let timer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        handle.cancel();
        // A stray second signal must not resume the search
        handle.cancel();
    });

    let start = Instant::now();
    let decision = ai.decide(&state, &SearchBudget::until_cancelled()).unwrap();
    timer.join().unwrap();

    assert!(start.elapsed() < Duration::from_secs(10));
    assert!(state.is_empty(decision.mv));
    assert_eq!(decision.stats.status, SearchStatus::Cancelled);
    assert!(decision.stats.nodes_expanded > 0);
}

#[test]
fn test_cancelled_fixed_depth_reports_partial_depth() {
    let state = BoardState::new(7).unwrap();
    let ai = DecisionController::default();
    let handle = ai.cancel_handle();

    let timer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        handle.cancel();
    });

    let decision = ai.decide(&state, &SearchBudget::depth(6)).unwrap();
    timer.join().unwrap();

    assert!(state.is_empty(decision.mv));
    assert_eq!(decision.stats.mode, SearchMode::FixedDepth);
    assert_eq!(decision.stats.status, SearchStatus::Cancelled);
    assert!(decision.stats.depth_reached < 6);
}

#[test]
fn test_decided_position_is_an_error() {
    let state = BoardState::from_rows(&["...", "XXX", "OO."], Player::Two).unwrap();
    let ai = DecisionController::default();
    assert_eq!(
        ai.decide(&state, &SearchBudget::depth(3)),
        Err(HexError::GameOver { winner: Player::One })
    );
}

#[test]
fn test_time_budget_deepens() {
    let state = BoardState::new(4).unwrap();
    let ai = DecisionController::default();
    let decision = ai
        .decide(&state, &SearchBudget::timed(Duration::from_millis(200)))
        .unwrap();
    assert!(decision.stats.depth_reached >= 1);
    assert!(state.is_empty(decision.mv));
}

#[test]
fn test_controller_is_reusable_after_cancel() {
    let state = BoardState::new(3).unwrap();
    let ai = DecisionController::default();

    let cancelled = ai.decide(&state, &SearchBudget::timed(Duration::ZERO)).unwrap();
    assert_eq!(cancelled.stats.status, SearchStatus::Cancelled);

    let fresh = ai.decide(&state, &SearchBudget::depth(2)).unwrap();
    assert_eq!(fresh.stats.status, SearchStatus::Completed);
}

#[test]
fn test_position_file_round_trip() {
    let state = BoardState::new(4)
        .unwrap()
        .apply(Cell::new(2, 1))
        .unwrap();
    let path = std::env::temp_dir().join(format!("hexmind-position-{}.json", std::process::id()));
    Position::from_board(&state).save(&path).unwrap();
    let loaded = Position::load(&path).unwrap().to_board().unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(loaded, state);
}
