//! Repetition and fifty-move draw detection.

use crate::board::search::{SearchLimits, SilentLogger};
use crate::board::{search_best_move, Board, SearchState};

/// Shuffle the knights out and back `rounds` times from the start position.
fn knight_shuffle(board: &mut Board, rounds: usize) {
    for _ in 0..rounds {
        for uci in ["g1f3", "g8f6", "f3g1", "f6g8"] {
            board.make_move_uci(uci).unwrap();
        }
    }
}

#[test]
fn single_return_is_not_a_repetition() {
    let mut board = Board::new();
    knight_shuffle(&mut board, 1);
    // The start position has now occurred twice: once at setup, once now
    assert!(!board.is_repetition());
}

#[test]
fn third_occurrence_is_a_repetition() {
    let mut board = Board::new();
    knight_shuffle(&mut board, 2);
    assert!(board.is_repetition());
}

#[test]
fn pawn_move_resets_the_window() {
    let mut board = Board::new();
    knight_shuffle(&mut board, 2);
    assert!(board.is_repetition());

    // An irreversible move cuts the history scan off
    board.make_move_uci("e2e4").unwrap();
    assert!(!board.is_repetition());
}

#[test]
fn search_scores_repetition_as_draw() {
    let mut board = Board::new();
    knight_shuffle(&mut board, 2);

    let mut state = SearchState::new(8);
    let (best, score) =
        search_best_move(&mut board, &mut state, &SearchLimits::depth(3), &SilentLogger);
    assert!(best.is_some());
    assert_eq!(score, 0);
}

#[test]
fn fifty_move_rule_detected() {
    let board = Board::try_from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 100 80").unwrap();
    assert!(board.is_fifty_move_draw());
    let board = Board::try_from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 99 80").unwrap();
    assert!(!board.is_fifty_move_draw());
}

#[test]
fn search_scores_fifty_move_as_draw() {
    // A rook up, but the clock has run out of patience
    let mut board = Board::try_from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 100 80").unwrap();
    let mut state = SearchState::new(8);
    let (best, score) =
        search_best_move(&mut board, &mut state, &SearchLimits::depth(4), &SilentLogger);
    assert!(best.is_some());
    assert_eq!(score, 0);
}
