//! Ember chess engine library.
//!
//! Provides a complete single-threaded chess engine with:
//! - Mailbox (64-square array) board representation
//! - Pseudo-legal and legal move generation with ray-walk sliders
//! - Incremental Zobrist hashing with make/unmake undo records
//! - Fail-soft alpha-beta search with iterative deepening and a
//!   transposition table
//! - UCI protocol support for GUI integration
//!
//! # Quick Start
//!
//! ```
//! use ember::board::{search_best_move, Board, SearchLimits, SearchState};
//! use ember::board::search::SilentLogger;
//!
//! // Create a new game from the starting position
//! let mut board = Board::new();
//!
//! // Generate all legal moves
//! let moves = board.generate_legal();
//! assert_eq!(moves.len(), 20);
//!
//! // Find the best move (depth 4)
//! let mut state = SearchState::new(16);
//! let limits = SearchLimits::depth(4);
//! let (best, _score) = search_best_move(&mut board, &mut state, &limits, &SilentLogger);
//! assert!(best.is_some());
//! ```
//!
//! # Building Positions
//!
//! ```
//! use ember::board::Board;
//!
//! // From FEN notation
//! let board =
//!     Board::try_from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
//! assert!(board.is_ok());
//! ```
//!
//! # Features
//!
//! - `serde` - Enable serialization for `Piece`, `Color`, `Square`, and `Move`
//! - `logging` - Enable optional debug logging via the `log` crate

// Enable pedantic lints with sensible domain-specific exceptions
#![warn(clippy::pedantic)]
// Chess engines have intentionally similar names (is_attacked/in_check, etc.)
#![allow(clippy::similar_names)]
// Index casts are ubiquitous and safe in chess (board indices, square indices)
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
// Module-level documentation is sufficient for this codebase
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod board;
pub mod book;
pub mod tt;
pub mod uci;
pub mod zobrist;
