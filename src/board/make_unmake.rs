//! Making and unmaking moves, with incremental Zobrist key maintenance.
//!
//! `make` presumes the move came from legal generation on the current
//! position; feeding it anything else leaves the board in an undefined
//! state. Every make pushes the new position key onto the key history and
//! every unmake pops it, so the history always mirrors the game path.

use crate::zobrist::ZOBRIST;

use super::state::{castle_rights_of, rook_castle_bit, NullUndo, Undo};
use super::types::{code_color, code_kind, piece_code, Color, Move, Piece, Square, EMPTY};
use super::Board;

#[inline]
fn piece_key(code: i8, sq: Square) -> u64 {
    ZOBRIST.piece_square[code_color(code).index()][code_kind(code).index()][sq.index()]
}

impl Board {
    /// Build the position key from scratch. Used to initialize a parsed
    /// position; everywhere else the key is maintained incrementally, and
    /// the two must always agree.
    #[must_use]
    pub fn compute_key(&self) -> u64 {
        let mut key = 0u64;
        for idx in 0..64 {
            let code = self.squares[idx];
            if code != EMPTY {
                key ^= piece_key(code, Square::from_index(idx));
            }
        }
        key ^= ZOBRIST.castling[self.castling_rights as usize];
        if let Some(ep) = self.en_passant {
            key ^= ZOBRIST.en_passant_file[ep.file()];
        }
        if self.side_to_move == Color::Black {
            key ^= ZOBRIST.side_to_move;
        }
        key
    }

    /// Apply a legal move, returning the undo record that reverses it.
    pub fn make(&mut self, mv: Move) -> Undo {
        let us = self.side_to_move;
        let moved = self.code_at(mv.from);
        let captured = self.code_at(mv.to);

        let mut undo = Undo {
            captured,
            en_passant_capture: None,
            castling_rights: self.castling_rights,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            key: self.key,
        };

        let old_castling = self.castling_rights;

        // Clocks
        if code_kind(moved) == Piece::Pawn || mv.is_capture() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if us == Color::Black {
            self.fullmove_number += 1;
        }

        // Clear the old en-passant target; a double push sets a fresh one below
        if let Some(old_ep) = self.en_passant.take() {
            self.key ^= ZOBRIST.en_passant_file[old_ep.file()];
        }

        // En passant removes the pawn one rank behind the destination
        if mv.is_en_passant() {
            let cap_sq = match us {
                Color::White => mv.to.shifted(-8),
                Color::Black => mv.to.shifted(8),
            };
            let cap_piece = self.squares[cap_sq.index()];
            undo.en_passant_capture = Some((cap_sq, cap_piece));
            self.squares[cap_sq.index()] = EMPTY;
            self.key ^= piece_key(cap_piece, cap_sq);
        } else if captured != EMPTY {
            self.key ^= piece_key(captured, mv.to);
        }

        // Move the piece, replacing a promoting pawn by the chosen piece
        let placed = match mv.promotion {
            Some(promo) => piece_code(us, promo),
            None => moved,
        };
        self.squares[mv.from.index()] = EMPTY;
        self.squares[mv.to.index()] = placed;
        self.key ^= piece_key(moved, mv.from) ^ piece_key(placed, mv.to);

        // On castle the rook jumps to the square the king crossed
        if mv.is_castle() {
            let (rook_from, rook_to) = rook_castle_squares(mv.to);
            let rook = self.squares[rook_from.index()];
            self.squares[rook_from.index()] = EMPTY;
            self.squares[rook_to.index()] = rook;
            self.key ^= piece_key(rook, rook_from) ^ piece_key(rook, rook_to);
        }

        // Castling rights: a king move drops both of its side's bits, a rook
        // leaving its original square drops that side's bit, and so does a
        // rook captured on its original square
        if code_kind(moved) == Piece::King {
            self.castling_rights &= !castle_rights_of(us);
        } else if code_kind(moved) == Piece::Rook {
            self.castling_rights &= !rook_castle_bit(mv.from);
        }
        if captured != EMPTY && code_kind(captured) == Piece::Rook {
            self.castling_rights &= !rook_castle_bit(mv.to);
        }
        self.key ^=
            ZOBRIST.castling[old_castling as usize] ^ ZOBRIST.castling[self.castling_rights as usize];

        // A double push leaves the en-passant target behind the pawn
        if mv.is_double_push() {
            let ep = match us {
                Color::White => mv.from.shifted(8),
                Color::Black => mv.from.shifted(-8),
            };
            self.en_passant = Some(ep);
            self.key ^= ZOBRIST.en_passant_file[ep.file()];
        }

        self.side_to_move = us.opposite();
        self.key ^= ZOBRIST.side_to_move;

        self.key_history.push(self.key);
        undo
    }

    /// Reverse a move made with [`Board::make`], restoring every field
    /// bit-for-bit.
    pub fn unmake(&mut self, mv: Move, undo: Undo) {
        self.key_history.pop();

        self.side_to_move = self.side_to_move.opposite();
        self.castling_rights = undo.castling_rights;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;
        self.key = undo.key;

        let us = self.side_to_move;

        // Put the mover back, undoing a promotion to the original pawn
        let moved = match mv.promotion {
            Some(_) => piece_code(us, Piece::Pawn),
            None => self.squares[mv.to.index()],
        };
        self.squares[mv.from.index()] = moved;
        self.squares[mv.to.index()] = undo.captured;

        if let Some((cap_sq, cap_piece)) = undo.en_passant_capture {
            self.squares[cap_sq.index()] = cap_piece;
        }

        if mv.is_castle() {
            let (rook_from, rook_to) = rook_castle_squares(mv.to);
            self.squares[rook_from.index()] = self.squares[rook_to.index()];
            self.squares[rook_to.index()] = EMPTY;
        }
    }

    /// Pass the move: toggle the side, clear the en-passant target, bump
    /// the halfmove clock. Used by null-move pruning in the search.
    pub fn make_null(&mut self) -> NullUndo {
        let undo = NullUndo {
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            key: self.key,
        };

        if let Some(ep) = self.en_passant.take() {
            self.key ^= ZOBRIST.en_passant_file[ep.file()];
        }
        self.halfmove_clock += 1;
        self.side_to_move = self.side_to_move.opposite();
        self.key ^= ZOBRIST.side_to_move;

        self.key_history.push(self.key);
        undo
    }

    /// Reverse a null move.
    pub fn unmake_null(&mut self, undo: NullUndo) {
        self.key_history.pop();
        self.side_to_move = self.side_to_move.opposite();
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.key = undo.key;
    }
}

/// Rook source and destination for a castling move, keyed by the king's
/// destination square.
fn rook_castle_squares(king_to: Square) -> (Square, Square) {
    match king_to.index() {
        6 => (Square::from_index(7), Square::from_index(5)),    // white O-O
        2 => (Square::from_index(0), Square::from_index(3)),    // white O-O-O
        62 => (Square::from_index(63), Square::from_index(61)), // black O-O
        _ => (Square::from_index(56), Square::from_index(59)),  // black O-O-O
    }
}

#[cfg(test)]
mod tests {
    use super::super::types::{CASTLE_BLACK_K, CASTLE_BLACK_Q, CASTLE_WHITE_K, CASTLE_WHITE_Q};
    use super::*;

    #[test]
    fn stored_key_matches_computed_after_parse() {
        let board = Board::new();
        assert_eq!(board.key(), board.compute_key());
    }

    #[test]
    fn make_updates_clocks_and_side() {
        let mut board = Board::new();
        let mv = board.parse_move("g1f3").unwrap();
        board.make(mv);
        assert_eq!(board.side_to_move(), Color::Black);
        assert_eq!(board.halfmove_clock(), 1);
        assert_eq!(board.fullmove_number(), 1);

        let reply = board.parse_move("g8f6").unwrap();
        board.make(reply);
        assert_eq!(board.fullmove_number(), 2);
    }

    #[test]
    fn pawn_move_resets_halfmove_clock() {
        let mut board = Board::try_from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 37 20").unwrap();
        let mv = board.parse_move("e2e3").unwrap();
        board.make(mv);
        assert_eq!(board.halfmove_clock(), 0);
    }

    #[test]
    fn double_push_sets_en_passant_target() {
        let mut board = Board::new();
        let mv = board.parse_move("e2e4").unwrap();
        board.make(mv);
        assert_eq!(board.en_passant, Some(Square::new(4, 2)));
        assert_eq!(board.key(), board.compute_key());
    }

    #[test]
    fn castle_moves_the_rook() {
        let mut board = Board::try_from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let mv = board.parse_move("e1g1").unwrap();
        let undo = board.make(mv);
        assert_eq!(
            board.piece_at(Square::new(5, 0)),
            Some((Color::White, Piece::Rook))
        );
        assert_eq!(board.piece_at(Square::new(7, 0)), None);
        assert!(!board.has_castling_right(CASTLE_WHITE_K));
        assert!(!board.has_castling_right(CASTLE_WHITE_Q));
        assert_eq!(board.key(), board.compute_key());

        board.unmake(mv, undo);
        assert_eq!(board.to_fen(), "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        assert_eq!(board.key(), board.compute_key());
    }

    #[test]
    fn rook_capture_clears_castling_right() {
        let mut board = Board::try_from_fen("r3k2r/8/8/8/8/8/6B1/R3K2R w KQkq - 0 1").unwrap();
        let mv = board.parse_move("g2a8").unwrap();
        board.make(mv);
        assert!(!board.has_castling_right(CASTLE_BLACK_Q));
        assert!(board.has_castling_right(CASTLE_BLACK_K));
        assert_eq!(board.key(), board.compute_key());
    }

    #[test]
    fn en_passant_round_trip() {
        let mut board =
            Board::try_from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3")
                .unwrap();
        let before = board.to_fen();
        let key = board.key();

        let mv = board.parse_move("e5f6").unwrap();
        assert!(mv.is_en_passant());
        let undo = board.make(mv);
        // The captured pawn disappears from f5, not f6
        assert_eq!(board.piece_at(Square::new(5, 4)), None);
        assert_eq!(
            board.piece_at(Square::new(5, 5)),
            Some((Color::White, Piece::Pawn))
        );
        assert_eq!(board.key(), board.compute_key());

        board.unmake(mv, undo);
        assert_eq!(board.to_fen(), before);
        assert_eq!(board.key(), key);
    }

    #[test]
    fn promotion_round_trip() {
        let mut board = Board::try_from_fen("8/P7/8/8/8/8/8/K1k5 w - - 0 1").unwrap();
        let key = board.key();
        let mv = board.parse_move("a7a8q").unwrap();
        let undo = board.make(mv);
        assert_eq!(
            board.piece_at(Square::new(0, 7)),
            Some((Color::White, Piece::Queen))
        );
        assert_eq!(board.key(), board.compute_key());
        board.unmake(mv, undo);
        assert_eq!(
            board.piece_at(Square::new(0, 6)),
            Some((Color::White, Piece::Pawn))
        );
        assert_eq!(board.key(), key);
    }

    #[test]
    fn null_move_round_trip() {
        let mut board =
            Board::try_from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3")
                .unwrap();
        let key = board.key();
        let ep = board.en_passant;
        let history_len = board.key_history.len();

        let undo = board.make_null();
        assert_eq!(board.side_to_move(), Color::Black);
        assert_eq!(board.en_passant, None);
        assert_ne!(board.key(), key);
        assert_eq!(board.key(), board.compute_key());
        assert_eq!(board.key_history.len(), history_len + 1);

        board.unmake_null(undo);
        assert_eq!(board.side_to_move(), Color::White);
        assert_eq!(board.en_passant, ep);
        assert_eq!(board.key(), key);
        assert_eq!(board.key_history.len(), history_len);
    }
}
