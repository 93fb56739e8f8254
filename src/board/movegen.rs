//! Pseudo-legal and legal move generation, attack queries, and perft.
//!
//! Generation dispatches on piece kind by explicit branching. Knight, king,
//! and pawn attacks come from the precomputed step tables; bishop, rook,
//! and queen moves walk rays outward until blocked.

use super::attack_tables::ATTACKS;
use super::types::{
    code_color, code_kind, on_board, piece_code, Color, Move, MoveList, Piece, Square,
    CASTLE_BLACK_K, CASTLE_BLACK_Q, CASTLE_WHITE_K, CASTLE_WHITE_Q, EMPTY, FLAG_CAPTURE,
    FLAG_CASTLE, FLAG_DOUBLE_PUSH, FLAG_EN_PASSANT, PROMOTION_PIECES,
};
use super::Board;

const ROOK_DIRS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const BISHOP_DIRS: [(i32, i32); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];

impl Board {
    /// Is `target` attacked by any piece of `by`?
    ///
    /// Works by reverse attack: a pawn of `by` on a square that attacks
    /// `target`, a knight or king one step-set away, or a slider with a
    /// clear ray. Pins are ignored by design; this answers "could a piece
    /// of `by` capture on `target`".
    #[must_use]
    pub fn is_attacked(&self, target: Square, by: Color) -> bool {
        // A pawn of `by` attacks `target` exactly when a pawn of the other
        // color standing on `target` would attack the pawn's square
        let pawn = piece_code(by, Piece::Pawn);
        for &sq in ATTACKS.pawn_attacks(by.opposite(), target) {
            if self.code_at(sq) == pawn {
                return true;
            }
        }

        let knight = piece_code(by, Piece::Knight);
        for &sq in &ATTACKS.knight[target.index()] {
            if self.code_at(sq) == knight {
                return true;
            }
        }

        let king = piece_code(by, Piece::King);
        for &sq in &ATTACKS.king[target.index()] {
            if self.code_at(sq) == king {
                return true;
            }
        }

        self.ray_attacked(target, by, &ROOK_DIRS, Piece::Rook)
            || self.ray_attacked(target, by, &BISHOP_DIRS, Piece::Bishop)
    }

    /// Walk each direction from `target` and test whether the first piece
    /// met is a `slider` or queen of `by`.
    fn ray_attacked(&self, target: Square, by: Color, dirs: &[(i32, i32)], slider: Piece) -> bool {
        let queen = piece_code(by, Piece::Queen);
        let wanted = piece_code(by, slider);
        for &(df, dr) in dirs {
            let mut file = target.file() as i32 + df;
            let mut rank = target.rank() as i32 + dr;
            while on_board(file, rank) {
                let code = self.code_at(Square::new(file as usize, rank as usize));
                if code != EMPTY {
                    if code == wanted || code == queen {
                        return true;
                    }
                    break;
                }
                file += df;
                rank += dr;
            }
        }
        false
    }

    /// Is `color`'s king attacked?
    #[must_use]
    pub fn in_check(&self, color: Color) -> bool {
        self.king_square(color)
            .is_some_and(|sq| self.is_attacked(sq, color.opposite()))
    }

    /// Generate every move that respects piece movement and occupancy,
    /// ignoring whether it leaves the own king in check. Castling is the
    /// exception: the out-of-check and through-check gates are applied
    /// here, leaving only the destination-square check to the legal filter.
    #[must_use]
    pub fn generate_pseudo_legal(&self) -> MoveList {
        let mut out = MoveList::new();
        let us = self.side_to_move;

        for idx in 0..64 {
            let code = self.squares[idx];
            if code == EMPTY || code_color(code) != us {
                continue;
            }
            let from = Square::from_index(idx);

            match code_kind(code) {
                Piece::Pawn => self.pawn_moves(from, us, &mut out),
                Piece::Knight => self.step_moves(from, &ATTACKS.knight[idx], us, &mut out),
                Piece::Bishop => self.slider_moves(from, &BISHOP_DIRS, us, &mut out),
                Piece::Rook => self.slider_moves(from, &ROOK_DIRS, us, &mut out),
                Piece::Queen => {
                    self.slider_moves(from, &BISHOP_DIRS, us, &mut out);
                    self.slider_moves(from, &ROOK_DIRS, us, &mut out);
                }
                Piece::King => {
                    self.step_moves(from, &ATTACKS.king[idx], us, &mut out);
                    self.castle_moves(us, &mut out);
                }
            }
        }

        out
    }

    /// Generate fully legal moves: pseudo-legal filtered by making each
    /// move and rejecting those that leave the own king attacked.
    #[must_use]
    pub fn generate_legal(&mut self) -> MoveList {
        let pseudo = self.generate_pseudo_legal();
        let mut out = MoveList::new();
        let us = self.side_to_move;

        for &mv in &pseudo {
            let undo = self.make(mv);
            if !self.in_check(us) {
                out.push(mv);
            }
            self.unmake(mv, undo);
        }

        out
    }

    fn step_moves(&self, from: Square, targets: &[Square], us: Color, out: &mut MoveList) {
        for &to in targets {
            let code = self.code_at(to);
            if code == EMPTY {
                out.push(Move::new(from, to, 0));
            } else if code_color(code) != us {
                out.push(Move::new(from, to, FLAG_CAPTURE));
            }
        }
    }

    fn slider_moves(&self, from: Square, dirs: &[(i32, i32)], us: Color, out: &mut MoveList) {
        for &(df, dr) in dirs {
            let mut file = from.file() as i32 + df;
            let mut rank = from.rank() as i32 + dr;
            while on_board(file, rank) {
                let to = Square::new(file as usize, rank as usize);
                let code = self.code_at(to);
                if code == EMPTY {
                    out.push(Move::new(from, to, 0));
                } else {
                    if code_color(code) != us {
                        out.push(Move::new(from, to, FLAG_CAPTURE));
                    }
                    break;
                }
                file += df;
                rank += dr;
            }
        }
    }

    fn pawn_moves(&self, from: Square, us: Color, out: &mut MoveList) {
        let (push, start_rank, promo_rank) = match us {
            Color::White => (8i8, 1, 7),
            Color::Black => (-8i8, 6, 0),
        };

        // Pushes
        let one = from.shifted(push);
        if self.code_at(one) == EMPTY {
            if one.rank() == promo_rank {
                for promo in PROMOTION_PIECES {
                    out.push(Move::new_promotion(from, one, promo, false));
                }
            } else {
                out.push(Move::new(from, one, 0));
                if from.rank() == start_rank {
                    let two = from.shifted(2 * push);
                    if self.code_at(two) == EMPTY {
                        out.push(Move::new(from, two, FLAG_DOUBLE_PUSH));
                    }
                }
            }
        }

        // Captures, en passant included
        for &to in ATTACKS.pawn_attacks(us, from) {
            let code = self.code_at(to);
            if code != EMPTY && code_color(code) != us {
                if to.rank() == promo_rank {
                    for promo in PROMOTION_PIECES {
                        out.push(Move::new_promotion(from, to, promo, true));
                    }
                } else {
                    out.push(Move::new(from, to, FLAG_CAPTURE));
                }
            } else if Some(to) == self.en_passant {
                out.push(Move::new(from, to, FLAG_EN_PASSANT | FLAG_CAPTURE));
            }
        }
    }

    /// Castling for the side to move. Requires the castling bit, empty
    /// squares between king and rook, the rook still on its corner, and a
    /// king that neither starts in check nor crosses an attacked square.
    fn castle_moves(&self, us: Color, out: &mut MoveList) {
        let (king_bit, queen_bit, rank) = match us {
            Color::White => (CASTLE_WHITE_K, CASTLE_WHITE_Q, 0),
            Color::Black => (CASTLE_BLACK_K, CASTLE_BLACK_Q, 7),
        };
        let them = us.opposite();
        let rook = piece_code(us, Piece::Rook);
        let king_from = Square::new(4, rank);

        if (self.has_castling_right(king_bit) || self.has_castling_right(queen_bit))
            && self.is_attacked(king_from, them)
        {
            return;
        }

        if self.has_castling_right(king_bit) {
            let f_sq = Square::new(5, rank);
            let g_sq = Square::new(6, rank);
            if self.code_at(f_sq) == EMPTY
                && self.code_at(g_sq) == EMPTY
                && self.code_at(Square::new(7, rank)) == rook
                && !self.is_attacked(f_sq, them)
                && !self.is_attacked(g_sq, them)
            {
                out.push(Move::new(king_from, g_sq, FLAG_CASTLE));
            }
        }

        if self.has_castling_right(queen_bit) {
            let d_sq = Square::new(3, rank);
            let c_sq = Square::new(2, rank);
            let b_sq = Square::new(1, rank);
            if self.code_at(d_sq) == EMPTY
                && self.code_at(c_sq) == EMPTY
                && self.code_at(b_sq) == EMPTY
                && self.code_at(Square::new(0, rank)) == rook
                && !self.is_attacked(d_sq, them)
                && !self.is_attacked(c_sq, them)
            {
                out.push(Move::new(king_from, c_sq, FLAG_CASTLE));
            }
        }
    }

    /// Count the leaf positions reachable by legal-move sequences of
    /// exactly `depth` plies. The canonical move-generation check.
    #[must_use]
    pub fn perft(&mut self, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = self.generate_legal();
        if depth == 1 {
            return moves.len() as u64;
        }

        let mut nodes = 0;
        for &mv in &moves {
            let undo = self.make(mv);
            nodes += self.perft(depth - 1);
            self.unmake(mv, undo);
        }
        nodes
    }

    /// Perft split by root move: returns each root move with its subtree
    /// leaf count, for diffing against a reference generator.
    #[must_use]
    pub fn perft_divide(&mut self, depth: u32) -> Vec<(Move, u64)> {
        let moves = self.generate_legal();
        let mut counts = Vec::with_capacity(moves.len());
        for &mv in &moves {
            let undo = self.make(mv);
            let nodes = if depth > 1 { self.perft(depth - 1) } else { 1 };
            self.unmake(mv, undo);
            counts.push((mv, nodes));
        }
        counts
    }
}
