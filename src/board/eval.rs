//! Static evaluation.
//!
//! Returns centipawns from the side-to-move's perspective. Material plus a
//! handful of positional terms: minor-piece centralization, pawn
//! advancement, the bishop pair, doubled and isolated pawns, king safety
//! via the castled-king squares, and a nudge against leaving the queen at
//! home too long. Deterministic, and antisymmetric under color swap with a
//! vertical mirror.

use super::types::{code_color, code_kind, piece_code, Color, Piece, Square, EMPTY};
use super::Board;

const BISHOP_PAIR_BONUS: i32 = 25;
const DOUBLED_PAWN_PENALTY: i32 = 10;
const ISOLATED_PAWN_PENALTY: i32 = 8;
const CASTLED_KING_BONUS: i32 = 18;
const UNCASTLED_KING_PENALTY: i32 = 18;
const HOME_QUEEN_PENALTY: i32 = 6;

/// Per-side running totals while scanning the board once.
#[derive(Default)]
struct SideTally {
    material: i32,
    position: i32,
    bishops: u32,
    /// Pawn counts per file, for doubled/isolated detection
    pawns_on_file: [u32; 8],
}

/// Chebyshev-like distance from the four central squares (d4, e4, d5, e5),
/// 0 on them and growing toward the rim.
#[inline]
fn center_distance(sq: Square) -> i32 {
    let file_d = match sq.file() {
        f @ 0..=2 => 3 - f as i32,
        f @ 5..=7 => f as i32 - 4,
        _ => 0,
    };
    let rank_d = match sq.rank() {
        r @ 0..=2 => 3 - r as i32,
        r @ 5..=7 => r as i32 - 4,
        _ => 0,
    };
    file_d.max(rank_d)
}

/// How far a pawn has advanced from its home rank (0-5).
#[inline]
fn pawn_advance(color: Color, sq: Square) -> i32 {
    match color {
        Color::White => sq.rank() as i32 - 1,
        Color::Black => 6 - sq.rank() as i32,
    }
}

impl Board {
    /// Static score in centipawns, positive when the side to move stands
    /// better.
    #[must_use]
    pub fn evaluate(&self) -> i32 {
        let mut tally = [SideTally::default(), SideTally::default()];

        for idx in 0..64 {
            let code = self.squares[idx];
            if code == EMPTY {
                continue;
            }
            let color = code_color(code);
            let kind = code_kind(code);
            let sq = Square::from_index(idx);
            let side = &mut tally[color.index()];

            side.material += kind.value();
            match kind {
                Piece::Knight | Piece::Bishop => {
                    side.position += (3 - center_distance(sq)) * 6;
                    if kind == Piece::Bishop {
                        side.bishops += 1;
                    }
                }
                Piece::Pawn => {
                    let advance = pawn_advance(color, sq);
                    let central_file = matches!(sq.file(), 3 | 4);
                    side.position += advance * if central_file { 3 } else { 2 };
                    side.pawns_on_file[sq.file()] += 1;
                }
                _ => {}
            }
        }

        for side in &mut tally {
            if side.bishops >= 2 {
                side.position += BISHOP_PAIR_BONUS;
            }
            side.position -= pawn_structure_penalty(&side.pawns_on_file);
        }

        for color in [Color::White, Color::Black] {
            let side = &mut tally[color.index()];
            side.position += self.king_shelter_term(color);
            side.position -= self.home_queen_term(color);
        }

        let white = tally[0].material + tally[0].position;
        let black = tally[1].material + tally[1].position;
        match self.side_to_move {
            Color::White => white - black,
            Color::Black => black - white,
        }
    }

    /// Reward a king on a typical castled square; once the opening is over
    /// (move 10), penalize one that never made it there.
    fn king_shelter_term(&self, color: Color) -> i32 {
        let rank = match color {
            Color::White => 0,
            Color::Black => 7,
        };
        let king = piece_code(color, Piece::King);
        let castled = self.code_at(Square::new(6, rank)) == king
            || self.code_at(Square::new(2, rank)) == king;
        if castled {
            CASTLED_KING_BONUS
        } else if self.fullmove_number > 10 {
            -UNCASTLED_KING_PENALTY
        } else {
            0
        }
    }

    /// Tiny penalty for a queen still sitting at home in the first moves;
    /// breaks ties between otherwise equal opening lines.
    fn home_queen_term(&self, color: Color) -> i32 {
        if self.fullmove_number >= 8 {
            return 0;
        }
        let home = match color {
            Color::White => Square::new(3, 0),
            Color::Black => Square::new(3, 7),
        };
        if self.code_at(home) == piece_code(color, Piece::Queen) {
            HOME_QUEEN_PENALTY
        } else {
            0
        }
    }
}

fn pawn_structure_penalty(pawns_on_file: &[u32; 8]) -> i32 {
    let mut penalty = 0;
    for file in 0..8 {
        let count = pawns_on_file[file];
        if count == 0 {
            continue;
        }
        if count > 1 {
            penalty += DOUBLED_PAWN_PENALTY * (count as i32 - 1);
        }
        let left = file.checked_sub(1).map_or(0, |f| pawns_on_file[f]);
        let right = if file < 7 { pawns_on_file[file + 1] } else { 0 };
        if left == 0 && right == 0 {
            penalty += ISOLATED_PAWN_PENALTY * count as i32;
        }
    }
    penalty
}
