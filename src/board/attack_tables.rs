//! Precomputed step tables for knight, king, and pawn attacks.
//!
//! For each square the tables hold the destination squares reachable by a
//! knight step, a king step, and (per color) the squares a pawn attacks
//! *from* that square. Sliding attacks are not tabulated; the generator
//! walks rays on demand because it needs per-step blocking logic anyway.

use once_cell::sync::Lazy;

use super::types::{on_board, Color, Square};

pub(crate) struct AttackTables {
    pub knight: [Vec<Square>; 64],
    pub king: [Vec<Square>; 64],
    /// `pawn[color][from]`: the one or two diagonal squares that color's
    /// pawn attacks from `from`, clipped to the board
    pub pawn: [[Vec<Square>; 64]; 2],
}

const KNIGHT_DELTAS: [(i32, i32); 8] = [
    (-2, 1),
    (-1, 2),
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
];

fn steps(from: Square, deltas: &[(i32, i32)]) -> Vec<Square> {
    let file = from.file() as i32;
    let rank = from.rank() as i32;
    deltas
        .iter()
        .filter(|(df, dr)| on_board(file + df, rank + dr))
        .map(|(df, dr)| Square::new((file + df) as usize, (rank + dr) as usize))
        .collect()
}

pub(crate) static ATTACKS: Lazy<AttackTables> = Lazy::new(|| {
    let king_deltas: Vec<(i32, i32)> = (-1..=1)
        .flat_map(|df| (-1..=1).map(move |dr| (df, dr)))
        .filter(|&(df, dr)| df != 0 || dr != 0)
        .collect();

    AttackTables {
        knight: std::array::from_fn(|idx| steps(Square::from_index(idx), &KNIGHT_DELTAS)),
        king: std::array::from_fn(|idx| steps(Square::from_index(idx), &king_deltas)),
        pawn: [
            std::array::from_fn(|idx| {
                steps(Square::from_index(idx), &[(-1, 1), (1, 1)])
            }),
            std::array::from_fn(|idx| {
                steps(Square::from_index(idx), &[(-1, -1), (1, -1)])
            }),
        ],
    }
});

impl AttackTables {
    #[inline]
    pub(crate) fn pawn_attacks(&self, color: Color, from: Square) -> &[Square] {
        &self.pawn[color.index()][from.index()]
    }
}
