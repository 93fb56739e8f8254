//! Zobrist hashing keys.
//!
//! Random 64-bit constants for every (color, piece, square) triple, every
//! castling-rights mask, every en-passant file, and the side to move. The
//! generator is seeded with a fixed constant so every process derives the
//! same keys; position keys are therefore comparable across runs.

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ZOBRIST_SEED: u64 = 0x00C0_FFEE_D00D_F00D;

pub struct ZobristKeys {
    /// Keys indexed by `[color][piece][square]`
    pub piece_square: [[[u64; 64]; 6]; 2],
    /// Keys indexed by the 4-bit castling-rights mask
    pub castling: [u64; 16],
    /// Keys indexed by en-passant file
    pub en_passant_file: [u64; 8],
    /// XORed in when black is to move
    pub side_to_move: u64,
}

pub static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(|| {
    let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);

    let mut piece_square = [[[0u64; 64]; 6]; 2];
    for color in &mut piece_square {
        for piece in color.iter_mut() {
            for sq in piece.iter_mut() {
                *sq = rng.gen();
            }
        }
    }

    let mut castling = [0u64; 16];
    for key in &mut castling {
        *key = rng.gen();
    }

    let mut en_passant_file = [0u64; 8];
    for key in &mut en_passant_file {
        *key = rng.gen();
    }

    ZobristKeys {
        piece_square,
        castling,
        en_passant_file,
        side_to_move: rng.gen(),
    }
});
