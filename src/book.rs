//! Opening book: a read-only table keyed by the move history from the
//! starting position, mapping to weighted candidate replies.
//!
//! Lookups filter the candidates down to moves that are actually legal in
//! the current position and pick one at random, proportional to weight.
//! A miss simply returns `None` and the caller falls back to searching.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use rand::Rng;

/// A candidate book reply with its selection weight.
#[derive(Clone, Copy, Debug)]
pub struct BookCandidate {
    pub uci: &'static str,
    pub weight: u32,
}

const fn c(uci: &'static str, weight: u32) -> BookCandidate {
    BookCandidate { uci, weight }
}

type BookTable = HashMap<&'static str, &'static [BookCandidate]>;

/// Book lines as (history key, weighted replies) pairs.
static BOOK_LINES: &[(&str, &[BookCandidate])] = &[
    ("", &[c("e2e4", 60), c("d2d4", 40)]),
    // White repertoire: 1.e4
    ("e2e4", &[c("c7c6", 40), c("e7e5", 35), c("c7c5", 25)]),
    ("e2e4 c7c6", &[c("d2d4", 60), c("g1f3", 40)]),
    ("e2e4 c7c6 d2d4", &[c("d7d5", 85), c("g8f6", 15)]),
    ("e2e4 c7c6 d2d4 d7d5", &[c("e4e5", 100)]),
    ("e2e4 c7c6 d2d4 d7d5 e4e5", &[c("c8f5", 55), c("c8g4", 45)]),
    ("e2e4 c7c6 d2d4 d7d5 e4e5 c8f5", &[c("g1f3", 100)]),
    (
        "e2e4 c7c6 d2d4 d7d5 e4e5 c8f5 g1f3",
        &[c("e7e6", 60), c("e7e5", 40)],
    ),
    // Italian / open games
    ("e2e4 e7e5", &[c("g1f3", 100)]),
    ("e2e4 e7e5 g1f3", &[c("b8c6", 80), c("g8f6", 20)]),
    ("e2e4 e7e5 g1f3 b8c6", &[c("f1c4", 90), c("d2d4", 10)]),
    ("e2e4 e7e5 g1f3 b8c6 f1c4", &[c("g8f6", 65), c("f8c5", 35)]),
    (
        "e2e4 e7e5 g1f3 b8c6 f1c4 g8f6",
        &[c("d2d3", 50), c("d2d4", 50)],
    ),
    (
        "e2e4 e7e5 g1f3 b8c6 f1c4 f8c5",
        &[c("c2c3", 60), c("d2d3", 40)],
    ),
    // Sicilian sidelines
    ("e2e4 c7c5", &[c("g1f3", 55), c("c2c3", 45)]),
    ("e2e4 c7c5 g1f3", &[c("d7d6", 60), c("b8c6", 40)]),
    ("e2e4 c7c5 c2c3", &[c("d7d5", 70), c("g8f6", 30)]),
    // Black repertoire vs 1.d4 (QGD / Semi-Slav)
    ("d2d4", &[c("d7d5", 80), c("g8f6", 20)]),
    ("d2d4 d7d5", &[c("c2c4", 75), c("g1f3", 25)]),
    ("d2d4 d7d5 c2c4", &[c("e7e6", 70), c("c7c6", 30)]),
    ("d2d4 d7d5 c2c4 e7e6", &[c("b1c3", 55), c("g1f3", 45)]),
    (
        "d2d4 d7d5 c2c4 e7e6 b1c3",
        &[c("g8f6", 80), c("f8e7", 20)],
    ),
    ("d2d4 d7d5 c2c4 c7c6", &[c("b1c3", 60), c("g1f3", 40)]),
    ("d2d4 d7d5 c2c4 c7c6 b1c3", &[c("g8f6", 100)]),
    // Common QGD transpositions
    ("d2d4 g8f6", &[c("c2c4", 80), c("g1f3", 20)]),
    ("d2d4 g8f6 c2c4", &[c("e7e6", 70), c("g7g6", 30)]),
    ("d2d4 g8f6 c2c4 e7e6", &[c("g1f3", 60), c("b1c3", 40)]),
    (
        "d2d4 g8f6 c2c4 e7e6 g1f3",
        &[c("d7d5", 75), c("b7b6", 25)],
    ),
    // English transpositions: 1.c4 e6 2.d4 d5
    ("c2c4", &[c("e7e5", 40), c("e7e6", 35), c("c7c5", 25)]),
    ("c2c4 e7e6", &[c("d2d4", 80), c("g1f3", 20)]),
    ("c2c4 e7e6 d2d4", &[c("d7d5", 75), c("g8f6", 25)]),
    ("c2c4 e7e6 d2d4 d7d5", &[c("b1c3", 55), c("g1f3", 45)]),
    // Further black lines vs 1.e4
    (
        "e2e4 e7e5 g1f3 b8c6 f1c4 g8f6 d2d3",
        &[c("f8c5", 70), c("h7h6", 30)],
    ),
    (
        "e2e4 e7e5 g1f3 b8c6 f1c4 g8f6 d2d4",
        &[c("e5d4", 85), c("f8c5", 15)],
    ),
    (
        "e2e4 c7c6 d2d4 d7d5 e4e5 c8g4",
        &[c("f1e2", 65), c("g1f3", 35)],
    ),
    (
        "e2e4 c7c6 d2d4 d7d5 e4e5 c8g4 f1e2",
        &[c("g4e2", 100)],
    ),
    // Quiet lines to keep the book alive a little longer
    ("g1f3", &[c("d7d5", 50), c("g8f6", 50)]),
    ("g1f3 d7d5", &[c("d2d4", 65), c("c2c4", 35)]),
    ("g1f3 g8f6", &[c("d2d4", 60), c("c2c4", 40)]),
    ("d2d4 d7d5 g1f3", &[c("g8f6", 70), c("e7e6", 30)]),
    ("d2d4 d7d5 g1f3 g8f6", &[c("c2c4", 80), c("e2e3", 20)]),
];

static BOOK: Lazy<BookTable> = Lazy::new(|| BOOK_LINES.iter().copied().collect());

/// Look up a book reply for the game defined by `move_history` (coordinate
/// strings from the starting position). Candidates not present in
/// `legal_moves` are ignored; the survivors are picked by weight.
#[must_use]
pub fn pick<R: Rng>(
    move_history: &[String],
    legal_moves: &[String],
    rng: &mut R,
) -> Option<&'static str> {
    let key = move_history.join(" ");
    let candidates = BOOK.get(key.as_str())?;

    let playable: Vec<BookCandidate> = candidates
        .iter()
        .filter(|cand| cand.weight > 0 && legal_moves.iter().any(|m| m == cand.uci))
        .copied()
        .collect();

    if playable.is_empty() {
        return None;
    }

    let total: u32 = playable.iter().map(|cand| cand.weight).sum();
    let mut roll = rng.gen_range(1..=total) as i64;
    for cand in &playable {
        roll -= i64::from(cand.weight);
        if roll <= 0 {
            return Some(cand.uci);
        }
    }
    Some(playable[0].uci)
}
