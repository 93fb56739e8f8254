//! Iterative deepening with aspiration windows and the root move loop.

use std::time::{Duration, Instant};

use crate::tt::Bound;

use super::alphabeta::SearchContext;
use super::super::types::Move;
use super::super::Board;
use super::{
    SearchInfo, SearchLimits, SearchLogger, SearchState, ASPIRATION_WINDOW, INFINITY, MATE,
};

/// Find the strongest move within the given limits.
///
/// Deepens from 1 until the depth cap or the deadline. After every
/// completed depth the best move and score are saved and a progress line
/// is reported; a depth cut short by the clock is discarded and the last
/// completed depth's move is returned. When at least one legal move exists
/// a move is always returned, even on a zero time budget.
///
/// With no legal moves the result is the null sentinel (`None`) with a
/// mate score when in check and zero for stalemate.
pub fn search_best_move(
    board: &mut Board,
    state: &mut SearchState,
    limits: &SearchLimits,
    logger: &dyn SearchLogger,
) -> (Option<Move>, i32) {
    let start = Instant::now();
    let deadline = limits
        .move_time_ms
        .map(|ms| start + Duration::from_millis(ms));

    state.new_search();

    let root_moves = board.generate_legal();
    if root_moves.is_empty() {
        let score = if board.in_check(board.side_to_move()) {
            -MATE
        } else {
            0
        };
        return (None, score);
    }

    // The fallback guarantees a legal answer before any searching happens
    let mut best_move = root_moves[0];
    let mut best_score: i32 = 0;

    if board.is_fifty_move_draw() || board.is_repetition() {
        return (Some(best_move), 0);
    }

    let mut ctx = SearchContext {
        board,
        state,
        deadline,
        stopped: false,
        nodes: 0,
    };

    for depth in 1..=limits.max_depth.max(1) as i32 {
        if let Some(d) = ctx.deadline {
            if Instant::now() >= d {
                break;
            }
        }

        // Aspiration: open a narrow window around the previous score and
        // fall back to the full window when the search lands outside it
        let (mut alpha, mut beta) = if depth >= 2 {
            (
                best_score.saturating_sub(ASPIRATION_WINDOW),
                best_score.saturating_add(ASPIRATION_WINDOW),
            )
        } else {
            (-INFINITY, INFINITY)
        };

        let (score, mv) = loop {
            let (score, mv) = ctx.search_root(depth, alpha, beta);
            if ctx.stopped {
                break (score, mv);
            }
            if score <= alpha || score >= beta {
                alpha = -INFINITY;
                beta = INFINITY;
                continue;
            }
            break (score, mv);
        };

        if ctx.stopped {
            break;
        }

        best_score = score;
        if let Some(mv) = mv {
            best_move = mv;
        }

        let elapsed_ms = start.elapsed().as_millis() as u64;
        let nps = if elapsed_ms > 0 {
            ctx.nodes * 1000 / elapsed_ms
        } else {
            ctx.nodes * 1000
        };
        logger.info(&SearchInfo {
            depth: depth as u32,
            score_cp: best_score,
            nodes: ctx.nodes,
            nps,
        });
    }

    let nodes = ctx.nodes;
    state.stats.nodes = nodes;
    (Some(best_move), best_score)
}

impl SearchContext<'_> {
    /// Alpha-beta over the root moves, tracking the best move explicitly.
    fn search_root(&mut self, depth: i32, mut alpha: i32, beta: i32) -> (i32, Option<Move>) {
        let key = self.board.key();
        let tt_move = self.state.tt.probe(key, 0, -INFINITY, INFINITY, 0).best_move;

        let moves = self.board.generate_legal();
        let mut ordered = self.order_moves(&moves, tt_move, 0);

        let original_alpha = alpha;
        let mut best_score = -INFINITY;
        let mut best_move = None;

        let mut idx = 0;
        while let Some(mv) = ordered.pick_best(idx) {
            idx += 1;

            let undo = self.board.make(mv);
            let score = -self.negamax(depth - 1, -beta, -alpha, 1, true);
            self.board.unmake(mv, undo);

            if self.stopped {
                break;
            }

            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                break;
            }
        }

        if !self.stopped {
            if let Some(mv) = best_move {
                let bound = if best_score >= beta {
                    Bound::Lower
                } else if best_score <= original_alpha {
                    Bound::Upper
                } else {
                    Bound::Exact
                };
                self.state
                    .tt
                    .store(key, depth, bound, best_score, mv.packed(), 0);
            }
        }

        (best_score, best_move)
    }
}
