//! UCI protocol front end.
//!
//! A thin line-oriented loop over the engine core: position setup, search
//! dispatch with time control, and the handful of handshake commands GUIs
//! expect. The session is generic over its input and output streams so the
//! whole protocol conversation is testable in-process.

mod time;

pub use time::budget_from_clock;

use std::cell::RefCell;
use std::io::{BufRead, Write};

use rand::thread_rng;

use crate::board::{
    search_best_move, Board, Color, SearchInfo, SearchLimits, SearchLogger, SearchState,
    DEFAULT_TT_MB,
};
use crate::book;

const ENGINE_NAME: &str = concat!("Ember ", env!("CARGO_PKG_VERSION"));

/// Parameters of a `go` command.
#[derive(Default, Debug, Clone, Copy)]
pub struct GoParams {
    pub wtime: Option<u64>,
    pub btime: Option<u64>,
    pub winc: Option<u64>,
    pub binc: Option<u64>,
    pub movetime: Option<u64>,
    pub depth: Option<u32>,
}

/// Parse the token following `parts[i]` as a number.
#[inline]
fn parse_next<T: std::str::FromStr>(parts: &[&str], i: usize) -> Option<T> {
    parts.get(i + 1).and_then(|v| v.parse::<T>().ok())
}

#[must_use]
pub fn parse_go_params(parts: &[&str]) -> GoParams {
    let mut params = GoParams::default();
    let mut i = 1;
    while i < parts.len() {
        let consumed = match parts[i] {
            "wtime" => {
                params.wtime = parse_next(parts, i);
                2
            }
            "btime" => {
                params.btime = parse_next(parts, i);
                2
            }
            "winc" => {
                params.winc = parse_next(parts, i);
                2
            }
            "binc" => {
                params.binc = parse_next(parts, i);
                2
            }
            "movetime" => {
                params.movetime = parse_next(parts, i);
                2
            }
            "depth" => {
                params.depth = parse_next(parts, i);
                2
            }
            _ => 1,
        };
        i += consumed;
    }
    params
}

/// Forwards per-depth progress lines to the session's output stream.
struct SessionLogger<'a, 'b, W: Write> {
    out: &'a RefCell<&'b mut W>,
}

impl<W: Write> SearchLogger for SessionLogger<'_, '_, W> {
    fn info(&self, info: &SearchInfo) {
        let _ = writeln!(
            self.out.borrow_mut(),
            "info depth {} score cp {} nodes {} nps {}",
            info.depth,
            info.score_cp,
            info.nodes,
            info.nps
        );
    }
}

/// One engine session: a board, persistent search state, and the move
/// history needed for opening-book lookups.
pub struct UciSession {
    board: Board,
    state: SearchState,
    /// Coordinate moves played from the start position, book-lookup key
    move_history: Vec<String>,
    /// The book only applies to games rooted at the standard start
    from_startpos: bool,
}

impl UciSession {
    #[must_use]
    pub fn new() -> Self {
        UciSession {
            board: Board::new(),
            state: SearchState::new(DEFAULT_TT_MB),
            move_history: Vec::new(),
            from_startpos: true,
        }
    }

    /// Handle one input line. Returns `false` when the session should end.
    pub fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> std::io::Result<bool> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(&command) = parts.first() else {
            return Ok(true);
        };

        match command {
            "uci" => {
                writeln!(out, "id name {ENGINE_NAME}")?;
                writeln!(out, "id author the Ember authors")?;
                writeln!(out, "option name Hash type spin default {DEFAULT_TT_MB} min 1 max 1024")?;
                writeln!(out, "uciok")?;
            }
            "isready" => writeln!(out, "readyok")?,
            "ucinewgame" => {
                self.board = Board::new();
                self.state.clear_tt();
                self.move_history.clear();
                self.from_startpos = true;
            }
            "position" => self.handle_position(&parts),
            "go" => self.handle_go(&parts, out)?,
            "setoption" => self.handle_setoption(&parts),
            "perft" => {
                let depth = parse_next::<u32>(&parts, 0).unwrap_or(1);
                let nodes = self.board.perft(depth);
                writeln!(out, "info string perft({depth}) = {nodes}")?;
            }
            "quit" => return Ok(false),
            _ => {
                #[cfg(feature = "logging")]
                log::debug!("ignoring unknown command: {line}");
            }
        }

        out.flush()?;
        Ok(true)
    }

    /// `position startpos [moves ...]` or `position fen <6 fields> [moves ...]`
    fn handle_position(&mut self, parts: &[&str]) {
        let mut i = 1;
        match parts.get(i) {
            Some(&"startpos") => {
                self.board = Board::new();
                self.from_startpos = true;
                i += 1;
            }
            Some(&"fen") if parts.len() >= i + 7 => {
                let fen = parts[i + 1..i + 7].join(" ");
                match Board::try_from_fen(&fen) {
                    Ok(board) => {
                        self.board = board;
                        self.from_startpos = false;
                    }
                    Err(_err) => {
                        #[cfg(feature = "logging")]
                        log::debug!("rejecting position: {_err}");
                        return;
                    }
                }
                i += 7;
            }
            _ => return,
        }

        self.move_history.clear();
        if parts.get(i) == Some(&"moves") {
            for uci in &parts[i + 1..] {
                if self.board.make_move_uci(uci).is_err() {
                    break;
                }
                self.move_history.push((*uci).to_string());
            }
        }
    }

    fn handle_go<W: Write>(&mut self, parts: &[&str], out: &mut W) -> std::io::Result<()> {
        // The book answers instantly while the game is still in it
        if self.from_startpos {
            let legal = self.board.legal_move_strings();
            if let Some(reply) = book::pick(&self.move_history, &legal, &mut thread_rng()) {
                writeln!(out, "bestmove {reply}")?;
                return Ok(());
            }
        }

        let params = parse_go_params(parts);
        let limits = self.limits_from(&params);

        let cell = RefCell::new(out);
        let logger = SessionLogger { out: &cell };
        let (best, _score) = search_best_move(&mut self.board, &mut self.state, &limits, &logger);

        let out = cell.into_inner();
        match best {
            Some(mv) => writeln!(out, "bestmove {mv}")?,
            None => writeln!(out, "bestmove 0000")?,
        }
        Ok(())
    }

    fn limits_from(&self, params: &GoParams) -> SearchLimits {
        if let Some(depth) = params.depth {
            return SearchLimits::depth(depth);
        }
        if let Some(ms) = params.movetime {
            return SearchLimits::move_time(ms);
        }

        let (remaining, increment) = match self.board.side_to_move() {
            Color::White => (params.wtime, params.winc),
            Color::Black => (params.btime, params.binc),
        };
        // With no clock at all, pretend a few seconds remain
        let remaining = remaining.unwrap_or(5000);
        SearchLimits::move_time(budget_from_clock(remaining, increment.unwrap_or(0)))
    }

    /// `setoption name Hash value <mb>`
    fn handle_setoption(&mut self, parts: &[&str]) {
        if parts.get(1) == Some(&"name")
            && parts.get(2).is_some_and(|n| n.eq_ignore_ascii_case("hash"))
            && parts.get(3) == Some(&"value")
        {
            if let Some(mb) = parse_next::<usize>(parts, 3) {
                self.state.resize_tt(mb.clamp(1, 1024));
            }
        }
    }
}

impl Default for UciSession {
    fn default() -> Self {
        UciSession::new()
    }
}

/// Drive a full session: read commands until `quit` or end of input.
pub fn run<R: BufRead, W: Write>(input: R, out: &mut W) -> std::io::Result<()> {
    let mut session = UciSession::new();
    for line in input.lines() {
        let line = line?;
        if !session.handle_line(line.trim(), out)? {
            break;
        }
    }
    Ok(())
}
