//! Ember binary: UCI engine with command-line perft self-test modes.
//!
//! ```text
//! ember                        UCI session on stdin/stdout
//! ember perft <depth>          node count from the start position
//! ember perftfen "<fen>" <d>   node count from a FEN position
//! ember divide <depth>         per-root-move node counts
//! ember dividefen "<fen>" <d>  per-root-move node counts from a FEN
//! ```

use std::io;
use std::process::ExitCode;
use std::time::Instant;

use ember::board::Board;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        Some("perft") => run_perft(Board::new(), &args[1..]),
        Some("perftfen") => match board_from_arg(&args[1..]) {
            Ok(board) => run_perft(board, &args[2..]),
            Err(code) => code,
        },
        Some("divide") => run_divide(Board::new(), &args[1..]),
        Some("dividefen") => match board_from_arg(&args[1..]) {
            Ok(board) => run_divide(board, &args[2..]),
            Err(code) => code,
        },
        _ => {
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            match ember::uci::run(stdin.lock(), &mut stdout) {
                Ok(()) => ExitCode::SUCCESS,
                Err(err) => {
                    eprintln!("io error: {err}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}

fn board_from_arg(args: &[String]) -> Result<Board, ExitCode> {
    let Some(fen) = args.first() else {
        eprintln!("missing FEN argument");
        return Err(ExitCode::FAILURE);
    };
    Board::try_from_fen(fen).map_err(|err| {
        eprintln!("bad FEN: {err}");
        ExitCode::FAILURE
    })
}

fn parse_depth(args: &[String]) -> Option<u32> {
    args.first().and_then(|d| d.parse().ok())
}

fn run_perft(mut board: Board, args: &[String]) -> ExitCode {
    let Some(depth) = parse_depth(args) else {
        eprintln!("missing or invalid depth");
        return ExitCode::FAILURE;
    };
    let start = Instant::now();
    let nodes = board.perft(depth);
    let elapsed = start.elapsed();
    println!("perft({depth}) = {nodes}  [{:.1} ms]", elapsed.as_secs_f64() * 1000.0);
    ExitCode::SUCCESS
}

fn run_divide(mut board: Board, args: &[String]) -> ExitCode {
    let Some(depth) = parse_depth(args) else {
        eprintln!("missing or invalid depth");
        return ExitCode::FAILURE;
    };
    let counts = board.perft_divide(depth);
    let mut total = 0;
    for (mv, nodes) in counts {
        println!("{mv}: {nodes}");
        total += nodes;
    }
    println!("Total: {total}");
    ExitCode::SUCCESS
}
