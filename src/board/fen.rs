//! Position-string (FEN) parsing and formatting, plus coordinate-move
//! parsing against the legal move set.

use std::str::FromStr;

use super::error::{FenError, MoveParseError};
use super::types::{
    Color, Move, Piece, Square, CASTLE_BLACK_K, CASTLE_BLACK_Q, CASTLE_WHITE_K, CASTLE_WHITE_Q,
};
use super::Board;

impl Board {
    /// Parse a position from FEN notation (all six fields required).
    ///
    /// On failure no board is produced; there is no partially-parsed state
    /// to misuse.
    pub fn try_from_fen(fen: &str) -> Result<Self, FenError> {
        let mut board = Board::empty();
        let fields: Vec<&str> = fen.split_whitespace().collect();

        if fields.len() < 6 {
            return Err(FenError::TooFewFields {
                found: fields.len(),
            });
        }

        // Piece placement, rank 8 first
        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidRankCount { found: ranks.len() });
        }
        for (row, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - row;
            let mut file = 0usize;
            for c in rank_str.chars() {
                if let Some(d) = c.to_digit(10) {
                    file += d as usize;
                } else {
                    let color = if c.is_ascii_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    let piece = Piece::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                    if file >= 8 {
                        return Err(FenError::InvalidRank { rank });
                    }
                    board.set_piece(Square::new(file, rank), color, piece);
                    file += 1;
                }
            }
            if file != 8 {
                return Err(FenError::InvalidRank { rank });
            }
        }

        // Side to move
        board.side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        // Castling rights
        if fields[2] != "-" {
            for c in fields[2].chars() {
                board.castling_rights |= match c {
                    'K' => CASTLE_WHITE_K,
                    'Q' => CASTLE_WHITE_Q,
                    'k' => CASTLE_BLACK_K,
                    'q' => CASTLE_BLACK_Q,
                    _ => return Err(FenError::InvalidCastling { char: c }),
                };
            }
        }

        // En passant target
        board.en_passant = if fields[3] == "-" {
            None
        } else {
            let sq = Square::from_str(fields[3]).map_err(|_| FenError::InvalidEnPassant {
                found: fields[3].to_string(),
            })?;
            Some(sq)
        };

        // Clocks
        board.halfmove_clock = fields[4].parse().map_err(|_| FenError::InvalidCounter {
            found: fields[4].to_string(),
        })?;
        board.fullmove_number = fields[5].parse().map_err(|_| FenError::InvalidCounter {
            found: fields[5].to_string(),
        })?;

        board.key = board.compute_key();
        board.key_history.push(board.key);
        Ok(board)
    }

    /// Format the position as a FEN string.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut placement = String::new();
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                if let Some((color, piece)) = self.piece_at(Square::new(file, rank)) {
                    if empty > 0 {
                        placement.push_str(&empty.to_string());
                        empty = 0;
                    }
                    placement.push(piece.to_fen_char(color));
                } else {
                    empty += 1;
                }
            }
            if empty > 0 {
                placement.push_str(&empty.to_string());
            }
            if rank > 0 {
                placement.push('/');
            }
        }

        let side = match self.side_to_move {
            Color::White => "w",
            Color::Black => "b",
        };

        let mut castling = String::new();
        for (bit, c) in [
            (CASTLE_WHITE_K, 'K'),
            (CASTLE_WHITE_Q, 'Q'),
            (CASTLE_BLACK_K, 'k'),
            (CASTLE_BLACK_Q, 'q'),
        ] {
            if self.has_castling_right(bit) {
                castling.push(c);
            }
        }
        if castling.is_empty() {
            castling.push('-');
        }

        let ep = self
            .en_passant
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!(
            "{placement} {side} {castling} {ep} {} {}",
            self.halfmove_clock, self.fullmove_number
        )
    }

    /// Parse a move in coordinate notation (e.g. "e2e4", "e7e8q") by
    /// matching it against the legal moves of the current position.
    pub fn parse_move(&mut self, uci: &str) -> Result<Move, MoveParseError> {
        // Coordinate moves are ASCII; the check also keeps slicing safe
        if !uci.is_ascii() || uci.len() < 4 || uci.len() > 5 {
            return Err(MoveParseError::InvalidLength { len: uci.len() });
        }

        let from = Square::from_str(&uci[0..2])?;
        let to = Square::from_str(&uci[2..4])?;

        let promotion = match uci.chars().nth(4) {
            None => None,
            Some(c) => {
                let piece =
                    Piece::from_char(c).ok_or(MoveParseError::InvalidPromotion { char: c })?;
                if matches!(piece, Piece::Pawn | Piece::King) {
                    return Err(MoveParseError::InvalidPromotion { char: c });
                }
                Some(piece)
            }
        };

        self.generate_legal()
            .iter()
            .find(|m| m.from == from && m.to == to && m.promotion == promotion)
            .copied()
            .ok_or(MoveParseError::IllegalMove {
                notation: uci.to_string(),
            })
    }

    /// Parse a coordinate move and make it on the board in one call.
    /// The board is unchanged when parsing fails.
    pub fn make_move_uci(&mut self, uci: &str) -> Result<Move, MoveParseError> {
        let mv = self.parse_move(uci)?;
        self.make(mv);
        Ok(mv)
    }

    /// Coordinate strings of every legal move in the current position.
    #[must_use]
    pub fn legal_move_strings(&mut self) -> Vec<String> {
        self.generate_legal()
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}

impl FromStr for Board {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::try_from_fen(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_round_trip() {
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        let board = Board::try_from_fen(fen).unwrap();
        assert_eq!(board.to_fen(), fen);
    }

    #[test]
    fn black_to_move_with_en_passant() {
        let board =
            Board::try_from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1")
                .unwrap();
        assert_eq!(board.side_to_move(), Color::Black);
        assert_eq!(board.en_passant, Some(Square::new(4, 2)));
    }

    #[test]
    fn clocks_are_parsed() {
        let board = Board::try_from_fen("4k3/8/8/8/8/8/8/4K3 w - - 42 17").unwrap();
        assert_eq!(board.halfmove_clock(), 42);
        assert_eq!(board.fullmove_number(), 17);
    }

    #[test]
    fn rejects_too_few_fields() {
        let result = Board::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w");
        assert!(matches!(result, Err(FenError::TooFewFields { .. })));
    }

    #[test]
    fn rejects_bad_piece() {
        let result =
            Board::try_from_fen("rnbqkbnr/ppppxppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert!(matches!(result, Err(FenError::InvalidPiece { .. })));
    }

    #[test]
    fn rejects_bad_side() {
        let result =
            Board::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1");
        assert!(matches!(result, Err(FenError::InvalidSideToMove { .. })));
    }

    #[test]
    fn rejects_bad_castling() {
        let result =
            Board::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w XQkq - 0 1");
        assert!(matches!(result, Err(FenError::InvalidCastling { .. })));
    }

    #[test]
    fn rejects_bad_en_passant() {
        let result =
            Board::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq z9 0 1");
        assert!(matches!(result, Err(FenError::InvalidEnPassant { .. })));
    }

    #[test]
    fn rejects_short_rank() {
        let result =
            Board::try_from_fen("rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert!(matches!(result, Err(FenError::InvalidRank { .. })));
    }

    #[test]
    fn rejects_bad_counter() {
        let result =
            Board::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - x 1");
        assert!(matches!(result, Err(FenError::InvalidCounter { .. })));
    }

    #[test]
    fn partial_castling_rights() {
        let board =
            Board::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w Kq - 0 1").unwrap();
        assert!(board.has_castling_right(CASTLE_WHITE_K));
        assert!(!board.has_castling_right(CASTLE_WHITE_Q));
        assert!(!board.has_castling_right(CASTLE_BLACK_K));
        assert!(board.has_castling_right(CASTLE_BLACK_Q));
    }

    #[test]
    fn parse_move_matches_legal_set() {
        let mut board = Board::new();
        let mv = board.parse_move("e2e4").unwrap();
        assert_eq!(mv.from, Square::new(4, 1));
        assert_eq!(mv.to, Square::new(4, 3));
        assert!(mv.is_double_push());
    }

    #[test]
    fn parse_move_promotion() {
        let mut board = Board::try_from_fen("8/P7/8/8/8/8/8/K1k5 w - - 0 1").unwrap();
        let mv = board.parse_move("a7a8q").unwrap();
        assert_eq!(mv.promotion, Some(Piece::Queen));
        assert!(board.parse_move("a7a8p").is_err());
    }

    #[test]
    fn parse_move_rejects_illegal() {
        let mut board = Board::new();
        assert!(matches!(
            board.parse_move("e2e5"),
            Err(MoveParseError::IllegalMove { .. })
        ));
        assert!(matches!(
            board.parse_move("e2"),
            Err(MoveParseError::InvalidLength { .. })
        ));
        assert!(matches!(
            board.parse_move("z9z9"),
            Err(MoveParseError::InvalidSquare { .. })
        ));
    }

    #[test]
    fn make_move_uci_leaves_board_unchanged_on_error() {
        let mut board = Board::new();
        let before = board.to_fen();
        assert!(board.make_move_uci("e2e5").is_err());
        assert_eq!(board.to_fen(), before);
        board.make_move_uci("e2e4").unwrap();
        assert_eq!(board.side_to_move(), Color::Black);
    }
}
