use std::str::FromStr;
use crate::position::{CastlingRights, CastlingSide, Position};
use crate::utils::{Color, PieceType, Square};

pub const INITIAL_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(thiserror::Error, Eq, PartialEq, Debug)]
pub enum FenParseError {
    #[error("expected 4 or 6 fields, found {0}")]
    InvalidFieldCount(usize),
    #[error("expected 8 ranks, found {0}")]
    InvalidRankCount(usize),
    #[error("invalid rank `{0}`")]
    InvalidRow(String),
    #[error("invalid side to move `{0}`")]
    InvalidSideToMove(String),
    #[error("invalid castling rights `{0}`")]
    InvalidCastle(String),
    #[error("invalid en passant target `{0}`")]
    InvalidEnPassantTarget(String),
    #[error("invalid halfmove clock `{0}`")]
    InvalidHalfmoveClock(String),
    #[error("invalid fullmove counter `{0}`")]
    InvalidFullmoveCounter(String),
}

fn process_fen_side_to_move(position: &mut Position, fen_side_to_move: &str) -> bool {
    match fen_side_to_move {
        "w" => position.side_to_move = Color::White,
        "b" => position.side_to_move = Color::Black,
        _ => return false,
    }
    true
}

fn process_fen_castle(position: &mut Position, fen_castle: &str) -> bool {
    if fen_castle == "-" {
        return true;
    }
    if fen_castle.is_empty() || fen_castle.len() > 4 {
        return false;
    }
    let mut rights = CastlingRights::NONE;
    for c in fen_castle.chars() {
        let (color, side) = match c {
            'K' => (Color::White, CastlingSide::KingSide),
            'Q' => (Color::White, CastlingSide::QueenSide),
            'k' => (Color::Black, CastlingSide::KingSide),
            'q' => (Color::Black, CastlingSide::QueenSide),
            _ => return false,
        };
        if rights.has(color, side) {
            return false;
        }
        rights.set(color, side);
    }
    position.castling_rights = rights;
    true
}

// expects side_to_move to be set first
fn process_en_passant_target_square(position: &mut Position, fen_en_passant_target_square: &str) -> bool {
    if fen_en_passant_target_square == "-" {
        return true;
    }

    let square = match Square::from_name(fen_en_passant_target_square) {
        Some(square) => square,
        None => return false,
    };

    let expected_rank = match position.side_to_move {
        Color::White => 5,
        Color::Black => 2,
    };
    if square.get_rank() != expected_rank {
        return false;
    }

    position.en_passant_target = Some(square);
    true
}

fn process_fen_halfmove_clock(position: &mut Position, fen_halfmove_clock: &str) -> bool {
    match fen_halfmove_clock.parse::<u16>() {
        Ok(halfmove_clock) => {
            position.halfmove_clock = halfmove_clock;
            true
        }
        Err(_) => false,
    }
}

fn process_fen_fullmove(position: &mut Position, fen_fullmove: &str) -> bool {
    match fen_fullmove.parse::<u16>() {
        Ok(fullmove) if fullmove >= 1 => {
            position.fullmove = fullmove;
            true
        }
        _ => false,
    }
}

fn process_fen_board_row(position: &mut Position, row_from_top: u8, row: &str) -> bool {
    if row.len() > 8 || row.is_empty() {
        return false;
    }
    let rank = 7 - row_from_top;
    let mut file = 0;
    for c in row.chars() {
        if let Some(skip) = c.to_digit(10) {
            if skip == 0 {
                return false;
            }
            file += skip as u8;
            if file > 8 {
                return false;
            }
            continue;
        }
        let piece_type = match PieceType::from_char(c) {
            Some(piece_type) => piece_type,
            None => return false,
        };
        let square = match Square::new(file, rank) {
            Some(square) => square,
            None => return false,
        };
        position.put_piece(Color::from(c.is_ascii_lowercase()), piece_type, square);
        file += 1;
    }
    file == 8
}

fn process_fen_board(position: &mut Position, fen_board: &str) -> Result<(), FenParseError> {
    let rows: Vec<&str> = fen_board.split('/').collect();
    if rows.len() != 8 {
        return Err(FenParseError::InvalidRankCount(rows.len()));
    }
    for (row_from_top, row) in rows.into_iter().enumerate() {
        if !process_fen_board_row(position, row_from_top as u8, row) {
            return Err(FenParseError::InvalidRow(row.to_string()));
        }
    }
    Ok(())
}

impl Position {
    /// Parses a FEN string. The two clock fields may be omitted (EPD style),
    /// in which case they default to `0 1`.
    pub fn from_fen(fen: &str) -> Result<Position, FenParseError> {
        let mut position = Position::blank();

        let fen_parts: Vec<&str> = fen.split_ascii_whitespace().collect();
        let (fen_board, fen_side_to_move, fen_castle, fen_en_passant, fen_halfmove_clock, fen_fullmove) = match &fen_parts[..] {
            [board, side_to_move, castle, en_passant] => (*board, *side_to_move, *castle, *en_passant, "0", "1"),
            [board, side_to_move, castle, en_passant, halfmove_clock, fullmove] => {
                (*board, *side_to_move, *castle, *en_passant, *halfmove_clock, *fullmove)
            }
            _ => return Err(FenParseError::InvalidFieldCount(fen_parts.len())),
        };

        if !process_fen_side_to_move(&mut position, fen_side_to_move) {
            return Err(FenParseError::InvalidSideToMove(fen_side_to_move.to_string()));
        }

        if !process_fen_castle(&mut position, fen_castle) {
            return Err(FenParseError::InvalidCastle(fen_castle.to_string()));
        }

        if !process_en_passant_target_square(&mut position, fen_en_passant) {
            return Err(FenParseError::InvalidEnPassantTarget(fen_en_passant.to_string()));
        }

        if !process_fen_halfmove_clock(&mut position, fen_halfmove_clock) {
            return Err(FenParseError::InvalidHalfmoveClock(fen_halfmove_clock.to_string()));
        }

        if !process_fen_fullmove(&mut position, fen_fullmove) {
            return Err(FenParseError::InvalidFullmoveCounter(fen_fullmove.to_string()));
        }

        process_fen_board(&mut position, fen_board)?;

        Ok(position)
    }

    fn get_fen_board(&self) -> String {
        let mut fen_board = String::new();
        for rank in (0..8).rev() {
            let mut empty_count: u8 = 0;
            for file in 0..8 {
                let piece = Square::new(file, rank).and_then(|square| self.get_piece_at(square));
                match piece {
                    None => empty_count += 1,
                    Some((color, piece_type)) => {
                        if empty_count > 0 {
                            fen_board.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        let c = piece_type.to_char();
                        fen_board.push(if color == Color::White { c.to_ascii_uppercase() } else { c });
                    }
                }
            }
            if empty_count > 0 {
                fen_board.push_str(&empty_count.to_string());
            }
            fen_board.push('/');
        }
        fen_board.pop();
        fen_board
    }

    fn get_fen_castling_info(&self) -> String {
        let mut castling_info = String::with_capacity(4);
        for (c, color, side) in [
            ('K', Color::White, CastlingSide::KingSide),
            ('Q', Color::White, CastlingSide::QueenSide),
            ('k', Color::Black, CastlingSide::KingSide),
            ('q', Color::Black, CastlingSide::QueenSide),
        ] {
            if self.castling_rights.has(color, side) {
                castling_info.push(c);
            }
        }
        if castling_info.is_empty() {
            castling_info.push('-');
        }
        castling_info
    }

    pub fn to_fen(&self) -> String {
        let side_to_move = match self.side_to_move {
            Color::White => "w",
            Color::Black => "b",
        };
        let en_passant_target = match self.en_passant_target {
            Some(square) => square.to_string(),
            None => "-".to_string(),
        };
        [
            self.get_fen_board(),
            side_to_move.to_string(),
            self.get_fen_castling_info(),
            en_passant_target,
            self.halfmove_clock.to_string(),
            self.fullmove.to_string(),
        ].join(" ")
    }
}

impl FromStr for Position {
    type Err = FenParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_fen(s)
    }
}
