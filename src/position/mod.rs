//! Piece placement and the auxiliary game state a network input is built from.
//!
//! A `Position` is a plain snapshot: it is not checked for legality and
//! cannot generate or play moves.

mod fen;
mod castling;

pub use fen::*;
pub use castling::*;

use crate::utils::{Bitboard, Color, PieceType, Square};

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Position {
    /// Indexed by `[color][piece_type]`.
    pub piece_masks: [[Bitboard; PieceType::LIMIT as usize]; Color::LIMIT as usize],
    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    /// The square a pawn of the side to move may capture onto en passant.
    pub en_passant_target: Option<Square>,
    /// Plies since the last capture or pawn move.
    pub halfmove_clock: u16,
    pub fullmove: u16,
}

impl Position {
    pub fn blank() -> Position {
        Position {
            piece_masks: [[0; PieceType::LIMIT as usize]; Color::LIMIT as usize],
            side_to_move: Color::White,
            castling_rights: CastlingRights::NONE,
            en_passant_target: None,
            halfmove_clock: 0,
            fullmove: 1,
        }
    }

    pub fn initial() -> Position {
        match Position::from_fen(INITIAL_FEN) {
            Ok(position) => position,
            Err(err) => unreachable!("initial FEN must parse: {err}"),
        }
    }

    pub fn put_piece(&mut self, color: Color, piece_type: PieceType, square: Square) {
        self.piece_masks[color as usize][piece_type as usize] |= square.to_mask();
    }

    pub const fn get_piece_mask(&self, color: Color, piece_type: PieceType) -> Bitboard {
        self.piece_masks[color as usize][piece_type as usize]
    }

    pub fn get_color_mask(&self, color: Color) -> Bitboard {
        self.piece_masks[color as usize].iter().fold(0, |acc, mask| acc | mask)
    }

    pub fn get_piece_at(&self, square: Square) -> Option<(Color, PieceType)> {
        let mask = square.to_mask();
        Color::iter()
            .flat_map(|color| PieceType::iter_all().map(move |piece_type| (color, piece_type)))
            .find(|&(color, piece_type)| self.get_piece_mask(color, piece_type) & mask != 0)
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_position() {
        let position = Position::initial();
        assert_eq!(position.side_to_move, Color::White);
        assert_eq!(position.castling_rights, CastlingRights::ALL);
        assert_eq!(position.en_passant_target, None);
        assert_eq!(position.get_color_mask(Color::White).count_ones(), 16);
        assert_eq!(position.get_color_mask(Color::Black).count_ones(), 16);
        assert_eq!(position.get_piece_at(Square::E1), Some((Color::White, PieceType::King)));
        assert_eq!(position.get_piece_at(Square::E8), Some((Color::Black, PieceType::King)));
        assert_eq!(position.get_piece_at(Square::E4), None);
    }

    #[test]
    fn test_put_piece() {
        let mut position = Position::blank();
        position.put_piece(Color::Black, PieceType::Queen, Square::E4);
        assert_eq!(position.get_piece_mask(Color::Black, PieceType::Queen), Square::E4.to_mask());
        assert_eq!(position.get_piece_at(Square::E4), Some((Color::Black, PieceType::Queen)));
    }
}
