use std::fmt::Display;
use crate::utils::Bitboard;

/// A board square, indexed `rank * 8 + file` so that a1 is 0 and h8 is 63.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct Square(u8);

impl Square {
    pub const LIMIT: u8 = 64;

    pub const A1: Square = Square(0);
    pub const E1: Square = Square(4);
    pub const H1: Square = Square(7);
    pub const E2: Square = Square(12);
    pub const E4: Square = Square(28);
    pub const E7: Square = Square(52);
    pub const A8: Square = Square(56);
    pub const E8: Square = Square(60);
    pub const H8: Square = Square(63);

    pub const fn new(file: u8, rank: u8) -> Option<Square> {
        if file < 8 && rank < 8 {
            Some(Square(rank * 8 + file))
        } else {
            None
        }
    }

    pub const fn from_index(index: u8) -> Option<Square> {
        if index < Square::LIMIT {
            Some(Square(index))
        } else {
            None
        }
    }

    pub const fn index(&self) -> u8 {
        self.0
    }

    pub const fn to_mask(&self) -> Bitboard {
        1 << self.0
    }

    pub const fn get_file(&self) -> u8 {
        self.0 % 8
    }

    pub const fn get_rank(&self) -> u8 {
        self.0 / 8
    }

    pub const fn get_file_char(&self) -> char {
        (b'a' + self.get_file()) as char
    }

    pub const fn get_rank_char(&self) -> char {
        (b'1' + self.get_rank()) as char
    }

    /// Parses algebraic notation such as `e4`.
    pub fn from_name(name: &str) -> Option<Square> {
        let mut chars = name.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => {
                if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
                    return None;
                }
                Square::new(file as u8 - b'a', rank as u8 - b'1')
            }
            _ => None,
        }
    }

    pub fn iter_all() -> impl Iterator<Item = Square> {
        (0..Square::LIMIT).map(Square)
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{}", self.get_file_char(), self.get_rank_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square() {
        assert_eq!(Square::A1.index(), 0);
        assert_eq!(Square::H1.index(), 7);
        assert_eq!(Square::A8.index(), 56);
        assert_eq!(Square::H8.index(), 63);
        assert_eq!(Square::new(4, 3), Some(Square::E4));
        assert_eq!(Square::new(8, 0), None);
        assert_eq!(Square::from_index(64), None);
        assert_eq!(Square::E4.get_file(), 4);
        assert_eq!(Square::E4.get_rank(), 3);
    }

    #[test]
    fn test_square_names() {
        for square in Square::iter_all() {
            assert_eq!(Square::from_name(&square.to_string()), Some(square));
        }
        assert_eq!(Square::E8.to_string(), "e8");
        assert_eq!(Square::from_name("i1"), None);
        assert_eq!(Square::from_name("a9"), None);
        assert_eq!(Square::from_name("e"), None);
        assert_eq!(Square::from_name("e44"), None);
    }
}
