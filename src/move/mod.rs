//! Moves as the network sees them: a source square, a destination square and
//! an optional promotion piece. Castling is written king-to-destination
//! (`e1g1`), as in UCI.

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use crate::utils::{PromotionPieceType, Square};

#[derive(thiserror::Error, Eq, PartialEq, Debug)]
pub enum MoveParseError {
    #[error("`{0}` is not 4 or 5 characters long")]
    InvalidLength(String),
    #[error("`{0}` contains an invalid square")]
    InvalidSquare(String),
    #[error("`{0}` has an invalid promotion piece")]
    InvalidPromotion(String),
    #[error("`{0}` does not move anything")]
    NullMove(String),
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Move {
    pub source: Square,
    pub destination: Square,
    pub promotion: Option<PromotionPieceType>,
}

impl Move {
    pub const fn new(source: Square, destination: Square) -> Move {
        Move { source, destination, promotion: None }
    }

    pub const fn new_promotion(source: Square, destination: Square, promotion: PromotionPieceType) -> Move {
        Move { source, destination, promotion: Some(promotion) }
    }

    /// Parses long algebraic (UCI) notation such as `e2e4` or `e7e8q`.
    pub fn from_uci(uci: &str) -> Result<Move, MoveParseError> {
        if !uci.is_ascii() || !(4..=5).contains(&uci.len()) {
            return Err(MoveParseError::InvalidLength(uci.to_string()));
        }

        let source = Square::from_name(&uci[0..2]);
        let destination = Square::from_name(&uci[2..4]);
        let (source, destination) = match (source, destination) {
            (Some(source), Some(destination)) => (source, destination),
            _ => return Err(MoveParseError::InvalidSquare(uci.to_string())),
        };
        if source == destination {
            return Err(MoveParseError::NullMove(uci.to_string()));
        }

        let promotion = match uci[4..].chars().next() {
            None => None,
            Some(c) => match PromotionPieceType::from_char(c) {
                Some(promotion) if c.is_ascii_lowercase() => Some(promotion),
                _ => return Err(MoveParseError::InvalidPromotion(uci.to_string())),
            },
        };

        Ok(Move { source, destination, promotion })
    }

    pub fn to_uci(&self) -> String {
        match self.promotion {
            Some(promotion) => format!("{}{}{}", self.source, self.destination, promotion.to_char()),
            None => format!("{}{}", self.source, self.destination),
        }
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

impl FromStr for Move {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Move::from_uci(s)
    }
}
