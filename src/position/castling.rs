use crate::utils::Color;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CastlingSide {
    KingSide, QueenSide
}

/// Castling rights as a `KQkq` bitmask, `K` in the highest of the four bits.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    const fn bit(color: Color, side: CastlingSide) -> u8 {
        let index = color as u8 * 2 + side as u8;
        0b1000 >> index
    }

    pub const fn has(&self, color: Color, side: CastlingSide) -> bool {
        self.0 & CastlingRights::bit(color, side) != 0
    }

    pub fn set(&mut self, color: Color, side: CastlingSide) {
        self.0 |= CastlingRights::bit(color, side);
    }

    pub const fn bits(&self) -> u8 {
        self.0
    }
}
