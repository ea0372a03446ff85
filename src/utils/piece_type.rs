use subenum::subenum;

/// Piece types in input-plane order: the discriminant is the plane offset
/// within a color's block of planes.
#[subenum(PromotionPieceType)]
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PieceType {
    Pawn=0,
    #[subenum(PromotionPieceType)]
    Knight=1,
    #[subenum(PromotionPieceType)]
    Bishop=2,
    #[subenum(PromotionPieceType)]
    Rook=3,
    #[subenum(PromotionPieceType)]
    Queen=4,
    King=5
}

const ALL: [PieceType; 6] = [
    PieceType::Pawn,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Rook,
    PieceType::Queen,
    PieceType::King
];

impl PieceType {
    pub const LIMIT: u8 = 6;

    /// Lowercase letter used by FEN and UCI.
    pub const fn to_char(&self) -> char {
        match self {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        }
    }

    /// Case-insensitive.
    pub const fn from_char(c: char) -> Option<PieceType> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceType::Pawn),
            'n' => Some(PieceType::Knight),
            'b' => Some(PieceType::Bishop),
            'r' => Some(PieceType::Rook),
            'q' => Some(PieceType::Queen),
            'k' => Some(PieceType::King),
            _ => None,
        }
    }

    pub fn iter_all() -> impl Iterator<Item = PieceType> {
        ALL.iter().copied()
    }
}

impl PromotionPieceType {
    pub fn to_char(&self) -> char {
        PieceType::from(*self).to_char()
    }

    pub fn from_char(c: char) -> Option<PromotionPieceType> {
        PieceType::from_char(c).and_then(|piece_type| PromotionPieceType::try_from(piece_type).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_type() {
        assert_eq!(PieceType::Pawn as u8, 0);
        assert_eq!(PieceType::King as u8, 5);
        assert_eq!(PieceType::iter_all().count(), PieceType::LIMIT as usize);
        for piece_type in PieceType::iter_all() {
            assert_eq!(PieceType::from_char(piece_type.to_char()), Some(piece_type));
            assert_eq!(PieceType::from_char(piece_type.to_char().to_ascii_uppercase()), Some(piece_type));
        }
        assert_eq!(PieceType::from_char('x'), None);
    }

    #[test]
    fn test_promotion_piece_type() {
        assert_eq!(PromotionPieceType::from_char('q'), Some(PromotionPieceType::Queen));
        assert_eq!(PromotionPieceType::from_char('N'), Some(PromotionPieceType::Knight));
        assert_eq!(PromotionPieceType::from_char('k'), None);
        assert_eq!(PromotionPieceType::from_char('p'), None);
        assert_eq!(PieceType::from(PromotionPieceType::Rook), PieceType::Rook);
    }
}
