use crate::utils::Square;

pub type Bitboard = u64;

#[derive(Debug, Clone)]
pub struct SquaresFromMaskIterator {
    mask: Bitboard,
}

impl From<Bitboard> for SquaresFromMaskIterator {
    fn from(mask: Bitboard) -> Self {
        SquaresFromMaskIterator {
            mask,
        }
    }
}

impl Iterator for SquaresFromMaskIterator {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        if self.mask == 0 {
            return None;
        }

        let square_index = self.mask.trailing_zeros();
        self.mask &= self.mask - 1;  // Clear the least significant set bit

        Square::from_index(square_index as u8)
    }
}

pub fn get_squares_from_mask_iter(mask: Bitboard) -> SquaresFromMaskIterator {
    mask.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_squares_from_mask() {
        assert_eq!(get_squares_from_mask_iter(0).count(), 0);

        let mask = Square::A1.to_mask() | Square::E4.to_mask() | Square::H8.to_mask();
        let squares: Vec<Square> = get_squares_from_mask_iter(mask).collect();
        assert_eq!(squares, vec![Square::A1, Square::E4, Square::H8]);

        assert_eq!(get_squares_from_mask_iter(Bitboard::MAX).count(), 64);
    }
}
