mod square;
mod color;
mod piece_type;
mod bitboard;

pub use square::*;
pub use color::*;
pub use piece_type::*;
pub use bitboard::*;
