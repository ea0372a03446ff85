use tch::{Device, Kind, Tensor};
use crate::consts::{BOARD_INPUT_CHANNELS, BOARD_INPUT_LEN, EN_PASSANT_PLANE, HALFMOVE_CLOCK_NORMALIZER, NUM_FILES, NUM_RANKS, PLANES_PER_COLOR, STATE_INPUT_LEN};
use crate::error::{PvNetError, Result};
use crate::position::{CastlingSide, Position};
use crate::utils::{get_squares_from_mask_iter, Color, PieceType, Square};

pub type StateVector = [f32; STATE_INPUT_LEN as usize];

/// Offset of a `(file, rank, channel)` cell in a flattened `[8, 8, 14]` board input.
pub const fn plane_offset(file: u8, rank: u8, channel: i64) -> usize {
    ((file as i64 * NUM_RANKS + rank as i64) * BOARD_INPUT_CHANNELS + channel) as usize
}

pub const fn piece_channel(color: Color, piece_type: PieceType) -> i64 {
    color as i64 * PLANES_PER_COLOR + piece_type as i64
}

pub const fn en_passant_channel(color: Color) -> i64 {
    color as i64 * PLANES_PER_COLOR + EN_PASSANT_PLANE
}

/// Offsets of every set cell of the board input, in ascending order.
pub fn active_planes(position: &Position) -> Vec<u16> {
    let mut offsets = Vec::with_capacity(33);

    for color in Color::iter() {
        for piece_type in PieceType::iter_all() {
            let channel = piece_channel(color, piece_type);
            for square in get_squares_from_mask_iter(position.get_piece_mask(color, piece_type)) {
                offsets.push(plane_offset(square.get_file(), square.get_rank(), channel) as u16);
            }
        }
    }

    // Only the side to move can capture en passant.
    if let Some(square) = position.en_passant_target {
        let channel = en_passant_channel(position.side_to_move);
        offsets.push(plane_offset(square.get_file(), square.get_rank(), channel) as u16);
    }

    offsets.sort_unstable();
    offsets
}

/// Dense `[file][rank][channel]` board input, flattened.
pub fn board_planes(position: &Position) -> Vec<f32> {
    planes_from_offsets(&active_planes(position))
}

pub fn planes_from_offsets(offsets: &[u16]) -> Vec<f32> {
    let mut planes = vec![0.; BOARD_INPUT_LEN];
    for &offset in offsets {
        planes[offset as usize] = 1.;
    }
    planes
}

pub fn state_vector(position: &Position) -> StateVector {
    let castling = position.castling_rights;
    let flag = |set: bool| if set { 1. } else { 0. };
    [
        flag(castling.has(Color::White, CastlingSide::KingSide)),
        flag(castling.has(Color::White, CastlingSide::QueenSide)),
        flag(castling.has(Color::Black, CastlingSide::KingSide)),
        flag(castling.has(Color::Black, CastlingSide::QueenSide)),
        flag(position.side_to_move == Color::White),
        (position.halfmove_clock as f32 / HALFMOVE_CLOCK_NORMALIZER).min(1.),
    ]
}

/// Stacks flattened board inputs into a `[batch, 8, 8, 14]` tensor.
pub fn board_tensor_from_planes(planes: &[Vec<f32>], device: Device) -> Result<Tensor> {
    if planes.is_empty() {
        return Err(PvNetError::EmptyBatch);
    }
    let mut flat = Vec::with_capacity(planes.len() * BOARD_INPUT_LEN);
    for board in planes {
        if board.len() != BOARD_INPUT_LEN {
            return Err(PvNetError::Shape {
                name: crate::consts::BOARD_INPUT.to_string(),
                expected: vec![BOARD_INPUT_LEN as i64],
                actual: vec![board.len() as i64],
            });
        }
        flat.extend_from_slice(board);
    }
    Ok(Tensor::from_slice(&flat)
        .view([planes.len() as i64, NUM_FILES, NUM_RANKS, BOARD_INPUT_CHANNELS])
        .to_kind(Kind::Float)
        .to_device(device))
}

pub fn state_tensor_from_vectors(states: &[StateVector], device: Device) -> Result<Tensor> {
    if states.is_empty() {
        return Err(PvNetError::EmptyBatch);
    }
    let flat: Vec<f32> = states.iter().flatten().copied().collect();
    Ok(Tensor::from_slice(&flat)
        .view([states.len() as i64, STATE_INPUT_LEN])
        .to_kind(Kind::Float)
        .to_device(device))
}

pub fn board_tensor(positions: &[Position], device: Device) -> Result<Tensor> {
    let planes: Vec<Vec<f32>> = positions.iter().map(board_planes).collect();
    board_tensor_from_planes(&planes, device)
}

pub fn state_tensor(positions: &[Position], device: Device) -> Result<Tensor> {
    let states: Vec<StateVector> = positions.iter().map(state_vector).collect();
    state_tensor_from_vectors(&states, device)
}

/// Squares set on one channel of a flattened board input.
pub fn squares_on_channel(planes: &[f32], channel: i64) -> Vec<Square> {
    Square::iter_all()
        .filter(|square| planes[plane_offset(square.get_file(), square.get_rank(), channel)] != 0.)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use super::*;
    use crate::position::INITIAL_FEN;

    #[test]
    fn test_initial_position_planes() {
        let planes = board_planes(&Position::initial());
        assert_eq!(planes.len(), BOARD_INPUT_LEN);
        assert_eq!(planes.iter().filter(|&&v| v == 1.).count(), 32);
        assert_eq!(planes.iter().filter(|&&v| v != 0. && v != 1.).count(), 0);

        let white_pawns = squares_on_channel(&planes, piece_channel(Color::White, PieceType::Pawn));
        assert_eq!(white_pawns.len(), 8);
        assert!(white_pawns.iter().all(|square| square.get_rank() == 1));

        assert_eq!(squares_on_channel(&planes, piece_channel(Color::Black, PieceType::King)), vec![Square::E8]);
        assert!(squares_on_channel(&planes, en_passant_channel(Color::White)).is_empty());
        assert!(squares_on_channel(&planes, en_passant_channel(Color::Black)).is_empty());
    }

    #[test]
    fn test_planes_match_chess_crate() {
        let fen = "r1bqkb1r/p2ppppp/1pn2n2/2p5/P7/2P2P1P/1P1PP1P1/RNBQKBNR w KQkq - 0 5";
        let planes = board_planes(&Position::from_fen(fen).unwrap());
        let reference = chess::Board::from_str(fen).unwrap();

        let pieces = [
            (PieceType::Pawn, chess::Piece::Pawn),
            (PieceType::Knight, chess::Piece::Knight),
            (PieceType::Bishop, chess::Piece::Bishop),
            (PieceType::Rook, chess::Piece::Rook),
            (PieceType::Queen, chess::Piece::Queen),
            (PieceType::King, chess::Piece::King),
        ];
        let colors = [(Color::White, chess::Color::White), (Color::Black, chess::Color::Black)];

        for (color, reference_color) in colors {
            for (piece_type, reference_piece) in pieces {
                let mut expected: Vec<u8> = (*reference.pieces(reference_piece) & *reference.color_combined(reference_color))
                    .map(|square| square.to_index() as u8)
                    .collect();
                expected.sort_unstable();
                let actual: Vec<u8> = squares_on_channel(&planes, piece_channel(color, piece_type))
                    .iter()
                    .map(|square| square.index())
                    .collect();
                assert_eq!(actual, expected, "{color:?} {piece_type:?}");
            }
        }
    }

    #[test]
    fn test_en_passant_plane() {
        let position = Position::from_fen("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3").unwrap();
        let planes = board_planes(&position);
        assert_eq!(squares_on_channel(&planes, en_passant_channel(Color::White)), vec![Square::from_name("d6").unwrap()]);
        assert!(squares_on_channel(&planes, en_passant_channel(Color::Black)).is_empty());

        let position = Position::from_fen("rnbqkbnr/pppp1ppp/8/8/3Pp3/8/PPP1PPPP/RNBQKBNR b KQkq d3 0 3").unwrap();
        let planes = board_planes(&position);
        assert_eq!(squares_on_channel(&planes, en_passant_channel(Color::Black)), vec![Square::from_name("d3").unwrap()]);
        assert_eq!(active_planes(&position).len(), 33);
    }

    #[test]
    fn test_state_vector() {
        assert_eq!(state_vector(&Position::from_fen(INITIAL_FEN).unwrap()), [1., 1., 1., 1., 1., 0.]);
        assert_eq!(
            state_vector(&Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R b Kq - 25 40").unwrap()),
            [1., 0., 0., 1., 0., 0.5]
        );
        // clamped past the normalizer
        assert_eq!(
            state_vector(&Position::from_fen("8/8/8/8/8/8/8/K6k w - - 80 90").unwrap())[5],
            1.
        );
    }

    #[test]
    fn test_batched_tensors() {
        let positions = [Position::initial(), Position::from_fen("8/8/8/8/8/8/8/K6k b - - 10 60").unwrap()];
        let board = board_tensor(&positions, Device::Cpu).unwrap();
        let state = state_tensor(&positions, Device::Cpu).unwrap();
        assert_eq!(board.size(), [2, 8, 8, 14]);
        assert_eq!(state.size(), [2, 6]);
        assert_eq!(board.kind(), Kind::Float);

        // e1 white king: file 4, rank 0, channel 5
        assert_eq!(board.double_value(&[0, 4, 0, 5]), 1.);
        // a1 white king in the second position
        assert_eq!(board.double_value(&[1, 0, 0, 5]), 1.);
        assert_eq!(board.sum(Kind::Float).double_value(&[]), 34.);
        assert!((state.double_value(&[1, 5]) - 0.2).abs() < 1e-6);
        assert_eq!(state.double_value(&[1, 4]), 0.);
    }

    #[test]
    fn test_empty_batch() {
        assert!(matches!(board_tensor(&[], Device::Cpu), Err(PvNetError::EmptyBatch)));
        assert!(matches!(state_tensor(&[], Device::Cpu), Err(PvNetError::EmptyBatch)));
    }
}
