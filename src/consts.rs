// Tensor contract shared by the encoders, the network and the exported signature.

pub const NUM_FILES: i64 = 8;
pub const NUM_RANKS: i64 = 8;
pub const NUM_SQUARES: i64 = NUM_FILES * NUM_RANKS;

pub const NUM_COLORS: i64 = 2;
pub const NUM_PIECE_TYPES: i64 = 6;
pub const PLANES_PER_COLOR: i64 = NUM_PIECE_TYPES + 1; // +1 for the en passant capture square
pub const EN_PASSANT_PLANE: i64 = NUM_PIECE_TYPES;
pub const BOARD_INPUT_CHANNELS: i64 = NUM_COLORS * PLANES_PER_COLOR; // 14
pub const BOARD_INPUT_LEN: usize = (NUM_FILES * NUM_RANKS * BOARD_INPUT_CHANNELS) as usize;

pub const NUM_CASTLING_BITS: i64 = 4;
pub const NUM_SIDE_TO_MOVE_BITS: i64 = 1;
pub const NUM_CLOCK_VALUES: i64 = 1;
pub const STATE_INPUT_LEN: i64 = NUM_CASTLING_BITS + NUM_SIDE_TO_MOVE_BITS + NUM_CLOCK_VALUES; // 6

/// The halfmove clock is divided by this and clamped to 1.
pub const HALFMOVE_CLOCK_NORMALIZER: f32 = 50.0;

pub const NUM_FROM_TO_MOVES: i64 = NUM_SQUARES * NUM_SQUARES; // 4096
pub const NUM_ENCODED_PROMOTIONS: i64 = 2; // knight and queen, bishop and rook are not encoded
pub const NUM_PROMOTION_MOVES: i64 = NUM_FILES * NUM_ENCODED_PROMOTIONS; // 16
pub const NUM_MOVES: i64 = NUM_FROM_TO_MOVES + NUM_PROMOTION_MOVES; // 4112

pub const VALUE_OUTPUTS: i64 = 1;

pub const BOARD_INPUT: &str = "board_input";
pub const STATE_INPUT: &str = "state_input";
pub const VALUE_OUTPUT: &str = "value_output";
pub const POLICY_OUTPUT: &str = "policy_output";
pub const VALUE_TARGET: &str = "value_target";
pub const POLICY_TARGET: &str = "policy_target";
pub const VALUE_LOSS: &str = "value_loss";
pub const POLICY_LOSS: &str = "policy_loss";
pub const LOSS: &str = "loss";

pub const EVALUATE_SIGNATURE: &str = "evaluate";
pub const TRAIN_SIGNATURE: &str = "train";
