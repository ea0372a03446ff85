use crate::position::FenParseError;
use crate::r#move::MoveParseError;

#[derive(thiserror::Error, Debug)]
pub enum PvNetError {
    #[error(transparent)]
    Tch(#[from] tch::TchError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Bincode(#[from] bincode::Error),

    #[error("invalid FEN: {0}")]
    Fen(#[from] FenParseError),

    #[error("invalid move: {0}")]
    Move(#[from] MoveParseError),

    /// A tensor handed to an entry point does not match its declared shape.
    #[error("shape mismatch for `{name}`: expected {expected:?}, got {actual:?}")]
    Shape {
        name: String,
        expected: Vec<i64>,
        actual: Vec<i64>,
    },

    #[error("dtype mismatch for `{name}`: expected {expected}, got {actual}")]
    DType {
        name: String,
        expected: String,
        actual: String,
    },

    #[error("batch must contain at least one sample")]
    EmptyBatch,

    #[error("unsupported artifact `{format}` version {version}")]
    UnsupportedArtifact { format: String, version: u32 },

    #[error("dataset line {line}: {reason}")]
    Dataset { line: usize, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PvNetError>;
