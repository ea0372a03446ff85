pub mod config;
pub mod consts;
pub mod encoding;
pub mod error;
pub mod evaluation;
pub mod export;
pub mod r#move;
pub mod net;
pub mod position;
pub mod training;
pub mod utils;

pub use crate::config::{DeviceChoice, NetConfig, TrainConfig};
pub use crate::error::{PvNetError, Result};
pub use crate::evaluation::{Evaluation, Evaluator};
pub use crate::export::{Artifact, Manifest, Signature};
pub use crate::net::EvalNet;
pub use crate::position::Position;
pub use crate::r#move::Move;
pub use crate::training::{Batch, Dataset, Trainer, TrainMetrics};
