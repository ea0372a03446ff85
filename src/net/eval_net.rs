use std::path::Path;
use log::info;
use tch::{nn, Device, Kind, Tensor};
use crate::config::NetConfig;
use crate::consts::STATE_INPUT_LEN;
use crate::encoding::{board_tensor, state_tensor};
use crate::error::Result;
use crate::export::Signature;
use crate::net::head::DecisionHead;
use crate::net::policy_value_network::PolicyValueNetwork;
use crate::net::trunk::{Trunk, TRUNK_OUTPUT_LEN};
use crate::position::Position;

pub const FUSED_LEN: i64 = TRUNK_OUTPUT_LEN + STATE_INPUT_LEN; // 3142

/// The position evaluation network: a convolutional trunk over the board
/// planes, fused with the state vector, feeding one shared decision head.
#[derive(Debug)]
pub struct EvalNet {
    pub vs: nn::VarStore,
    config: NetConfig,
    trunk: Trunk,
    head: DecisionHead,
}

impl EvalNet {
    pub fn new(config: &NetConfig) -> Result<EvalNet> {
        config.validate()?;
        if let Some(seed) = config.seed {
            tch::manual_seed(seed);
        }

        let device = config.device.resolve();
        let vs = nn::VarStore::new(device);
        let root = &vs.root();

        let trunk = Trunk::new(&(root / "trunk"), config);
        let head = DecisionHead::new(&(root / "head"), FUSED_LEN);

        let net = EvalNet {
            vs,
            config: config.clone(),
            trunk,
            head,
        };
        info!("built evaluation network with {} parameters on {:?}", net.num_parameters(), device);
        Ok(net)
    }

    pub fn config(&self) -> &NetConfig {
        &self.config
    }

    pub fn device(&self) -> Device {
        self.vs.device()
    }

    pub fn num_parameters(&self) -> usize {
        self.vs.trainable_variables().iter().map(|tensor| tensor.numel()).sum()
    }

    /// Forward pass with both softmax-normalized policy and tanh value.
    pub fn forward_probabilities_t(&self, board: &Tensor, state: &Tensor, train: bool) -> (Tensor, Tensor) {
        let (value, policy_logits) = self.forward_t(board, state, train);
        (value, policy_logits.softmax(-1, Kind::Float))
    }

    /// Inference entry point: eval mode, no gradient tracking.
    ///
    /// Returns `(value_output [batch, 1], policy_output [batch, num_moves])`.
    pub fn evaluate(&self, board: &Tensor, state: &Tensor) -> Result<(Tensor, Tensor)> {
        Signature::evaluate().check_inputs(&[board, state])?;
        let device = self.device();
        Ok(tch::no_grad(|| {
            self.forward_probabilities_t(&board.to_device(device), &state.to_device(device), false)
        }))
    }

    pub fn evaluate_positions(&self, positions: &[Position]) -> Result<(Tensor, Tensor)> {
        let device = self.device();
        self.evaluate(&board_tensor(positions, device)?, &state_tensor(positions, device)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.vs.save(path)?;
        Ok(())
    }

    pub fn load(&mut self, path: &Path) -> Result<()> {
        self.vs.load(path)?;
        Ok(())
    }
}

impl PolicyValueNetwork for EvalNet {
    fn forward_t(&self, board: &Tensor, state: &Tensor, train: bool) -> (Tensor, Tensor) {
        // [batch, file, rank, channel] -> [batch, channel, file, rank]
        let board = board.permute([0, 3, 1, 2]);
        let features = self.trunk.forward_t(&board, train).flatten(1, -1);
        let fused = Tensor::cat(&[&features, state], 1);
        self.head.forward(&fused)
    }
}
