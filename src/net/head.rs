use tch::{nn, Tensor};
use crate::consts::{NUM_MOVES, STATE_INPUT_LEN, VALUE_OUTPUTS};

pub const NUM_DENSE_LAYERS: usize = 4;
pub const DENSE_BASE_UNITS: i64 = 64 + STATE_INPUT_LEN;

/// Unit count of each dense layer: starts at `64 + state_len` and doubles.
pub fn dense_units() -> [i64; NUM_DENSE_LAYERS] {
    let mut units = [DENSE_BASE_UNITS; NUM_DENSE_LAYERS];
    for i in 1..NUM_DENSE_LAYERS {
        units[i] = units[i - 1] * 2;
    }
    units
}

/// Dense ReLU stack over the fused features, ending in sibling value and policy projections.
#[derive(Debug)]
pub struct DecisionHead {
    dense: Vec<nn::Linear>,
    value: nn::Linear,
    policy: nn::Linear,
}

impl DecisionHead {
    pub fn new(vs: &nn::Path, in_features: i64) -> DecisionHead {
        let mut dense = Vec::with_capacity(NUM_DENSE_LAYERS);
        let mut in_dim = in_features;
        for (i, units) in dense_units().into_iter().enumerate() {
            dense.push(nn::linear(vs / format!("dense_{}", i), in_dim, units, Default::default()));
            in_dim = units;
        }

        let value = nn::linear(vs / "value_output", in_dim, VALUE_OUTPUTS, Default::default());
        let policy = nn::linear(vs / "policy_output", in_dim, NUM_MOVES, Default::default());

        DecisionHead { dense, value, policy }
    }

    /// Returns `(tanh value, policy logits)`.
    pub fn forward(&self, fused: &Tensor) -> (Tensor, Tensor) {
        let mut xs = fused.shallow_clone();
        for layer in &self.dense {
            xs = xs.apply(layer).relu();
        }
        let value = xs.apply(&self.value).tanh();
        let policy_logits = xs.apply(&self.policy);
        (value, policy_logits)
    }
}
