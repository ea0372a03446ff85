use std::fmt::{Display, Formatter};
use std::path::Path;
use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use tch::nn::{self, OptimizerConfig};
use tch::{Kind, Reduction, Tensor};
use crate::config::NetConfig;
use crate::error::{PvNetError, Result};
use crate::export::{Artifact, Manifest, Signature};
use crate::net::{EvalNet, PolicyValueNetwork};
use crate::training::{Batch, Dataset};

/// Adam epsilon, libtorch defaults to 1e-8.
pub const ADAM_EPS: f64 = 1e-7;

/// Scalar losses of one step.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct TrainMetrics {
    pub value_loss: f64,
    pub policy_loss: f64,
    pub loss: f64,
}

impl Display for TrainMetrics {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "loss {:.5} (value {:.5}, policy {:.5})", self.loss, self.value_loss, self.policy_loss)
    }
}

/// Loss tensors, still attached to the graph when computed in training mode.
pub struct Losses {
    pub value_loss: Tensor,
    pub policy_loss: Tensor,
    pub loss: Tensor,
}

impl Losses {
    pub fn metrics(&self) -> Result<TrainMetrics> {
        Ok(TrainMetrics {
            value_loss: self.value_loss.f_double_value(&[])?,
            policy_loss: self.policy_loss.f_double_value(&[])?,
            loss: self.loss.f_double_value(&[])?,
        })
    }
}

/// Mean squared value error plus categorical cross-entropy of the policy, unweighted.
pub fn compute_losses(
    model: &dyn PolicyValueNetwork,
    board: &Tensor,
    state: &Tensor,
    value_target: &Tensor,
    policy_target: &Tensor,
    train: bool,
) -> Losses {
    let (value, policy_logits) = model.forward_t(board, state, train);

    let value_loss = value.mse_loss(value_target, Reduction::Mean);
    let policy_loss = -(policy_target * policy_logits.log_softmax(-1, Kind::Float))
        .sum_dim_intlist(&[1i64][..], false, Kind::Float)
        .mean(Kind::Float);
    let loss = &value_loss + &policy_loss;

    Losses { value_loss, policy_loss, loss }
}

/// Owns the network and its Adam state.
pub struct Trainer {
    net: EvalNet,
    optimizer: nn::Optimizer,
    learning_rate: f64,
    steps: u64,
}

impl Trainer {
    pub fn new(net: EvalNet) -> Result<Trainer> {
        let learning_rate = net.config().learning_rate;
        let optimizer = nn::Adam { eps: ADAM_EPS, ..Default::default() }.build(&net.vs, learning_rate)?;
        Ok(Trainer { net, optimizer, learning_rate, steps: 0 })
    }

    /// Resumes from an exported model. Adam moments start fresh.
    pub fn from_artifact(artifact: Artifact) -> Result<Trainer> {
        let steps = artifact.manifest.steps;
        let mut trainer = Trainer::new(artifact.into_net())?;
        trainer.steps = steps;
        Ok(trainer)
    }

    pub fn net(&self) -> &EvalNet {
        &self.net
    }

    pub fn into_net(self) -> EvalNet {
        self.net
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn set_learning_rate(&mut self, learning_rate: f64) {
        self.optimizer.set_lr(learning_rate);
        self.learning_rate = learning_rate;
    }

    /// Takes the learning rate from `config`. The batch-norm settings are
    /// fixed once the network is built, so differing ones are only reported.
    pub fn apply_config(&mut self, config: &NetConfig) -> Result<()> {
        config.validate()?;
        let built = self.net.config();
        if config.batch_norm_momentum != built.batch_norm_momentum || config.batch_norm_eps != built.batch_norm_eps {
            warn!(
                "ignoring batch norm momentum {} / eps {}, the model was built with {} / {}",
                config.batch_norm_momentum, config.batch_norm_eps, built.batch_norm_momentum, built.batch_norm_eps
            );
        }
        self.set_learning_rate(config.learning_rate);
        Ok(())
    }

    /// One optimizer step on a batch, returning the losses before the update.
    pub fn train_tensors(
        &mut self,
        board: &Tensor,
        state: &Tensor,
        value_target: &Tensor,
        policy_target: &Tensor,
    ) -> Result<TrainMetrics> {
        Signature::train().check_inputs(&[board, state, value_target, policy_target])?;
        let device = self.net.device();

        let losses = compute_losses(
            &self.net,
            &board.to_device(device),
            &state.to_device(device),
            &value_target.to_device(device),
            &policy_target.to_device(device),
            true,
        );
        self.optimizer.zero_grad();
        losses.loss.f_backward()?;
        self.optimizer.step();
        self.steps += 1;

        let metrics = losses.metrics()?;
        debug!("step {}: {}", self.steps, metrics);
        Ok(metrics)
    }

    pub fn train(&mut self, batch: &Batch) -> Result<TrainMetrics> {
        self.train_tensors(&batch.board, &batch.state, &batch.value_target, &batch.policy_target)
    }

    /// Losses in eval mode, without touching weights or batch-norm statistics.
    pub fn validation_loss(&self, batch: &Batch) -> Result<TrainMetrics> {
        Signature::train().check_inputs(&[&batch.board, &batch.state, &batch.value_target, &batch.policy_target])?;
        let device = self.net.device();
        let losses = tch::no_grad(|| {
            compute_losses(
                &self.net,
                &batch.board.to_device(device),
                &batch.state.to_device(device),
                &batch.value_target.to_device(device),
                &batch.policy_target.to_device(device),
                false,
            )
        });
        losses.metrics()
    }

    /// One pass over `dataset`. Returns the sample-weighted mean of the step losses.
    pub fn fit_epoch(&mut self, dataset: &Dataset, batch_size: usize, shuffle: bool, rng: &mut impl Rng) -> Result<TrainMetrics> {
        if dataset.is_empty() || batch_size == 0 {
            return Err(PvNetError::EmptyBatch);
        }

        let mut order: Vec<usize> = (0..dataset.len()).collect();
        if shuffle {
            order.shuffle(rng);
        }

        let device = self.net.device();
        let mut total = TrainMetrics::default();
        for chunk in order.chunks(batch_size) {
            let batch = Batch::from_encoded(chunk.iter().filter_map(|&i| dataset.get(i)), device)?;
            let metrics = self.train(&batch)?;
            let weight = chunk.len() as f64;
            total.value_loss += metrics.value_loss * weight;
            total.policy_loss += metrics.policy_loss * weight;
            total.loss += metrics.loss * weight;
        }

        let n = dataset.len() as f64;
        Ok(TrainMetrics {
            value_loss: total.value_loss / n,
            policy_loss: total.policy_loss / n,
            loss: total.loss / n,
        })
    }

    pub fn export(&self, dir: &Path) -> Result<Manifest> {
        Artifact::export(&self.net, self.steps, dir)
    }
}
