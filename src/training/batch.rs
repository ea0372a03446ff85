use tch::{Device, Tensor};
use crate::consts::{NUM_MOVES, VALUE_OUTPUTS};
use crate::encoding::{board_tensor, board_tensor_from_planes, planes_from_offsets, policy_target, state_tensor, state_tensor_from_vectors, StateVector};
use crate::error::{PvNetError, Result};
use crate::evaluation::Evaluation;
use crate::position::Position;
use crate::training::EncodedSample;

/// Training tensors in `train` signature order.
#[derive(Debug)]
pub struct Batch {
    pub board: Tensor,
    pub state: Tensor,
    pub value_target: Tensor,
    pub policy_target: Tensor,
}

impl Batch {
    /// Batches positions labelled with a target evaluation.
    pub fn from_samples(samples: &[(Position, Evaluation)], device: Device) -> Result<Batch> {
        if samples.is_empty() {
            return Err(PvNetError::EmptyBatch);
        }
        let positions: Vec<Position> = samples.iter().map(|(position, _)| position.clone()).collect();
        let values: Vec<f32> = samples.iter().map(|(_, evaluation)| evaluation.value).collect();
        let policies: Vec<f32> = samples.iter().flat_map(|(_, evaluation)| policy_target(&evaluation.policy)).collect();

        Ok(Batch {
            board: board_tensor(&positions, device)?,
            state: state_tensor(&positions, device)?,
            value_target: value_tensor(&values, device),
            policy_target: Tensor::from_slice(&policies).view([samples.len() as i64, NUM_MOVES]).to_device(device),
        })
    }

    pub fn from_encoded<'a>(samples: impl IntoIterator<Item = &'a EncodedSample>, device: Device) -> Result<Batch> {
        let mut boards = Vec::new();
        let mut states: Vec<StateVector> = Vec::new();
        let mut values = Vec::new();
        let mut policies = Vec::new();

        for sample in samples {
            boards.push(planes_from_offsets(&sample.board));
            states.push(sample.state);
            values.push(sample.value);

            let mut policy = vec![0f32; NUM_MOVES as usize];
            for &(index, prob) in &sample.policy {
                policy[index as usize] += prob;
            }
            policies.extend(policy);
        }

        let batch_size = values.len() as i64;
        Ok(Batch {
            board: board_tensor_from_planes(&boards, device)?,
            state: state_tensor_from_vectors(&states, device)?,
            value_target: value_tensor(&values, device),
            policy_target: Tensor::from_slice(&policies).view([batch_size, NUM_MOVES]).to_device(device),
        })
    }

    pub fn size(&self) -> i64 {
        self.board.size()[0]
    }
}

fn value_tensor(values: &[f32], device: Device) -> Tensor {
    Tensor::from_slice(values).view([values.len() as i64, VALUE_OUTPUTS]).to_device(device)
}

#[cfg(test)]
mod tests {
    use tch::Kind;
    use super::*;
    use crate::encoding::PolicyIndex;
    use crate::r#move::Move;

    #[test]
    fn test_from_samples() {
        let e2e4 = Move::from_uci("e2e4").unwrap();
        let d2d4 = Move::from_uci("d2d4").unwrap();
        let samples = vec![
            (Position::initial(), Evaluation { policy: vec![(e2e4, 0.5), (d2d4, 0.5)], value: 0.1 }),
            (Position::initial(), Evaluation { policy: vec![(e2e4, 1.)], value: -0.2 }),
        ];
        let batch = Batch::from_samples(&samples, Device::Cpu).unwrap();

        assert_eq!(batch.size(), 2);
        assert_eq!(batch.board.size(), [2, 8, 8, 14]);
        assert_eq!(batch.state.size(), [2, 6]);
        assert_eq!(batch.value_target.size(), [2, 1]);
        assert_eq!(batch.policy_target.size(), [2, NUM_MOVES]);
        assert_eq!(batch.board.kind(), Kind::Float);

        let index = PolicyIndex::from_move(&e2e4).index() as i64;
        assert_eq!(batch.policy_target.double_value(&[0, index]), 0.5);
        assert_eq!(batch.policy_target.double_value(&[1, index]), 1.);
        assert!((batch.value_target.double_value(&[1, 0]) + 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_empty_batch() {
        assert!(matches!(Batch::from_samples(&[], Device::Cpu), Err(PvNetError::EmptyBatch)));
        assert!(matches!(Batch::from_encoded(std::iter::empty(), Device::Cpu), Err(PvNetError::EmptyBatch)));
    }
}
