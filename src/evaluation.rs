use crate::encoding::legal_priors;
use crate::error::Result;
use crate::net::EvalNet;
use crate::position::Position;
use crate::r#move::Move;

#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Priors over the moves the caller offered, summing to 1.
    pub policy: Vec<(Move, f32)>,
    /// From the side to move's point of view.
    pub value: f32,
}

pub trait Evaluator {
    fn evaluate_position(&self, position: &Position, moves: &[Move]) -> Result<Evaluation>;
}

impl Evaluator for EvalNet {
    fn evaluate_position(&self, position: &Position, moves: &[Move]) -> Result<Evaluation> {
        let (value, policy) = self.evaluate_positions(std::slice::from_ref(position))?;
        let value = value.f_double_value(&[0, 0])? as f32;
        let policy_row = Vec::<f32>::try_from(&policy.get(0))?;
        Ok(Evaluation {
            policy: legal_priors(&policy_row, moves),
            value,
        })
    }
}
