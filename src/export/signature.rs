use std::fmt::{Display, Formatter};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tch::{Kind, Tensor};
use crate::consts::*;
use crate::error::{PvNetError, Result};

/// Marks the batch axis in a declared shape.
pub const BATCH_DIM: i64 = -1;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    Float32,
}

impl DType {
    pub const fn kind(&self) -> Kind {
        match self {
            DType::Float32 => Kind::Float,
        }
    }
}

impl Display for DType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DType::Float32 => write!(f, "float32"),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct TensorSpec {
    pub shape: Vec<i64>,
    pub dtype: DType,
}

impl TensorSpec {
    pub fn batched(dims: &[i64]) -> TensorSpec {
        let mut shape = Vec::with_capacity(dims.len() + 1);
        shape.push(BATCH_DIM);
        shape.extend_from_slice(dims);
        TensorSpec { shape, dtype: DType::Float32 }
    }

    pub fn scalar() -> TensorSpec {
        TensorSpec { shape: Vec::new(), dtype: DType::Float32 }
    }

    /// Checks `tensor` against this spec. A known `batch_size` pins the batch axis.
    pub fn check(&self, name: &str, tensor: &Tensor, batch_size: Option<i64>) -> Result<()> {
        if tensor.kind() != self.dtype.kind() {
            return Err(PvNetError::DType {
                name: name.to_string(),
                expected: self.dtype.to_string(),
                actual: format!("{:?}", tensor.kind()),
            });
        }

        let expected: Vec<i64> = self.shape
            .iter()
            .map(|&dim| match (dim, batch_size) {
                (BATCH_DIM, Some(batch_size)) => batch_size,
                _ => dim,
            })
            .collect();
        let actual = tensor.size();
        let matches = expected.len() == actual.len()
            && expected.iter().zip(&actual).all(|(&e, &a)| e == a || (e == BATCH_DIM && a > 0));
        if !matches {
            return Err(PvNetError::Shape { name: name.to_string(), expected, actual });
        }
        Ok(())
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Signature {
    pub inputs: IndexMap<String, TensorSpec>,
    pub outputs: IndexMap<String, TensorSpec>,
}

impl Signature {
    pub fn evaluate() -> Signature {
        Signature {
            inputs: IndexMap::from([
                (BOARD_INPUT.to_string(), TensorSpec::batched(&[NUM_FILES, NUM_RANKS, BOARD_INPUT_CHANNELS])),
                (STATE_INPUT.to_string(), TensorSpec::batched(&[STATE_INPUT_LEN])),
            ]),
            outputs: IndexMap::from([
                (VALUE_OUTPUT.to_string(), TensorSpec::batched(&[VALUE_OUTPUTS])),
                (POLICY_OUTPUT.to_string(), TensorSpec::batched(&[NUM_MOVES])),
            ]),
        }
    }

    pub fn train() -> Signature {
        Signature {
            inputs: IndexMap::from([
                (BOARD_INPUT.to_string(), TensorSpec::batched(&[NUM_FILES, NUM_RANKS, BOARD_INPUT_CHANNELS])),
                (STATE_INPUT.to_string(), TensorSpec::batched(&[STATE_INPUT_LEN])),
                (VALUE_TARGET.to_string(), TensorSpec::batched(&[VALUE_OUTPUTS])),
                (POLICY_TARGET.to_string(), TensorSpec::batched(&[NUM_MOVES])),
            ]),
            outputs: IndexMap::from([
                (VALUE_LOSS.to_string(), TensorSpec::scalar()),
                (POLICY_LOSS.to_string(), TensorSpec::scalar()),
                (LOSS.to_string(), TensorSpec::scalar()),
            ]),
        }
    }

    /// Checks tensors given in declaration order and returns the shared batch size.
    pub fn check_inputs(&self, tensors: &[&Tensor]) -> Result<i64> {
        if tensors.len() != self.inputs.len() {
            return Err(PvNetError::Shape {
                name: "inputs".to_string(),
                expected: vec![self.inputs.len() as i64],
                actual: vec![tensors.len() as i64],
            });
        }

        let mut batch_size = None;
        for ((name, spec), tensor) in self.inputs.iter().zip(tensors) {
            spec.check(name, tensor, batch_size)?;
            if batch_size.is_none() && spec.shape.first() == Some(&BATCH_DIM) {
                batch_size = tensor.size().first().copied();
            }
        }
        batch_size.ok_or(PvNetError::EmptyBatch)
    }
}
