use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter};
use std::path::Path;
use log::info;
use serde::{Deserialize, Serialize};
use crate::encoding::{active_planes, state_vector, PolicyIndex, StateVector};
use crate::error::{PvNetError, Result};
use crate::position::Position;
use crate::r#move::Move;

/// One line of a JSONL dataset.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct SampleRecord {
    pub fen: String,
    pub value: f32,
    pub policy: Vec<PolicyEntry>,
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct PolicyEntry {
    pub uci: String,
    pub prob: f32,
}

/// A validated sample with sparse board planes and policy.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct EncodedSample {
    /// Offsets of the set board planes.
    pub board: Vec<u16>,
    pub state: StateVector,
    pub value: f32,
    /// `(policy index, probability)`, probabilities summing to 1.
    pub policy: Vec<(u16, f32)>,
}

impl EncodedSample {
    pub fn encode(position: &Position, value: f32, policy: &[(Move, f32)]) -> std::result::Result<EncodedSample, String> {
        if !value.is_finite() || !(-1.0..=1.0).contains(&value) {
            return Err(format!("value {} is outside [-1, 1]", value));
        }
        if let Some((mv, prob)) = policy.iter().find(|(_, prob)| !prob.is_finite() || *prob < 0.) {
            return Err(format!("probability {} of {} is not a non-negative number", prob, mv));
        }
        let total: f32 = policy.iter().map(|(_, prob)| prob).sum();
        if total <= 0. {
            return Err("policy has no probability mass".to_string());
        }

        Ok(EncodedSample {
            board: active_planes(position),
            state: state_vector(position),
            value,
            policy: policy
                .iter()
                .map(|(mv, prob)| (PolicyIndex::from_move(mv).index() as u16, prob / total))
                .collect(),
        })
    }

    fn from_record(record: &SampleRecord) -> std::result::Result<EncodedSample, String> {
        let position = Position::from_fen(&record.fen).map_err(|e| e.to_string())?;
        let policy = record.policy
            .iter()
            .map(|entry| {
                Move::from_uci(&entry.uci)
                    .map(|mv| (mv, entry.prob))
                    .map_err(|e| format!("{}: {}", entry.uci, e))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        EncodedSample::encode(&position, record.value, &policy)
    }
}

#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Dataset {
    samples: Vec<EncodedSample>,
}

impl Dataset {
    pub fn new(samples: Vec<EncodedSample>) -> Dataset {
        Dataset { samples }
    }

    /// Parses JSON lines, skipping blank ones. Errors carry the 1-based line number.
    pub fn from_jsonl(reader: impl BufRead) -> Result<Dataset> {
        let mut samples = Vec::new();
        for (i, line) in reader.lines().enumerate() {
            let line_number = i + 1;
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let record: SampleRecord = serde_json::from_str(&line)
                .map_err(|e| PvNetError::Dataset { line: line_number, reason: e.to_string() })?;
            let sample = EncodedSample::from_record(&record)
                .map_err(|reason| PvNetError::Dataset { line: line_number, reason })?;
            samples.push(sample);
        }
        Ok(Dataset { samples })
    }

    pub fn load_jsonl(path: &Path) -> Result<Dataset> {
        let dataset = Dataset::from_jsonl(BufReader::new(File::open(path)?))?;
        info!("loaded {} samples from {}", dataset.len(), path.display());
        Ok(dataset)
    }

    pub fn save_cache(&self, path: &Path) -> Result<()> {
        bincode::serialize_into(BufWriter::new(File::create(path)?), self)?;
        Ok(())
    }

    pub fn load_cache(path: &Path) -> Result<Dataset> {
        let dataset: Dataset = bincode::deserialize_from(BufReader::new(File::open(path)?))?;
        info!("loaded {} cached samples from {}", dataset.len(), path.display());
        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&EncodedSample> {
        self.samples.get(index)
    }
}
