use std::path::Path;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use tch::Device;
use crate::error::{PvNetError, Result};

lazy_static! {
    pub static ref DEFAULT_DEVICE: Device = Device::cuda_if_available();
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DeviceChoice {
    /// CUDA when available, CPU otherwise.
    #[default]
    Auto,
    Cpu,
    Cuda,
    Mps,
}

impl DeviceChoice {
    /// Whether this host can allocate on the device.
    pub fn is_available(self) -> bool {
        match self {
            DeviceChoice::Auto | DeviceChoice::Cpu => true,
            DeviceChoice::Cuda => tch::Cuda::is_available(),
            DeviceChoice::Mps => tch::utils::has_mps(),
        }
    }

    pub fn resolve(self) -> Device {
        match self {
            DeviceChoice::Auto => *DEFAULT_DEVICE,
            DeviceChoice::Cpu => Device::Cpu,
            DeviceChoice::Cuda => Device::Cuda(0),
            DeviceChoice::Mps => Device::Mps,
        }
    }
}

/// Runtime knobs of the network. The topology itself is fixed.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct NetConfig {
    pub device: DeviceChoice,
    /// Adam step size.
    pub learning_rate: f64,
    /// libtorch convention: weight of the new batch statistic.
    pub batch_norm_momentum: f64,
    pub batch_norm_eps: f64,
    pub seed: Option<i64>,
}

impl Default for NetConfig {
    fn default() -> Self {
        NetConfig {
            device: DeviceChoice::Auto,
            learning_rate: 1e-3,
            batch_norm_momentum: 0.01,
            batch_norm_eps: 1e-3,
            seed: None,
        }
    }
}

impl NetConfig {
    pub fn cpu() -> NetConfig {
        NetConfig { device: DeviceChoice::Cpu, ..Default::default() }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.device.is_available() {
            return Err(PvNetError::Config(format!("device {:?} is not available on this host", self.device)));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(PvNetError::Config(format!("learning_rate must be positive, got {}", self.learning_rate)));
        }
        if !(0.0..=1.0).contains(&self.batch_norm_momentum) {
            return Err(PvNetError::Config(format!("batch_norm_momentum must be in [0, 1], got {}", self.batch_norm_momentum)));
        }
        if !(self.batch_norm_eps > 0.0) {
            return Err(PvNetError::Config(format!("batch_norm_eps must be positive, got {}", self.batch_norm_eps)));
        }
        Ok(())
    }
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub batch_size: usize,
    pub epochs: usize,
    pub shuffle: bool,
    pub net: NetConfig,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            batch_size: 256,
            epochs: 1,
            shuffle: true,
            net: NetConfig::default(),
        }
    }
}

impl TrainConfig {
    pub fn from_toml_str(s: &str) -> Result<TrainConfig> {
        let config: TrainConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<TrainConfig> {
        TrainConfig::from_toml_str(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(PvNetError::Config("batch_size must be at least 1".to_string()));
        }
        self.net.validate()
    }
}
