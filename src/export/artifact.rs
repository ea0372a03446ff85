use std::fs;
use std::path::{Path, PathBuf};
use indexmap::IndexMap;
use log::info;
use serde::{Deserialize, Serialize};
use crate::config::{DeviceChoice, NetConfig};
use crate::consts::{EVALUATE_SIGNATURE, TRAIN_SIGNATURE};
use crate::error::{PvNetError, Result};
use crate::export::Signature;
use crate::net::EvalNet;

pub const ARTIFACT_FORMAT: &str = "pvnet";
pub const ARTIFACT_VERSION: u32 = 1;
pub const WEIGHTS_FILE: &str = "weights.safetensors";
pub const MANIFEST_FILE: &str = "signature.json";

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Manifest {
    pub format: String,
    pub version: u32,
    pub config: NetConfig,
    /// Training steps applied to the weights.
    #[serde(default)]
    pub steps: u64,
    pub signatures: IndexMap<String, Signature>,
}

impl Manifest {
    pub fn new(config: &NetConfig, steps: u64) -> Manifest {
        Manifest {
            format: ARTIFACT_FORMAT.to_string(),
            version: ARTIFACT_VERSION,
            config: config.clone(),
            steps,
            signatures: IndexMap::from([
                (EVALUATE_SIGNATURE.to_string(), Signature::evaluate()),
                (TRAIN_SIGNATURE.to_string(), Signature::train()),
            ]),
        }
    }

    fn check_supported(&self) -> Result<()> {
        if self.format != ARTIFACT_FORMAT || self.version != ARTIFACT_VERSION {
            return Err(PvNetError::UnsupportedArtifact {
                format: self.format.clone(),
                version: self.version,
            });
        }
        Ok(())
    }
}

/// A network restored from an exported directory.
#[derive(Debug)]
pub struct Artifact {
    pub manifest: Manifest,
    pub net: EvalNet,
}

impl Artifact {
    pub fn weights_path(dir: &Path) -> PathBuf {
        dir.join(WEIGHTS_FILE)
    }

    pub fn manifest_path(dir: &Path) -> PathBuf {
        dir.join(MANIFEST_FILE)
    }

    /// Writes the weights and the manifest into `dir`, creating it if needed.
    pub fn export(net: &EvalNet, steps: u64, dir: &Path) -> Result<Manifest> {
        fs::create_dir_all(dir)?;
        net.save(&Artifact::weights_path(dir))?;

        let manifest = Manifest::new(net.config(), steps);
        fs::write(Artifact::manifest_path(dir), serde_json::to_string_pretty(&manifest)?)?;
        info!("exported model after {} steps to {}", steps, dir.display());
        Ok(manifest)
    }

    pub fn read_manifest(dir: &Path) -> Result<Manifest> {
        let manifest: Manifest = serde_json::from_str(&fs::read_to_string(Artifact::manifest_path(dir))?)?;
        manifest.check_supported()?;
        Ok(manifest)
    }

    /// Rebuilds the network from the stored config and loads its weights.
    /// `device` overrides the device the artifact was exported with.
    pub fn load(dir: &Path, device: Option<DeviceChoice>) -> Result<Artifact> {
        let mut manifest = Artifact::read_manifest(dir)?;
        if let Some(device) = device {
            manifest.config.device = device;
        }

        let mut net = EvalNet::new(&manifest.config)?;
        net.load(&Artifact::weights_path(dir))?;
        info!("loaded model from {} ({} steps)", dir.display(), manifest.steps);
        Ok(Artifact { manifest, net })
    }

    pub fn into_net(self) -> EvalNet {
        self.net
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_json() {
        let manifest = Manifest::new(&NetConfig::cpu(), 3);
        let json = serde_json::to_value(&manifest).unwrap();
        assert_eq!(json["format"], "pvnet");
        assert_eq!(json["version"], 1);
        assert_eq!(json["steps"], 3);
        assert_eq!(json["config"]["device"], "cpu");

        let names: Vec<&String> = manifest.signatures.keys().collect();
        assert_eq!(names, vec!["evaluate", "train"]);

        let parsed: Manifest = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, manifest);
    }

    #[test]
    fn test_unsupported_manifest() {
        let mut manifest = Manifest::new(&NetConfig::cpu(), 0);
        assert!(manifest.check_supported().is_ok());

        manifest.version = ARTIFACT_VERSION + 1;
        assert!(matches!(
            manifest.check_supported(),
            Err(PvNetError::UnsupportedArtifact { version, .. }) if version == ARTIFACT_VERSION + 1
        ));

        manifest.version = 0;
        assert!(matches!(manifest.check_supported(), Err(PvNetError::UnsupportedArtifact { version: 0, .. })));

        manifest.version = ARTIFACT_VERSION;
        manifest.format = "onnx".to_string();
        assert!(matches!(manifest.check_supported(), Err(PvNetError::UnsupportedArtifact { .. })));
    }
}
