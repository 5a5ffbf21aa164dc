//! Machine-specific constants, optionally loaded from a YAML profile.
//!
//! Every field has a default, so an empty document is a valid profile.

use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MachineProfile {
    /// Values written for every key by the feeder template generator.
    pub template: TemplateDefaults,
    pub vision: String,
    pub pressure: String,
    /// The three values of the trailer's `Other` section.
    pub calibration: [String; 3],
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplateDefaults {
    pub nozzle: String,
    pub speed: String,
    pub height: String,
}

impl Default for MachineProfile {
    fn default() -> Self {
        Self {
            template: TemplateDefaults::default(),
            vision: "None".to_string(),
            pressure: "True".to_string(),
            calibration: ["0.00".to_string(), "0.00".to_string(), "0.00".to_string()],
        }
    }
}

impl Default for TemplateDefaults {
    fn default() -> Self {
        Self {
            nozzle: "1/2".to_string(),
            speed: "100".to_string(),
            height: "0.5".to_string(),
        }
    }
}

impl MachineProfile {
    pub fn from_yaml_str(input: &str) -> Result<Self> {
        // serde_yaml rejects an empty document; treat it as all defaults.
        if input.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(input)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_yaml_str(&raw)
    }
}
