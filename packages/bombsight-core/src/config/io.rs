//! Configuration I/O (YAML loading)
//!
//! Schema v1:
//!
//! ```yaml
//! version: 1
//! preset: balanced
//! overrides:
//!   trigger:
//!     max_search_depth: 32
//!     max_visited_nodes: 5000
//! ```
//!
//! Fields missing from `overrides.trigger` keep the preset's value.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use super::error::{ConfigError, ConfigResult};
use super::patch::TriggerConfigPatch;
use super::preset::Preset;
use super::trigger_config::TriggerConfig;

const SUPPORTED_VERSIONS: [u32; 1] = [1];

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigExportV1 {
    /// Schema version (always 1 for v1)
    pub version: Option<u32>,

    /// Base preset
    pub preset: String,

    /// Fine-grained overrides
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overrides: Option<ConfigOverrides>,
}

/// Configuration overrides
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<TriggerConfigPatch>,
}

impl TriggerConfig {
    /// Load and validate a configuration file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let export: ConfigExportV1 = serde_yaml::from_str(content)?;

        let version = export.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let preset = Preset::from_str(&export.preset)?;
        let mut config = TriggerConfig::from_preset(preset);
        if let Some(patch) = export.overrides.and_then(|o| o.trigger) {
            config = config.apply_patch(patch);
        }

        config.validate()?;
        Ok(config)
    }

    /// Export as a v1 document based on `preset`
    pub fn to_yaml(&self, preset: Preset) -> ConfigResult<String> {
        let export = ConfigExportV1 {
            version: Some(1),
            preset: preset.to_string(),
            overrides: Some(ConfigOverrides {
                trigger: Some(TriggerConfigPatch::from(self)),
            }),
        };

        serde_yaml::to_string(&export).map_err(ConfigError::Yaml)
    }
}
