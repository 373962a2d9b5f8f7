//! Detector configuration errors

use std::path::PathBuf;
use thiserror::Error;

use crate::shared::models::TagFamily;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Numeric setting outside its accepted range
    #[error("{field} = {value} is outside {min}..={max} ({hint})")]
    Range {
        field: &'static str,
        value: usize,
        min: usize,
        max: usize,
        hint: &'static str,
    },

    /// Nothing left that could make a branch suspicious
    #[error("tracked_families is empty (expected time, location, sms or suspicious)")]
    NoTrackedFamilies,

    #[error("tracked_families lists '{0}' more than once")]
    DuplicateTrackedFamily(TagFamily),

    #[error("Detector config has no 'version' key (expected 'version: 1')")]
    MissingVersion,

    #[error("Detector config version {found} is not supported (known: {supported:?})")]
    UnsupportedVersion { found: u32, supported: Vec<u32> },

    #[error("Unknown preset '{0}' (expected fast, balanced, thorough or custom)")]
    UnknownPreset(String),

    #[error("Cannot read detector config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed detector config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    /// Check `value` against `min..=max`
    pub fn check_range(
        field: &'static str,
        value: usize,
        min: usize,
        max: usize,
        hint: &'static str,
    ) -> ConfigResult<()> {
        if (min..=max).contains(&value) {
            Ok(())
        } else {
            Err(Self::Range {
                field,
                value,
                min,
                max,
                hint,
            })
        }
    }
}
