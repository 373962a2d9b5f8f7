//! Detector configuration
//!
//! # Usage
//!
//! ```
//! use bombsight_core::config::{Preset, TriggerConfig};
//!
//! // Preset-based
//! let config = TriggerConfig::from_preset(Preset::Thorough);
//! assert!(config.validate().is_ok());
//!
//! // Fine-tuned
//! let config = TriggerConfig::from_preset(Preset::Fast)
//!     .max_search_depth(32)
//!     .parallel(false);
//! assert_eq!(config.max_search_depth, 32);
//! ```

pub mod error;
pub mod io;
pub mod patch;
pub mod preset;
pub mod trigger_config;

pub use error::{ConfigError, ConfigResult};
pub use io::{ConfigExportV1, ConfigOverrides};
pub use patch::TriggerConfigPatch;
pub use preset::Preset;
pub use trigger_config::TriggerConfig;
