//! Engine error types
//!
//! Missing analysis data is never an error: it degrades to "no evidence".
//! Errors here are wiring and configuration problems detected before a run.

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum TriggerError {
    /// A collaborator was not supplied to the detector builder
    #[error("Missing collaborator '{0}': all collaborators must be initialised before a run")]
    MissingCollaborator(&'static str),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Program snapshot or report (de)serialisation
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for engine operations
pub type TriggerResult<T> = Result<T, TriggerError>;
