//! Error types for the companion core.
//!
//! None of these are fatal: window-manager failures degrade to skipping the
//! affected side effect, and trigger rejections leave the pet untouched.

use crate::pet::PetState;

/// Failure reported by the host window manager.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BridgeError {
    /// The host window is gone or not reachable.
    #[error("window unavailable")]
    Unavailable,

    /// The host refused or failed the request.
    #[error("window request rejected: {reason}")]
    Rejected { reason: String },

    /// The request was dropped before the host answered.
    #[error("window request dropped before completion")]
    Dropped,
}

impl BridgeError {
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PetError {
    /// A trigger sequence is already running.
    #[error("pet is busy ({state})")]
    Busy { state: PetState },

    #[error("pet has been destroyed")]
    Destroyed,

    #[error("unknown pet plugin: {id}")]
    UnknownPlugin { id: String },

    #[error("invalid companion config: {reason}")]
    InvalidConfig { reason: String },
}

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
