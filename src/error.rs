//! Error types shared by the simulator and its front end.

use thiserror::Error;

/// Everything that can stop a simulation run or its output.
#[derive(Debug, Error)]
pub enum SimError {
    /// A parameter failed validation. Raised before any random draw.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON config could not be parsed, or a JSON report could not be written.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SimError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
