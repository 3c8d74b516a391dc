//! Error types for spec artifact loading

use thiserror::Error;

/// Errors that can occur while loading and validating a vehicle spec artifact.
/// All of these are fatal at load time; nothing here is retried.
#[derive(Error, Debug)]
pub enum SpecError {
    #[error("could not read vehicle spec: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse vehicle spec: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("malformed vehicle spec: '{field}': {message}")]
    Malformed {
        field: &'static str,
        message: String,
    },
}

impl SpecError {
    pub fn malformed(field: &'static str, message: impl Into<String>) -> SpecError {
        SpecError::Malformed {
            field,
            message: message.into(),
        }
    }
}
