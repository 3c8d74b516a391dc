//! Error types for the dynamics core

use roadster_core::gear::Gear;
use thiserror::Error;

/// Configuration inconsistencies surfaced by the core. These signal bugs
/// in the hosting application or its data, not recoverable runtime
/// conditions; nothing here is retried.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum DynamicsError {
    #[error("invalid curve: {0}")]
    InvalidCurve(&'static str),

    #[error("invalid gear request: {0:?}")]
    InvalidGear(Gear),
}
