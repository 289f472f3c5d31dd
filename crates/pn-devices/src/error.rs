//! Error types for device math.

use pn_core::{CoreError, SlotIndex};
use thiserror::Error;

/// Errors raised while evaluating a device.
///
/// `InvalidInput` is the expected cold-start condition: the solver turns it
/// into a "not yet valid" device and keeps iterating.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComputeError {
    #[error("Invalid input on slot {slot}: {what}")]
    InvalidInput { slot: SlotIndex, what: &'static str },

    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

pub type ComputeResult<T> = Result<T, ComputeError>;

impl From<CoreError> for ComputeError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::NonFinite { what, .. } => ComputeError::NonPhysical { what },
            CoreError::OutOfRange { what } => ComputeError::InvalidArg { what },
        }
    }
}
