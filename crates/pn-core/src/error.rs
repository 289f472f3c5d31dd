use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

/// Failure of a numeric precondition on a device parameter or channel.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("{what} is not finite ({value})")]
    NonFinite { what: &'static str, value: f64 },

    #[error("{what} must lie in [0, 1]")]
    OutOfRange { what: &'static str },
}
