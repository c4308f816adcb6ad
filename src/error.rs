use thiserror::Error;

/// Errors raised by the reward engine.
///
/// Every failure is a bad input; nothing in the engine does I/O, so there is
/// no retryable or partial-failure variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShareError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl ShareError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        ShareError::InvalidArgument(msg.into())
    }

    /// Message without the `invalid argument:` prefix, for re-wrapping.
    pub fn message(&self) -> &str {
        match self {
            ShareError::InvalidArgument(msg) => msg,
        }
    }
}

pub type ShareResult<T> = Result<T, ShareError>;
