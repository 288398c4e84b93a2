//! Error types for shipit.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid invocation: {0}")]
    InvalidInvocation(String),

    #[error("execution failed: {0}")]
    ExecutionFailed(String),
}

pub type Result<T> = std::result::Result<T, Error>;
