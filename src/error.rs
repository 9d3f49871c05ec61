//! Crate-level error types.

use std::error::Error as StdError;

/// Crate-level error type.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Invalid configuration or rejected parameter value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The DAC disconnected or became unreachable.
    #[error("disconnected: {0}")]
    Disconnected(String),

    /// Backend/protocol error (wrapped).
    #[error("backend error: {0}")]
    Backend(#[source] Box<dyn StdError + Send + Sync>),

    /// I/O error from a socket or listener.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid config error with a message.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Error::InvalidConfig(msg.into())
    }

    /// Create a disconnected error with a message.
    pub fn disconnected(msg: impl Into<String>) -> Self {
        Error::Disconnected(msg.into())
    }

    /// Create a backend error from any error type.
    pub fn backend(err: impl StdError + Send + Sync + 'static) -> Self {
        Error::Backend(Box::new(err))
    }

    /// Returns true if this error indicates the device is gone.
    ///
    /// The output loops treat other write errors as recoverable (the DAC may
    /// answer the next readiness poll), but a disconnected device ends the run.
    pub fn is_disconnected(&self) -> bool {
        matches!(self, Error::Disconnected(_))
    }
}

/// Crate-level result type.
pub type Result<T> = std::result::Result<T, Error>;
