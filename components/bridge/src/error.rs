//! Error types for the bridge

use core_types::HostError;
use thiserror::Error;

/// A value could not be represented on the other side of the bridge.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The embedded operation produced an exception instead of a value.
    ///
    /// The caller is expected to fetch and translate the pending exception.
    #[error("embedded runtime raised an exception")]
    Exception,

    /// The host failed to produce a textual representation of a value.
    #[error("host value has no textual representation: {0}")]
    Repr(#[source] HostError),

    /// The embedded runtime rejected the conversion (allocation, UTF-8).
    #[error("embedded runtime error: {0}")]
    Engine(#[from] rquickjs::Error),
}

/// Errors surfaced by the [`Context`](crate::Context) facade.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Runtime or context allocation failed during construction.
    #[error("out of memory while creating the embedded runtime")]
    OutOfMemory,

    /// A value could not be converted.
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// Embedded source raised or failed to parse.
    #[error("{message}")]
    Evaluation {
        /// Textual form of the embedded exception
        message: String,
        /// The exception's `stack` property, when it has one
        stack: Option<String>,
        /// Name the evaluated source was registered under
        filename: String,
    },

    /// The context was already torn down.
    #[error("context has been destroyed")]
    Destroyed,

    /// Evaluation was requested from inside a running evaluation of the same
    /// context.
    #[error("re-entrant evaluation of a context is not supported")]
    Reentrant,

    /// Reading source from disk failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other error reported by the embedded runtime.
    #[error("embedded runtime error: {0}")]
    Engine(#[source] rquickjs::Error),
}

impl BridgeError {
    /// Message of an evaluation failure, if this is one.
    pub fn evaluation_message(&self) -> Option<&str> {
        match self {
            BridgeError::Evaluation { message, .. } => Some(message),
            _ => None,
        }
    }
}

impl From<rquickjs::Error> for BridgeError {
    fn from(err: rquickjs::Error) -> Self {
        match err {
            rquickjs::Error::Allocation => BridgeError::OutOfMemory,
            other => BridgeError::Engine(other),
        }
    }
}

/// Result type for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;
