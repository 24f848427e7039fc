//! Host failure type.
//!
//! A host callable that fails hands back a [`HostError`]. Only its text ever
//! crosses into the embedded runtime; the bridge never forwards the original
//! host error object.

use thiserror::Error;

/// A failure raised on the host side of the bridge.
///
/// # Examples
///
/// ```
/// use core_types::HostError;
///
/// let error = HostError::new("Something went wrong");
/// assert_eq!(error.message(), "Something went wrong");
/// assert_eq!(error.to_string(), "Something went wrong");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HostError {
    message: String,
}

impl HostError {
    /// Creates a host error carrying the given description.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the textual description of the failure.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for HostError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for HostError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}
