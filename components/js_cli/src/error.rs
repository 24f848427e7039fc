//! Error types for the CLI

use bridge::BridgeError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    /// Evaluation or context error from the bridge
    #[error("{0}")]
    Bridge(#[from] BridgeError),

    /// File I/O error
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    /// REPL error
    #[error("REPL error: {0}")]
    Repl(String),
}

impl CliError {
    /// Whether this is an exception raised by the evaluated script
    pub fn is_script_error(&self) -> bool {
        matches!(self, CliError::Bridge(BridgeError::Evaluation { .. }))
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
