//! QuickJS bridge CLI library
//!
//! Provides the Runtime struct and supporting modules for the `qjs-bridge`
//! binary.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod cli;
pub mod error;
pub mod repl;
pub mod runtime;

pub use cli::Cli;
pub use error::{CliError, CliResult};
pub use runtime::{format_value, Runtime};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the tracing subscriber, once, when `RUST_LOG` is set.
///
/// Logs go to stderr so they never mix with script output.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}
