//! Bidirectional value bridge between a host runtime and QuickJS.
//!
//! The bridge lets a host inject values into an embedded QuickJS context,
//! evaluate JavaScript against them, and read results back. Host callables
//! become ordinary JavaScript functions: each call from JavaScript goes
//! through the callback proxy, which converts the arguments, runs the host
//! function and converts the result or rethrows the host failure.
//!
//! # Overview
//!
//! - [`Context`] - Owns one runtime and one context; bind globals, evaluate
//! - [`to_host`] / [`coerce_text`] - Embedded-to-host conversion
//! - [`BridgeConfig`] - Runtime limits and the host label
//! - [`BridgeError`] - Errors surfaced to the host
//! - [`registry`] - Runtime identities and foreign-object accounting
//!
//! # Lifetime
//!
//! A host callable handed to the bridge is wrapped in a foreign object owned
//! by the embedded heap. The host reference is released exactly once, when
//! the embedded collector finalizes the function object or when the context
//! is destroyed, whichever comes first.
//!
//! # Threading
//!
//! Everything here is single-threaded. A [`Context`] is `!Send`, and it
//! rejects a second evaluation while one is running.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod config;
mod context;
mod convert;
mod error;
mod foreign;
mod proxy;
pub mod registry;

pub use config::{BridgeConfig, DEFAULT_HOST_LABEL};
pub use context::{Context, DEFAULT_FILENAME};
pub use convert::{coerce_text, completion_to_host, to_host, OPAQUE_PLACEHOLDER};
pub use error::{BridgeError, BridgeResult, ConversionError};
pub use registry::RuntimeId;
