//! Host-provided globals for bridged QuickJS contexts
//!
//! QuickJS ships the language built-ins but no host environment. This crate
//! adds the two pieces scripts usually expect, both wired through host
//! callables bound on a [`bridge::Context`]:
//! - `console` with `log`/`info`/`debug` and `error`/`warn`
//! - `require` for CommonJS modules on the local filesystem
//!
//! # Example
//!
//! ```
//! use bridge::Context;
//! use builtins::console::{self, CaptureWriter};
//! use std::rc::Rc;
//!
//! let ctx = Context::new().unwrap();
//! let capture = Rc::new(CaptureWriter::new());
//! console::install(&ctx, capture.clone()).unwrap();
//!
//! ctx.eval("console.log('answer', 42)").unwrap();
//! assert_eq!(capture.stdout(), vec!["answer 42".to_string()]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod console;
pub mod require;

// Re-export main types for convenience
pub use console::{CaptureWriter, ConsoleWriter, StdioWriter, Stream};
pub use require::{ModuleLoader, ModuleStatus};
