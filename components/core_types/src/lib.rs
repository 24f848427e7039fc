//! Host-side value model for the QuickJS bridge.
//!
//! The bridge moves values between a host runtime and an embedded QuickJS
//! context. This crate describes the host half of that exchange: the values a
//! host can hand over, the callables it can expose to embedded code, and the
//! failure a host callable reports back.
//!
//! # Overview
//!
//! - [`HostValue`] - Tagged representation of a host value
//! - [`Callable`] - Reference-counted handle to a host function
//! - [`HostCallable`] - Trait implemented by anything the embedded side may call
//! - [`HostObject`] - Opaque host value that only has a textual form
//! - [`HostError`] - Failure raised by a host callable or textual conversion
//!
//! # Examples
//!
//! ```
//! use core_types::{Callable, HostError, HostValue};
//!
//! let add = Callable::named("add", |args: &[HostValue]| match args {
//!     [HostValue::Int(a), HostValue::Int(b)] => Ok(HostValue::Int(a + b)),
//!     _ => Err(HostError::new("add expects two integers")),
//! });
//!
//! let sum = add.call(&[HostValue::from(2), HostValue::from(3)]).unwrap();
//! assert_eq!(sum, HostValue::from(5));
//! assert_eq!(sum.to_string(), "5");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod callable;
mod error;
mod value;

pub use callable::{Callable, HostCallable, HostObject};
pub use error::HostError;
pub use value::HostValue;
