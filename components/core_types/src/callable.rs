//! Host callables and opaque host objects.

use crate::{HostError, HostValue};
use std::fmt;
use std::rc::Rc;

/// A host function the embedded runtime may invoke.
///
/// Implementors receive the already-converted argument list in call order and
/// return either a host value or a [`HostError`] describing the failure.
pub trait HostCallable {
    /// Invokes the callable with a fixed argument list.
    fn call(&self, args: &[HostValue]) -> Result<HostValue, HostError>;

    /// Name used in diagnostics and textual forms.
    fn name(&self) -> &str {
        "<anonymous>"
    }
}

/// A host value that is neither primitive nor callable.
///
/// The bridge never converts these structurally; it asks for their textual
/// form, which may itself fail.
pub trait HostObject {
    /// Name of the host type, e.g. `"dict"`.
    fn type_name(&self) -> &str;

    /// Textual representation of the object.
    fn to_text(&self) -> Result<String, HostError>;
}

/// Function adapter behind [`Callable::named`] and [`Callable::from_fn`].
struct FnCallable<F> {
    name: String,
    function: F,
}

impl<F> HostCallable for FnCallable<F>
where
    F: Fn(&[HostValue]) -> Result<HostValue, HostError>,
{
    fn call(&self, args: &[HostValue]) -> Result<HostValue, HostError> {
        (self.function)(args)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Reference-counted handle to a [`HostCallable`].
///
/// Cloning acquires a strong reference and dropping releases it, which is the
/// acquire/release pair the bridge relies on when an embedded function object
/// captures the callable.
///
/// # Examples
///
/// ```
/// use core_types::{Callable, HostValue};
///
/// let hello = Callable::named("hello", |_args: &[HostValue]| Ok(HostValue::from("hi")));
/// let alias = hello.clone();
/// assert_eq!(hello.ref_count(), 2);
/// drop(alias);
/// assert_eq!(hello.ref_count(), 1);
/// ```
#[derive(Clone)]
pub struct Callable {
    inner: Rc<dyn HostCallable>,
}

impl Callable {
    /// Wraps any [`HostCallable`] implementation.
    pub fn new(callable: impl HostCallable + 'static) -> Self {
        Self {
            inner: Rc::new(callable),
        }
    }

    /// Wraps a closure under the given name.
    pub fn named<F>(name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&[HostValue]) -> Result<HostValue, HostError> + 'static,
    {
        Self::new(FnCallable {
            name: name.into(),
            function,
        })
    }

    /// Wraps an anonymous closure.
    pub fn from_fn<F>(function: F) -> Self
    where
        F: Fn(&[HostValue]) -> Result<HostValue, HostError> + 'static,
    {
        Self::named("<anonymous>", function)
    }

    /// Invokes the wrapped callable.
    pub fn call(&self, args: &[HostValue]) -> Result<HostValue, HostError> {
        self.inner.call(args)
    }

    /// Name of the wrapped callable.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Number of strong references currently held to the callable.
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.inner)
    }

    /// Whether two handles refer to the same callable.
    pub fn ptr_eq(&self, other: &Callable) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Callable").field(&self.name()).finish()
    }
}
