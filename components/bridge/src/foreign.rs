//! Foreign objects: host callables captured by embedded function objects.
//!
//! A [`ForeignObject`] holds the one strong host reference. It is moved into
//! the closure of an embedded native function, so the embedded heap owns it:
//! when the function object is finalized the closure is dropped, the
//! foreign object with it, and the host reference is released exactly once.

use crate::convert::Marshaller;
use crate::proxy;
use crate::registry::ForeignClass;
use core_types::{Callable, HostValue};
use rquickjs::function::Rest;
use rquickjs::{Ctx, Function, Value};
use std::rc::Rc;

/// Capture cell holding a strong reference to one host value.
pub(crate) struct ForeignObject {
    payload: HostValue,
    class: Rc<ForeignClass>,
}

impl ForeignObject {
    /// Wraps `payload`, taking over the strong reference it carries.
    pub(crate) fn wrap(payload: HostValue, class: &Rc<ForeignClass>) -> Self {
        class.retain();
        tracing::debug!(
            runtime = %class.runtime(),
            kind = payload.type_name(),
            live = class.live(),
            "wrapped host value"
        );
        Self {
            payload,
            class: Rc::clone(class),
        }
    }

    /// The captured callable, or `None` when the payload is not invocable.
    pub(crate) fn callable(&self) -> Option<&Callable> {
        self.payload.as_callable()
    }
}

impl Drop for ForeignObject {
    fn drop(&mut self) {
        self.class.release();
        tracing::debug!(
            runtime = %self.class.runtime(),
            live = self.class.live(),
            "released host value"
        );
    }
}

/// Creates a bound foreign function: an embedded native function whose only
/// captured datum is a foreign object wrapping `callable`.
pub(crate) fn bind<'js>(
    ctx: &Ctx<'js>,
    marshaller: &Marshaller,
    callable: Callable,
) -> rquickjs::Result<Function<'js>> {
    let cell = ForeignObject::wrap(HostValue::Callable(callable), marshaller.class());
    let marshaller = marshaller.clone();
    Function::new(
        ctx.clone(),
        move |ctx: Ctx<'js>, args: Rest<Value<'js>>| -> rquickjs::Result<Value<'js>> {
            proxy::invoke(&ctx, &cell, &marshaller, &args.0)
        },
    )
}
