//! Value conversion between host values and QuickJS values.
//!
//! Both directions dispatch on the value's kind tag:
//!
//! | host            | embedded                                   |
//! |-----------------|--------------------------------------------|
//! | `None`          | `null` (and `undefined` on the way back)   |
//! | `Bool`          | boolean                                    |
//! | `Int`           | int-tagged number, or a double beyond i32  |
//! | `Float`         | double                                     |
//! | `Str`           | string                                     |
//! | `Callable`      | bound foreign function                     |
//! | `List`/`Object` | string holding the host's textual form     |
//!
//! Embedded objects, arrays, functions, symbols and bigints come back as
//! their string coercion. Aggregates are never converted structurally.

use crate::error::ConversionError;
use crate::foreign;
use crate::registry::ForeignClass;
use core_types::HostValue;
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use rquickjs::convert::Coerced;
use rquickjs::{Ctx, Type, Value};
use std::rc::Rc;

/// Text produced for an embedded value whose string coercion itself fails.
pub const OPAQUE_PLACEHOLDER: &str = "[Object]";

/// Host-to-embedded converter bound to one runtime.
///
/// It carries what a conversion needs beyond the value itself: the runtime's
/// foreign class, to wrap callables, and the host label used by the callback
/// proxy when a host call fails.
#[derive(Clone)]
pub(crate) struct Marshaller {
    class: Rc<ForeignClass>,
    host_label: Rc<str>,
}

impl Marshaller {
    pub(crate) fn new(class: Rc<ForeignClass>, host_label: &str) -> Self {
        Self {
            class,
            host_label: Rc::from(host_label),
        }
    }

    pub(crate) fn class(&self) -> &Rc<ForeignClass> {
        &self.class
    }

    pub(crate) fn host_label(&self) -> &str {
        &self.host_label
    }

    /// Converts a host value into an embedded value.
    ///
    /// Only two things can fail: the host's textual form of an aggregate, and
    /// an allocation inside the embedded runtime.
    pub(crate) fn to_embedded<'js>(
        &self,
        ctx: &Ctx<'js>,
        value: &HostValue,
    ) -> Result<Value<'js>, ConversionError> {
        let converted = match value {
            HostValue::None => Value::new_null(ctx.clone()),
            HostValue::Bool(b) => Value::new_bool(ctx.clone(), *b),
            HostValue::Int(n) => integer(ctx, n),
            HostValue::Float(n) => Value::new_float(ctx.clone(), *n),
            HostValue::Str(s) => text(ctx, s)?,
            HostValue::Callable(callable) => {
                foreign::bind(ctx, self, callable.clone())?.into_value()
            }
            HostValue::List(_) | HostValue::Object(_) => {
                let repr = value.to_text().map_err(ConversionError::Repr)?;
                text(ctx, &repr)?
            }
        };
        Ok(converted)
    }
}

/// Integers that fit in i32 stay int-tagged; wider ones become doubles, the
/// same representation QuickJS itself picks for 64-bit integers.
fn integer<'js>(ctx: &Ctx<'js>, n: &BigInt) -> Value<'js> {
    if let Some(small) = n.to_i32() {
        return Value::new_int(ctx.clone(), small);
    }
    let wide = match n.to_i64() {
        Some(wide) => wide as f64,
        None => n.to_f64().unwrap_or(f64::NAN),
    };
    Value::new_float(ctx.clone(), wide)
}

fn text<'js>(ctx: &Ctx<'js>, s: &str) -> rquickjs::Result<Value<'js>> {
    Ok(rquickjs::String::from_str(ctx.clone(), s)?.into_value())
}

/// Converts an embedded value into a host value.
///
/// Int-tagged numbers go through `i64` so they stay exact; every other number
/// becomes a float. `null` and `undefined` both collapse to `None`.
pub fn to_host(value: &Value<'_>) -> Result<HostValue, ConversionError> {
    let converted = match value.type_of() {
        Type::Int => HostValue::Int(BigInt::from(value.get::<i64>()?)),
        Type::Float => HostValue::Float(value.get::<f64>()?),
        Type::String => HostValue::Str(value.get::<String>()?),
        Type::Bool => HostValue::Bool(value.get::<Coerced<bool>>()?.0),
        Type::Null | Type::Undefined => HostValue::None,
        _ => HostValue::Str(coerce_text(value)),
    };
    Ok(converted)
}

/// Converts the outcome of an embedded operation.
///
/// An operation that raised produced no value: that is reported as
/// [`ConversionError::Exception`] and the pending exception is left in place
/// for the caller to fetch.
pub fn completion_to_host(completion: rquickjs::Result<Value<'_>>) -> Result<HostValue, ConversionError> {
    match completion {
        Ok(value) => to_host(&value),
        Err(rquickjs::Error::Exception) => Err(ConversionError::Exception),
        Err(err) => Err(ConversionError::Engine(err)),
    }
}

/// String coercion of an embedded value, or [`OPAQUE_PLACEHOLDER`] when the
/// coercion throws. The exception thrown by a failed coercion is discarded.
pub fn coerce_text(value: &Value<'_>) -> String {
    match value.get::<Coerced<String>>() {
        Ok(Coerced(text)) => text,
        Err(err) => {
            if matches!(err, rquickjs::Error::Exception) {
                let _ = value.ctx().catch();
            }
            OPAQUE_PLACEHOLDER.to_string()
        }
    }
}
