//! Callback proxy: the native body of every bound foreign function.

use crate::convert::{self, Marshaller};
use crate::error::ConversionError;
use crate::foreign::ForeignObject;
use core_types::HostValue;
use rquickjs::{Ctx, Exception, Value};

/// Runs one embedded call of a bound foreign function.
///
/// Arguments are converted left to right and the host callable only runs once
/// all of them converted. A host failure is rethrown as an embedded
/// `InternalError` carrying the failure text.
pub(crate) fn invoke<'js>(
    ctx: &Ctx<'js>,
    cell: &ForeignObject,
    marshaller: &Marshaller,
    args: &[Value<'js>],
) -> rquickjs::Result<Value<'js>> {
    // Own reference for the duration of the call.
    let Some(callable) = cell.callable().cloned() else {
        return Err(Exception::throw_internal(ctx, "Failed to get host function"));
    };

    let mut host_args: Vec<HostValue> = Vec::with_capacity(args.len());
    for (index, arg) in args.iter().enumerate() {
        match convert::to_host(arg) {
            Ok(value) => host_args.push(value),
            Err(err) => {
                tracing::debug!(index, %err, "argument conversion failed");
                return Err(Exception::throw_internal(
                    ctx,
                    &format!("Failed to convert argument {}", index),
                ));
            }
        }
    }

    tracing::trace!(callable = callable.name(), argc = host_args.len(), "calling host");
    match callable.call(&host_args) {
        Ok(result) => marshaller.to_embedded(ctx, &result).map_err(|err| match err {
            ConversionError::Engine(engine) => engine,
            other => Exception::throw_internal(ctx, &other.to_string()),
        }),
        Err(err) => {
            tracing::debug!(callable = callable.name(), %err, "host call failed");
            Err(Exception::throw_internal(
                ctx,
                &format!("{} Exception: {}", marshaller.host_label(), err),
            ))
        }
    }
}
