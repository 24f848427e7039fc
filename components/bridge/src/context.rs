//! Context facade: one embedded runtime plus one execution context.

use crate::config::BridgeConfig;
use crate::convert::{self, Marshaller};
use crate::error::{BridgeError, BridgeResult, ConversionError};
use crate::registry::{ForeignClass, RuntimeId};
use core_types::HostValue;
use rquickjs::context::EvalOptions;
use rquickjs::{Ctx, Value};
use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

/// Filename used when the caller does not name the evaluated source.
pub const DEFAULT_FILENAME: &str = "<input>";

struct Engine {
    context: rquickjs::Context,
    runtime: rquickjs::Runtime,
}

/// A paired embedded runtime and execution context.
///
/// A `Context` is single-threaded (`!Send`) and accepts one operation at a
/// time: starting an evaluation while another one on the same context is
/// still running, for instance from inside a host callback, fails with
/// [`BridgeError::Reentrant`].
///
/// # Examples
///
/// ```
/// use bridge::Context;
/// use core_types::{Callable, HostValue};
///
/// let ctx = Context::new().unwrap();
/// ctx.bind_global("base", 40).unwrap();
/// ctx.bind_global(
///     "inc",
///     Callable::named("inc", |args: &[HostValue]| {
///         let n = args.first().and_then(HostValue::as_i64).unwrap_or(0);
///         Ok(HostValue::from(n + 2))
///     }),
/// )
/// .unwrap();
///
/// assert_eq!(ctx.eval("inc(base)").unwrap(), HostValue::from(42));
/// ```
pub struct Context {
    runtime_id: RuntimeId,
    engine: Option<Engine>,
    marshaller: Marshaller,
    busy: Cell<bool>,
}

/// Clears the busy flag when an operation finishes.
struct BusyGuard<'a>(&'a Cell<bool>);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl Context {
    /// Creates a context with the default configuration.
    ///
    /// # Errors
    /// Returns [`BridgeError::OutOfMemory`] if the runtime or the context
    /// cannot be allocated.
    pub fn new() -> BridgeResult<Self> {
        Self::with_config(BridgeConfig::default())
    }

    /// Creates a context, applying the runtime limits of `config`.
    ///
    /// # Errors
    /// Returns [`BridgeError::OutOfMemory`] if the runtime or the context
    /// cannot be allocated.
    pub fn with_config(config: BridgeConfig) -> BridgeResult<Self> {
        let runtime = rquickjs::Runtime::new().map_err(|err| {
            tracing::warn!(%err, "runtime allocation failed");
            BridgeError::OutOfMemory
        })?;
        config.apply(&runtime);

        // On failure the runtime is released as it goes out of scope.
        let context = rquickjs::Context::full(&runtime).map_err(|err| {
            tracing::warn!(%err, "context allocation failed");
            BridgeError::OutOfMemory
        })?;

        let runtime_id = RuntimeId::next();
        let class = Rc::new(ForeignClass::new(runtime_id));

        tracing::debug!(runtime = %runtime_id, label = %config.host_label, "context ready");
        Ok(Self {
            runtime_id,
            engine: Some(Engine { context, runtime }),
            marshaller: Marshaller::new(class, &config.host_label),
            busy: Cell::new(false),
        })
    }

    /// Identity of the embedded runtime this context owns.
    pub fn runtime_id(&self) -> RuntimeId {
        self.runtime_id
    }

    /// Whether [`destroy`](Self::destroy) has run.
    pub fn is_destroyed(&self) -> bool {
        self.engine.is_none()
    }

    fn engine(&self) -> BridgeResult<&Engine> {
        self.engine.as_ref().ok_or(BridgeError::Destroyed)
    }

    fn enter(&self) -> BridgeResult<BusyGuard<'_>> {
        if self.busy.replace(true) {
            tracing::debug!(runtime = %self.runtime_id, "rejected re-entrant call");
            return Err(BridgeError::Reentrant);
        }
        Ok(BusyGuard(&self.busy))
    }

    /// Converts `value` and stores it as the global property `name`.
    ///
    /// # Errors
    /// Fails if the context was destroyed, if the host value has no textual
    /// form, or if the embedded runtime runs out of memory.
    pub fn bind_global(&self, name: &str, value: impl Into<HostValue>) -> BridgeResult<()> {
        let engine = self.engine()?;
        let _guard = self.enter()?;
        let value = value.into();

        engine.context.with(|ctx| {
            let embedded = self.marshaller.to_embedded(&ctx, &value)?;
            ctx.globals()
                .set(name, embedded)
                .map_err(|err| engine_error(&ctx, err, DEFAULT_FILENAME))
        })
    }

    /// Evaluates `source` in global scope and converts the completion value.
    ///
    /// `filename` is recorded on [`BridgeError::Evaluation`] only. It does not
    /// reach the engine, so QuickJS stack frames keep the engine's own script
    /// name (`eval_script`).
    ///
    /// # Errors
    /// Returns [`BridgeError::Evaluation`] carrying the textual form of the
    /// exception when the source throws or fails to parse.
    pub fn evaluate(&self, source: &str, filename: &str) -> BridgeResult<HostValue> {
        let engine = self.engine()?;
        let _guard = self.enter()?;
        tracing::debug!(runtime = %self.runtime_id, filename, bytes = source.len(), "evaluating");

        engine.context.with(|ctx| {
            let mut options = EvalOptions::default();
            options.global = true;
            options.strict = false;

            let completion = ctx.eval_with_options::<Value, _>(source, options);
            match convert::completion_to_host(completion) {
                Ok(value) => Ok(value),
                Err(ConversionError::Exception) => Err(pending_exception(&ctx, filename)),
                Err(ConversionError::Engine(err)) => Err(engine_error(&ctx, err, filename)),
                Err(err) => Err(err.into()),
            }
        })
    }

    /// Evaluates `source` under [`DEFAULT_FILENAME`].
    ///
    /// # Errors
    /// See [`evaluate`](Self::evaluate).
    pub fn eval(&self, source: &str) -> BridgeResult<HostValue> {
        self.evaluate(source, DEFAULT_FILENAME)
    }

    /// Reads a UTF-8 source file and evaluates it under its path.
    ///
    /// # Errors
    /// Returns [`BridgeError::Io`] if the file cannot be read, otherwise see
    /// [`evaluate`](Self::evaluate).
    pub fn eval_file(&self, path: impl AsRef<Path>) -> BridgeResult<HostValue> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        self.evaluate(&source, &path.display().to_string())
    }

    /// Number of foreign objects of this context that are not yet finalized.
    pub fn live_foreign_objects(&self) -> usize {
        self.marshaller.class().live()
    }

    /// Runs the embedded garbage collector.
    ///
    /// # Errors
    /// Returns [`BridgeError::Destroyed`] after teardown.
    pub fn collect_garbage(&self) -> BridgeResult<()> {
        let engine = self.engine()?;
        let _guard = self.enter()?;
        engine.runtime.run_gc();
        Ok(())
    }

    /// Releases the context, then the runtime. Safe to call more than once.
    pub fn destroy(&mut self) {
        if let Some(Engine { context, runtime }) = self.engine.take() {
            drop(context);
            drop(runtime);
            tracing::debug!(
                runtime = %self.runtime_id,
                live = self.live_foreign_objects(),
                "context destroyed"
            );
        }
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Fetches the pending exception and turns it into an evaluation error.
fn pending_exception(ctx: &Ctx<'_>, filename: &str) -> BridgeError {
    let exception = ctx.catch();
    let message = convert::coerce_text(&exception);
    let stack = exception
        .as_object()
        .and_then(|object| match object.get::<_, Option<String>>("stack") {
            Ok(stack) => stack,
            Err(rquickjs::Error::Exception) => {
                // A throwing `stack` getter leaves its own exception pending.
                let _ = ctx.catch();
                None
            }
            Err(_) => None,
        })
        .filter(|stack| !stack.trim().is_empty());

    tracing::debug!(filename, %message, "evaluation raised");
    BridgeError::Evaluation {
        message,
        stack,
        filename: filename.to_string(),
    }
}

fn engine_error(ctx: &Ctx<'_>, err: rquickjs::Error, filename: &str) -> BridgeError {
    match err {
        rquickjs::Error::Exception => pending_exception(ctx, filename),
        other => other.into(),
    }
}
