//! Console object backed by host writers

use bridge::{BridgeResult, Context};
use core_types::{Callable, HostError, HostValue};
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

const LOG_GLOBAL: &str = "__host_log";
const ERROR_GLOBAL: &str = "__host_error";

const CONSOLE_SHIM: &str = r#"
(function () {
    var log = __host_log;
    var error = __host_error;
    globalThis.console = {
        log: function (...args) { log(...args); },
        info: function (...args) { log(...args); },
        debug: function (...args) { log(...args); },
        error: function (...args) { error(...args); },
        warn: function (...args) { error(...args); }
    };
})();
"#;

/// Output stream a console line is written to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    /// `log`, `info` and `debug`
    Stdout,
    /// `error` and `warn`
    Stderr,
}

/// Console output writer trait
pub trait ConsoleWriter {
    /// Write one line, without its terminator, to `stream`
    fn write_line(&self, stream: Stream, line: &str) -> Result<(), HostError>;
}

/// Writer that prints to the process's stdout and stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct StdioWriter;

impl ConsoleWriter for StdioWriter {
    fn write_line(&self, stream: Stream, line: &str) -> Result<(), HostError> {
        let result = match stream {
            Stream::Stdout => writeln!(std::io::stdout().lock(), "{}", line),
            Stream::Stderr => writeln!(std::io::stderr().lock(), "{}", line),
        };
        result.map_err(|err| HostError::new(err.to_string()))
    }
}

/// Writer that captures output in memory
#[derive(Debug, Default)]
pub struct CaptureWriter {
    lines: RefCell<Vec<(Stream, String)>>,
}

impl CaptureWriter {
    /// Create an empty capture
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured lines in write order
    pub fn lines(&self) -> Vec<(Stream, String)> {
        self.lines.borrow().clone()
    }

    /// Lines written to stdout
    pub fn stdout(&self) -> Vec<String> {
        self.on(Stream::Stdout)
    }

    /// Lines written to stderr
    pub fn stderr(&self) -> Vec<String> {
        self.on(Stream::Stderr)
    }

    fn on(&self, stream: Stream) -> Vec<String> {
        self.lines
            .borrow()
            .iter()
            .filter(|(s, _)| *s == stream)
            .map(|(_, line)| line.clone())
            .collect()
    }
}

impl ConsoleWriter for CaptureWriter {
    fn write_line(&self, stream: Stream, line: &str) -> Result<(), HostError> {
        self.lines.borrow_mut().push((stream, line.to_string()));
        Ok(())
    }
}

/// Joins the textual forms of `values` with single spaces
pub fn format_line(values: &[HostValue]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn line_writer(name: &str, stream: Stream, writer: Rc<dyn ConsoleWriter>) -> Callable {
    Callable::named(name, move |args: &[HostValue]| {
        writer.write_line(stream, &format_line(args))?;
        Ok(HostValue::None)
    })
}

/// Define `globalThis.console` on `ctx`, writing through `writer`.
///
/// The temporary globals used for the wiring are removed before returning.
///
/// # Errors
/// Fails if the context was destroyed or the wiring script fails.
pub fn install(ctx: &Context, writer: Rc<dyn ConsoleWriter>) -> BridgeResult<()> {
    ctx.bind_global(
        LOG_GLOBAL,
        line_writer("console.log", Stream::Stdout, Rc::clone(&writer)),
    )?;
    ctx.bind_global(ERROR_GLOBAL, line_writer("console.error", Stream::Stderr, writer))?;

    ctx.evaluate(CONSOLE_SHIM, "<console>")?;
    ctx.eval(&format!(
        "delete globalThis.{}; delete globalThis.{};",
        LOG_GLOBAL, ERROR_GLOBAL
    ))?;

    tracing::debug!(runtime = %ctx.runtime_id(), "console installed");
    Ok(())
}
