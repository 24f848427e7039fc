//! Runtime orchestration for script execution
//!
//! The Runtime struct owns one bridged context and the host globals installed
//! on it:
//! - `console`, written through a [`ConsoleWriter`]
//! - `require`, when a module base directory is configured

use crate::cli::Cli;
use crate::error::CliResult;
use bridge::{BridgeConfig, Context};
use builtins::console::{self, ConsoleWriter, StdioWriter};
use builtins::require::{self, ModuleLoader};
use core_types::HostValue;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Main runtime wrapping a bridged QuickJS context
pub struct Runtime {
    /// The bridged context all scripts run in
    context: Context,
    /// Module loader, once require is enabled
    modules: Option<Rc<ModuleLoader>>,
}

impl Runtime {
    /// Create a runtime with no host globals installed
    ///
    /// # Example
    /// ```
    /// use bridge::BridgeConfig;
    /// use core_types::HostValue;
    /// use js_cli::Runtime;
    ///
    /// let mut runtime = Runtime::new(BridgeConfig::default()).unwrap();
    /// assert_eq!(runtime.execute_string("6 * 7").unwrap(), HostValue::from(42));
    /// ```
    pub fn new(config: BridgeConfig) -> CliResult<Self> {
        Ok(Self {
            context: Context::with_config(config)?,
            modules: None,
        })
    }

    /// Create a runtime configured from command-line arguments
    pub fn from_cli(cli: &Cli) -> CliResult<Self> {
        let mut config = BridgeConfig::default();
        if let Some(limit) = cli.memory_limit {
            config = config.with_memory_limit(limit);
        }
        if let Some(size) = cli.stack_size {
            config = config.with_max_stack_size(size);
        }

        let mut runtime = Self::new(config)?;
        if !cli.no_console {
            runtime = runtime.with_console(Rc::new(StdioWriter))?;
        }
        if let Some(base) = &cli.require_base {
            runtime = runtime.with_require(base)?;
        }
        tracing::debug!(
            runtime = %runtime.context.runtime_id(),
            console = !cli.no_console,
            require = cli.require_base.is_some(),
            "runtime configured"
        );
        Ok(runtime)
    }

    /// Define `console`, writing through `writer`
    pub fn with_console(self, writer: Rc<dyn ConsoleWriter>) -> CliResult<Self> {
        console::install(&self.context, writer)?;
        Ok(self)
    }

    /// Define `require`, resolving modules against `base_dir`
    pub fn with_require(mut self, base_dir: impl Into<PathBuf>) -> CliResult<Self> {
        self.modules = Some(require::install(&self.context, base_dir)?);
        Ok(self)
    }

    /// The underlying bridged context
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Modules loaded through require so far
    pub fn loaded_modules(&self) -> Vec<PathBuf> {
        self.modules
            .as_ref()
            .map(|loader| loader.loaded_modules())
            .unwrap_or_default()
    }

    /// Execute a JavaScript file
    ///
    /// # Errors
    /// Returns `CliError` if the file cannot be read or execution fails
    ///
    /// # Example
    /// ```no_run
    /// use bridge::BridgeConfig;
    /// use js_cli::Runtime;
    ///
    /// let mut runtime = Runtime::new(BridgeConfig::default()).unwrap();
    /// let result = runtime.execute_file("example.js").unwrap();
    /// ```
    pub fn execute_file(&mut self, path: impl AsRef<Path>) -> CliResult<HostValue> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "executing file");
        let source = std::fs::read_to_string(path)?;
        Ok(self.context.evaluate(&source, &path.display().to_string())?)
    }

    /// Execute a JavaScript source string
    ///
    /// # Errors
    /// Returns `CliError` if the script throws or fails to parse
    pub fn execute_string(&mut self, source: &str) -> CliResult<HostValue> {
        Ok(self.context.eval(source)?)
    }

    /// Start the interactive REPL on this runtime
    pub fn repl(&mut self) -> CliResult<()> {
        tracing::debug!(runtime = %self.context.runtime_id(), "starting repl");
        crate::repl::run_repl(self)
    }
}

/// Format a completion value the way a JavaScript shell prints it
pub fn format_value(value: &HostValue) -> String {
    match value {
        HostValue::None => "undefined".to_string(),
        HostValue::Bool(b) => b.to_string(),
        HostValue::Int(n) => n.to_string(),
        HostValue::Float(f) => format_number(*f),
        HostValue::Str(s) => s.clone(),
        other => other.to_string(),
    }
}

fn format_number(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        if f > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if f == f.trunc() && f.abs() < 1e21 {
        // Integral doubles print without a fraction; -0 prints as 0.
        format!("{:.0}", f + 0.0)
    } else {
        f.to_string()
    }
}
