//! Command-line arguments

use clap::Parser;
use std::path::PathBuf;

/// Run JavaScript in QuickJS with host-provided console and require
#[derive(Debug, Parser)]
#[command(name = "qjs-bridge", version, about)]
pub struct Cli {
    /// JavaScript file to execute
    #[arg(short, long, conflicts_with = "eval")]
    pub file: Option<PathBuf>,

    /// Inline JavaScript to evaluate
    #[arg(short, long)]
    pub eval: Option<String>,

    /// Start the interactive REPL
    #[arg(short, long)]
    pub repl: bool,

    /// Do not define the console global
    #[arg(long)]
    pub no_console: bool,

    /// Enable require() resolving modules against this directory
    #[arg(long, value_name = "DIR")]
    pub require_base: Option<PathBuf>,

    /// Heap limit of the embedded runtime, in bytes
    #[arg(long, value_name = "BYTES")]
    pub memory_limit: Option<usize>,

    /// Stack limit of the embedded runtime, in bytes
    #[arg(long, value_name = "BYTES")]
    pub stack_size: Option<usize>,
}
