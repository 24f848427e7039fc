//! qjs-bridge
//!
//! Entry point for the CLI. Parses arguments and delegates to the Runtime for
//! execution.

use clap::Parser as ClapParser;
use core_types::HostValue;
use js_cli::{format_value, Cli, CliError, CliResult, Runtime};
use std::process::ExitCode;

fn main() -> ExitCode {
    js_cli::init_tracing();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Io(e)) => {
            eprintln!("Error: Could not read file: {}", e);
            ExitCode::FAILURE
        }
        Err(e) if e.is_script_error() => {
            eprintln!("Uncaught {}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> CliResult<()> {
    let mut runtime = Runtime::from_cli(cli)?;

    if let Some(file) = &cli.file {
        print_result(&runtime.execute_file(file)?);
    } else if let Some(code) = &cli.eval {
        print_result(&runtime.execute_string(code)?);
    }

    if cli.repl {
        runtime.repl()?;
    } else if cli.file.is_none() && cli.eval.is_none() {
        // Default: show usage
        println!("qjs-bridge {}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Usage:");
        println!("  qjs-bridge --file <FILE>     Execute a JavaScript file");
        println!("  qjs-bridge --eval <CODE>     Evaluate inline JavaScript code");
        println!("  qjs-bridge --repl            Start interactive REPL");
        println!();
        println!("Run 'qjs-bridge --help' for more options.");
    }
    Ok(())
}

/// Print the completion value unless it is undefined or null
fn print_result(value: &HostValue) {
    if !value.is_none() {
        println!("{}", format_value(value));
    }
}
