//! REPL (Read-Eval-Print Loop) implementation

use crate::error::{CliError, CliResult};
use crate::runtime::{format_value, Runtime};
use core_types::HostValue;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Run the interactive REPL
///
/// Returns `Ok(())` when the REPL exits normally.
pub fn run_repl(runtime: &mut Runtime) -> CliResult<()> {
    let mut editor = DefaultEditor::new()
        .map_err(|e| CliError::Repl(format!("Failed to initialize editor: {}", e)))?;

    println!("qjs-bridge {}", env!("CARGO_PKG_VERSION"));
    println!("Type JavaScript code, .help for commands or .exit to quit.");
    println!();

    let mut line_buffer = String::new();

    loop {
        let prompt = if line_buffer.is_empty() { "> " } else { "... " };

        match editor.readline(prompt) {
            Ok(line) => {
                let trimmed = line.trim();

                if line_buffer.is_empty() && trimmed.starts_with('.') {
                    match handle_repl_command(trimmed, runtime) {
                        Command::Exit => break,
                        Command::Continue => continue,
                    }
                }

                if !line_buffer.is_empty() {
                    line_buffer.push('\n');
                }
                line_buffer.push_str(&line);

                if !is_input_complete(&line_buffer) {
                    continue;
                }

                let _ = editor.add_history_entry(line_buffer.as_str());
                match runtime.execute_string(&line_buffer) {
                    Ok(value) => println!("{}", format_repl_value(&value)),
                    Err(e) => eprintln!("{}", e),
                }
                line_buffer.clear();
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C
                if line_buffer.is_empty() {
                    println!("Press Ctrl-D or type .exit to quit");
                } else {
                    println!("^C");
                    line_buffer.clear();
                }
            }
            Err(ReadlineError::Eof) => {
                // Ctrl-D
                println!();
                break;
            }
            Err(err) => {
                return Err(CliError::Repl(format!("Readline error: {}", err)));
            }
        }
    }

    tracing::debug!("repl finished");
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Continue,
    Exit,
}

/// Handle special REPL commands
fn handle_repl_command(command: &str, runtime: &Runtime) -> Command {
    match command {
        ".exit" => return Command::Exit,
        ".help" => {
            println!("REPL Commands:");
            println!("  .help     - Show this help message");
            println!("  .modules  - List modules loaded through require");
            println!("  .gc       - Run the garbage collector");
            println!("  .exit     - Exit the REPL");
        }
        ".modules" => {
            for path in runtime.loaded_modules() {
                println!("{}", path.display());
            }
        }
        ".gc" => match runtime.context().collect_garbage() {
            Ok(()) => println!(
                "{} host object(s) still referenced",
                runtime.context().live_foreign_objects()
            ),
            Err(e) => eprintln!("{}", e),
        },
        _ => {
            println!("Unknown command: {}", command);
            println!("Type .help for available commands");
        }
    }
    Command::Continue
}

/// Check if the input appears to be complete
///
/// This is a simple heuristic that checks for balanced braces/brackets/parens
fn is_input_complete(input: &str) -> bool {
    let mut depth: i32 = 0;
    let mut in_string = false;
    let mut string_char = ' ';
    let mut escape_next = false;

    for c in input.chars() {
        if escape_next {
            escape_next = false;
            continue;
        }

        if c == '\\' && in_string {
            escape_next = true;
            continue;
        }

        if !in_string {
            match c {
                '"' | '\'' | '`' => {
                    in_string = true;
                    string_char = c;
                }
                '{' | '[' | '(' => depth += 1,
                '}' | ']' | ')' => depth -= 1,
                _ => {}
            }
        } else if c == string_char {
            in_string = false;
        }
    }

    // Over-closed input is complete; the evaluator reports the syntax error.
    depth <= 0 && !in_string
}

/// Strings are quoted in the REPL so they stand apart from other values
fn format_repl_value(value: &HostValue) -> String {
    match value {
        HostValue::Str(s) => format!("'{}'", s),
        other => format_value(other),
    }
}
