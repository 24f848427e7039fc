//! Context facade lifecycle and evaluation

use bridge::{BridgeConfig, BridgeError, Context, DEFAULT_FILENAME};
use core_types::HostValue;
use std::io::Write;

// ============================================================================
// Evaluation
// ============================================================================

#[test]
fn test_globals_persist_between_evaluations() {
    let ctx = Context::new().unwrap();
    ctx.eval("var counter = 1;").unwrap();
    ctx.eval("counter += 1;").unwrap();
    assert_eq!(ctx.eval("counter").unwrap(), HostValue::from(2));
}

#[test]
fn test_thrown_error_reports_message() {
    let ctx = Context::new().unwrap();
    match ctx.eval("throw new TypeError('wrong')").unwrap_err() {
        BridgeError::Evaluation {
            message, filename, ..
        } => {
            assert_eq!(message, "TypeError: wrong");
            assert_eq!(filename, DEFAULT_FILENAME);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_thrown_primitive_reports_text() {
    let ctx = Context::new().unwrap();
    let err = ctx.eval("throw 42").unwrap_err();
    assert_eq!(err.evaluation_message(), Some("42"));
}

#[test]
fn test_syntax_error() {
    let ctx = Context::new().unwrap();
    let err = ctx.eval("let = ;").unwrap_err();
    let message = err.evaluation_message().unwrap_or_default().to_string();
    assert!(message.starts_with("SyntaxError"), "{message}");
}

#[test]
fn test_evaluate_keeps_filename() {
    let ctx = Context::new().unwrap();
    match ctx.evaluate("undefinedName", "script.js").unwrap_err() {
        BridgeError::Evaluation { filename, message, .. } => {
            assert_eq!(filename, "script.js");
            assert!(message.contains("ReferenceError"), "{message}");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_context_usable_after_error() {
    let ctx = Context::new().unwrap();
    assert!(ctx.eval("throw 'x'").is_err());
    assert_eq!(ctx.eval("'still here'").unwrap(), HostValue::from("still here"));
}

#[test]
fn test_throwing_stack_getter_is_cleared() {
    let ctx = Context::new().unwrap();
    match ctx
        .eval("throw { get stack() { throw 'inner'; } }")
        .unwrap_err()
    {
        BridgeError::Evaluation { message, stack, .. } => {
            assert_eq!(message, "[object Object]");
            assert_eq!(stack, None);
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(ctx.eval("1 + 1").unwrap(), HostValue::from(2));
}

#[test]
fn test_eval_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "var a = 20;").unwrap();
    writeln!(file, "a * 2 + 2").unwrap();

    let ctx = Context::new().unwrap();
    assert_eq!(ctx.eval_file(file.path()).unwrap(), HostValue::from(42));
}

#[test]
fn test_eval_file_missing() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = Context::new().unwrap();
    let err = ctx.eval_file(dir.path().join("missing.js")).unwrap_err();
    assert!(matches!(err, BridgeError::Io(_)));
}

// ============================================================================
// Configuration and isolation
// ============================================================================

#[test]
fn test_contexts_are_isolated() {
    let a = Context::new().unwrap();
    let b = Context::new().unwrap();
    assert_ne!(a.runtime_id(), b.runtime_id());

    a.bind_global("shared", 1).unwrap();
    assert_eq!(b.eval("typeof shared").unwrap(), HostValue::from("undefined"));
}

#[test]
fn test_memory_limit_stops_runaway_allocation() {
    let config = BridgeConfig::default().with_memory_limit(4 * 1024 * 1024);
    let ctx = Context::with_config(config).unwrap();
    let result = ctx.eval("let xs = []; while (true) { xs.push(new Array(100000).fill(1)); }");
    assert!(result.is_err());
}
