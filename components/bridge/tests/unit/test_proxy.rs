//! Host callables invoked from JavaScript

use bridge::{BridgeError, Context};
use core_types::{Callable, HostError, HostValue};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

fn add() -> Callable {
    Callable::named("add", |args: &[HostValue]| {
        let a = args.first().and_then(HostValue::as_i64).unwrap_or(0);
        let b = args.get(1).and_then(HostValue::as_i64).unwrap_or(0);
        Ok(HostValue::from(a + b))
    })
}

fn message(err: BridgeError) -> String {
    match err {
        BridgeError::Evaluation { message, .. } => message,
        other => panic!("expected an evaluation error, got {other:?}"),
    }
}

// ============================================================================
// Invocation
// ============================================================================

#[test]
fn test_call_host_function() {
    let ctx = Context::new().unwrap();
    ctx.bind_global("add", add()).unwrap();
    assert_eq!(ctx.eval("add(2, 3)").unwrap(), HostValue::from(5));
    assert_eq!(ctx.eval("typeof add").unwrap(), HostValue::from("function"));
}

#[test]
fn test_arguments_arrive_in_order() {
    let ctx = Context::new().unwrap();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    ctx.bind_global(
        "record",
        Callable::named("record", move |args: &[HostValue]| {
            sink.borrow_mut().extend(args.iter().cloned());
            Ok(HostValue::None)
        }),
    )
    .unwrap();

    let result = ctx.eval("record(1, 'two', 3.5, null, true)").unwrap();
    assert!(result.is_none());
    assert_eq!(
        *seen.borrow(),
        vec![
            HostValue::from(1),
            HostValue::from("two"),
            HostValue::from(3.5),
            HostValue::None,
            HostValue::from(true),
        ]
    );
}

#[test]
fn test_missing_arguments_are_absent() {
    let ctx = Context::new().unwrap();
    ctx.bind_global(
        "argc",
        Callable::named("argc", |args: &[HostValue]| Ok(HostValue::from(args.len() as i64))),
    )
    .unwrap();
    assert_eq!(ctx.eval("argc()").unwrap(), HostValue::from(0));
    assert_eq!(ctx.eval("argc(undefined, 1)").unwrap(), HostValue::from(2));
}

#[test]
fn test_object_argument_arrives_as_text() {
    let ctx = Context::new().unwrap();
    ctx.bind_global(
        "echo",
        Callable::named("echo", |args: &[HostValue]| {
            Ok(args.first().cloned().unwrap_or(HostValue::None))
        }),
    )
    .unwrap();
    assert_eq!(
        ctx.eval("echo({})").unwrap(),
        HostValue::from("[object Object]")
    );
}

#[test]
fn test_host_returns_callable() {
    let ctx = Context::new().unwrap();
    ctx.bind_global(
        "make_adder",
        Callable::named("make_adder", |_args: &[HostValue]| Ok(HostValue::from(add()))),
    )
    .unwrap();
    assert_eq!(ctx.eval("make_adder()(20, 22)").unwrap(), HostValue::from(42));
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_unconvertible_argument_skips_host_call() {
    let ctx = Context::new().unwrap();
    let calls = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&calls);
    ctx.bind_global(
        "f",
        Callable::named("f", move |_args: &[HostValue]| {
            counter.set(counter.get() + 1);
            Ok(HostValue::None)
        }),
    )
    .unwrap();

    let text = message(ctx.eval("f(1, '\\uD800', 3)").unwrap_err());
    assert_eq!(text, "InternalError: Failed to convert argument 1");
    assert_eq!(calls.get(), 0);

    ctx.eval("f(1, 'ok', 3)").unwrap();
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_host_failure_becomes_internal_error() {
    let ctx = Context::new().unwrap();
    ctx.bind_global(
        "fail",
        Callable::named("fail", |_args: &[HostValue]| Err(HostError::new("bad input"))),
    )
    .unwrap();

    let text = message(ctx.eval("fail()").unwrap_err());
    assert!(text.contains("InternalError"), "{text}");
    assert!(text.contains("Host Exception: bad input"), "{text}");
}

#[test]
fn test_host_failure_is_catchable() {
    let ctx = Context::new().unwrap();
    ctx.bind_global(
        "fail",
        Callable::named("fail", |_args: &[HostValue]| Err(HostError::new("bad input"))),
    )
    .unwrap();

    let caught = ctx
        .eval("try { fail(); 'no' } catch (e) { e instanceof InternalError }")
        .unwrap();
    assert_eq!(caught, HostValue::from(true));
}

#[test]
fn test_host_label_names_the_failure() {
    let config = bridge::BridgeConfig::default().with_host_label("Python");
    let ctx = Context::with_config(config).unwrap();
    ctx.bind_global(
        "fail",
        Callable::named("fail", |_args: &[HostValue]| Err(HostError::new("ValueError: x"))),
    )
    .unwrap();
    let text = message(ctx.eval("fail()").unwrap_err());
    assert!(text.contains("Python Exception: ValueError: x"), "{text}");
}

#[test]
fn test_reentrant_evaluation_is_rejected() {
    let ctx = Rc::new(Context::new().unwrap());
    let weak: Weak<Context> = Rc::downgrade(&ctx);
    ctx.bind_global(
        "nested",
        Callable::named("nested", move |_args: &[HostValue]| {
            let ctx = weak.upgrade().ok_or("context gone")?;
            ctx.eval("1").map_err(|err| HostError::new(err.to_string()))
        }),
    )
    .unwrap();

    let text = message(ctx.eval("nested()").unwrap_err());
    assert!(text.contains("re-entrant"), "{text}");
    assert_eq!(ctx.eval("2 + 2").unwrap(), HostValue::from(4));
}
