//! Contract tests for the bridge
//!
//! These check the properties every conversion and every bound callable must
//! hold, independent of any particular script.

use bridge::{BridgeError, Context};
use core_types::{Callable, HostError, HostValue};
use proptest::prelude::*;
use std::rc::Rc;

fn identity() -> Callable {
    Callable::named("identity", |args: &[HostValue]| {
        Ok(args.first().cloned().unwrap_or(HostValue::None))
    })
}

// ============================================================================
// Round trips
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Test 32-bit integers survive host -> embedded -> host exactly
    #[test]
    fn prop_i32_round_trip(n in any::<i32>()) {
        let ctx = Context::new().unwrap();
        ctx.bind_global("v", n).unwrap();
        prop_assert_eq!(ctx.eval("v").unwrap(), HostValue::from(n));
    }

    /// Test integers up to 2^53 survive as numerically equal values
    #[test]
    fn prop_safe_integer_round_trip(n in -(1_i64 << 53)..(1_i64 << 53)) {
        let ctx = Context::new().unwrap();
        ctx.bind_global("v", n).unwrap();
        prop_assert_eq!(ctx.eval("v").unwrap(), HostValue::from(n));
    }

    /// Test strings survive unchanged, including non-ASCII text
    #[test]
    fn prop_string_round_trip(s in "\\PC*") {
        let ctx = Context::new().unwrap();
        ctx.bind_global("v", s.as_str()).unwrap();
        prop_assert_eq!(ctx.eval("v").unwrap(), HostValue::from(s));
    }

    /// Test values passed through a host callable come back unchanged
    #[test]
    fn prop_callback_identity(n in any::<i32>(), s in "[a-z]{0,16}") {
        let ctx = Context::new().unwrap();
        ctx.bind_global("id", identity()).unwrap();
        ctx.bind_global("n", n).unwrap();
        ctx.bind_global("s", s.as_str()).unwrap();
        prop_assert_eq!(ctx.eval("id(n)").unwrap(), HostValue::from(n));
        prop_assert_eq!(ctx.eval("id(s)").unwrap(), HostValue::from(s));
    }

    /// Test host failures always surface with their text
    #[test]
    fn prop_failure_text_propagates(text in "[a-zA-Z0-9 ]{1,32}") {
        let ctx = Context::new().unwrap();
        let reason = text.clone();
        ctx.bind_global(
            "fail",
            Callable::named("fail", move |_args: &[HostValue]| Err(HostError::new(reason.clone()))),
        )
        .unwrap();
        let message = ctx.eval("fail()").unwrap_err().to_string();
        let expected = format!("Host Exception: {}", text);
        prop_assert!(message.contains(&expected), "{}", message);
    }
}

// ============================================================================
// Fixed contracts
// ============================================================================

/// Test None maps to null and back to None
#[test]
fn contract_none_identity() {
    let ctx = Context::new().unwrap();
    ctx.bind_global("v", HostValue::None).unwrap();
    assert!(ctx.eval("v").unwrap().is_none());
}

/// Test a host callable sees embedded arguments and its result is returned
#[test]
fn contract_callback() {
    let ctx = Context::new().unwrap();
    ctx.bind_global(
        "concat",
        Callable::named("concat", |args: &[HostValue]| {
            let joined: String = args.iter().filter_map(HostValue::as_str).collect();
            Ok(HostValue::from(joined))
        }),
    )
    .unwrap();
    assert_eq!(
        ctx.eval("concat('a', 'b', 'c')").unwrap(),
        HostValue::from("abc")
    );
}

/// Test every embedded object kind converts to non-empty text
#[test]
fn contract_objects_have_text() {
    let ctx = Context::new().unwrap();
    for source in [
        "({})",
        "[]",
        "new Map()",
        "(() => 1)",
        "new Error('x')",
        "Symbol()",
        "10n",
        "Object.create(null)",
    ] {
        let value = ctx.eval(source).unwrap();
        let text = value.as_str().unwrap_or_default();
        assert!(!text.is_empty() || source == "[]", "{source} -> {value:?}");
    }
}

/// Test each runtime carries its own foreign class and accounting
#[test]
fn contract_foreign_class_is_per_runtime() {
    let first = Context::new().unwrap();
    let mut second = Context::new().unwrap();
    assert_ne!(first.runtime_id(), second.runtime_id());

    first.bind_global("id", identity()).unwrap();
    second.bind_global("id", identity()).unwrap();
    second.bind_global("other", identity()).unwrap();
    assert_eq!(first.live_foreign_objects(), 1);
    assert_eq!(second.live_foreign_objects(), 2);

    second.destroy();
    assert_eq!(second.live_foreign_objects(), 0);
    assert_eq!(first.live_foreign_objects(), 1);
    assert_eq!(first.eval("id(7)").unwrap(), HostValue::from(7));
}

/// Test a destroyed context releases everything and refuses work
#[test]
fn contract_teardown_releases_references() {
    let callable = identity();
    let mut ctx = Context::new().unwrap();
    let held = Rc::new(());
    let witness = Rc::clone(&held);
    ctx.bind_global(
        "keep",
        Callable::named("keep", move |_args: &[HostValue]| {
            let _ = &witness;
            Ok(HostValue::None)
        }),
    )
    .unwrap();
    ctx.bind_global("id", callable.clone()).unwrap();

    ctx.destroy();
    assert_eq!(Rc::strong_count(&held), 1);
    assert_eq!(callable.ref_count(), 1);
    assert!(matches!(ctx.eval("1"), Err(BridgeError::Destroyed)));
}
