//! Conversion through the public context surface

use bridge::{BridgeError, ConversionError, Context, OPAQUE_PLACEHOLDER};
use core_types::{HostError, HostObject, HostValue};
use num_bigint::BigInt;
use std::rc::Rc;

struct Broken;

impl HostObject for Broken {
    fn type_name(&self) -> &str {
        "Broken"
    }

    fn to_text(&self) -> Result<String, HostError> {
        Err(HostError::new("no repr"))
    }
}

struct Point(i32, i32);

impl HostObject for Point {
    fn type_name(&self) -> &str {
        "Point"
    }

    fn to_text(&self) -> Result<String, HostError> {
        Ok(format!("Point({}, {})", self.0, self.1))
    }
}

// ============================================================================
// Host to embedded
// ============================================================================

#[test]
fn test_bind_small_integer() {
    let ctx = Context::new().unwrap();
    ctx.bind_global("n", 41).unwrap();
    assert_eq!(ctx.eval("n + 1").unwrap(), HostValue::from(42));
    assert_eq!(ctx.eval("typeof n").unwrap(), HostValue::from("number"));
}

#[test]
fn test_bind_wide_integer_keeps_value() {
    let ctx = Context::new().unwrap();
    ctx.bind_global("n", 1_i64 << 40).unwrap();
    assert_eq!(ctx.eval("n === 1099511627776").unwrap(), HostValue::from(true));
}

#[test]
fn test_bind_huge_integer_becomes_double() {
    let ctx = Context::new().unwrap();
    let huge = BigInt::from(1u8) << 100;
    ctx.bind_global("n", huge).unwrap();
    assert_eq!(ctx.eval("n > 1e30").unwrap(), HostValue::from(true));
}

#[test]
fn test_bind_float() {
    let ctx = Context::new().unwrap();
    ctx.bind_global("x", 2.5).unwrap();
    assert_eq!(ctx.eval("x * 2").unwrap(), HostValue::from(5));
}

#[test]
fn test_bind_string_with_unicode() {
    let ctx = Context::new().unwrap();
    ctx.bind_global("s", "héllo wörld").unwrap();
    assert_eq!(ctx.eval("s.length").unwrap(), HostValue::from(11));
    assert_eq!(ctx.eval("s").unwrap(), HostValue::from("héllo wörld"));
}

#[test]
fn test_bind_none_is_null() {
    let ctx = Context::new().unwrap();
    ctx.bind_global("v", HostValue::None).unwrap();
    assert_eq!(ctx.eval("v === null").unwrap(), HostValue::from(true));
}

#[test]
fn test_bind_bool() {
    let ctx = Context::new().unwrap();
    ctx.bind_global("flag", false).unwrap();
    assert_eq!(ctx.eval("!flag").unwrap(), HostValue::from(true));
}

#[test]
fn test_bind_list_as_text() {
    let ctx = Context::new().unwrap();
    let list = HostValue::List(vec![1.into(), 2.into(), "a".into()]);
    ctx.bind_global("xs", list).unwrap();
    assert_eq!(ctx.eval("typeof xs").unwrap(), HostValue::from("string"));
    assert_eq!(ctx.eval("xs").unwrap(), HostValue::from("[1, 2, 'a']"));
}

#[test]
fn test_bind_object_as_text() {
    let ctx = Context::new().unwrap();
    ctx.bind_global("p", HostValue::Object(Rc::new(Point(1, 2))))
        .unwrap();
    assert_eq!(ctx.eval("p").unwrap(), HostValue::from("Point(1, 2)"));
}

#[test]
fn test_bind_object_without_text_fails() {
    let ctx = Context::new().unwrap();
    let err = ctx
        .bind_global("b", HostValue::Object(Rc::new(Broken)))
        .unwrap_err();
    assert!(matches!(
        err,
        BridgeError::Conversion(ConversionError::Repr(_))
    ));
    assert_eq!(ctx.eval("typeof b").unwrap(), HostValue::from("undefined"));
}

// ============================================================================
// Embedded to host
// ============================================================================

#[test]
fn test_eval_integer() {
    let ctx = Context::new().unwrap();
    assert_eq!(ctx.eval("40 + 2").unwrap(), HostValue::from(42));
}

#[test]
fn test_eval_fraction_is_float() {
    let ctx = Context::new().unwrap();
    assert_eq!(ctx.eval("1 / 4").unwrap().as_float(), Some(0.25));
}

#[test]
fn test_eval_undefined_and_null() {
    let ctx = Context::new().unwrap();
    assert!(ctx.eval("undefined").unwrap().is_none());
    assert!(ctx.eval("null").unwrap().is_none());
    assert!(ctx.eval("var unused = 1;").unwrap().is_none());
}

#[test]
fn test_eval_plain_object_as_text() {
    let ctx = Context::new().unwrap();
    assert_eq!(
        ctx.eval("({a: 1})").unwrap(),
        HostValue::from("[object Object]")
    );
}

#[test]
fn test_eval_array_as_text() {
    let ctx = Context::new().unwrap();
    assert_eq!(ctx.eval("[1, 2, 3]").unwrap(), HostValue::from("1,2,3"));
}

#[test]
fn test_eval_error_object_as_text() {
    let ctx = Context::new().unwrap();
    assert_eq!(
        ctx.eval("new Error('boom')").unwrap(),
        HostValue::from("Error: boom")
    );
}

#[test]
fn test_eval_symbol_uses_placeholder() {
    let ctx = Context::new().unwrap();
    assert_eq!(
        ctx.eval("Symbol('s')").unwrap(),
        HostValue::from(OPAQUE_PLACEHOLDER)
    );
    // The discarded coercion failure leaves the context usable.
    assert_eq!(ctx.eval("1 + 1").unwrap(), HostValue::from(2));
}

#[test]
fn test_eval_function_as_text() {
    let ctx = Context::new().unwrap();
    let text = ctx.eval("(function f() { return 1; })").unwrap();
    assert!(text.as_str().unwrap().contains("function f"));
}
