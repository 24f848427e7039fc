//! Host value representation.
//!
//! [`HostValue`] is a closed sum over every kind of value the host can hand to
//! the bridge. The textual forms follow the host's conventions (`None`,
//! `True`, `2.0`, `[1, 'a']`) because that is what the host prints and what
//! aggregates degrade to when they cross into the embedded runtime.

use crate::{Callable, HostError, HostObject};
use num_bigint::BigInt;
use num_traits::{FromPrimitive, ToPrimitive};
use std::fmt;
use std::rc::Rc;

/// Represents any host value.
///
/// Integers are arbitrary precision so an integer coming back from the
/// embedded runtime is never approximated.
///
/// # Examples
///
/// ```
/// use core_types::HostValue;
///
/// let none = HostValue::None;
/// let number = HostValue::from(42);
/// let text = HostValue::from("hello");
///
/// assert!(none.is_none());
/// assert_eq!(number.type_name(), "int");
/// assert_eq!(text.to_string(), "hello");
/// ```
#[derive(Clone)]
pub enum HostValue {
    /// The host's single absence value
    None,
    /// Boolean
    Bool(bool),
    /// Arbitrary-precision integer
    Int(BigInt),
    /// Double-precision float
    Float(f64),
    /// UTF-8 text
    Str(String),
    /// Callable host function
    Callable(Callable),
    /// Host list; crosses the bridge as text
    List(Vec<HostValue>),
    /// Opaque host object; crosses the bridge as text
    Object(Rc<dyn HostObject>),
}

impl HostValue {
    /// Returns the host type name of this value.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_types::HostValue;
    ///
    /// assert_eq!(HostValue::None.type_name(), "NoneType");
    /// assert_eq!(HostValue::from(1.5).type_name(), "float");
    /// assert_eq!(HostValue::List(vec![]).type_name(), "list");
    /// ```
    pub fn type_name(&self) -> &str {
        match self {
            HostValue::None => "NoneType",
            HostValue::Bool(_) => "bool",
            HostValue::Int(_) => "int",
            HostValue::Float(_) => "float",
            HostValue::Str(_) => "str",
            HostValue::Callable(_) => "function",
            HostValue::List(_) => "list",
            HostValue::Object(object) => object.type_name(),
        }
    }

    /// Whether this is the absence value.
    pub fn is_none(&self) -> bool {
        matches!(self, HostValue::None)
    }

    /// Returns the boolean if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            HostValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer if this is an `Int`.
    pub fn as_int(&self) -> Option<&BigInt> {
        match self {
            HostValue::Int(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the integer as `i64` if this is an `Int` that fits.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_int().and_then(ToPrimitive::to_i64)
    }

    /// Returns the float if this is a `Float`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            HostValue::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the text if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            HostValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the callable if this is a `Callable`.
    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            HostValue::Callable(c) => Some(c),
            _ => None,
        }
    }

    /// Textual form of the value, as the host's `str()` would produce it.
    ///
    /// Only opaque objects can fail here; every other kind has a total
    /// textual form.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_types::HostValue;
    ///
    /// let list = HostValue::List(vec![HostValue::from(1), HostValue::from("a")]);
    /// assert_eq!(list.to_text().unwrap(), "[1, 'a']");
    /// assert_eq!(HostValue::from(true).to_text().unwrap(), "True");
    /// ```
    pub fn to_text(&self) -> Result<String, HostError> {
        match self {
            HostValue::Str(s) => Ok(s.clone()),
            HostValue::Object(object) => object.to_text(),
            HostValue::List(items) => {
                let parts = items
                    .iter()
                    .map(HostValue::to_repr)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(format!("[{}]", parts.join(", ")))
            }
            other => Ok(other.to_string()),
        }
    }

    /// Representation used for list elements: text is quoted.
    fn to_repr(&self) -> Result<String, HostError> {
        match self {
            HostValue::Str(s) => Ok(quote(s)),
            other => other.to_text(),
        }
    }
}

fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('\'');
    for ch in text.chars() {
        match ch {
            '\\' => quoted.push_str("\\\\"),
            '\'' => quoted.push_str("\\'"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            '\r' => quoted.push_str("\\r"),
            c => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}

/// Formats a float the way the host prints it: shortest round-trip digits,
/// always with a fractional part or an explicitly signed two-digit exponent.
fn format_float(n: f64) -> String {
    if n.is_nan() {
        return "nan".to_string();
    }
    if n.is_infinite() {
        return if n.is_sign_positive() { "inf" } else { "-inf" }.to_string();
    }

    let mut buffer = ryu::Buffer::new();
    let digits = buffer.format_finite(n);
    match digits.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, magnitude) = match exponent.strip_prefix('-') {
                Some(rest) => ('-', rest),
                None => ('+', exponent),
            };
            let mantissa = mantissa.strip_suffix(".0").unwrap_or(mantissa);
            format!("{}e{}{:0>2}", mantissa, sign, magnitude)
        }
        None => digits.to_string(),
    }
}

/// Equality follows the host: integers and floats compare by numeric value,
/// callables and objects by identity.
impl PartialEq for HostValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (HostValue::None, HostValue::None) => true,
            (HostValue::Bool(a), HostValue::Bool(b)) => a == b,
            (HostValue::Int(a), HostValue::Int(b)) => a == b,
            (HostValue::Float(a), HostValue::Float(b)) => a == b,
            (HostValue::Int(i), HostValue::Float(f)) | (HostValue::Float(f), HostValue::Int(i)) => {
                f.fract() == 0.0 && BigInt::from_f64(*f).is_some_and(|exact| &exact == i)
            }
            (HostValue::Str(a), HostValue::Str(b)) => a == b,
            (HostValue::Callable(a), HostValue::Callable(b)) => a.ptr_eq(b),
            (HostValue::List(a), HostValue::List(b)) => a == b,
            (HostValue::Object(a), HostValue::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostValue::None => write!(f, "None"),
            HostValue::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            HostValue::Int(n) => f.debug_tuple("Int").field(n).finish(),
            HostValue::Float(n) => f.debug_tuple("Float").field(n).finish(),
            HostValue::Str(s) => f.debug_tuple("Str").field(s).finish(),
            HostValue::Callable(c) => f.debug_tuple("Callable").field(&c.name()).finish(),
            HostValue::List(items) => f.debug_tuple("List").field(items).finish(),
            HostValue::Object(object) => write!(f, "Object(<{}>)", object.type_name()),
        }
    }
}

/// Infallible textual form; an object whose own conversion fails prints as
/// `<type object>`.
///
/// # Examples
///
/// ```
/// use core_types::HostValue;
///
/// assert_eq!(HostValue::None.to_string(), "None");
/// assert_eq!(HostValue::from(false).to_string(), "False");
/// assert_eq!(HostValue::from(2.0).to_string(), "2.0");
/// assert_eq!(HostValue::from(1e300).to_string(), "1e+300");
/// ```
impl fmt::Display for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostValue::None => write!(f, "None"),
            HostValue::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            HostValue::Int(n) => write!(f, "{}", n),
            HostValue::Float(n) => write!(f, "{}", format_float(*n)),
            HostValue::Str(s) => write!(f, "{}", s),
            HostValue::Callable(c) => write!(f, "<function {}>", c.name()),
            HostValue::List(_) | HostValue::Object(_) => match self.to_text() {
                Ok(text) => write!(f, "{}", text),
                Err(_) => write!(f, "<{} object>", self.type_name()),
            },
        }
    }
}

impl From<bool> for HostValue {
    fn from(b: bool) -> Self {
        HostValue::Bool(b)
    }
}

impl From<i32> for HostValue {
    fn from(n: i32) -> Self {
        HostValue::Int(BigInt::from(n))
    }
}

impl From<i64> for HostValue {
    fn from(n: i64) -> Self {
        HostValue::Int(BigInt::from(n))
    }
}

impl From<BigInt> for HostValue {
    fn from(n: BigInt) -> Self {
        HostValue::Int(n)
    }
}

impl From<f64> for HostValue {
    fn from(n: f64) -> Self {
        HostValue::Float(n)
    }
}

impl From<&str> for HostValue {
    fn from(s: &str) -> Self {
        HostValue::Str(s.to_string())
    }
}

impl From<String> for HostValue {
    fn from(s: String) -> Self {
        HostValue::Str(s)
    }
}

impl From<Callable> for HostValue {
    fn from(c: Callable) -> Self {
        HostValue::Callable(c)
    }
}

impl From<Vec<HostValue>> for HostValue {
    fn from(items: Vec<HostValue>) -> Self {
        HostValue::List(items)
    }
}

impl<T: Into<HostValue>> From<Option<T>> for HostValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(HostValue::None, Into::into)
    }
}
