//! Interchange value used between grammars.
//!
//! A [`Value`] is the neutral payload a tree is projected into when it crosses
//! from one grammar to another: a scalar [`Atom`], a list, or an ordered map.
//!
//! ## Creating Values
//!
//! ```rust
//! use textgram::{value, Atom, Value};
//!
//! let number = Value::from(42);
//! let text = Value::from("hello");
//! let doc = value!({
//!     "name": "Alice",
//!     "tags": ["a", "b"]
//! });
//! assert!(doc.is_map());
//! ```
//!
//! ## Inferring Scalars From Text
//!
//! [`Value::infer`] is the default INI value-parse hook. It recognises
//! `null`, booleans, integers (falling back to big integers past `i64`),
//! floats and RFC 3339 timestamps; everything else stays a string.
//!
//! ```rust
//! use textgram::{Atom, Number, Value};
//!
//! assert_eq!(Value::infer("12345"), Value::Atom(Atom::Number(Number::Integer(12345))));
//! assert_eq!(Value::infer("TRUE"), Value::from(true));
//! assert_eq!(Value::infer("007"), Value::from("007"));
//! assert!(Value::infer("2024-01-15T10:30:00Z").as_atom().is_some_and(Atom::is_date));
//! ```

use crate::ValueMap;
use chrono::{DateTime, Utc};
use num_bigint::BigInt;
use serde::{Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A scalar interchange value.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Atom {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Date(DateTime<Utc>),
    BigInt(BigInt),
}

/// A numeric atom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

/// A recursive interchange value: `Atom | List<Value> | Map<String, Value>`.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Atom(Atom),
    List(Vec<Value>),
    Map(ValueMap),
}

impl Default for Value {
    fn default() -> Self {
        Value::Atom(Atom::Null)
    }
}

impl Number {
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }

    /// Returns the integer, or a whole float that fits in `i64`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(i) => Some(*i),
            Number::Float(f) => {
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                    Some(*f as i64)
                } else {
                    None
                }
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Float(fl) => write!(f, "{}", fl),
        }
    }
}

impl Atom {
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Atom::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_date(&self) -> bool {
        matches!(self, Atom::Date(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_bigint(&self) -> bool {
        matches!(self, Atom::BigInt(_))
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Null => write!(f, "null"),
            Atom::Bool(b) => write!(f, "{}", b),
            Atom::Number(n) => write!(f, "{}", n),
            Atom::String(s) => write!(f, "{}", s),
            Atom::Date(dt) => write!(f, "{}", dt.to_rfc3339()),
            Atom::BigInt(bi) => write!(f, "{}", bi),
        }
    }
}

impl Value {
    /// Types a scalar from its textual form.
    #[must_use]
    pub fn infer(text: &str) -> Value {
        Value::Atom(infer_atom(text))
    }

    /// Wraps text as a string atom without interpreting it.
    #[must_use]
    pub fn literal(text: &str) -> Value {
        Value::Atom(Atom::String(text.to_string()))
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Atom(Atom::Null))
    }

    #[inline]
    #[must_use]
    pub const fn is_atom(&self) -> bool {
        matches!(self, Value::Atom(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    #[must_use]
    pub fn as_atom(&self) -> Option<&Atom> {
        match self {
            Value::Atom(atom) => Some(atom),
            _ => None,
        }
    }

    /// If the value is a string atom, returns it.
    ///
    /// ```rust
    /// use textgram::Value;
    ///
    /// assert_eq!(Value::from("hello").as_str(), Some("hello"));
    /// assert_eq!(Value::from(42).as_str(), None);
    /// ```
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Atom(Atom::String(s)) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Atom(Atom::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Atom(Atom::Number(n)) => n.as_i64(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Follows `path` through nested maps.
    #[must_use]
    pub fn pointer(&self, path: &[&str]) -> Option<&Value> {
        path.iter()
            .try_fold(self, |current, key| current.as_map()?.get(key))
    }
}

fn infer_atom(text: &str) -> Atom {
    if text == "null" {
        return Atom::Null;
    }
    if text.eq_ignore_ascii_case("true") {
        return Atom::Bool(true);
    }
    if text.eq_ignore_ascii_case("false") {
        return Atom::Bool(false);
    }
    if is_integer_literal(text) {
        return match text.parse::<i64>() {
            Ok(i) => Atom::Number(Number::Integer(i)),
            Err(_) => match text.parse::<BigInt>() {
                Ok(bi) => Atom::BigInt(bi),
                Err(_) => Atom::String(text.to_string()),
            },
        };
    }
    if is_float_literal(text) {
        if let Ok(f) = text.parse::<f64>() {
            return Atom::Number(Number::Float(f));
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Atom::Date(dt.with_timezone(&Utc));
    }
    Atom::String(text.to_string())
}

// Leading zeros stay strings so "007" survives a round trip.
fn is_integer_literal(text: &str) -> bool {
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && (digits.len() == 1 || !digits.starts_with('0'))
}

fn is_float_literal(text: &str) -> bool {
    let body = text.strip_prefix(['-', '+']).unwrap_or(text);
    let mut chars = body.chars();
    let starts_numeric = match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('.') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    };
    starts_numeric
        && body.contains(['.', 'e', 'E'])
        && body
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '-' | '+'))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Atom(atom) => write!(f, "{}", atom),
            Value::List(list) => {
                write!(
                    f,
                    "[{}]",
                    list.iter()
                        .map(|v| v.to_string())
                        .collect::<Vec<_>>()
                        .join(",")
                )
            }
            Value::Map(map) => {
                write!(
                    f,
                    "{{{}}}",
                    map.iter()
                        .map(|(k, v)| format!("{}={}", k, v))
                        .collect::<Vec<_>>()
                        .join(",")
                )
            }
        }
    }
}

impl Hash for Atom {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Atom::Null => {}
            Atom::Bool(b) => b.hash(state),
            Atom::Number(Number::Integer(i)) => i.hash(state),
            Atom::Number(Number::Float(f)) => f.to_bits().hash(state),
            Atom::String(s) => s.hash(state),
            Atom::Date(dt) => dt.hash(state),
            Atom::BigInt(bi) => bi.hash(state),
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Atom(atom) => atom.hash(state),
            Value::List(list) => list.hash(state),
            Value::Map(map) => {
                map.len().hash(state);
                for (k, v) in map.iter() {
                    k.hash(state);
                    v.hash(state);
                }
            }
        }
    }
}

impl Serialize for Atom {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Atom::Null => serializer.serialize_unit(),
            Atom::Bool(b) => serializer.serialize_bool(*b),
            Atom::Number(Number::Integer(i)) => serializer.serialize_i64(*i),
            Atom::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            Atom::String(s) => serializer.serialize_str(s),
            Atom::Date(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            Atom::BigInt(bi) => serializer.serialize_str(&bi.to_string()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Atom(atom) => atom.serialize(serializer),
            Value::List(list) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(list.len()))?;
                for element in list {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Map(map) => {
                use serde::ser::SerializeMap;
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map.iter() {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Atom(Atom::Bool(value))
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Atom(Atom::Number(Number::Integer(value as i64)))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Atom(Atom::Number(Number::Integer(value)))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Atom(Atom::Number(Number::Integer(value as i64)))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Atom(Atom::Number(Number::Float(value)))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Atom(Atom::String(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Atom(Atom::String(value.to_string()))
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::Atom(Atom::BigInt(value))
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Atom(Atom::Date(value))
    }
}

impl From<Atom> for Value {
    fn from(value: Atom) -> Self {
        Value::Atom(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<ValueMap> for Value {
    fn from(value: ValueMap) -> Self {
        Value::Map(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_infer_numbers() {
        assert_eq!(Value::infer("-17"), Value::from(-17i64));
        assert_eq!(Value::infer("3.25"), Value::from(3.25));
        assert_eq!(Value::infer("1e3"), Value::from(1000.0));
        assert_eq!(Value::infer("0"), Value::from(0i64));
        assert_eq!(Value::infer("inf"), Value::from("inf"));
        assert_eq!(Value::infer("1.2.3"), Value::from("1.2.3"));
    }

    #[test]
    fn test_infer_bigint() {
        let value = Value::infer("123456789012345678901234567890");
        let expected: BigInt = "123456789012345678901234567890".parse().unwrap();
        assert_eq!(value, Value::from(expected));
    }

    #[test]
    fn test_infer_date() {
        let value = Value::infer("2024-01-15T10:30:00Z");
        let expected = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(value, Value::from(expected));
    }

    #[test]
    fn test_infer_keeps_plain_text() {
        assert_eq!(Value::infer("string"), Value::from("string"));
        assert_eq!(Value::infer(""), Value::from(""));
        assert_eq!(Value::infer("null"), Value::default());
    }

    #[test]
    fn test_pointer() {
        let mut inner = ValueMap::new();
        inner.insert("b".to_string(), Value::from(1));
        let mut outer = ValueMap::new();
        outer.insert("a".to_string(), Value::Map(inner));
        let value = Value::Map(outer);

        assert_eq!(value.pointer(&["a", "b"]), Some(&Value::from(1)));
        assert_eq!(value.pointer(&["a", "c"]), None);
        assert_eq!(value.pointer(&[]), Some(&value));
    }

    #[test]
    fn test_display() {
        let value = Value::List(vec![Value::from(1), Value::from("x")]);
        assert_eq!(value.to_string(), "[1,x]");
    }
}
