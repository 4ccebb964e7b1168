//! Field values
//!
//! Every value stored in a complex type instance, a bounded sequence or a
//! top-level element is a [`Value`]: a scalar leaf, a complex composite or a
//! bounded sequence. Equality is kind-first, so a sequence is never equal to
//! a scalar or a complex value, while numeric scalars compare across
//! integer, decimal and float representations.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::fmt;

use crate::schema::{ComplexValue, TypedSequence};

/// Atomic value of a built-in type
#[derive(Debug, Clone)]
pub enum Scalar {
    /// String value
    String(String),
    /// Boolean value
    Boolean(bool),
    /// Integer value
    Integer(i64),
    /// Decimal value
    Decimal(Decimal),
    /// Float or double value
    Float(f64),
    /// Date value
    Date(NaiveDate),
    /// DateTime value
    DateTime(NaiveDateTime),
    /// Binary value (hex or base64 decoded)
    Binary(Vec<u8>),
}

enum Number {
    Integer(i64),
    Decimal(Decimal),
    Float(f64),
}

impl Number {
    fn eq_number(&self, other: &Number) -> bool {
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) => a == b,
            (Number::Decimal(a), Number::Decimal(b)) => a == b,
            (Number::Float(a), Number::Float(b)) => a == b,
            (Number::Integer(i), Number::Decimal(d)) | (Number::Decimal(d), Number::Integer(i)) => {
                Decimal::from(*i) == *d
            }
            // Exact comparisons: a float equals an integer or decimal only when
            // it holds precisely the same number.
            (Number::Integer(i), Number::Float(f)) | (Number::Float(f), Number::Integer(i)) => {
                f.is_finite() && f.fract() == 0.0 && *f as i128 == i128::from(*i)
            }
            (Number::Decimal(d), Number::Float(f)) | (Number::Float(f), Number::Decimal(d)) => {
                Decimal::from_f64_retain(*f) == Some(*d)
            }
        }
    }
}

impl Scalar {
    fn as_number(&self) -> Option<Number> {
        match self {
            Scalar::Integer(i) => Some(Number::Integer(*i)),
            Scalar::Decimal(d) => Some(Number::Decimal(*d)),
            Scalar::Float(f) => Some(Number::Float(*f)),
            _ => None,
        }
    }

    /// Get the string content, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::String(a), Scalar::String(b)) => a == b,
            (Scalar::Boolean(a), Scalar::Boolean(b)) => a == b,
            (Scalar::Date(a), Scalar::Date(b)) => a == b,
            (Scalar::DateTime(a), Scalar::DateTime(b)) => a == b,
            (Scalar::Binary(a), Scalar::Binary(b)) => a == b,
            _ => match (self.as_number(), other.as_number()) {
                (Some(a), Some(b)) => a.eq_number(&b),
                _ => false,
            },
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => write!(f, "{}", s),
            Scalar::Boolean(b) => write!(f, "{}", if *b { "true" } else { "false" }),
            Scalar::Integer(i) => write!(f, "{}", i),
            Scalar::Decimal(d) => write!(f, "{}", d),
            Scalar::Float(v) => {
                if v.is_nan() {
                    write!(f, "NaN")
                } else if *v == f64::INFINITY {
                    write!(f, "INF")
                } else if *v == f64::NEG_INFINITY {
                    write!(f, "-INF")
                } else {
                    write!(f, "{}", v)
                }
            }
            Scalar::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Scalar::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f")),
            Scalar::Binary(b) => {
                for byte in b {
                    write!(f, "{:02X}", byte)?;
                }
                Ok(())
            }
        }
    }
}

/// A field value: scalar leaf, complex composite or bounded sequence
#[derive(Debug, Clone)]
pub enum Value {
    /// Value of a built-in type
    Scalar(Scalar),
    /// Instance of a complex type
    Complex(ComplexValue),
    /// Repeated values of one type
    Sequence(TypedSequence),
}

impl Value {
    /// Short name of the value kind, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "scalar",
            Value::Complex(_) => "complex",
            Value::Sequence(_) => "sequence",
        }
    }

    /// Get the scalar, if this is one
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Get the string content, if this is a string scalar
    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Scalar::as_str)
    }

    /// Get the integer content, if this is an integer scalar
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Scalar(Scalar::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    /// Get the complex instance, if this is one
    pub fn as_complex(&self) -> Option<&ComplexValue> {
        match self {
            Value::Complex(c) => Some(c),
            _ => None,
        }
    }

    /// Get the complex instance mutably, if this is one
    pub fn as_complex_mut(&mut self) -> Option<&mut ComplexValue> {
        match self {
            Value::Complex(c) => Some(c),
            _ => None,
        }
    }

    /// Get the sequence, if this is one
    pub fn as_sequence(&self) -> Option<&TypedSequence> {
        match self {
            Value::Sequence(s) => Some(s),
            _ => None,
        }
    }

    /// Get the sequence mutably, if this is one
    pub fn as_sequence_mut(&mut self) -> Option<&mut TypedSequence> {
        match self {
            Value::Sequence(s) => Some(s),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Scalar(a), Value::Scalar(b)) => a == b,
            (Value::Complex(a), Value::Complex(b)) => a == b,
            (Value::Sequence(a), Value::Sequence(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(s) => write!(f, "{}", s),
            Value::Complex(c) => write!(f, "<{}>", c.complex_type().name()),
            Value::Sequence(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Value::Scalar(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(Scalar::String(s))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Scalar(Scalar::Boolean(b))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Scalar(Scalar::Integer(i))
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Scalar(Scalar::Integer(i64::from(i)))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Scalar(Scalar::Float(v))
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Scalar(Scalar::Decimal(d))
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Scalar(Scalar::Date(d))
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::Scalar(Scalar::DateTime(dt))
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Scalar(Scalar::Binary(b))
    }
}

impl From<ComplexValue> for Value {
    fn from(c: ComplexValue) -> Self {
        Value::Complex(c)
    }
}

impl From<TypedSequence> for Value {
    fn from(s: TypedSequence) -> Self {
        Value::Sequence(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::BuiltinType;
    use std::str::FromStr;

    #[test]
    fn test_numeric_equality_across_representations() {
        assert_eq!(Value::from(1), Value::from(1.0));
        assert_eq!(Value::from(1.0), Value::from(1i64));
        assert_eq!(Value::from(2), Value::from(Decimal::from(2)));
        assert_eq!(
            Value::from(Decimal::from_str("1.5").unwrap()),
            Value::from(1.5)
        );
        assert_ne!(Value::from(1), Value::from(1.5));
    }

    #[test]
    fn test_integer_float_equality_is_exact() {
        let two_53 = 9_007_199_254_740_992i64;
        assert_eq!(Value::from(two_53), Value::from(two_53 as f64));
        assert_ne!(Value::from(two_53 + 1), Value::from(two_53 as f64));
        assert_ne!(Value::from(two_53 as f64), Value::from(two_53 + 1));
        assert_ne!(Value::from(i64::MAX), Value::from(i64::MAX as f64));
        assert_ne!(Value::from(0), Value::from(f64::NAN));
        assert_ne!(Value::from(i64::MAX), Value::from(f64::INFINITY));

        assert_eq!(Value::from(Decimal::from(two_53)), Value::from(two_53 as f64));
        assert_ne!(Value::from(Decimal::from(two_53 + 1)), Value::from(two_53 as f64));
        assert_ne!(Value::from(Decimal::from_str("0.1").unwrap()), Value::from(0.1));
        assert_eq!(Value::from(Decimal::from_str("0.25").unwrap()), Value::from(0.25));
    }

    #[test]
    fn test_kinds_never_cross_compare() {
        assert_ne!(Value::from(true), Value::from(1));
        assert_ne!(Value::from("1"), Value::from(1));

        let empty = Value::from(TypedSequence::new(BuiltinType::Boolean));
        assert_ne!(empty, Value::from(false));
        assert_ne!(Value::from(true), empty);
    }

    #[test]
    fn test_scalar_display() {
        assert_eq!(Value::from("test").to_string(), "test");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::from(42).to_string(), "42");
        assert_eq!(Value::from(f64::NAN).to_string(), "NaN");
        assert_eq!(Value::from(f64::NEG_INFINITY).to_string(), "-INF");
        assert_eq!(Value::from(vec![0x0a, 0xff]).to_string(), "0AFF");
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(Value::from(date).to_string(), "2024-01-15");
    }

    #[test]
    fn test_accessors() {
        let v = Value::from("abc");
        assert_eq!(v.as_str(), Some("abc"));
        assert_eq!(v.as_i64(), None);
        assert_eq!(v.kind(), "scalar");
        assert!(v.as_complex().is_none());
        assert!(v.as_sequence().is_none());
        assert_eq!(Value::from(7).as_i64(), Some(7));
    }
}
