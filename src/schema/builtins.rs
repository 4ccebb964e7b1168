//! XSD built-in types
//!
//! This module defines the built-in scalar types that can be used for
//! attributes, elements and sequence items. Each type implements the
//! `check_value` contract: coerce a compatible value or reject it with a
//! validation error.

use base64::Engine;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::fmt;

use crate::error::{Error, Result, ValidationError};
use crate::values::{Scalar, Value};

// =============================================================================
// XSD Type Names
// =============================================================================

/// XSD string type name
pub const XSD_STRING: &str = "string";
/// XSD normalizedString type name
pub const XSD_NORMALIZED_STRING: &str = "normalizedString";
/// XSD token type name
pub const XSD_TOKEN: &str = "token";
/// XSD boolean type name
pub const XSD_BOOLEAN: &str = "boolean";
/// XSD decimal type name
pub const XSD_DECIMAL: &str = "decimal";
/// XSD integer type name
pub const XSD_INTEGER: &str = "integer";
/// XSD nonPositiveInteger type name
pub const XSD_NON_POSITIVE_INTEGER: &str = "nonPositiveInteger";
/// XSD negativeInteger type name
pub const XSD_NEGATIVE_INTEGER: &str = "negativeInteger";
/// XSD long type name
pub const XSD_LONG: &str = "long";
/// XSD int type name
pub const XSD_INT: &str = "int";
/// XSD short type name
pub const XSD_SHORT: &str = "short";
/// XSD byte type name
pub const XSD_BYTE: &str = "byte";
/// XSD nonNegativeInteger type name
pub const XSD_NON_NEGATIVE_INTEGER: &str = "nonNegativeInteger";
/// XSD positiveInteger type name
pub const XSD_POSITIVE_INTEGER: &str = "positiveInteger";
/// XSD unsignedInt type name
pub const XSD_UNSIGNED_INT: &str = "unsignedInt";
/// XSD unsignedShort type name
pub const XSD_UNSIGNED_SHORT: &str = "unsignedShort";
/// XSD unsignedByte type name
pub const XSD_UNSIGNED_BYTE: &str = "unsignedByte";
/// XSD float type name
pub const XSD_FLOAT: &str = "float";
/// XSD double type name
pub const XSD_DOUBLE: &str = "double";
/// XSD date type name
pub const XSD_DATE: &str = "date";
/// XSD dateTime type name
pub const XSD_DATETIME: &str = "dateTime";
/// XSD hexBinary type name
pub const XSD_HEX_BINARY: &str = "hexBinary";
/// XSD base64Binary type name
pub const XSD_BASE64_BINARY: &str = "base64Binary";
/// XSD anyURI type name
pub const XSD_ANY_URI: &str = "anyURI";

/// A built-in scalar type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinType {
    /// xs:string
    String,
    /// xs:normalizedString
    NormalizedString,
    /// xs:token
    Token,
    /// xs:boolean
    Boolean,
    /// xs:decimal
    Decimal,
    /// xs:integer
    Integer,
    /// xs:nonPositiveInteger
    NonPositiveInteger,
    /// xs:negativeInteger
    NegativeInteger,
    /// xs:long
    Long,
    /// xs:int
    Int,
    /// xs:short
    Short,
    /// xs:byte
    Byte,
    /// xs:nonNegativeInteger
    NonNegativeInteger,
    /// xs:positiveInteger
    PositiveInteger,
    /// xs:unsignedInt
    UnsignedInt,
    /// xs:unsignedShort
    UnsignedShort,
    /// xs:unsignedByte
    UnsignedByte,
    /// xs:float (held as f64)
    Float,
    /// xs:double
    Double,
    /// xs:date
    Date,
    /// xs:dateTime (timezones are normalized to UTC)
    DateTime,
    /// xs:hexBinary
    HexBinary,
    /// xs:base64Binary
    Base64Binary,
    /// xs:anyURI
    AnyUri,
}

impl BuiltinType {
    /// All built-in types
    pub const ALL: [BuiltinType; 24] = [
        BuiltinType::String,
        BuiltinType::NormalizedString,
        BuiltinType::Token,
        BuiltinType::Boolean,
        BuiltinType::Decimal,
        BuiltinType::Integer,
        BuiltinType::NonPositiveInteger,
        BuiltinType::NegativeInteger,
        BuiltinType::Long,
        BuiltinType::Int,
        BuiltinType::Short,
        BuiltinType::Byte,
        BuiltinType::NonNegativeInteger,
        BuiltinType::PositiveInteger,
        BuiltinType::UnsignedInt,
        BuiltinType::UnsignedShort,
        BuiltinType::UnsignedByte,
        BuiltinType::Float,
        BuiltinType::Double,
        BuiltinType::Date,
        BuiltinType::DateTime,
        BuiltinType::HexBinary,
        BuiltinType::Base64Binary,
        BuiltinType::AnyUri,
    ];

    /// Get the XSD local name of the type (e.g. `positiveInteger`)
    pub fn xsd_name(&self) -> &'static str {
        match self {
            BuiltinType::String => XSD_STRING,
            BuiltinType::NormalizedString => XSD_NORMALIZED_STRING,
            BuiltinType::Token => XSD_TOKEN,
            BuiltinType::Boolean => XSD_BOOLEAN,
            BuiltinType::Decimal => XSD_DECIMAL,
            BuiltinType::Integer => XSD_INTEGER,
            BuiltinType::NonPositiveInteger => XSD_NON_POSITIVE_INTEGER,
            BuiltinType::NegativeInteger => XSD_NEGATIVE_INTEGER,
            BuiltinType::Long => XSD_LONG,
            BuiltinType::Int => XSD_INT,
            BuiltinType::Short => XSD_SHORT,
            BuiltinType::Byte => XSD_BYTE,
            BuiltinType::NonNegativeInteger => XSD_NON_NEGATIVE_INTEGER,
            BuiltinType::PositiveInteger => XSD_POSITIVE_INTEGER,
            BuiltinType::UnsignedInt => XSD_UNSIGNED_INT,
            BuiltinType::UnsignedShort => XSD_UNSIGNED_SHORT,
            BuiltinType::UnsignedByte => XSD_UNSIGNED_BYTE,
            BuiltinType::Float => XSD_FLOAT,
            BuiltinType::Double => XSD_DOUBLE,
            BuiltinType::Date => XSD_DATE,
            BuiltinType::DateTime => XSD_DATETIME,
            BuiltinType::HexBinary => XSD_HEX_BINARY,
            BuiltinType::Base64Binary => XSD_BASE64_BINARY,
            BuiltinType::AnyUri => XSD_ANY_URI,
        }
    }

    /// Look up a built-in type by its XSD local name
    pub fn from_xsd_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.xsd_name() == name)
    }

    /// Check if this type is one of the integer types
    pub fn is_integer(&self) -> bool {
        self.integer_bounds().is_some()
    }

    /// Check if this type is numeric
    pub fn is_numeric(&self) -> bool {
        self.is_integer()
            || matches!(
                self,
                BuiltinType::Decimal | BuiltinType::Float | BuiltinType::Double
            )
    }

    fn integer_bounds(&self) -> Option<(i64, i64)> {
        let bounds = match self {
            BuiltinType::Integer | BuiltinType::Long => (i64::MIN, i64::MAX),
            BuiltinType::NonPositiveInteger => (i64::MIN, 0),
            BuiltinType::NegativeInteger => (i64::MIN, -1),
            BuiltinType::Int => (i64::from(i32::MIN), i64::from(i32::MAX)),
            BuiltinType::Short => (i64::from(i16::MIN), i64::from(i16::MAX)),
            BuiltinType::Byte => (i64::from(i8::MIN), i64::from(i8::MAX)),
            BuiltinType::NonNegativeInteger => (0, i64::MAX),
            BuiltinType::PositiveInteger => (1, i64::MAX),
            BuiltinType::UnsignedInt => (0, i64::from(u32::MAX)),
            BuiltinType::UnsignedShort => (0, i64::from(u16::MAX)),
            BuiltinType::UnsignedByte => (0, i64::from(u8::MAX)),
            _ => return None,
        };
        Some(bounds)
    }

    /// Validate `value` against this type, returning the coerced value
    pub fn check_value(&self, value: Value) -> Result<Value> {
        let scalar = match value {
            Value::Scalar(scalar) => scalar,
            other => {
                return Err(self.mismatch(&other, format!("a {} value is not a scalar", other.kind())))
            }
        };

        let checked = match self {
            BuiltinType::String => Scalar::String(self.expect_string(scalar)?),
            BuiltinType::NormalizedString => {
                let s = self.expect_string(scalar)?;
                Scalar::String(s.replace(['\t', '\n', '\r'], " "))
            }
            BuiltinType::Token => {
                let s = self.expect_string(scalar)?;
                Scalar::String(s.split_whitespace().collect::<Vec<_>>().join(" "))
            }
            BuiltinType::AnyUri => {
                let s = self.expect_string(scalar)?;
                let trimmed = s.trim();
                match url::Url::parse(trimmed) {
                    Ok(_) | Err(url::ParseError::RelativeUrlWithoutBase) => {
                        Scalar::String(trimmed.to_string())
                    }
                    Err(e) => return Err(self.mismatch(&s, e.to_string())),
                }
            }
            BuiltinType::Boolean => Scalar::Boolean(self.to_boolean(scalar)?),
            BuiltinType::Decimal => Scalar::Decimal(self.to_decimal(scalar)?),
            BuiltinType::Float | BuiltinType::Double => Scalar::Float(self.to_float(scalar)?),
            BuiltinType::Date => Scalar::Date(self.to_date(scalar)?),
            BuiltinType::DateTime => Scalar::DateTime(self.to_datetime(scalar)?),
            BuiltinType::HexBinary => Scalar::Binary(self.to_hex_binary(scalar)?),
            BuiltinType::Base64Binary => Scalar::Binary(self.to_base64_binary(scalar)?),
            _ => Scalar::Integer(self.to_integer(scalar)?),
        };
        Ok(Value::Scalar(checked))
    }

    /// Render a scalar in the lexical form of this type
    pub fn render(&self, scalar: &Scalar) -> String {
        match (self, scalar) {
            (BuiltinType::Base64Binary, Scalar::Binary(bytes)) => {
                base64::engine::general_purpose::STANDARD.encode(bytes)
            }
            (_, scalar) => scalar.to_string(),
        }
    }

    fn mismatch(&self, value: &impl fmt::Display, reason: impl Into<String>) -> Error {
        ValidationError::new(format!("'{}' is not a valid {}", value, self))
            .with_reason(reason)
            .into()
    }

    fn expect_string(&self, scalar: Scalar) -> Result<String> {
        match scalar {
            Scalar::String(s) => Ok(s),
            other => Err(self.mismatch(&other, "expected a string")),
        }
    }

    fn to_boolean(&self, scalar: Scalar) -> Result<bool> {
        match scalar {
            Scalar::Boolean(b) => Ok(b),
            Scalar::String(ref s) => match s.trim() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                _ => Err(self.mismatch(&scalar, "expected one of 'true', 'false', '1', '0'")),
            },
            other => Err(self.mismatch(&other, "expected a boolean")),
        }
    }

    fn to_integer(&self, scalar: Scalar) -> Result<i64> {
        let value = match scalar {
            Scalar::Integer(i) => i,
            Scalar::Float(f) if f.is_finite() && f.fract() == 0.0 => f
                .to_i64()
                .ok_or_else(|| self.mismatch(&scalar, "value out of range"))?,
            Scalar::Decimal(d) if d.fract().is_zero() => d
                .to_i64()
                .ok_or_else(|| self.mismatch(&scalar, "value out of range"))?,
            Scalar::String(ref s) => s
                .trim()
                .parse::<i64>()
                .map_err(|e| self.mismatch(&scalar, e.to_string()))?,
            other => return Err(self.mismatch(&other, "expected an integral number")),
        };

        let (min, max) = self.integer_bounds().unwrap_or((i64::MIN, i64::MAX));
        if !(min..=max).contains(&value) {
            return Err(self.mismatch(&value, format!("value must be {} <= x <= {}", min, max)));
        }
        Ok(value)
    }

    fn to_decimal(&self, scalar: Scalar) -> Result<Decimal> {
        match scalar {
            Scalar::Decimal(d) => Ok(d),
            Scalar::Integer(i) => Ok(Decimal::from(i)),
            Scalar::Float(f) => {
                Decimal::from_f64(f).ok_or_else(|| self.mismatch(&scalar, "not a finite number"))
            }
            Scalar::String(ref s) => s
                .trim()
                .parse::<Decimal>()
                .map_err(|e| self.mismatch(&scalar, e.to_string())),
            other => Err(self.mismatch(&other, "expected a decimal number")),
        }
    }

    fn to_float(&self, scalar: Scalar) -> Result<f64> {
        match scalar {
            Scalar::Float(f) => Ok(f),
            Scalar::Integer(i) => Ok(i as f64),
            Scalar::Decimal(d) => d
                .to_f64()
                .ok_or_else(|| self.mismatch(&scalar, "value out of range")),
            Scalar::String(ref s) => {
                let t = s.trim();
                match t {
                    "INF" => Ok(f64::INFINITY),
                    "-INF" => Ok(f64::NEG_INFINITY),
                    "NaN" => Ok(f64::NAN),
                    _ if t
                        .chars()
                        .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') =>
                    {
                        Err(self.mismatch(&scalar, "special values are INF, -INF and NaN"))
                    }
                    _ => t
                        .parse::<f64>()
                        .map_err(|e| self.mismatch(&scalar, e.to_string())),
                }
            }
            other => Err(self.mismatch(&other, "expected a number")),
        }
    }

    fn to_date(&self, scalar: Scalar) -> Result<NaiveDate> {
        match scalar {
            Scalar::Date(d) => Ok(d),
            Scalar::String(ref s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .map_err(|e| self.mismatch(&scalar, e.to_string())),
            other => Err(self.mismatch(&other, "expected a date")),
        }
    }

    fn to_datetime(&self, scalar: Scalar) -> Result<NaiveDateTime> {
        match scalar {
            Scalar::DateTime(dt) => Ok(dt),
            Scalar::String(ref s) => {
                let t = s.trim();
                NaiveDateTime::parse_from_str(t, "%Y-%m-%dT%H:%M:%S%.f")
                    .or_else(|_| DateTime::parse_from_rfc3339(t).map(|dt| dt.naive_utc()))
                    .map_err(|e| self.mismatch(&scalar, e.to_string()))
            }
            other => Err(self.mismatch(&other, "expected a dateTime")),
        }
    }

    fn to_hex_binary(&self, scalar: Scalar) -> Result<Vec<u8>> {
        match scalar {
            Scalar::Binary(b) => Ok(b),
            Scalar::String(ref s) => {
                let t = s.trim();
                if t.len() % 2 != 0 || !t.is_ascii() {
                    return Err(self.mismatch(&scalar, "expected an even number of hex digits"));
                }
                (0..t.len())
                    .step_by(2)
                    .map(|i| u8::from_str_radix(&t[i..i + 2], 16))
                    .collect::<std::result::Result<Vec<u8>, _>>()
                    .map_err(|e| self.mismatch(&scalar, e.to_string()))
            }
            other => Err(self.mismatch(&other, "expected binary data")),
        }
    }

    fn to_base64_binary(&self, scalar: Scalar) -> Result<Vec<u8>> {
        match scalar {
            Scalar::Binary(b) => Ok(b),
            Scalar::String(ref s) => {
                let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
                base64::engine::general_purpose::STANDARD
                    .decode(compact)
                    .map_err(|e| self.mismatch(&scalar, e.to_string()))
            }
            other => Err(self.mismatch(&other, "expected binary data")),
        }
    }
}

impl fmt::Display for BuiltinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(ty: BuiltinType, value: impl Into<Value>) -> Result<Value> {
        ty.check_value(value.into())
    }

    #[test]
    fn test_string_types() {
        assert_eq!(check(BuiltinType::String, "Hello World").unwrap(), Value::from("Hello World"));
        assert_eq!(
            check(BuiltinType::NormalizedString, "a\tb\nc").unwrap(),
            Value::from("a b c")
        );
        assert_eq!(
            check(BuiltinType::Token, "  a   b \n c ").unwrap(),
            Value::from("a b c")
        );
        assert!(check(BuiltinType::String, 5).unwrap_err().is_validation());
    }

    #[test]
    fn test_boolean_type() {
        assert_eq!(check(BuiltinType::Boolean, "true").unwrap(), Value::from(true));
        assert_eq!(check(BuiltinType::Boolean, "0").unwrap(), Value::from(false));
        assert_eq!(check(BuiltinType::Boolean, false).unwrap(), Value::from(false));
        assert!(check(BuiltinType::Boolean, "yes").is_err());
    }

    #[test]
    fn test_integer_coercion() {
        assert_eq!(check(BuiltinType::Integer, 1).unwrap().as_i64(), Some(1));
        assert_eq!(check(BuiltinType::Integer, "3").unwrap().as_i64(), Some(3));
        assert_eq!(check(BuiltinType::Integer, 1.0).unwrap().as_i64(), Some(1));
        assert!(check(BuiltinType::Integer, "a").unwrap_err().is_validation());
        assert!(check(BuiltinType::Integer, 1.5).is_err());
        assert!(check(BuiltinType::Integer, true).is_err());
    }

    #[test]
    fn test_integer_bounds() {
        assert!(check(BuiltinType::Byte, 127).is_ok());
        assert!(check(BuiltinType::Byte, 128).is_err());
        assert!(check(BuiltinType::Byte, -128).is_ok());
        assert!(check(BuiltinType::UnsignedByte, 255).is_ok());
        assert!(check(BuiltinType::UnsignedByte, -1).is_err());
        assert!(check(BuiltinType::PositiveInteger, 1).is_ok());
        assert!(check(BuiltinType::PositiveInteger, 0).is_err());
        assert!(check(BuiltinType::NegativeInteger, -1).is_ok());
        assert!(check(BuiltinType::NegativeInteger, 0).is_err());
        assert!(check(BuiltinType::NonPositiveInteger, 0).is_ok());
        assert!(check(BuiltinType::UnsignedInt, 4_294_967_295i64).is_ok());
        assert!(check(BuiltinType::UnsignedInt, 4_294_967_296i64).is_err());
    }

    #[test]
    fn test_decimal_and_float() {
        let d = check(BuiltinType::Decimal, "123.456").unwrap();
        assert_eq!(d, Value::from("123.456".parse::<Decimal>().unwrap()));
        assert_eq!(check(BuiltinType::Decimal, 7).unwrap(), Value::from(7));
        assert!(check(BuiltinType::Decimal, "abc").is_err());
        assert!(check(BuiltinType::Decimal, f64::NAN).is_err());

        assert_eq!(check(BuiltinType::Double, "1.23e10").unwrap(), Value::from(1.23e10));
        assert_eq!(check(BuiltinType::Float, 2).unwrap(), Value::from(2.0));
        assert_eq!(check(BuiltinType::Float, "INF").unwrap(), Value::from(f64::INFINITY));
        assert!(check(BuiltinType::Float, "inf").is_err());
        assert!(check(BuiltinType::Float, "infinity").is_err());
    }

    #[test]
    fn test_date_types() {
        let date = check(BuiltinType::Date, "2024-01-15").unwrap();
        assert_eq!(date.to_string(), "2024-01-15");
        assert!(check(BuiltinType::Date, "15/01/2024").is_err());

        let dt = check(BuiltinType::DateTime, "2024-01-15T10:30:00").unwrap();
        assert_eq!(dt.to_string(), "2024-01-15T10:30:00");
        let utc = check(BuiltinType::DateTime, "2024-01-15T10:30:00+02:00").unwrap();
        assert_eq!(utc.to_string(), "2024-01-15T08:30:00");
        assert!(check(BuiltinType::DateTime, "invalid").is_err());
    }

    #[test]
    fn test_binary_types() {
        let hex = check(BuiltinType::HexBinary, "0A1b2C").unwrap();
        assert_eq!(hex, Value::from(vec![0x0a, 0x1b, 0x2c]));
        assert!(check(BuiltinType::HexBinary, "GH").is_err());
        assert!(check(BuiltinType::HexBinary, "ABC").is_err());

        let b64 = check(BuiltinType::Base64Binary, "SGVsbG8=").unwrap();
        assert_eq!(b64, Value::from(b"Hello".to_vec()));
        if let Value::Scalar(scalar) = &b64 {
            assert_eq!(BuiltinType::Base64Binary.render(scalar), "SGVsbG8=");
            assert_eq!(BuiltinType::HexBinary.render(scalar), "48656C6C6F");
        }
    }

    #[test]
    fn test_any_uri() {
        assert!(check(BuiltinType::AnyUri, "http://example.com").is_ok());
        assert!(check(BuiltinType::AnyUri, "relative/path").is_ok());
        assert!(check(BuiltinType::AnyUri, "http://[::1").is_err());
    }

    #[test]
    fn test_names() {
        assert_eq!(BuiltinType::PositiveInteger.to_string(), "PositiveInteger");
        assert_eq!(BuiltinType::PositiveInteger.xsd_name(), "positiveInteger");
        assert_eq!(BuiltinType::from_xsd_name("anyURI"), Some(BuiltinType::AnyUri));
        assert_eq!(BuiltinType::from_xsd_name("unknownType"), None);
        assert!(BuiltinType::Short.is_integer());
        assert!(BuiltinType::Double.is_numeric());
        assert!(!BuiltinType::Date.is_numeric());
    }

    #[test]
    fn test_rejects_non_scalars() {
        let seq = crate::schema::TypedSequence::new(BuiltinType::Integer);
        let err = BuiltinType::Integer.check_value(seq.into()).unwrap_err();
        assert!(err.is_validation());
    }
}
