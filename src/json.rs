//! JSON export
//!
//! Converts typed values to `serde_json` values:
//! - complex values become objects of their effective fields, with
//!   attributes prefixed by `@`
//! - sequences become arrays
//! - booleans and numbers stay native; other scalars use their lexical form

use serde_json::{Map, Number, Value as JsonValue};

use crate::error::{Error, Result};
use crate::schema::DataType;
use crate::values::{Scalar, Value};

/// Prefix for attribute names in exported objects
pub const ATTR_PREFIX: &str = "@";

/// Convert `value`, declared with `data_type`, to JSON
pub fn to_json(data_type: &DataType, value: &Value) -> Result<JsonValue> {
    match value {
        Value::Sequence(items) => items
            .iter()
            .map(|item| to_json(items.item_type(), item))
            .collect::<Result<Vec<_>>>()
            .map(JsonValue::Array),
        Value::Complex(instance) => {
            let mut object = Map::new();
            for (name, component) in instance.complex_type().components() {
                let Some(field) = instance.effective(name, component) else {
                    continue;
                };
                let key = if component.is_attribute() {
                    format!("{}{}", ATTR_PREFIX, name)
                } else {
                    name.clone()
                };
                object.insert(key, to_json(component.data_type(), field)?);
            }
            Ok(JsonValue::Object(object))
        }
        Value::Scalar(scalar) => scalar_to_json(data_type, scalar),
    }
}

fn scalar_to_json(data_type: &DataType, scalar: &Scalar) -> Result<JsonValue> {
    let DataType::Builtin(builtin) = data_type else {
        return Err(Error::Type(format!(
            "cannot export a scalar as complex type {}",
            data_type
        )));
    };

    let json = match scalar {
        Scalar::Boolean(b) => JsonValue::Bool(*b),
        Scalar::Integer(i) => JsonValue::from(*i),
        Scalar::Float(f) => Number::from_f64(*f)
            .map(JsonValue::Number)
            .unwrap_or_else(|| JsonValue::String(builtin.render(scalar))),
        Scalar::Decimal(d) => d
            .to_string()
            .parse::<Number>()
            .map(JsonValue::Number)
            .unwrap_or_else(|_| JsonValue::String(builtin.render(scalar))),
        _ => JsonValue::String(builtin.render(scalar)),
    };
    Ok(json)
}
