//! Data types
//!
//! A [`DataType`] is either a built-in scalar type or a declared complex
//! type. Both sides implement the same contract: `check_value` coerces or
//! rejects a value, and `to_markup` renders a value under a tag.

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::markup::MarkupNode;
use crate::values::Value;

use super::builtins::BuiltinType;
use super::complex_types::{ComplexType, ComplexValue};

/// The declared type of a component, sequence item or top-level element
#[derive(Clone)]
pub enum DataType {
    /// Built-in scalar type
    Builtin(BuiltinType),
    /// Declared complex type
    Complex(Arc<ComplexType>),
}

impl DataType {
    /// Resolve a built-in type from its XSD local name
    pub fn builtin(name: &str) -> Result<Self> {
        BuiltinType::from_xsd_name(name)
            .map(DataType::Builtin)
            .ok_or_else(|| Error::Type(format!("'{}' is not a valid SimpleType or ComplexType", name)))
    }

    /// Get the display name of the type
    pub fn name(&self) -> String {
        self.to_string()
    }

    /// Check if this is a complex type
    pub fn is_complex(&self) -> bool {
        matches!(self, DataType::Complex(_))
    }

    /// Get the complex type, if this is one
    pub fn as_complex(&self) -> Option<&Arc<ComplexType>> {
        match self {
            DataType::Complex(ct) => Some(ct),
            DataType::Builtin(_) => None,
        }
    }

    /// Validate `value` against this type, returning the coerced value
    pub fn check_value(&self, value: Value) -> Result<Value> {
        match self {
            DataType::Builtin(builtin) => builtin.check_value(value),
            DataType::Complex(ct) => ct.check_value(value),
        }
    }

    /// Create an empty instance of this type.
    ///
    /// Only complex types have a zero-argument constructor; scalar types
    /// return `None`.
    pub fn instantiate(&self) -> Option<Value> {
        match self {
            DataType::Complex(ct) => Some(Value::Complex(ComplexValue::new(ct))),
            DataType::Builtin(_) => None,
        }
    }

    /// Render a scalar value as text (used for markup attributes)
    pub(crate) fn render_text(&self, value: &Value) -> Result<String> {
        match (self, value) {
            (DataType::Builtin(builtin), Value::Scalar(scalar)) => Ok(builtin.render(scalar)),
            _ => Err(Error::Type(format!(
                "cannot render a {} value of type {} as text",
                value.kind(),
                self
            ))),
        }
    }

    /// Render a value of this type as a markup node tagged `tag`
    pub(crate) fn to_markup(&self, tag: &str, value: &Value) -> Result<MarkupNode> {
        match (self, value) {
            (DataType::Complex(ct), Value::Complex(instance)) => ct.to_markup(tag, instance),
            (DataType::Builtin(_), Value::Scalar(_)) => {
                Ok(MarkupNode::new(tag).with_text(self.render_text(value)?))
            }
            _ => Err(Error::Type(format!(
                "cannot serialize a {} value as {} element '{}'",
                value.kind(),
                self,
                tag
            ))),
        }
    }
}

impl PartialEq for DataType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (DataType::Builtin(a), DataType::Builtin(b)) => a == b,
            (DataType::Complex(a), DataType::Complex(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Builtin(builtin) => write!(f, "{:?}", builtin),
            DataType::Complex(ct) => write!(f, "ComplexType({})", ct.name()),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Builtin(builtin) => write!(f, "{}", builtin),
            DataType::Complex(ct) => write!(f, "{}", ct.name()),
        }
    }
}

impl From<BuiltinType> for DataType {
    fn from(builtin: BuiltinType) -> Self {
        DataType::Builtin(builtin)
    }
}

impl From<Arc<ComplexType>> for DataType {
    fn from(ct: Arc<ComplexType>) -> Self {
        DataType::Complex(ct)
    }
}

impl From<&Arc<ComplexType>> for DataType {
    fn from(ct: &Arc<ComplexType>) -> Self {
        DataType::Complex(Arc::clone(ct))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Element, ModelGroup};

    #[test]
    fn test_builtin_lookup() {
        assert_eq!(DataType::builtin("integer").unwrap(), BuiltinType::Integer.into());
        assert!(matches!(DataType::builtin("a"), Err(Error::Type(_))));
    }

    #[test]
    fn test_complex_types_compare_by_identity() {
        let build = || {
            ComplexType::builder("Point")
                .content(ModelGroup::sequence([
                    Element::new("x", BuiltinType::Integer).unwrap(),
                    Element::new("y", BuiltinType::Integer).unwrap(),
                ]))
                .build()
                .unwrap()
        };
        let a = build();
        let b = build();
        assert_eq!(DataType::from(&a), DataType::from(&a));
        assert_ne!(DataType::from(&a), DataType::from(&b));
        assert_ne!(DataType::from(&a), DataType::from(BuiltinType::String));
        assert_eq!(DataType::from(&a).to_string(), "Point");
    }

    #[test]
    fn test_instantiate() {
        let ct = ComplexType::builder("Empty").build().unwrap();
        let value = DataType::from(&ct).instantiate().unwrap();
        assert!(value.as_complex().is_some());
        assert!(DataType::from(BuiltinType::String).instantiate().is_none());
    }

    #[test]
    fn test_scalar_to_markup() {
        let node = DataType::from(BuiltinType::Boolean)
            .to_markup("flag", &Value::from(true))
            .unwrap();
        assert_eq!(node.tag(), "flag");
        assert_eq!(node.text(), Some("true"));

        let err = DataType::from(BuiltinType::Boolean).to_markup("flag", &Value::from(
            crate::schema::TypedSequence::new(BuiltinType::Boolean),
        ));
        assert!(matches!(err, Err(Error::Type(_))));
    }
}
