//! Attribute declarations
//!
//! An attribute is a single-valued component rendered as a markup attribute
//! of its owning element, so only built-in scalar types are accepted.

use std::fmt;

use crate::error::{Error, Result};
use crate::names::validate_declared_name;
use crate::values::Value;

use super::particles::{Occurs, Particle};
use super::types::DataType;

/// Attribute declaration of a complex type
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// Attribute name
    pub name: String,
    /// Declared type (always a built-in type)
    pub data_type: DataType,
    default: Option<Value>,
}

impl Attribute {
    /// Declare an attribute
    pub fn new(name: impl Into<String>, data_type: impl Into<DataType>) -> Result<Self> {
        let name = name.into();
        let data_type = data_type.into();
        validate_declared_name(&name)?;

        if data_type.is_complex() {
            return Err(Error::Declaration(format!(
                "attribute '{}' cannot have complex type {}",
                name, data_type
            )));
        }

        Ok(Self {
            name,
            data_type,
            default: None,
        })
    }

    /// Get the default value
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Replace the default value
    pub fn set_default(&mut self, default: Option<Value>) {
        self.default = default;
    }

    /// Set the default value
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }
}

impl Particle for Attribute {
    fn occurs(&self) -> Occurs {
        Occurs::once()
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{} ({})", self.name, self.data_type)
    }
}
