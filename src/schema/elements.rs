//! Element declarations
//!
//! This module provides the [`Element`] declaration, its builder (including
//! derivation from another element by snapshot), and [`TopLevelElement`],
//! which pairs a declaration with a concrete root value for export.

use std::fmt;

use tracing::debug;

use crate::error::{Error, Result};
use crate::json;
use crate::markup::{MarkupConfig, MarkupNode};
use crate::names::validate_declared_name;
use crate::values::Value;

use super::complex_types::ComplexValue;
use super::particles::{MaxOccurs, Occurs, Particle};
use super::sequences::TypedSequence;
use super::types::DataType;

/// Element declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Element name (used as the markup tag)
    pub name: String,
    /// Declared type
    pub data_type: DataType,
    default: Option<Value>,
    /// Occurrence constraints
    pub occurs: Occurs,
}

impl Element {
    /// Declare a single-valued, required element
    pub fn new(name: impl Into<String>, data_type: impl Into<DataType>) -> Result<Self> {
        Self::builder().name(name).data_type(data_type).build()
    }

    /// Start building an element declaration
    pub fn builder() -> ElementBuilder {
        ElementBuilder::new()
    }

    /// Start deriving a new declaration from `source`.
    ///
    /// The source is copied when this is called; later changes to it are not
    /// seen by the derived element.
    pub fn reference(source: &Element) -> ElementBuilder {
        ElementBuilder::new().reference(source)
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

    /// Bind this declaration to a root value
    pub fn instantiate(&self, value: Option<Value>) -> Result<TopLevelElement> {
        TopLevelElement::from_element(self.clone(), value)
    }
}

impl Particle for Element {
    fn occurs(&self) -> Occurs {
        self.occurs
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.data_type)
    }
}

/// Builder for element declarations
#[derive(Debug)]
pub struct ElementBuilder {
    name: Option<String>,
    data_type: Option<DataType>,
    default: Option<Value>,
    min_occurs: Option<u32>,
    max_occurs: Option<MaxOccurs>,
    source: Option<Element>,
}

impl ElementBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            name: None,
            data_type: None,
            default: None,
            min_occurs: None,
            max_occurs: None,
            source: None,
        }
    }

    /// Set the element name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the declared type
    pub fn data_type(mut self, data_type: impl Into<DataType>) -> Self {
        self.data_type = Some(data_type.into());
        self
    }

    /// Set the default value
    pub fn default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Set minOccurs
    pub fn min_occurs(mut self, min: u32) -> Self {
        self.min_occurs = Some(min);
        self
    }

    /// Set maxOccurs
    pub fn max_occurs(mut self, max: MaxOccurs) -> Self {
        self.max_occurs = Some(max);
        self
    }

    /// Set both occurrence bounds
    pub fn occurs(mut self, occurs: Occurs) -> Self {
        self.min_occurs = Some(occurs.min);
        self.max_occurs = Some(occurs.max);
        self
    }

    /// Copy name, type, default and cardinality from `source` for every
    /// field not set explicitly
    pub fn reference(mut self, source: &Element) -> Self {
        self.source = Some(source.clone());
        self
    }

    /// Build the element
    pub fn build(self) -> Result<Element> {
        let source = self.source;
        let name = self
            .name
            .or_else(|| source.as_ref().map(|s| s.name.clone()))
            .ok_or_else(|| Error::Declaration("Name must be provided".to_string()))?;
        let data_type = self
            .data_type
            .or_else(|| source.as_ref().map(|s| s.data_type.clone()))
            .ok_or_else(|| {
                Error::Declaration(format!("Type must be provided for element '{}'", name))
            })?;

        let inherited = source.as_ref().map(|s| s.occurs).unwrap_or_default();
        let occurs = Occurs::new(
            self.min_occurs.unwrap_or(inherited.min),
            self.max_occurs.unwrap_or(inherited.max),
        );
        let default = self.default.or_else(|| source.and_then(|s| s.default));

        validate_declared_name(&name)?;
        occurs.validate()?;

        Ok(Element {
            name,
            data_type,
            default,
            occurs,
        })
    }
}

impl Default for ElementBuilder {
    fn default() -> Self {
        Self::new()
    }
}

const RESERVED: [&str; 4] = ["name", "type", "value", "default"];

/// An element declaration bound to a root value.
///
/// The names `name`, `type`, `value` and `default` always address the
/// element itself, in every accessor. Any other field name is forwarded to
/// the contained complex value, and writing such a field while no value is
/// set first creates an empty instance of the declared complex type.
///
/// A content field that shares a reserved name is reached through the root
/// instance:
///
/// ```rust
/// # use xsdtypes::{BuiltinType, ComplexType, Element, ModelGroup, TopLevelElement, Value};
/// let item = ComplexType::builder("DictionaryItem")
///     .content(ModelGroup::sequence([
///         Element::new("key", BuiltinType::String)?,
///         Element::new("value", BuiltinType::String)?,
///     ]))
///     .build()?;
/// let mut root = TopLevelElement::new("item", &item)?;
/// root.set("key", "foo")?;
/// root.complex_mut("value")?.set("value", "bar")?;
/// assert_eq!(root.get("name")?, Some(&Value::from("item")));
/// # Ok::<(), xsdtypes::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TopLevelElement {
    element: Element,
    // element name as a value, read back through the `name` field
    tag: Value,
    value: Option<Value>,
}

impl TopLevelElement {
    /// Declare a top-level element without a value
    pub fn new(name: impl Into<String>, data_type: impl Into<DataType>) -> Result<Self> {
        Self::from_element(Element::new(name, data_type)?, None)
    }

    /// Declare a top-level element holding `value`
    pub fn with_value(
        name: impl Into<String>,
        data_type: impl Into<DataType>,
        value: impl Into<Value>,
    ) -> Result<Self> {
        Self::from_element(Element::new(name, data_type)?, Some(value.into()))
    }

    /// Bind an existing declaration to `value`
    pub fn from_element(element: Element, value: Option<Value>) -> Result<Self> {
        let mut top = Self {
            tag: Value::from(element.name.as_str()),
            element,
            value: None,
        };
        top.set_value(value)?;
        Ok(top)
    }

    /// Get the element name
    pub fn name(&self) -> &str {
        &self.element.name
    }

    /// Get the declared type
    pub fn data_type(&self) -> &DataType {
        &self.element.data_type
    }

    /// Get the declared default
    pub fn default(&self) -> Option<&Value> {
        self.element.default()
    }

    /// Get the underlying declaration
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// Get the root value
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Replace the root value; a present value must pass the declared type
    pub fn set_value(&mut self, value: Option<Value>) -> Result<()> {
        self.value = match value {
            Some(value) => Some(self.element.data_type.check_value(value)?),
            None => None,
        };
        Ok(())
    }

    fn reserved_error(&self, name: &str) -> Error {
        let reason = match name {
            // a type is a declaration, not a value; read it with `data_type()`
            "type" => "is a declaration and has no value form, use data_type()",
            "name" => "is fixed by the declaration",
            _ => "addresses the element itself, not a field",
        };
        Error::Key(format!(
            "'{}' of element '{}' {}",
            name, self.element.name, reason
        ))
    }

    fn instance_mut(&mut self) -> Result<&mut ComplexValue> {
        if self.value.is_none() {
            let instance = self.element.data_type.instantiate().ok_or_else(|| {
                Error::Type(format!(
                    "element '{}' of simple type {} has no fields",
                    self.element.name, self.element.data_type
                ))
            })?;
            debug!(
                element = %self.element.name,
                data_type = %self.element.data_type,
                "instantiated element value on first write"
            );
            self.value = Some(instance);
        }

        match self.value.as_mut() {
            Some(Value::Complex(instance)) => Ok(instance),
            _ => Err(Error::Type(format!(
                "element '{}' of simple type {} has no fields",
                self.element.name, self.element.data_type
            ))),
        }
    }

    /// Read a field of the contained value.
    ///
    /// `name`, `value` and `default` read the element itself. `type` fails
    /// with [`Error::Key`]. Reading any other field requires a complex value
    /// to be present.
    pub fn get(&mut self, name: &str) -> Result<Option<&Value>> {
        match name {
            "name" => Ok(Some(&self.tag)),
            "value" => Ok(self.value.as_ref()),
            "default" => Ok(self.element.default()),
            "type" => Err(self.reserved_error(name)),
            _ => match self.value.as_mut() {
                Some(Value::Complex(instance)) => instance.get(name),
                Some(other) => Err(Error::Type(format!(
                    "cannot read field '{}' of a {} value",
                    name,
                    other.kind()
                ))),
                None => Err(Error::MissingValue(format!(
                    "element '{}' has no value to read '{}' from",
                    self.element.name, name
                ))),
            },
        }
    }

    /// Get mutable access to a complex field of the contained value.
    ///
    /// `value` yields the root instance itself, creating it if unset.
    pub fn complex_mut(&mut self, name: &str) -> Result<&mut ComplexValue> {
        match name {
            "value" => self.instance_mut(),
            _ if RESERVED.contains(&name) => Err(self.reserved_error(name)),
            _ => self.instance_mut()?.complex_mut(name),
        }
    }

    /// Get mutable access to a multi-valued field of the contained value
    pub fn sequence_mut(&mut self, name: &str) -> Result<&mut TypedSequence> {
        if RESERVED.contains(&name) {
            return Err(self.reserved_error(name));
        }
        self.instance_mut()?.sequence_mut(name)
    }

    /// Write a field of the contained value.
    ///
    /// `value` replaces the root value and `default` replaces the declared
    /// default. `name` and `type` cannot be written. Any other name is
    /// forwarded to the contained complex value.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        match name {
            "value" => self.set_value(Some(value.into())),
            "default" => {
                self.element.set_default(Some(value.into()));
                Ok(())
            }
            "name" | "type" => Err(self.reserved_error(name)),
            _ => self.instance_mut()?.set(name, value),
        }
    }

    /// Build the markup tree of this element
    pub fn to_markup(&self) -> Result<MarkupNode> {
        let value = self.value.as_ref().ok_or_else(|| {
            Error::MissingValue(format!("element '{}' has no value", self.element.name))
        })?;
        self.element.data_type.to_markup(&self.element.name, value)
    }

    /// Render this element as markup text
    pub fn to_text(&self, config: &MarkupConfig) -> Result<String> {
        let text = self.to_markup()?.render(config)?;
        debug!(element = %self.element.name, bytes = text.len(), "rendered element");
        Ok(text)
    }

    /// Export this element as a JSON object `{ name: value }`
    pub fn to_json(&self) -> Result<serde_json::Value> {
        let value = self.value.as_ref().ok_or_else(|| {
            Error::MissingValue(format!("element '{}' has no value", self.element.name))
        })?;
        let mut object = serde_json::Map::new();
        object.insert(
            self.element.name.clone(),
            json::to_json(&self.element.data_type, value)?,
        );
        Ok(serde_json::Value::Object(object))
    }

    /// Export this element as JSON text
    pub fn to_json_string(&self, pretty: bool) -> Result<String> {
        let json = self.to_json()?;
        let text = if pretty {
            serde_json::to_string_pretty(&json)?
        } else {
            serde_json::to_string(&json)?
        };
        Ok(text)
    }
}

impl fmt::Display for TopLevelElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.element)
    }
}
