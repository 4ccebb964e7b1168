//! Component descriptors
//!
//! A [`Component`] is the tagged descriptor stored in a complex type's
//! name table: either an attribute or an element declaration. It answers
//! everything the field accessors need to know about a name: its type, its
//! cardinality and how to produce its default.

use crate::values::Value;

use super::attributes::Attribute;
use super::elements::Element;
use super::particles::{Occurs, Particle};
use super::sequences::TypedSequence;
use super::types::DataType;

/// A named, typed declaration belonging to a complex type
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    /// Attribute declaration
    Attribute(Attribute),
    /// Element declaration from the content model
    Element(Element),
}

impl Component {
    /// Get the component name
    pub fn name(&self) -> &str {
        match self {
            Component::Attribute(attr) => &attr.name,
            Component::Element(elem) => &elem.name,
        }
    }

    /// Get the declared type
    pub fn data_type(&self) -> &DataType {
        match self {
            Component::Attribute(attr) => &attr.data_type,
            Component::Element(elem) => &elem.data_type,
        }
    }

    /// Get the declared default value
    pub fn default(&self) -> Option<&Value> {
        match self {
            Component::Attribute(attr) => attr.default(),
            Component::Element(elem) => elem.default(),
        }
    }

    /// Check if this is an attribute
    pub fn is_attribute(&self) -> bool {
        matches!(self, Component::Attribute(_))
    }

    /// Create an empty sequence bounded by this component's maxOccurs
    pub fn empty_sequence(&self) -> TypedSequence {
        TypedSequence::with_max_len(self.data_type().clone(), self.occurs().max)
    }

    /// Produce a fresh, independently owned default for one instance.
    ///
    /// Multi-valued components start as an empty sequence; single-valued
    /// components start as a copy of the declared default, if any.
    pub fn default_value(&self) -> Option<Value> {
        if self.is_multiple() {
            Some(Value::Sequence(self.empty_sequence()))
        } else {
            self.default().cloned()
        }
    }
}

impl Particle for Component {
    fn occurs(&self) -> Occurs {
        match self {
            Component::Attribute(attr) => attr.occurs(),
            Component::Element(elem) => elem.occurs(),
        }
    }
}

impl From<Attribute> for Component {
    fn from(attr: Attribute) -> Self {
        Component::Attribute(attr)
    }
}

impl From<Element> for Component {
    fn from(elem: Element) -> Self {
        Component::Element(elem)
    }
}
