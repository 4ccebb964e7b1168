//! # xsdtypes
//!
//! Declare XML Schema complex types as typed Rust object graphs and export
//! them as XML or JSON.
//!
//! ## Features
//!
//! - Complex types built from attributes and sequence/choice content models
//! - Per-field type checking and coercion for the XSD built-in types
//! - Default values, with per-instance copies for repeated content
//! - Cardinality-bounded typed sequences for `maxOccurs > 1`
//! - Element declarations derived from other elements by snapshot
//! - Markup export through `quick_xml`, JSON export through `serde_json`
//!
//! ## Example
//!
//! ```rust
//! use xsdtypes::{serialize, BuiltinType, ComplexType, Element, ModelGroup, TopLevelElement};
//!
//! let item = ComplexType::builder("DictionaryItem")
//!     .content(ModelGroup::sequence([
//!         Element::new("key", BuiltinType::String)?,
//!         Element::new("value", BuiltinType::String)?,
//!     ]))
//!     .build()?;
//!
//! let mut entry = item.instantiate();
//! entry.set("key", "foo")?;
//! entry.set("value", "bar")?;
//! let root = TopLevelElement::with_value("item", &item, entry)?;
//!
//! assert_eq!(serialize(&root)?, "<item><key>foo</key><value>bar</value></item>");
//! # Ok::<(), xsdtypes::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod names;
pub mod values;

// Schema component model
pub mod schema;

// Export
pub mod json;
pub mod markup;

// Re-exports for convenience
pub use error::{Error, Result, ValidationError};
pub use markup::{MarkupConfig, MarkupNode};
pub use schema::{
    parse_occurs, Attribute, BuiltinType, Component, ComplexType, ComplexTypeBuilder,
    ComplexValue, DataType, Element, ElementBuilder, GroupParticle, MaxOccurs, ModelGroup,
    ModelType, Occurs, Particle, TopLevelElement, TypedSequence, UNBOUNDED,
};
pub use values::{Scalar, Value};

/// Version of the xsdtypes library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Render a top-level element as compact markup text
pub fn serialize(element: &TopLevelElement) -> Result<String> {
    element.to_text(&MarkupConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_serialize_scalar_element() {
        let element = TopLevelElement::with_value("lastname", BuiltinType::String, "Refnes").unwrap();
        assert_eq!(serialize(&element).unwrap(), "<lastname>Refnes</lastname>");

        let empty = TopLevelElement::new("lastname", BuiltinType::String).unwrap();
        assert!(matches!(serialize(&empty), Err(Error::MissingValue(_))));
    }
}
