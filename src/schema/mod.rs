//! Schema component model
//!
//! This module contains the declarations a complex type is built from and
//! the runtime values they describe:
//! - particles: occurrence constraints (minOccurs/maxOccurs)
//! - builtins: built-in scalar types and their `check_value` rules
//! - types: the `DataType` shared by scalar and complex declarations
//! - attributes / elements: component declarations
//! - groups: sequence and choice content models
//! - complex_types: component tables and instance field storage
//! - sequences: bounded typed sequences for repeated content

pub mod attributes;
pub mod base;
pub mod builtins;
pub mod complex_types;
pub mod elements;
pub mod groups;
pub mod particles;
pub mod sequences;
pub mod types;

pub use attributes::Attribute;
pub use base::Component;
pub use builtins::BuiltinType;
pub use complex_types::{ComplexType, ComplexTypeBuilder, ComplexValue};
pub use elements::{Element, ElementBuilder, TopLevelElement};
pub use groups::{GroupParticle, ModelGroup, ModelType};
pub use particles::{parse_occurs, MaxOccurs, Occurs, Particle, UNBOUNDED};
pub use sequences::TypedSequence;
pub use types::DataType;
