//! Complex types and their instances
//!
//! A [`ComplexType`] is built once from its declared attributes and content
//! model into an ordered name -> [`Component`] table, then shared read-only
//! through an `Arc` by every [`ComplexValue`] created from it.
//!
//! Field access on a `ComplexValue` goes through that table:
//! - reading a stored field returns it as is
//! - reading an unset multi-valued field stores a fresh empty sequence, so
//!   later mutation of it is visible on the next read
//! - reading an unset single-valued field returns the declared default
//!   without storing it
//! - writing a multi-valued field always replaces it with a fresh sequence
//! - unknown names fail immediately

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::error::{at_path, Error, Result, ValidationError};
use crate::markup::MarkupNode;
use crate::names::validate_declared_name;
use crate::values::Value;

use super::attributes::Attribute;
use super::base::Component;
use super::groups::ModelGroup;
use super::particles::Particle;
use super::sequences::TypedSequence;

/// Declared complex type with its flattened component table
#[derive(Debug)]
pub struct ComplexType {
    name: String,
    components: IndexMap<String, Component>,
}

impl ComplexType {
    /// Start declaring a complex type
    pub fn builder(name: impl Into<String>) -> ComplexTypeBuilder {
        ComplexTypeBuilder::new(name)
    }

    /// Get the type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a component by name
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.get(name)
    }

    /// Get the component table: attributes first, then content, in declared order
    pub fn components(&self) -> &IndexMap<String, Component> {
        &self.components
    }

    /// Iterate over attribute declarations
    pub fn attributes(&self) -> impl Iterator<Item = &Component> {
        self.components.values().filter(|c| c.is_attribute())
    }

    /// Iterate over element declarations
    pub fn elements(&self) -> impl Iterator<Item = &Component> {
        self.components.values().filter(|c| !c.is_attribute())
    }

    /// Create an empty instance
    pub fn instantiate(self: &Arc<Self>) -> ComplexValue {
        ComplexValue::new(self)
    }

    fn is_type_of(&self, instance: &ComplexValue) -> bool {
        std::ptr::eq(Arc::as_ptr(&instance.complex_type), self)
    }

    /// Accept only instances of this very type
    pub fn check_value(&self, value: Value) -> Result<Value> {
        let found = match &value {
            Value::Complex(instance) if self.is_type_of(instance) => None,
            Value::Complex(instance) => Some(instance.type_name().to_string()),
            other => Some(other.kind().to_string()),
        };
        match found {
            None => Ok(value),
            Some(found) => Err(ValidationError::new(format!(
                "value of type {} is not a valid {}",
                found, self.name
            ))
            .into()),
        }
    }

    pub(crate) fn to_markup(&self, tag: &str, instance: &ComplexValue) -> Result<MarkupNode> {
        if !self.is_type_of(instance) {
            return Err(Error::Type(format!(
                "cannot serialize a {} as {}",
                instance.type_name(),
                self.name
            )));
        }
        trace!(complex_type = %self.name, tag, "rendering complex value");

        let mut node = MarkupNode::new(tag);
        for (name, component) in &self.components {
            let Some(value) = instance.effective(name, component) else {
                continue;
            };
            let data_type = component.data_type();
            if component.is_attribute() {
                node.set_attribute(name, data_type.render_text(value)?);
                continue;
            }
            match value {
                Value::Sequence(items) => {
                    for item in items {
                        node.push_child(data_type.to_markup(name, item)?);
                    }
                }
                single => node.push_child(data_type.to_markup(name, single)?),
            }
        }
        Ok(node)
    }
}

impl fmt::Display for ComplexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Builder for complex types
#[derive(Debug)]
pub struct ComplexTypeBuilder {
    name: String,
    attributes: Vec<Attribute>,
    content: Option<ModelGroup>,
}

impl ComplexTypeBuilder {
    /// Create a builder for a type named `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            content: None,
        }
    }

    /// Declare an attribute
    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Declare several attributes
    pub fn attributes(mut self, attributes: impl IntoIterator<Item = Attribute>) -> Self {
        self.attributes.extend(attributes);
        self
    }

    /// Set the content model
    pub fn content(mut self, content: ModelGroup) -> Self {
        self.content = Some(content);
        self
    }

    /// Build the component table and publish the type
    pub fn build(self) -> Result<Arc<ComplexType>> {
        validate_declared_name(&self.name)?;

        let mut components = IndexMap::new();
        let elements = match &self.content {
            Some(group) => group.component_dict()?,
            None => IndexMap::new(),
        };
        let declared = self
            .attributes
            .into_iter()
            .map(Component::Attribute)
            .chain(elements.into_values().map(Component::Element));

        for component in declared {
            let name = component.name().to_string();
            if components.insert(name.clone(), component).is_some() {
                return Err(Error::Declaration(format!(
                    "component '{}' is declared more than once in {}",
                    name, self.name
                )));
            }
        }

        debug!(
            complex_type = %self.name,
            components = components.len(),
            "built component table"
        );
        Ok(Arc::new(ComplexType {
            name: self.name,
            components,
        }))
    }
}

fn lookup<'a>(complex_type: &'a ComplexType, name: &str) -> Result<&'a Component> {
    complex_type
        .component(name)
        .ok_or_else(|| Error::UnknownAttribute {
            type_name: complex_type.name.clone(),
            name: name.to_string(),
        })
}

/// Instance of a complex type
#[derive(Clone)]
pub struct ComplexValue {
    complex_type: Arc<ComplexType>,
    fields: HashMap<String, Value>,
}

impl ComplexValue {
    /// Create an empty instance of `complex_type`
    pub fn new(complex_type: &Arc<ComplexType>) -> Self {
        Self {
            complex_type: Arc::clone(complex_type),
            fields: HashMap::new(),
        }
    }

    /// Get the type of this instance
    pub fn complex_type(&self) -> &Arc<ComplexType> {
        &self.complex_type
    }

    /// Get the type name
    pub fn type_name(&self) -> &str {
        &self.complex_type.name
    }

    /// Check if a field has been written or materialized
    pub fn is_stored(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Read a field.
    ///
    /// An unset multi-valued field is materialized as an empty sequence and
    /// stored; an unset single-valued field yields its declared default.
    pub fn get(&mut self, name: &str) -> Result<Option<&Value>> {
        let component = lookup(&self.complex_type, name)?;
        if component.is_multiple() && !self.fields.contains_key(name) {
            trace!(
                complex_type = %self.complex_type.name,
                field = name,
                "materialized multi-valued field"
            );
            self.fields
                .insert(name.to_string(), Value::Sequence(component.empty_sequence()));
        }
        Ok(self.fields.get(name).or_else(|| component.default()))
    }

    /// Read a field without materializing anything
    pub fn field(&self, name: &str) -> Result<Option<&Value>> {
        let component = lookup(&self.complex_type, name)?;
        Ok(self.fields.get(name).or_else(|| {
            if component.is_multiple() {
                None
            } else {
                component.default()
            }
        }))
    }

    fn cardinality_error(&self, name: &str, multiple: bool) -> Error {
        Error::Type(format!(
            "'{}' of {} is {}",
            name,
            self.complex_type.name,
            if multiple { "multi-valued" } else { "single-valued" }
        ))
    }

    /// Get mutable access to a single-valued field of complex type.
    ///
    /// An unset field starts as a copy of its default, or as an empty
    /// instance of its declared type. Nested fields are then written through
    /// [`ComplexValue::set`], so every stored value passes its type check.
    pub fn complex_mut(&mut self, name: &str) -> Result<&mut ComplexValue> {
        let component = lookup(&self.complex_type, name)?;
        if component.is_multiple() {
            return Err(self.cardinality_error(name, true));
        }
        if !component.data_type().is_complex() {
            return Err(Error::Type(format!(
                "'{}' of {} has simple type {}",
                name,
                self.complex_type.name,
                component.data_type()
            )));
        }
        if !self.fields.contains_key(name) {
            let initial = component
                .default_value()
                .or_else(|| component.data_type().instantiate());
            if let Some(initial) = initial {
                self.fields.insert(name.to_string(), initial);
            }
        }
        let type_name = self.complex_type.name.clone();
        self.fields
            .get_mut(name)
            .and_then(Value::as_complex_mut)
            .ok_or_else(|| Error::Type(format!("'{}' of {} is not complex", name, type_name)))
    }

    /// Get mutable access to a multi-valued field, materializing it if unset
    pub fn sequence_mut(&mut self, name: &str) -> Result<&mut TypedSequence> {
        let component = lookup(&self.complex_type, name)?;
        if !component.is_multiple() {
            return Err(self.cardinality_error(name, false));
        }
        if !self.fields.contains_key(name) {
            self.fields
                .insert(name.to_string(), Value::Sequence(component.empty_sequence()));
        }
        let type_name = self.complex_type.name.clone();
        self.fields
            .get_mut(name)
            .and_then(Value::as_sequence_mut)
            .ok_or_else(|| Error::Type(format!("'{}' of {} is not a sequence", name, type_name)))
    }

    /// Write a field.
    ///
    /// Multi-valued fields are replaced by a fresh sequence holding the
    /// items of `value` (or `value` itself when it is not a sequence).
    /// Single-valued fields store the value as coerced by the declared type.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let component = lookup(&self.complex_type, name)?;
        let path = format!("{}.{}", self.complex_type.name, name);

        let stored = if component.is_multiple() {
            let mut items = component.empty_sequence();
            let filled = match value {
                Value::Sequence(source) => items.extend(source.into_items()),
                single => items.push(single),
            };
            filled.map_err(|e| at_path(e, path))?;
            Value::Sequence(items)
        } else {
            component
                .data_type()
                .check_value(value)
                .map_err(|e| at_path(e, path))?
        };

        self.fields.insert(name.to_string(), stored);
        Ok(())
    }

    /// Replace a multi-valued field with `values`
    pub fn set_all<I, V>(&mut self, name: &str, values: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let component = lookup(&self.complex_type, name)?;
        if !component.is_multiple() {
            return Err(self.cardinality_error(name, false));
        }
        let mut items = component.empty_sequence();
        items
            .extend(values)
            .map_err(|e| at_path(e, format!("{}.{}", self.complex_type.name, name)))?;
        self.fields.insert(name.to_string(), Value::Sequence(items));
        Ok(())
    }

    /// Forget a stored field, returning what was stored
    pub fn unset(&mut self, name: &str) -> Result<Option<Value>> {
        lookup(&self.complex_type, name)?;
        Ok(self.fields.remove(name))
    }

    /// Render this instance as a markup node tagged `tag`
    pub fn to_markup(&self, tag: &str) -> Result<MarkupNode> {
        self.complex_type.to_markup(tag, self)
    }

    /// Effective value of a field: stored or default, with empty sequences
    /// counting as absent
    pub(crate) fn effective<'a>(&'a self, name: &str, component: &'a Component) -> Option<&'a Value> {
        match self.fields.get(name) {
            Some(Value::Sequence(items)) if items.is_empty() => None,
            Some(value) => Some(value),
            None if component.is_multiple() => None,
            None => component.default(),
        }
    }
}

impl PartialEq for ComplexValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.complex_type, &other.complex_type)
            && self
                .complex_type
                .components
                .iter()
                .all(|(name, component)| {
                    self.effective(name, component) == other.effective(name, component)
                })
    }
}

impl fmt::Debug for ComplexValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct(&self.complex_type.name);
        for name in self.complex_type.components.keys() {
            if let Some(value) = self.fields.get(name) {
                out.field(name, value);
            }
        }
        out.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{BuiltinType, Element, MaxOccurs, Occurs, UNBOUNDED};

    fn dictionary_item() -> Arc<ComplexType> {
        ComplexType::builder("DictionaryItem")
            .content(ModelGroup::sequence([
                Element::new("key", BuiltinType::String).unwrap(),
                Element::new("value", BuiltinType::String).unwrap(),
            ]))
            .build()
            .unwrap()
    }

    fn order() -> Arc<ComplexType> {
        ComplexType::builder("Order")
            .attribute(
                Attribute::new("currency", BuiltinType::String)
                    .unwrap()
                    .with_default("EUR"),
            )
            .content(ModelGroup::sequence([
                Element::new("customer", BuiltinType::String)
                    .unwrap()
                    .with_default("anonymous"),
                Element::builder()
                    .name("item")
                    .data_type(BuiltinType::Integer)
                    .occurs(Occurs::zero_or_more())
                    .build()
                    .unwrap(),
                Element::builder()
                    .name("note")
                    .data_type(BuiltinType::String)
                    .occurs(Occurs::new(0, MaxOccurs::Bounded(2)))
                    .build()
                    .unwrap(),
            ]))
            .build()
            .unwrap()
    }

    #[test]
    fn test_component_table_order() {
        let ct = order();
        let names: Vec<&str> = ct.components().keys().map(String::as_str).collect();
        assert_eq!(names, ["currency", "customer", "item", "note"]);
        assert_eq!(ct.attributes().count(), 1);
        assert_eq!(ct.elements().count(), 3);
        assert!(std::ptr::eq(ct.components(), ct.instantiate().complex_type().components()));
    }

    #[test]
    fn test_duplicate_components_rejected() {
        let err = ComplexType::builder("Dup")
            .attribute(Attribute::new("id", BuiltinType::String).unwrap())
            .content(ModelGroup::sequence([Element::new("id", BuiltinType::String).unwrap()]))
            .build();
        assert!(matches!(err, Err(Error::Declaration(_))));
        assert!(matches!(ComplexType::builder("1bad").build(), Err(Error::Name(_))));
    }

    #[test]
    fn test_unknown_field() {
        let mut value = dictionary_item().instantiate();
        match value.get("colour") {
            Err(Error::UnknownAttribute { type_name, name }) => {
                assert_eq!(type_name, "DictionaryItem");
                assert_eq!(name, "colour");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(value.set("colour", "red").is_err());
        assert!(value.field("colour").is_err());
        assert!(value.unset("colour").is_err());
    }

    #[test]
    fn test_single_valued_default_is_not_stored() {
        let ct = order();
        let mut a = ct.instantiate();
        let b = ct.instantiate();

        assert_eq!(a.get("customer").unwrap(), Some(&Value::from("anonymous")));
        assert_eq!(a.get("customer").unwrap(), Some(&Value::from("anonymous")));
        assert!(!a.is_stored("customer"));

        a.set("customer", "changed").unwrap();
        assert_eq!(a.field("customer").unwrap(), Some(&Value::from("changed")));
        assert_eq!(b.field("customer").unwrap(), Some(&Value::from("anonymous")));
        assert_eq!(
            ct.component("customer").and_then(Component::default),
            Some(&Value::from("anonymous"))
        );
    }

    #[test]
    fn test_multi_valued_read_materializes() {
        let mut value = order().instantiate();
        assert!(!value.is_stored("item"));
        assert_eq!(value.field("item").unwrap(), None);

        let items = value.get("item").unwrap().and_then(Value::as_sequence).unwrap();
        assert!(items.is_empty());
        assert_eq!(items.max_len(), UNBOUNDED);
        assert!(value.is_stored("item"));

        value.sequence_mut("item").unwrap().push(4).unwrap();
        let items = value.get("item").unwrap().and_then(Value::as_sequence).unwrap();
        assert_eq!(items, &vec![Value::from(4)]);
    }

    #[test]
    fn test_multi_valued_set_replaces() {
        let mut value = order().instantiate();
        value.set("item", 1).unwrap();
        assert_eq!(value.field("item").unwrap().and_then(Value::as_sequence).unwrap(), &vec![Value::from(1)]);

        value.set_all("item", [2, 3]).unwrap();
        assert_eq!(
            value.field("item").unwrap().and_then(Value::as_sequence).unwrap(),
            &vec![Value::from(2), Value::from(3)]
        );

        value.set_all("item", [4]).unwrap();
        assert_eq!(
            value.field("item").unwrap().and_then(Value::as_sequence).unwrap(),
            &vec![Value::from(4)]
        );
    }

    #[test]
    fn test_multi_valued_set_respects_bounds() {
        let mut value = order().instantiate();
        value.set_all("note", ["a", "b"]).unwrap();
        assert!(matches!(
            value.set_all("note", ["a", "b", "c"]),
            Err(Error::OutOfBounds(_))
        ));
        assert_eq!(value.field("note").unwrap().and_then(Value::as_sequence).map(TypedSequence::len), Some(2));
        assert!(matches!(value.sequence_mut("customer"), Err(Error::Type(_))));
    }

    #[test]
    fn test_set_checks_single_values() {
        let mut value = order().instantiate();
        let err = value.set_all("item", [Value::from(1), Value::from("x")]).unwrap_err();
        match err {
            Error::Validation(v) => assert_eq!(v.path.as_deref(), Some("Order.item[1]")),
            other => panic!("unexpected error: {other}"),
        }

        let mut item = dictionary_item().instantiate();
        item.set("key", "foo").unwrap();
        assert!(item.set("key", order().instantiate()).unwrap_err().is_validation());
        assert_eq!(item.field("key").unwrap(), Some(&Value::from("foo")));
    }

    #[test]
    fn test_complex_mut_writes_through_type_checks() {
        let item = dictionary_item();
        let entry = ComplexType::builder("Entry")
            .content(ModelGroup::sequence([
                Element::new("count", BuiltinType::Integer).unwrap(),
                Element::new("item", &item).unwrap(),
            ]))
            .build()
            .unwrap();
        let mut value = entry.instantiate();

        value.complex_mut("item").unwrap().set("key", "foo").unwrap();
        assert!(value
            .complex_mut("item")
            .unwrap()
            .set("key", order().instantiate())
            .unwrap_err()
            .is_validation());
        let nested = value.field("item").unwrap().and_then(Value::as_complex).unwrap();
        assert!(Arc::ptr_eq(nested.complex_type(), &item));
        assert_eq!(nested.field("key").unwrap(), Some(&Value::from("foo")));

        value.set("count", 1).unwrap();
        assert!(matches!(value.complex_mut("count"), Err(Error::Type(_))));
        assert!(value.set("count", "not a number").unwrap_err().is_validation());
        assert_eq!(value.field("count").unwrap(), Some(&Value::from(1)));

        let mut purchase = order().instantiate();
        assert!(matches!(purchase.complex_mut("item"), Err(Error::Type(_))));
        assert!(matches!(purchase.sequence_mut("customer"), Err(Error::Type(_))));
        assert!(matches!(purchase.set_all("customer", ["a"]), Err(Error::Type(_))));
        assert!(!purchase.is_stored("customer"));
    }

    #[test]
    fn test_equality() {
        let ct = dictionary_item();
        let mut a = ct.instantiate();
        let mut b = ct.instantiate();
        assert_eq!(a, b);

        a.set("key", "foo").unwrap();
        assert_ne!(a, b);
        b.set("key", "foo").unwrap();
        assert_eq!(a, b);

        let other = dictionary_item().instantiate();
        assert_ne!(ct.instantiate(), other);

        let mut materialized = order().instantiate();
        let fresh = materialized.clone();
        materialized.get("item").unwrap();
        assert_eq!(materialized, fresh);
    }

    #[test]
    fn test_check_value_by_identity() {
        let ct = dictionary_item();
        assert!(ct.check_value(ct.instantiate().into()).is_ok());
        assert!(ct.check_value(dictionary_item().instantiate().into()).is_err());
        assert!(ct.check_value(Value::from("x")).unwrap_err().is_validation());
    }

    #[test]
    fn test_to_markup() {
        let mut value = order().instantiate();
        value.set_all("item", [1, 2]).unwrap();
        let node = value.to_markup("order").unwrap();

        assert_eq!(node.tag(), "order");
        assert_eq!(node.attributes().get("currency").map(String::as_str), Some("EUR"));
        let tags: Vec<&str> = node.children().iter().map(|c| c.tag()).collect();
        assert_eq!(tags, ["customer", "item", "item"]);
        assert_eq!(node.children()[2].text(), Some("2"));
    }

    #[test]
    fn test_debug_lists_stored_fields() {
        let mut item = dictionary_item().instantiate();
        item.set("value", "bar").unwrap();
        assert_eq!(format!("{:?}", item), r#"DictionaryItem { value: Scalar(String("bar")) }"#);
    }
}
