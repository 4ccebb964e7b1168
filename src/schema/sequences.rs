//! Bounded typed sequences
//!
//! A [`TypedSequence`] is an ordered, mutable list whose items all belong to
//! one data type and whose length may be capped. It backs every
//! multi-valued component of a complex type.

use std::fmt;
use std::ops::Index;

use crate::error::{at_path, Error, Result};
use crate::values::Value;

use super::complex_types::ComplexValue;
use super::particles::MaxOccurs;
use super::types::DataType;

/// Ordered list of values of one type, with an optional maximum length
#[derive(Clone)]
pub struct TypedSequence {
    item_type: DataType,
    max_len: MaxOccurs,
    items: Vec<Value>,
}

impl TypedSequence {
    /// Create an unbounded sequence of `item_type`
    pub fn new(item_type: impl Into<DataType>) -> Self {
        Self::with_max_len(item_type, MaxOccurs::Unbounded)
    }

    /// Create a sequence of `item_type` holding at most `max_len` items
    pub fn with_max_len(item_type: impl Into<DataType>, max_len: MaxOccurs) -> Self {
        Self {
            item_type: item_type.into(),
            max_len,
            items: Vec::new(),
        }
    }

    /// Get the contained type
    pub fn item_type(&self) -> &DataType {
        &self.item_type
    }

    /// Get the maximum length
    pub fn max_len(&self) -> MaxOccurs {
        self.max_len
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the sequence has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the item at `index`
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    /// Get the complex item at `index` for in-place field updates
    pub fn get_complex_mut(&mut self, index: usize) -> Option<&mut ComplexValue> {
        self.items.get_mut(index).and_then(Value::as_complex_mut)
    }

    /// Iterate over the items
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    /// View the items as a slice
    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    /// Consume the sequence, returning its items
    pub fn into_items(self) -> Vec<Value> {
        self.items
    }

    fn check_room(&self, additional: usize) -> Result<()> {
        if self.max_len.admits(self.items.len() + additional) {
            Ok(())
        } else {
            Err(Error::OutOfBounds(format!(
                "sequence of {} is limited to {} items",
                self.item_type, self.max_len
            )))
        }
    }

    fn check_item(&self, index: usize, value: Value) -> Result<Value> {
        self.item_type
            .check_value(value)
            .map_err(|e| at_path(e, format!("[{}]", index)))
    }

    /// Insert `value` before `index`; indices past the end append
    pub fn insert(&mut self, index: usize, value: impl Into<Value>) -> Result<()> {
        self.check_room(1)?;
        let index = index.min(self.items.len());
        let value = self.check_item(index, value.into())?;
        self.items.insert(index, value);
        Ok(())
    }

    /// Append `value`
    pub fn push(&mut self, value: impl Into<Value>) -> Result<()> {
        self.insert(self.items.len(), value)
    }

    /// Append every value; nothing is added if any value is rejected
    pub fn extend<I, V>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let incoming: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.check_room(incoming.len())?;
        let start = self.items.len();
        let checked = incoming
            .into_iter()
            .enumerate()
            .map(|(offset, value)| self.check_item(start + offset, value))
            .collect::<Result<Vec<_>>>()?;
        self.items.extend(checked);
        Ok(())
    }

    /// Replace the item at `index`; the length never changes
    pub fn set(&mut self, index: usize, value: impl Into<Value>) -> Result<()> {
        if index >= self.items.len() {
            return Err(Error::OutOfBounds(format!(
                "index {} out of range for sequence of length {}",
                index,
                self.items.len()
            )));
        }
        let value = self.check_item(index, value.into())?;
        self.items[index] = value;
        Ok(())
    }

    /// Remove and return the item at `index`
    pub fn remove(&mut self, index: usize) -> Result<Value> {
        if index >= self.items.len() {
            return Err(Error::OutOfBounds(format!(
                "index {} out of range for sequence of length {}",
                index,
                self.items.len()
            )));
        }
        Ok(self.items.remove(index))
    }

    /// Remove all items
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl PartialEq for TypedSequence {
    fn eq(&self, other: &Self) -> bool {
        self.item_type == other.item_type && self.items == other.items
    }
}

impl PartialEq<[Value]> for TypedSequence {
    fn eq(&self, other: &[Value]) -> bool {
        self.items.as_slice() == other
    }
}

impl PartialEq<Vec<Value>> for TypedSequence {
    fn eq(&self, other: &Vec<Value>) -> bool {
        self.items == *other
    }
}

impl PartialEq<Value> for TypedSequence {
    fn eq(&self, other: &Value) -> bool {
        match other {
            Value::Sequence(seq) => self == seq,
            _ => false,
        }
    }
}

impl Index<usize> for TypedSequence {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        &self.items[index]
    }
}

impl<'a> IntoIterator for &'a TypedSequence {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl fmt::Debug for TypedSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}
