//! Change-detecting property storage for a single entity

use std::collections::BTreeMap;

use crate::value::PropertyValue;

/// Keyed property storage for one entity
///
/// Keys are case-sensitive and update independently. Change detection is
/// built in: `set` compares by content and only stores differing values.
///
/// # Example
///
/// ```rust
/// use entity_table::{PropertyBag, PropertyValue};
///
/// let mut bag = PropertyBag::new();
/// assert!(bag.get("State").is_none());
///
/// // First set returns true (value changed)
/// assert!(bag.set("State", PropertyValue::from("idle")));
///
/// // Same value returns false (no change)
/// assert!(!bag.set("State", PropertyValue::from("idle")));
///
/// // Different value returns true
/// assert!(bag.set("State", PropertyValue::from("online")));
/// assert_eq!(bag.get_str("State"), Some("online"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyBag {
    values: BTreeMap<String, PropertyValue>,
}

impl PropertyBag {
    /// Create a new empty property bag
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Get a property value by key
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.values.get(key)
    }

    /// Get a string property, `None` if absent or not a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(PropertyValue::as_str)
    }

    /// Get a boolean property, `None` if absent or not a bool
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(PropertyValue::as_bool)
    }

    /// Get a numeric property, `None` if absent or not a number
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(PropertyValue::as_f64)
    }

    /// Set a property value, returning whether the value changed
    ///
    /// Returns `true` if the key was absent or held a different value,
    /// `false` if the stored value is already equal.
    pub fn set(&mut self, key: &str, value: PropertyValue) -> bool {
        if self.values.get(key) == Some(&value) {
            return false;
        }
        self.values.insert(key.to_string(), value);
        true
    }

    /// Remove a property, returning whether it existed
    pub fn remove(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Iterate properties in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}
