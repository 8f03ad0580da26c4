//! Dynamically-typed property values
//!
//! External services deliver properties as loosely typed dictionaries.
//! `PropertyValue` closes that set to the shapes that actually occur so
//! comparison and validation happen on plain Rust data.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single property value as delivered by an external service
///
/// Deserializes from any JSON-shaped payload without a type tag, `null`
/// included. Equality is structural, so two separately decoded payloads
/// with the same content compare equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Explicit absence; consumers decide whether to skip it
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<PropertyValue>),
    Dictionary(BTreeMap<String, PropertyValue>),
}

/// The variant of a `PropertyValue`, used for expected-type checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    List,
    Dictionary,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::List => "list",
            ValueKind::Dictionary => "dictionary",
        };
        f.write_str(name)
    }
}

impl PropertyValue {
    /// The variant of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            PropertyValue::Null => ValueKind::Null,
            PropertyValue::Bool(_) => ValueKind::Bool,
            PropertyValue::Number(_) => ValueKind::Number,
            PropertyValue::String(_) => ValueKind::String,
            PropertyValue::List(_) => ValueKind::List,
            PropertyValue::Dictionary(_) => ValueKind::Dictionary,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[PropertyValue]> {
        match self {
            PropertyValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dictionary(&self) -> Option<&BTreeMap<String, PropertyValue>> {
        match self {
            PropertyValue::Dictionary(map) => Some(map),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Bool(b)
    }
}

impl From<f64> for PropertyValue {
    fn from(n: f64) -> Self {
        PropertyValue::Number(n)
    }
}

impl From<i32> for PropertyValue {
    fn from(n: i32) -> Self {
        PropertyValue::Number(f64::from(n))
    }
}

impl<T: Into<PropertyValue>> From<Vec<T>> for PropertyValue {
    fn from(items: Vec<T>) -> Self {
        PropertyValue::List(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_untagged_shapes() {
        let json = r#"{"State": "online", "Strength": 72, "Connectable": true,
                       "Nameservers": ["8.8.8.8"], "Provider": {"Type": "l2tp"}}"#;
        let map: BTreeMap<String, PropertyValue> = serde_json::from_str(json).unwrap();

        assert_eq!(map["State"], PropertyValue::String("online".into()));
        assert_eq!(map["Strength"], PropertyValue::Number(72.0));
        assert_eq!(map["Connectable"], PropertyValue::Bool(true));
        assert_eq!(map["Nameservers"].kind(), ValueKind::List);
        assert_eq!(map["Provider"].kind(), ValueKind::Dictionary);
    }

    #[test]
    fn test_deserialize_null() {
        let json = r#"{"Name": "home", "Proxy": null, "Domains": ["lan", null]}"#;
        let map: BTreeMap<String, PropertyValue> = serde_json::from_str(json).unwrap();

        assert_eq!(map["Name"].as_str(), Some("home"));
        assert!(map["Proxy"].is_null());
        assert_eq!(map["Proxy"].kind(), ValueKind::Null);
        assert_eq!(
            map["Domains"],
            PropertyValue::List(vec!["lan".into(), PropertyValue::Null])
        );
        assert_eq!(serde_json::to_string(&PropertyValue::Null).unwrap(), "null");
    }

    #[test]
    fn test_equality_is_by_content() {
        let a: PropertyValue = vec!["a", "b"].into();
        let b = PropertyValue::List(vec!["a".into(), "b".into()]);
        assert_eq!(a, b);
        assert_ne!(a, PropertyValue::List(vec!["b".into(), "a".into()]));
    }

    #[test]
    fn test_accessors_reject_other_variants() {
        let value = PropertyValue::from("wifi");
        assert_eq!(value.as_str(), Some("wifi"));
        assert_eq!(value.as_bool(), None);
        assert_eq!(value.as_f64(), None);
        assert!(value.as_list().is_none());
    }

    #[test]
    fn test_value_kind_display() {
        assert_eq!(ValueKind::Dictionary.to_string(), "dictionary");
        assert_eq!(PropertyValue::from(3).kind().to_string(), "number");
    }
}
