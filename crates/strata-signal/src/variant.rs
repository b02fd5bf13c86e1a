//! Generic string-keyed variant dictionary (`a{sv}`).
//!
//! This is the payload shape the modem-manager side speaks: an ordered list
//! of `(key, value)` entries where each value carries its own type. Signal
//! types are converted to and from it in [`crate::signal`] and
//! [`crate::report`].
//!
//! # JSON form
//!
//! When a dictionary has to leave the process as JSON, each value is written
//! as `{"type": <code>, "value": <payload>}` and the dictionary as an object
//! whose members keep insertion order:
//!
//! ```text
//! { "rssi": { "type": "d", "value": -75.0 },
//!   "snr":  { "type": "d", "value": 12.5 } }
//! ```

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Type code of a dictionary, as used in error messages.
pub const DICT_TYPE: &str = "a{sv}";

// ── Variant ─────────────────────────────────────────────────────────

/// A single typed value. There is no implicit numeric coercion between
/// variants: an `Int32` is never read back as a double.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Variant {
    #[serde(rename = "b")]
    Bool(bool),
    #[serde(rename = "i")]
    Int32(i32),
    #[serde(rename = "u")]
    UInt32(u32),
    #[serde(rename = "d")]
    Double(f64),
    #[serde(rename = "s")]
    String(String),
    #[serde(rename = "a{sv}")]
    Dict(VariantDict),
}

impl Variant {
    /// Type code of the held value (`"b"`, `"i"`, `"u"`, `"d"`, `"s"`, `"a{sv}"`).
    pub fn type_code(&self) -> &'static str {
        match self {
            Variant::Bool(_) => "b",
            Variant::Int32(_) => "i",
            Variant::UInt32(_) => "u",
            Variant::Double(_) => "d",
            Variant::String(_) => "s",
            Variant::Dict(_) => DICT_TYPE,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Variant::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Variant::UInt32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Variant::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Variant::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&VariantDict> {
        match self {
            Variant::Dict(v) => Some(v),
            _ => None,
        }
    }
}

impl From<f64> for Variant {
    fn from(v: f64) -> Self {
        Variant::Double(v)
    }
}

impl From<u32> for Variant {
    fn from(v: u32) -> Self {
        Variant::UInt32(v)
    }
}

impl From<bool> for Variant {
    fn from(v: bool) -> Self {
        Variant::Bool(v)
    }
}

impl From<VariantDict> for Variant {
    fn from(v: VariantDict) -> Self {
        Variant::Dict(v)
    }
}

// ── VariantDict ─────────────────────────────────────────────────────

/// Ordered `a{sv}` dictionary.
///
/// Entries keep insertion order. Like the wire format it models, the same key
/// may appear more than once; [`VariantDict::get`] returns the last one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariantDict {
    entries: Vec<(String, Variant)>,
}

impl VariantDict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry without checking for an existing key.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<Variant>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Last value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Variant> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Variant)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<K: Into<String>, V: Into<Variant>> FromIterator<(K, V)> for VariantDict {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dict = VariantDict::new();
        for (k, v) in iter {
            dict.push(k, v);
        }
        dict
    }
}

impl IntoIterator for VariantDict {
    type Item = (String, Variant);
    type IntoIter = std::vec::IntoIter<(String, Variant)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for VariantDict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for VariantDict {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DictVisitor)
    }
}

struct DictVisitor;

impl<'de> Visitor<'de> for DictVisitor {
    type Value = VariantDict;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of string keys to typed variants")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        // Document order and duplicates are both kept.
        while let Some((k, v)) = access.next_entry::<String, Variant>()? {
            entries.push((k, v));
        }
        Ok(VariantDict { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_keeps_insertion_order() {
        let mut dict = VariantDict::new();
        dict.push("snr", 12.5);
        dict.push("rssi", -75.0);
        dict.push("io", -90.0);
        let keys: Vec<&str> = dict.keys().collect();
        assert_eq!(keys, ["snr", "rssi", "io"]);
        assert_eq!(dict.len(), 3);
    }

    #[test]
    fn get_returns_last_duplicate() {
        let mut dict = VariantDict::new();
        dict.push("rssi", -75.0);
        dict.push("rssi", -80.0);
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get("rssi").and_then(Variant::as_f64), Some(-80.0));
        assert!(dict.get("snr").is_none());
    }

    #[test]
    fn accessors_do_not_coerce() {
        assert_eq!(Variant::Double(1.0).as_f64(), Some(1.0));
        assert_eq!(Variant::Int32(1).as_f64(), None);
        assert_eq!(Variant::UInt32(1).as_f64(), None);
        assert_eq!(Variant::Bool(true).as_u32(), None);
        assert_eq!(Variant::String("x".into()).as_str(), Some("x"));
        assert!(Variant::Double(0.0).as_dict().is_none());
    }

    #[test]
    fn type_codes() {
        assert_eq!(Variant::Bool(false).type_code(), "b");
        assert_eq!(Variant::Int32(0).type_code(), "i");
        assert_eq!(Variant::UInt32(0).type_code(), "u");
        assert_eq!(Variant::Double(0.0).type_code(), "d");
        assert_eq!(Variant::String(String::new()).type_code(), "s");
        assert_eq!(Variant::Dict(VariantDict::new()).type_code(), "a{sv}");
    }

    #[test]
    fn json_keeps_order_and_duplicates() {
        let json = r#"{
            "snr":  { "type": "d", "value": 12.5 },
            "rssi": { "type": "d", "value": -75.0 },
            "snr":  { "type": "d", "value": 13.0 }
        }"#;
        let dict: VariantDict = serde_json::from_str(json).unwrap();
        let keys: Vec<&str> = dict.keys().collect();
        assert_eq!(keys, ["snr", "rssi", "snr"]);
        assert_eq!(dict.get("snr").and_then(Variant::as_f64), Some(13.0));
    }

    #[test]
    fn json_shape_of_values() {
        let dict: VariantDict = [
            ("rssi-threshold", Variant::UInt32(5)),
            ("error-rate-threshold", Variant::Bool(true)),
        ]
        .into_iter()
        .collect();
        let value = serde_json::to_value(&dict).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "rssi-threshold": { "type": "u", "value": 5 },
                "error-rate-threshold": { "type": "b", "value": true },
            })
        );
    }

    #[test]
    fn nested_dict_json() {
        let inner: VariantDict = [("rsrp", -101.0)].into_iter().collect();
        let mut outer = VariantDict::new();
        outer.push("lte", inner.clone());
        let text = serde_json::to_string(&outer).unwrap();
        let back: VariantDict = serde_json::from_str(&text).unwrap();
        assert_eq!(back.get("lte").and_then(Variant::as_dict), Some(&inner));
    }

    #[test]
    fn json_rejects_unknown_type_code() {
        let json = r#"{ "rssi": { "type": "q", "value": 1 } }"#;
        assert!(serde_json::from_str::<VariantDict>(json).is_err());
    }
}
