//! Payload: the untyped tree carried by an event.
//!
//! Hosts hand events over as JSON-like data with no schema. `Payload` is the
//! closed union the binding walks; every lookup is total and returns `None`
//! instead of failing, so a payload that does not match a path is simply a
//! miss.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::config::BindingConfig;
use crate::path::PathKey;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Array(Vec<Payload>),
    Object(HashMap<String, Payload>),
}

impl Payload {
    /// Build an object payload from `(key, value)` pairs.
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Payload)>,
    {
        Payload::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn field(&self, name: &str) -> Option<&Payload> {
        match self {
            Payload::Object(map) => map.get(name),
            _ => None,
        }
    }

    pub fn index(&self, index: usize) -> Option<&Payload> {
        match self {
            Payload::Array(items) => items.get(index),
            _ => None,
        }
    }

    /// Numeric view of a scalar. Booleans and numeric-looking text are not numbers.
    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Payload::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Payload::Array(_) | Payload::Object(_))
    }

    /// Descend one level using `key`.
    pub fn child(&self, key: &PathKey, config: &BindingConfig) -> Option<&Payload> {
        match (self, key) {
            (Payload::Object(map), PathKey::Field(name)) => map.get(name.as_str()),
            (Payload::Object(map), PathKey::Index(i)) => map.get(i.to_string().as_str()),
            (Payload::Array(items), PathKey::Index(i)) => items.get(*i),
            (Payload::Array(items), PathKey::Field(name)) if config.index_numeric_keys => {
                canonical_index(name).and_then(|i| items.get(i))
            }
            _ => None,
        }
    }
}

/// Parse an array index written in plain decimal form: `"0"`, or digits with
/// no leading zero. `"01"`, `"+1"` and `"-0"` are ordinary field names.
fn canonical_index(name: &str) -> Option<usize> {
    let plain = name == "0"
        || (!name.is_empty()
            && !name.starts_with('0')
            && name.bytes().all(|b| b.is_ascii_digit()));
    if plain {
        name.parse().ok()
    } else {
        None
    }
}

/// Walk `keys` from `root` and return the number found at the end.
///
/// Returns `None` for a missing field, an out-of-range index, a scalar where a
/// container is needed, a non-numeric terminal, or a non-finite number the
/// config rejects.
pub fn resolve_number(root: &Payload, keys: &[PathKey], config: &BindingConfig) -> Option<f64> {
    keys.iter()
        .try_fold(root, |node, key| node.child(key, config))
        .and_then(Payload::as_number)
        .and_then(|n| config.admit(n))
}

impl From<JsonValue> for Payload {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Payload::Null,
            JsonValue::Bool(b) => Payload::Bool(b),
            JsonValue::Number(n) => n.as_f64().map(Payload::Number).unwrap_or(Payload::Null),
            JsonValue::String(s) => Payload::Text(s),
            JsonValue::Array(arr) => Payload::Array(arr.into_iter().map(Payload::from).collect()),
            JsonValue::Object(obj) => Payload::Object(
                obj.into_iter()
                    .map(|(k, v)| (k, Payload::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<f64> for Payload {
    fn from(value: f64) -> Self {
        Payload::Number(value)
    }
}

impl From<bool> for Payload {
    fn from(value: bool) -> Self {
        Payload::Bool(value)
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Payload::Text(value.to_string())
    }
}

impl From<Vec<Payload>> for Payload {
    fn from(value: Vec<Payload>) -> Self {
        Payload::Array(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keys(raw: &[&str]) -> Vec<PathKey> {
        raw.iter().map(|s| PathKey::Field(s.to_string())).collect()
    }

    #[test]
    fn from_json_keeps_structure() {
        let p = Payload::from(json!({ "a": [1, true, "x", null], "b": { "c": 2.5 } }));
        assert_eq!(p.field("b").and_then(|b| b.field("c")), Some(&Payload::Number(2.5)));
        let a = p.field("a").unwrap();
        assert_eq!(a.index(0), Some(&Payload::Number(1.0)));
        assert_eq!(a.index(1), Some(&Payload::Bool(true)));
        assert_eq!(a.index(2), Some(&Payload::Text("x".into())));
        assert_eq!(a.index(3), Some(&Payload::Null));
        assert!(a.index(4).is_none());
    }

    #[test]
    fn deserializes_directly() {
        let p: Payload = serde_json::from_str(r#"{ "touches": [{ "pageX": 10 }] }"#).unwrap();
        let cfg = BindingConfig::default();
        assert_eq!(resolve_number(&p, &keys(&["touches", "0", "pageX"]), &cfg), Some(10.0));
    }

    #[test]
    fn lookups_on_scalars_miss() {
        let p = Payload::Number(3.0);
        assert!(p.field("x").is_none());
        assert!(p.index(0).is_none());
        assert!(!p.is_container());
        assert!(Payload::Bool(true).as_number().is_none());
        assert!(Payload::Text("4".into()).as_number().is_none());
    }

    #[test]
    fn index_key_reads_numeric_object_field() {
        let p = Payload::from(json!({ "0": 7 }));
        let cfg = BindingConfig::default();
        assert_eq!(resolve_number(&p, &[PathKey::Index(0)], &cfg), Some(7.0));
    }

    #[test]
    fn numeric_field_indexing_can_be_disabled() {
        let p = Payload::from(json!([4, 5]));
        let cfg = BindingConfig {
            index_numeric_keys: false,
            ..BindingConfig::default()
        };
        assert_eq!(resolve_number(&p, &keys(&["1"]), &cfg), None);
        assert_eq!(resolve_number(&p, &[PathKey::Index(1)], &cfg), Some(5.0));
    }

    #[test]
    fn non_canonical_numeric_keys_do_not_index() {
        let p = Payload::from(json!([4, 5]));
        let cfg = BindingConfig::default();
        assert_eq!(resolve_number(&p, &keys(&["1"]), &cfg), Some(5.0));
        assert_eq!(resolve_number(&p, &keys(&["0"]), &cfg), Some(4.0));
        for key in ["01", "+1", "-0", "00", " 1", "1.0"] {
            assert_eq!(resolve_number(&p, &keys(&[key]), &cfg), None, "key {key:?}");
        }
    }

    #[test]
    fn descending_through_scalar_misses() {
        let p = Payload::from(json!({ "a": 1 }));
        let cfg = BindingConfig::default();
        assert_eq!(resolve_number(&p, &keys(&["a", "b"]), &cfg), None);
    }
}
