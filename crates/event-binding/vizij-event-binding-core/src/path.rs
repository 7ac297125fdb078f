//! EventPath parsing and formatting.
//!
//! An event path is an ordered, non-empty list of keys that descends from the
//! payload root to one scalar:
//!   ["nativeEvent", "contentOffset", "y"]
//!   ["touches", 0, "pageX"]
//! The dotted string form `nativeEvent.contentOffset.y` is accepted as well.
//! Numeric string keys stay field keys; resolution decides whether they index
//! an array (see [`crate::config::BindingConfig::index_numeric_keys`]).

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;

use crate::error::BindingError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathKey {
    Index(usize),
    Field(String),
}

impl PathKey {
    pub fn field(name: impl Into<String>) -> Self {
        PathKey::Field(name.into())
    }
}

impl From<&str> for PathKey {
    fn from(value: &str) -> Self {
        PathKey::Field(value.to_string())
    }
}

impl From<String> for PathKey {
    fn from(value: String) -> Self {
        PathKey::Field(value)
    }
}

impl From<usize> for PathKey {
    fn from(value: usize) -> Self {
        PathKey::Index(value)
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathKey::Index(i) => write!(f, "{i}"),
            PathKey::Field(name) => f.write_str(name),
        }
    }
}

/// Non-empty, immutable key sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<PathKey>", into = "Vec<PathKey>")]
pub struct EventPath {
    keys: Vec<PathKey>,
}

#[allow(clippy::len_without_is_empty)]
impl EventPath {
    /// Validate and wrap a key list. Empty lists and empty field names are rejected.
    pub fn new(keys: Vec<PathKey>) -> Result<Self, BindingError> {
        if keys.is_empty() {
            return Err(BindingError::EmptyPath);
        }
        if let Some(position) = keys
            .iter()
            .position(|k| matches!(k, PathKey::Field(name) if name.is_empty()))
        {
            return Err(BindingError::EmptySegment { position });
        }
        Ok(Self { keys })
    }

    /// Build a path from string segments, e.g. `["nativeEvent", "contentOffset", "y"]`.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, BindingError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            segments
                .into_iter()
                .map(|s| PathKey::Field(s.into()))
                .collect(),
        )
    }

    /// Parse the dotted form `a.b.0.c`.
    pub fn parse(s: &str) -> Result<Self, BindingError> {
        if s.is_empty() {
            return Err(BindingError::EmptyPath);
        }
        Self::from_segments(s.split('.'))
    }

    /// Parse a JSON array whose items are strings or non-negative integers.
    pub fn from_json(value: &JsonValue) -> Result<Self, BindingError> {
        let items = value
            .as_array()
            .ok_or_else(|| BindingError::InvalidSegment(value.to_string()))?;
        let keys = items
            .iter()
            .map(|item| match item {
                JsonValue::String(s) => Ok(PathKey::Field(s.clone())),
                JsonValue::Number(n) => n
                    .as_u64()
                    .and_then(|i| usize::try_from(i).ok())
                    .map(PathKey::Index)
                    .ok_or_else(|| BindingError::InvalidSegment(n.to_string())),
                other => Err(BindingError::InvalidSegment(other.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(keys)
    }

    pub fn keys(&self) -> &[PathKey] {
        &self.keys
    }

    /// Always at least 1.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Terminal key, the field that holds the scalar.
    pub fn leaf(&self) -> &PathKey {
        // `new` guarantees at least one key.
        &self.keys[self.keys.len() - 1]
    }
}

impl TryFrom<Vec<PathKey>> for EventPath {
    type Error = BindingError;
    fn try_from(keys: Vec<PathKey>) -> Result<Self, Self::Error> {
        EventPath::new(keys)
    }
}

impl From<EventPath> for Vec<PathKey> {
    fn from(path: EventPath) -> Self {
        path.keys
    }
}

impl FromStr for EventPath {
    type Err = BindingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventPath::parse(s)
    }
}

impl fmt::Display for EventPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{key}")?;
        }
        Ok(())
    }
}
