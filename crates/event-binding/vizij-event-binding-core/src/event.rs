//! Events delivered by the host and the keys bindings are registered under.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

use crate::payload::Payload;

/// Normalize a component-facing event name to its dispatch name.
///
/// `onScroll` becomes `topScroll`; names without the `on` + uppercase prefix
/// are returned unchanged.
pub fn normalize_event_name(name: &str) -> String {
    match name.strip_prefix("on") {
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_uppercase()) => {
            format!("top{rest}")
        }
        _ => name.to_string(),
    }
}

fn deserialize_event_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(normalize_event_name(&raw))
}

/// Registry key: the view that emitted the event and its normalized name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventKey {
    pub view_tag: u32,
    #[serde(deserialize_with = "deserialize_event_name")]
    pub name: String,
}

impl EventKey {
    pub fn new(view_tag: u32, name: &str) -> Self {
        Self {
            view_tag,
            name: normalize_event_name(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub view_tag: u32,
    /// Normalized dispatch name, e.g. `topScroll`.
    #[serde(deserialize_with = "deserialize_event_name")]
    pub name: String,
    #[serde(default)]
    pub payload: Payload,
}

impl Event {
    pub fn new(view_tag: u32, name: &str, payload: Payload) -> Self {
        Self {
            view_tag,
            name: normalize_event_name(name),
            payload,
        }
    }

    pub fn from_json(view_tag: u32, name: &str, payload: JsonValue) -> Self {
        Self::new(view_tag, name, Payload::from(payload))
    }

    pub fn key(&self) -> EventKey {
        EventKey::new(self.view_tag, &self.name)
    }
}
