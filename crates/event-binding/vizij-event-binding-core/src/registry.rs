//! Registry of event bindings keyed by view and event name.
//!
//! Hosts attach bindings when a component maps an event onto an animated value
//! and detach them when the listener goes away. `dispatch` routes one event to
//! every binding registered for its key, in attach order.

use hashbrown::HashMap;
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::binding::{ApplyOutcome, EventValueBinding};
use crate::config::BindingConfig;
use crate::error::BindingError;
use crate::event::{Event, EventKey};
use crate::node::{NodeHandle, NodeLiveness, NodeWriter};
use crate::path::EventPath;

/// Event mapping as sent by the host:
/// `{ "animatedValueTag": 3, "nativeEventPath": ["nativeEvent", "contentOffset", "y"] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMapping {
    pub animated_value_tag: u32,
    pub native_event_path: EventPath,
}

/// Maps host-side node tags to graph handles.
pub trait NodeResolver {
    fn resolve(&self, tag: u32) -> Option<NodeHandle>;
}

impl NodeResolver for HashMap<u32, NodeHandle> {
    fn resolve(&self, tag: u32) -> Option<NodeHandle> {
        self.get(&tag).copied()
    }
}

impl NodeResolver for std::collections::HashMap<u32, NodeHandle> {
    fn resolve(&self, tag: u32) -> Option<NodeHandle> {
        self.get(&tag).copied()
    }
}

/// Per-dispatch tally of binding outcomes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReport {
    pub written: usize,
    pub missed: usize,
    pub stale: usize,
}

impl DispatchReport {
    fn record(&mut self, outcome: ApplyOutcome) {
        match outcome {
            ApplyOutcome::Written(_) => self.written += 1,
            ApplyOutcome::Missed => self.missed += 1,
            ApplyOutcome::TargetGone => self.stale += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.written + self.missed + self.stale
    }
}

#[derive(Debug, Default)]
pub struct EventBindingRegistry {
    config: BindingConfig,
    bindings: HashMap<EventKey, Vec<EventValueBinding>>,
}

impl EventBindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose mapping-built bindings use `config`.
    pub fn with_config(config: BindingConfig) -> Self {
        Self {
            config,
            bindings: HashMap::new(),
        }
    }

    pub fn config(&self) -> &BindingConfig {
        &self.config
    }

    pub fn attach(&mut self, view_tag: u32, event_name: &str, binding: EventValueBinding) {
        let key = EventKey::new(view_tag, event_name);
        debug!(
            "attach: view={} event={} path={} target={:?}",
            key.view_tag,
            key.name,
            binding.path(),
            binding.target()
        );
        self.bindings.entry(key).or_default().push(binding);
    }

    /// Resolve `mapping.animated_value_tag` and attach a binding for it.
    pub fn attach_mapping<R: NodeResolver + ?Sized>(
        &mut self,
        view_tag: u32,
        event_name: &str,
        mapping: &EventMapping,
        resolver: &R,
    ) -> Result<NodeHandle, BindingError> {
        let target = resolver
            .resolve(mapping.animated_value_tag)
            .ok_or(BindingError::UnknownNode(mapping.animated_value_tag))?;
        let binding =
            EventValueBinding::with_config(mapping.native_event_path.clone(), target, self.config);
        self.attach(view_tag, event_name, binding);
        Ok(target)
    }

    /// Remove every binding on this key that writes to `target`.
    pub fn detach(&mut self, view_tag: u32, event_name: &str, target: NodeHandle) -> usize {
        let key = EventKey::new(view_tag, event_name);
        let Some(list) = self.bindings.get_mut(&key) else {
            return 0;
        };
        let before = list.len();
        list.retain(|b| b.target() != target);
        let removed = before - list.len();
        if list.is_empty() {
            self.bindings.remove(&key);
        }
        debug!(
            "detach: view={} event={} target={:?} removed={}",
            key.view_tag, key.name, target, removed
        );
        removed
    }

    /// Remove all bindings registered on a view.
    pub fn detach_view(&mut self, view_tag: u32) -> usize {
        let mut removed = 0;
        self.bindings.retain(|key, list| {
            if key.view_tag == view_tag {
                removed += list.len();
                false
            } else {
                true
            }
        });
        debug!("detach_view: view={} removed={}", view_tag, removed);
        removed
    }

    pub fn has_bindings(&self, view_tag: u32, event_name: &str) -> bool {
        self.bindings
            .contains_key(&EventKey::new(view_tag, event_name))
    }

    pub fn bindings_for(&self, view_tag: u32, event_name: &str) -> &[EventValueBinding] {
        self.bindings
            .get(&EventKey::new(view_tag, event_name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of bindings across all keys.
    pub fn len(&self) -> usize {
        self.bindings.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Apply `event` to every binding registered for its key.
    pub fn dispatch<W: NodeWriter + ?Sized>(&self, event: &Event, nodes: &mut W) -> DispatchReport {
        let mut report = DispatchReport::default();
        let key = event.key();
        let Some(list) = self.bindings.get(&key) else {
            return report;
        };
        for binding in list {
            let outcome = binding.apply(event, nodes);
            if outcome == ApplyOutcome::TargetGone {
                warn!(
                    "dispatch: view={} event={} target {:?} no longer exists",
                    key.view_tag,
                    key.name,
                    binding.target()
                );
            }
            report.record(outcome);
        }
        trace!(
            "dispatch: view={} event={} written={} missed={} stale={}",
            key.view_tag,
            key.name,
            report.written,
            report.missed,
            report.stale
        );
        report
    }

    /// Drop bindings whose target is no longer alive.
    pub fn prune_stale<L: NodeLiveness + ?Sized>(&mut self, nodes: &L) -> usize {
        let mut removed = 0;
        self.bindings.retain(|_, list| {
            let before = list.len();
            list.retain(|b| nodes.is_alive(b.target()));
            removed += before - list.len();
            !list.is_empty()
        });
        if removed > 0 {
            debug!("prune_stale: removed={}", removed);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{ValueGraph, ValueNode};
    use serde_json::json;

    #[test]
    fn mapping_from_camel_case_json() {
        let mapping: EventMapping = serde_json::from_value(json!({
            "animatedValueTag": 4,
            "nativeEventPath": ["nativeEvent", "contentOffset", "y"]
        }))
        .unwrap();
        assert_eq!(mapping.animated_value_tag, 4);
        assert_eq!(mapping.native_event_path.to_string(), "nativeEvent.contentOffset.y");
    }

    #[test]
    fn mapping_with_empty_path_is_rejected() {
        let parsed = serde_json::from_value::<EventMapping>(json!({
            "animatedValueTag": 4,
            "nativeEventPath": []
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn attach_mapping_unknown_tag() {
        let mut registry = EventBindingRegistry::new();
        let tags: HashMap<u32, NodeHandle> = HashMap::new();
        let mapping = EventMapping {
            animated_value_tag: 9,
            native_event_path: EventPath::parse("x").unwrap(),
        };
        assert_eq!(
            registry.attach_mapping(1, "onScroll", &mapping, &tags),
            Err(BindingError::UnknownNode(9))
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn one_resolver_serves_many_registries() {
        let mut graph = ValueGraph::new();
        let h = graph.insert(ValueNode::default());
        let tags: HashMap<u32, NodeHandle> = [(5, h)].into_iter().collect();
        let shared = &tags;
        let mapping = EventMapping {
            animated_value_tag: 5,
            native_event_path: EventPath::parse("y").unwrap(),
        };

        let mut scroll = EventBindingRegistry::new();
        let mut layout = EventBindingRegistry::new();
        assert_eq!(scroll.attach_mapping(1, "onScroll", &mapping, shared), Ok(h));
        assert_eq!(layout.attach_mapping(1, "onLayout", &mapping, shared), Ok(h));
        assert_eq!(shared.resolve(5), Some(h));
        assert_eq!(shared.resolve(6), None);
    }

    #[test]
    fn detach_drops_empty_keys() {
        let mut graph = ValueGraph::new();
        let h = graph.insert(ValueNode::default());
        let mut registry = EventBindingRegistry::new();
        registry.attach(
            1,
            "onScroll",
            EventValueBinding::new(EventPath::parse("y").unwrap(), h),
        );
        assert!(registry.has_bindings(1, "topScroll"));
        assert_eq!(registry.detach(1, "onScroll", h), 1);
        assert!(!registry.has_bindings(1, "onScroll"));
        assert_eq!(registry.detach(1, "onScroll", h), 0);
    }
}
