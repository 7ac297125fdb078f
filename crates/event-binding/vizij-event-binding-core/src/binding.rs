//! EventValueBinding: copy one number out of an event payload into a value node.
//!
//! A binding is immutable once built. Each `apply_event` walks the path, then
//! performs at most one write through the caller's [`NodeWriter`]. A payload
//! that does not match the path is expected traffic, so the miss is reported
//! as an [`ApplyOutcome`] rather than an error.

use crate::config::BindingConfig;
use crate::error::BindingError;
use crate::event::Event;
use crate::node::{NodeHandle, NodeWriter};
use crate::path::EventPath;
use crate::payload::{resolve_number, Payload};

/// Result of applying one event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ApplyOutcome {
    /// The value was written to the target node.
    Written(f64),
    /// The path did not resolve to an admissible number; nothing was written.
    Missed,
    /// The path resolved but the target node no longer exists.
    TargetGone,
}

impl ApplyOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, ApplyOutcome::Written(_))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EventValueBinding {
    path: EventPath,
    target: NodeHandle,
    config: BindingConfig,
}

impl EventValueBinding {
    pub fn new(path: EventPath, target: NodeHandle) -> Self {
        Self::with_config(path, target, BindingConfig::default())
    }

    pub fn with_config(path: EventPath, target: NodeHandle, config: BindingConfig) -> Self {
        Self {
            path,
            target,
            config,
        }
    }

    /// Shorthand for `EventPath::from_segments` + `new`.
    pub fn from_segments<I, S>(segments: I, target: NodeHandle) -> Result<Self, BindingError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self::new(EventPath::from_segments(segments)?, target))
    }

    pub fn path(&self) -> &EventPath {
        &self.path
    }

    pub fn target(&self) -> NodeHandle {
        self.target
    }

    pub fn config(&self) -> &BindingConfig {
        &self.config
    }

    /// Resolve the bound path against `payload` without writing.
    pub fn resolve(&self, payload: &Payload) -> Option<f64> {
        resolve_number(payload, self.path.keys(), &self.config)
    }

    pub fn apply_event<W: NodeWriter + ?Sized>(
        &self,
        payload: &Payload,
        nodes: &mut W,
    ) -> ApplyOutcome {
        let Some(value) = self.resolve(payload) else {
            return ApplyOutcome::Missed;
        };
        if nodes.write(self.target, value) {
            ApplyOutcome::Written(value)
        } else {
            ApplyOutcome::TargetGone
        }
    }

    pub fn apply<W: NodeWriter + ?Sized>(&self, event: &Event, nodes: &mut W) -> ApplyOutcome {
        self.apply_event(&event.payload, nodes)
    }
}
