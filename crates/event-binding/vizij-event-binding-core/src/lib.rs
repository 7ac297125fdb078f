//! vizij-event-binding-core: route host UI events into animation value nodes.
//!
//! An [`EventValueBinding`] pairs an [`EventPath`] with a [`NodeHandle`]. When
//! the host delivers an event, the binding reads the number at that path in the
//! event [`Payload`] and writes it to the node. The graph that owns the nodes
//! and the machinery that captures events stay outside this crate; they plug in
//! through [`NodeWriter`] and [`EventBindingRegistry::dispatch`].

pub mod binding;
pub mod config;
pub mod error;
pub mod event;
pub mod node;
pub mod path;
pub mod payload;
pub mod registry;

pub use binding::{ApplyOutcome, EventValueBinding};
pub use config::{BindingConfig, NonFinitePolicy};
pub use error::BindingError;
pub use event::{normalize_event_name, Event, EventKey};
pub use node::{NodeHandle, NodeLiveness, NodeWriter, ValueGraph, ValueNode};
pub use path::{EventPath, PathKey};
pub use payload::{resolve_number, Payload};
pub use registry::{DispatchReport, EventBindingRegistry, EventMapping, NodeResolver};
