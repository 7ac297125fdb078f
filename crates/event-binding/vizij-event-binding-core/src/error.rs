//! Usage errors raised while building bindings.
//!
//! Runtime path misses are not errors; see [`crate::binding::ApplyOutcome`].

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BindingError {
    #[error("event path must contain at least one key")]
    EmptyPath,
    #[error("event path segment {position} is empty")]
    EmptySegment { position: usize },
    #[error("invalid event path segment: {0}")]
    InvalidSegment(String),
    #[error("no value node registered for tag {0}")]
    UnknownNode(u32),
}
