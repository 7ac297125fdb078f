//! Resolution options shared by bindings and the registry.

use serde::{Deserialize, Serialize};

/// What to do when a path resolves to NaN or an infinity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonFinitePolicy {
    /// Treat the value as a miss; the node keeps its previous value.
    #[default]
    Skip,
    /// Write the value to the node unchanged.
    WriteThrough,
}

/// Configuration captured by each binding at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingConfig {
    pub non_finite: NonFinitePolicy,
    /// Allow string keys such as `"0"` to index into arrays.
    pub index_numeric_keys: bool,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            non_finite: NonFinitePolicy::Skip,
            index_numeric_keys: true,
        }
    }
}

impl BindingConfig {
    /// Apply the non-finite policy to a resolved number.
    #[inline]
    pub fn admit(&self, value: f64) -> Option<f64> {
        match self.non_finite {
            NonFinitePolicy::Skip if !value.is_finite() => None,
            _ => Some(value),
        }
    }
}
