//! Merge configuration.

use serde::{Deserialize, Serialize};

/// NullTarget decides what happens when a map is merged into a null target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NullTarget {
    /// Fail with `MergeError::NonMergeableTarget`.
    #[default]
    Reject,
    /// Treat the null as an empty map and merge into it.
    Replace,
}

/// MergeOptions configures a [`Merger`](super::Merger).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MergeOptions {
    pub null_target: NullTarget,
}
