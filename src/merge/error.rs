//! Merge errors.

use crate::value::Kind;
use thiserror::Error;

/// MergeError represents a failed merge.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    /// A property had to be written into a value that cannot hold properties.
    #[error("{path}: cannot merge properties into {found} target")]
    NonMergeableTarget { path: String, found: Kind },
}

impl MergeError {
    /// Creates a non-mergeable target error.
    pub fn non_mergeable_target(path: impl Into<String>, found: Kind) -> Self {
        MergeError::NonMergeableTarget {
            path: path.into(),
            found,
        }
    }

    /// Returns the key path of the offending target.
    pub fn path(&self) -> &str {
        match self {
            MergeError::NonMergeableTarget { path, .. } => path,
        }
    }
}

pub type Result<T> = std::result::Result<T, MergeError>;
