//! # Deep Assign
//!
//! Recursively merges the properties of source values into a target value.
//!
//! Nested maps are merged rather than overwritten, and the target never
//! shares structure with a source. Lists, scalars and tagged values are
//! replaced wholesale. Null source properties never overwrite.
//!
//! ## Modules
//!
//! - [`value`] - In-memory representation of JSON/YAML objects with ordered maps
//! - [`merge`] - The merge algorithm, its options and its error type

pub mod merge;
pub mod value;

pub use merge::{merge, MergeError, MergeOptions, Merger, MergerBuilder, NullTarget};
pub use value::{Kind, Map, Tagged, Value};
