//! Value module - In-memory representation of JSON/YAML objects.
//!
//! Maps keep their key order, which makes merge results deterministic.

mod map;
mod value;

pub use map::*;
pub use value::*;
