//! Merge module - Deep merge of source values into a target value.
//!
//! Maps are merged key by key; every other kind of value is replaced.

mod error;
mod merger;
mod options;


pub use error::*;
pub use merger::*;
pub use options::*;
