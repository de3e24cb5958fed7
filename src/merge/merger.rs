//! Merger folds source values into a target value.

use super::{MergeError, MergeOptions, NullTarget, Result};
use crate::value::{Kind, Map, Value};
use tracing::{debug, trace};

/// Key path of the value passed to [`Merger::merge`].
const ROOT: &str = "$";

/// MergerBuilder is a builder for creating a Merger.
#[derive(Debug, Default)]
pub struct MergerBuilder {
    options: MergeOptions,
}

impl MergerBuilder {
    /// Creates a new MergerBuilder with default options.
    pub fn new() -> Self {
        MergerBuilder::default()
    }

    /// Replaces all options at once, e.g. with options read from a config file.
    pub fn options(mut self, options: MergeOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets how null targets are handled.
    pub fn null_target(mut self, policy: NullTarget) -> Self {
        self.options.null_target = policy;
        self
    }

    /// Builds the Merger.
    pub fn build(self) -> Merger {
        Merger {
            options: self.options,
        }
    }
}

/// Merger recursively copies the properties of sources into a target.
///
/// For every non-null property of a source:
///
/// - a map is merged into the target's map at that key, or into a fresh
///   empty map when the target holds anything else there;
/// - any other value is cloned into the target, replacing what was there.
///
/// Null properties never overwrite. Sources are applied left to right and
/// the last write wins.
#[derive(Debug, Clone, Default)]
pub struct Merger {
    options: MergeOptions,
}

impl Merger {
    /// Creates a Merger with the given options.
    pub fn new(options: MergeOptions) -> Self {
        Merger { options }
    }

    /// Creates a new MergerBuilder.
    pub fn builder() -> MergerBuilder {
        MergerBuilder::new()
    }

    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// Merges each source into `target` in order and returns `target`.
    ///
    /// Null sources are skipped. Fails with
    /// [`MergeError::NonMergeableTarget`] when a property has to be written
    /// into something other than a map; writes made before the failure are
    /// kept.
    pub fn merge<'t, 's, I>(&self, target: &'t mut Value, sources: I) -> Result<&'t mut Value>
    where
        I: IntoIterator<Item = &'s Value>,
    {
        for (index, source) in sources.into_iter().enumerate() {
            match source.kind() {
                Kind::Nullish => {
                    debug!(index, "skipping null source");
                    continue;
                }
                Kind::Scalar => debug!(index, "scalar source has no properties"),
                _ => {}
            }
            self.assign(target, source, ROOT)?;
        }
        Ok(target)
    }

    fn assign(&self, target: &mut Value, source: &Value, path: &str) -> Result<()> {
        for (key, value) in source.own_properties() {
            if value.is_null() {
                trace!(path, key = %key, "skipping null property");
                continue;
            }
            let map = self.writable(target, path)?;
            self.assign_key(map, &key, value, path)?;
        }
        Ok(())
    }

    fn assign_key(&self, map: &mut Map, key: &str, value: &Value, path: &str) -> Result<()> {
        if !value.kind().is_mergeable() {
            trace!(path, key, kind = %value.kind(), "replacing value");
            map.set(key, value.clone());
            return Ok(());
        }

        let child = format!("{}.{}", path, key);
        match map.get(key).map(Value::kind) {
            Some(Kind::PlainContainer) => trace!(path = %child, "merging into existing map"),
            Some(Kind::Nullish) if self.options.null_target == NullTarget::Reject => {
                return Err(MergeError::non_mergeable_target(child, Kind::Nullish));
            }
            existing => {
                trace!(path = %child, ?existing, "merging into fresh map");
                map.set(key, Value::Map(Map::new()));
            }
        }
        self.assign(map.slot(key), value, &child)
    }

    /// Returns the map properties are written into, or an error naming the
    /// kind of value found instead. Under `NullTarget::Replace` a null
    /// target becomes an empty map here, at its first write.
    fn writable<'v>(&self, target: &'v mut Value, path: &str) -> Result<&'v mut Map> {
        if target.is_null() && self.options.null_target == NullTarget::Replace {
            debug!(path, "replacing null target with an empty map");
            *target = Value::Map(Map::new());
        }
        match target {
            Value::Map(map) => Ok(map),
            other => Err(MergeError::non_mergeable_target(path, other.kind())),
        }
    }
}

/// Merges `sources` into `target` with default options.
///
/// ```
/// use deep_assign::{merge, value::from_json};
///
/// let mut target = from_json(r#"{"foo":0}"#).unwrap();
/// let source = from_json(r#"{"bar":1}"#).unwrap();
/// merge(&mut target, [&source]).unwrap();
/// assert_eq!(target, from_json(r#"{"foo":0,"bar":1}"#).unwrap());
/// ```
pub fn merge<'t, 's, I>(target: &'t mut Value, sources: I) -> Result<&'t mut Value>
where
    I: IntoIterator<Item = &'s Value>,
{
    Merger::default().merge(target, sources)
}
