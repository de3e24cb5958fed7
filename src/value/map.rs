//! Insertion-ordered string-keyed map.

use super::Value;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Field represents a single key-value pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub value: Value,
}

/// Map represents a key-value map where keys are strings.
///
/// Keys keep the order in which they were first inserted. Replacing the
/// value of an existing key leaves it in its original position.
#[derive(Debug, Clone, Default)]
pub struct Map {
    fields: Vec<Field>,
}

impl Map {
    pub fn new() -> Self {
        Map { fields: Vec::new() }
    }

    fn index_of(&self, key: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.index_of(key).map(|i| &self.fields[i].value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        match self.index_of(key) {
            Some(i) => Some(&mut self.fields[i].value),
            None => None,
        }
    }

    /// Sets `key` to `value`, returning the previous value if there was one.
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        match self.index_of(&key) {
            Some(i) => Some(std::mem::replace(&mut self.fields[i].value, value)),
            None => {
                self.fields.push(Field { name: key, value });
                None
            }
        }
    }

    /// Returns the slot for `key`, appending `Value::Null` if it is missing.
    pub fn slot(&mut self, key: &str) -> &mut Value {
        let i = match self.index_of(key) {
            Some(i) => i,
            None => {
                self.fields.push(Field {
                    name: key.to_string(),
                    value: Value::Null,
                });
                self.fields.len() - 1
            }
        };
        &mut self.fields[i].value
    }

    pub fn has(&self, key: &str) -> bool {
        self.index_of(key).is_some()
    }

    /// Removes `key`, shifting later keys down so order is kept.
    pub fn delete(&mut self, key: &str) -> Option<Value> {
        self.index_of(key).map(|i| self.fields.remove(i).value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|f| (f.name.as_str(), &f.value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub(crate) fn fields(&self) -> &[Field] {
        &self.fields
    }
}

/// Equality ignores key order.
impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .fields
                .iter()
                .all(|f| other.get(&f.name) == Some(&f.value))
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Map {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        let mut map = Map::new();
        for (k, v) in iter {
            map.set(k, v);
        }
        map
    }
}

impl IntoIterator for Map {
    type Item = (String, Value);
    type IntoIter = std::iter::Map<std::vec::IntoIter<Field>, fn(Field) -> (String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        let pair: fn(Field) -> (String, Value) = |f| (f.name, f.value);
        self.fields.into_iter().map(pair)
    }
}

impl Serialize for Map {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for field in &self.fields {
            map.serialize_entry(&field.name, &field.value)?;
        }
        map.end()
    }
}

/// Reads every entry of a serde map into a `Map`.
///
/// Duplicate keys keep the first position and the last value.
pub(crate) fn read_entries<'de, A: MapAccess<'de>>(mut access: A) -> Result<Map, A::Error> {
    let mut map = Map::new();
    while let Some((key, value)) = access.next_entry::<String, Value>()? {
        map.set(key, value);
    }
    Ok(map)
}

struct MapVisitor;

impl<'de> Visitor<'de> for MapVisitor {
    type Value = Map;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map with string keys")
    }

    fn visit_map<A: MapAccess<'de>>(self, access: A) -> Result<Map, A::Error> {
        read_entries(access)
    }
}

impl<'de> Deserialize<'de> for Map {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(MapVisitor)
    }
}
