//! Core value types and operations.

use super::map::{read_entries, Field, Map};
use serde::de::{EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_yaml::value::{Tag, TaggedValue};
use std::borrow::Cow;
use std::fmt;

/// Value represents a JSON/YAML value that can be any of the supported types.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(Map),
    Tagged(Box<Tagged>),
}

/// A value carrying an explicit tag, such as the YAML node `!regex "a+"`.
///
/// Tagged values are object-like but never plain: a merge replaces them
/// wholesale, even when the wrapped value is a map.
#[derive(Debug, Clone, PartialEq)]
pub struct Tagged {
    pub tag: String,
    pub value: Value,
}

/// Kind is the merge-relevant classification of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// `Null`. Never copied, never written into (by default).
    Nullish,
    /// A `Map`, merged recursively.
    PlainContainer,
    /// A `List`, replaced wholesale.
    Array,
    /// A bool, number or string.
    Scalar,
    /// A `Tagged` value, replaced wholesale.
    Tagged,
}

impl Kind {
    /// Returns true if values of this kind are merged key by key.
    pub fn is_mergeable(self) -> bool {
        self == Kind::PlainContainer
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Nullish => "null",
            Kind::PlainContainer => "map",
            Kind::Array => "list",
            Kind::Scalar => "scalar",
            Kind::Tagged => "tagged",
        };
        f.write_str(name)
    }
}

impl Value {
    /// Classifies the value for merge dispatch.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Nullish,
            Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::String(_) => Kind::Scalar,
            Value::List(_) => Kind::Array,
            Value::Map(_) => Kind::PlainContainer,
            Value::Tagged(_) => Kind::Tagged,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Value::Int(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    pub fn is_tagged(&self) -> bool {
        matches!(self, Value::Tagged(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_tagged(&self) -> Option<&Tagged> {
        match self {
            Value::Tagged(t) => Some(t),
            _ => None,
        }
    }

    /// Looks up `key` if this value is a map.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map()?.get(key)
    }

    /// Iterates the properties this value contributes as a merge source.
    ///
    /// Maps yield their entries in order, lists yield their elements keyed
    /// by decimal index, tagged values yield the properties of the value
    /// they wrap. Scalars and null yield nothing.
    pub fn own_properties(&self) -> OwnProperties<'_> {
        let inner = match self {
            Value::Map(m) => Properties::Fields(m.fields().iter()),
            Value::List(l) => Properties::Items(l.iter().enumerate()),
            Value::Tagged(t) => return t.value.own_properties(),
            _ => Properties::Empty,
        };
        OwnProperties { inner }
    }

    /// Converts into a `serde_json::Value`. Non-finite floats become null.
    pub fn to_serde_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::Number((*i).into()),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_serde_json).collect())
            }
            Value::Map(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.to_string(), v.to_serde_json()))
                    .collect(),
            ),
            Value::Tagged(t) => {
                let mut obj = serde_json::Map::new();
                obj.insert(format!("!{}", t.tag), t.value.to_serde_json());
                serde_json::Value::Object(obj)
            }
        }
    }

    /// Converts into a `serde_yaml::Value`, keeping tags as YAML tags.
    ///
    /// A tagged value with an empty tag is emitted as the value it wraps.
    pub fn to_serde_yaml(&self) -> serde_yaml::Value {
        match self {
            Value::Null => serde_yaml::Value::Null,
            Value::Bool(b) => serde_yaml::Value::Bool(*b),
            Value::Int(i) => serde_yaml::Value::Number((*i).into()),
            Value::Float(f) => serde_yaml::Value::Number((*f).into()),
            Value::String(s) => serde_yaml::Value::String(s.clone()),
            Value::List(items) => {
                serde_yaml::Value::Sequence(items.iter().map(Value::to_serde_yaml).collect())
            }
            Value::Map(map) => serde_yaml::Value::Mapping(
                map.iter()
                    .map(|(k, v)| (serde_yaml::Value::String(k.to_string()), v.to_serde_yaml()))
                    .collect(),
            ),
            Value::Tagged(t) if t.tag.is_empty() => t.value.to_serde_yaml(),
            Value::Tagged(t) => serde_yaml::Value::Tagged(Box::new(TaggedValue {
                tag: Tag::new(t.tag.as_str()),
                value: t.value.to_serde_yaml(),
            })),
        }
    }
}

/// Iterator returned by [`Value::own_properties`].
pub struct OwnProperties<'a> {
    inner: Properties<'a>,
}

enum Properties<'a> {
    Fields(std::slice::Iter<'a, Field>),
    Items(std::iter::Enumerate<std::slice::Iter<'a, Value>>),
    Empty,
}

impl<'a> Iterator for OwnProperties<'a> {
    type Item = (Cow<'a, str>, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            Properties::Fields(it) => it
                .next()
                .map(|f| (Cow::Borrowed(f.name.as_str()), &f.value)),
            Properties::Items(it) => it.next().map(|(i, v)| (Cow::Owned(i.to_string()), v)),
            Properties::Empty => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

impl From<Tagged> for Value {
    fn from(t: Tagged) -> Self {
        Value::Tagged(Box::new(t))
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => {
                Value::Map(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::List(items) => items.serialize(serializer),
            Value::Map(map) => map.serialize(serializer),
            // Formats without tags get a one-entry "!tag" map; `to_yaml`
            // goes through `to_serde_yaml` to emit a real tag instead.
            Value::Tagged(t) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(&format!("!{}", t.tag), &t.value)?;
                map.end()
            }
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON or YAML value")
    }

    fn visit_bool<E>(self, b: bool) -> Result<Value, E> {
        Ok(Value::Bool(b))
    }

    fn visit_i64<E>(self, i: i64) -> Result<Value, E> {
        Ok(Value::Int(i))
    }

    fn visit_u64<E>(self, u: u64) -> Result<Value, E> {
        Ok(match i64::try_from(u) {
            Ok(i) => Value::Int(i),
            Err(_) => Value::Float(u as f64),
        })
    }

    fn visit_f64<E>(self, f: f64) -> Result<Value, E> {
        Ok(Value::Float(f))
    }

    fn visit_str<E>(self, s: &str) -> Result<Value, E> {
        Ok(Value::String(s.to_string()))
    }

    fn visit_string<E>(self, s: String) -> Result<Value, E> {
        Ok(Value::String(s))
    }

    fn visit_unit<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<Value>()? {
            items.push(item);
        }
        Ok(Value::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, access: A) -> Result<Value, A::Error> {
        read_entries(access).map(Value::Map)
    }

    // serde_yaml reports `!tag node` as an enum whose variant is the tag.
    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<Value, A::Error> {
        let (tag, variant) = data.variant::<String>()?;
        let value = variant.newtype_variant::<Value>()?;
        let tag = match tag.strip_prefix('!') {
            Some(stripped) => stripped.to_string(),
            None => tag,
        };
        Ok(Value::Tagged(Box::new(Tagged { tag, value })))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

/// Parse a value from JSON. Object key order is preserved.
pub fn from_json(json: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(json)
}

/// Serialize a value to JSON.
pub fn to_json(value: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}

/// Parse a value from YAML. Mapping key order is preserved.
pub fn from_yaml(yaml: &str) -> Result<Value, serde_yaml::Error> {
    serde_yaml::from_str(yaml)
}

/// Serialize a value to YAML. Tagged values are written as tagged nodes.
pub fn to_yaml(value: &Value) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(&value.to_serde_yaml())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_value_types() {
        assert!(Value::Null.is_null());
        assert!(Value::Bool(true).is_bool());
        assert!(Value::Int(42).is_int());
        assert!(Value::Float(3.5).is_float());
        assert!(Value::String("hello".into()).is_string());
        assert!(Value::List(vec![]).is_list());
        assert!(Value::Map(Map::new()).is_map());
    }

    #[test]
    fn test_kind() {
        assert_eq!(Value::Null.kind(), Kind::Nullish);
        assert_eq!(Value::Bool(false).kind(), Kind::Scalar);
        assert_eq!(Value::Int(0).kind(), Kind::Scalar);
        assert_eq!(Value::String(String::new()).kind(), Kind::Scalar);
        assert_eq!(Value::List(vec![]).kind(), Kind::Array);
        assert_eq!(Value::Map(Map::new()).kind(), Kind::PlainContainer);

        let tagged = Value::from(Tagged {
            tag: "fn".into(),
            value: Value::Map(Map::new()),
        });
        assert_eq!(tagged.kind(), Kind::Tagged);
        assert!(!tagged.kind().is_mergeable());
        assert!(Kind::PlainContainer.is_mergeable());
    }

    #[test]
    fn test_value_equality() {
        assert_eq!(Value::Null, Value::Null);
        assert_eq!(Value::Bool(true), Value::Bool(true));
        assert_ne!(Value::Bool(true), Value::Bool(false));
        assert_eq!(Value::Int(42), Value::Int(42));
        assert_ne!(Value::Int(1), Value::Float(1.0));
        assert_eq!(Value::String("hello".into()), Value::String("hello".into()));
    }

    #[test]
    fn test_json_preserves_key_order() {
        let value = from_json(r#"{"zeta":1,"alpha":{"b":2,"a":3},"mid":[true,null]}"#).unwrap();

        let keys: Vec<_> = value.as_map().unwrap().keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        let inner: Vec<_> = value.get("alpha").unwrap().as_map().unwrap().keys().collect();
        assert_eq!(inner, vec!["b", "a"]);

        assert_eq!(
            to_json(&value).unwrap(),
            r#"{"zeta":1,"alpha":{"b":2,"a":3},"mid":[true,null]}"#
        );
    }

    #[test]
    fn test_json_numbers() {
        let value = from_json(r#"[1,-2,2.5,18446744073709551615]"#).unwrap();
        let items = value.as_list().unwrap();
        assert_eq!(items[0], Value::Int(1));
        assert_eq!(items[1], Value::Int(-2));
        assert_eq!(items[2], Value::Float(2.5));
        assert!(items[3].is_float());
    }

    #[test]
    fn test_yaml_tagged_node() {
        let value = from_yaml("pattern: !regex \"a+\"\nname: plain\n").unwrap();

        let pattern = value.get("pattern").unwrap().as_tagged().unwrap();
        assert_eq!(pattern.tag, "regex");
        assert_eq!(pattern.value, Value::String("a+".into()));
        assert_eq!(value.get("name"), Some(&Value::String("plain".into())));
    }

    #[test]
    fn test_yaml_tagged_round_trip() {
        let value = from_yaml("when: !date 2024-01-01\nhandler: !fn {answer: 42}\nplain: 1\n")
            .unwrap();

        let yaml = to_yaml(&value).unwrap();
        let parsed = from_yaml(&yaml).unwrap();

        assert_eq!(parsed, value);
        assert_eq!(parsed.get("when").unwrap().as_tagged().unwrap().tag, "date");
        let handler = parsed.get("handler").unwrap().as_tagged().unwrap();
        assert_eq!(handler.tag, "fn");
        assert_eq!(handler.value.get("answer"), Some(&Value::Int(42)));
    }

    #[test]
    fn test_yaml_preserves_key_order() {
        let value = from_yaml("zeta: 1\nalpha:\n  b: 2\n  a: 3\n").unwrap();
        let parsed = from_yaml(&to_yaml(&value).unwrap()).unwrap();

        let keys: Vec<_> = parsed.as_map().unwrap().keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
        let inner: Vec<_> = parsed.get("alpha").unwrap().as_map().unwrap().keys().collect();
        assert_eq!(inner, vec!["b", "a"]);
    }

    #[test]
    fn test_tagged_serializes_as_bang_key() {
        let value = Value::from(Tagged {
            tag: "date".into(),
            value: Value::String("2024-01-01".into()),
        });
        assert_eq!(to_json(&value).unwrap(), r#"{"!date":"2024-01-01"}"#);
        assert_eq!(
            value.to_serde_json(),
            serde_json::json!({"!date": "2024-01-01"})
        );
    }

    #[test]
    fn test_own_properties() {
        let map = from_json(r#"{"b":1,"a":2}"#).unwrap();
        let props: Vec<_> = map
            .own_properties()
            .map(|(k, v)| (k.into_owned(), v.clone()))
            .collect();
        assert_eq!(
            props,
            vec![("b".to_string(), Value::Int(1)), ("a".to_string(), Value::Int(2))]
        );

        let list = from_json(r#"["x",null]"#).unwrap();
        let keys: Vec<_> = list.own_properties().map(|(k, _)| k.into_owned()).collect();
        assert_eq!(keys, vec!["0", "1"]);

        let tagged = Value::from(Tagged {
            tag: "fn".into(),
            value: map.clone(),
        });
        assert_eq!(tagged.own_properties().count(), 2);

        assert_eq!(Value::Int(7).own_properties().count(), 0);
        assert_eq!(Value::Null.own_properties().count(), 0);
    }

    #[test]
    fn test_serde_json_conversion() {
        let json = serde_json::json!({"name": "test", "count": 42, "ratio": 0.5, "tags": ["a"]});
        let value = Value::from(json.clone());

        assert_eq!(value.get("name"), Some(&Value::String("test".into())));
        assert_eq!(value.get("count"), Some(&Value::Int(42)));
        assert_eq!(value.get("ratio"), Some(&Value::Float(0.5)));
        assert_eq!(value.to_serde_json(), json);
    }

    #[test]
    fn test_serde_json_conversion_keeps_key_order() {
        let value = Value::from(serde_json::json!({"zeta": 1, "alpha": {"y": 2, "b": 3}}));

        let keys: Vec<_> = value.as_map().unwrap().keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
        let inner: Vec<_> = value.get("alpha").unwrap().as_map().unwrap().keys().collect();
        assert_eq!(inner, vec!["y", "b"]);

        let back = from_json(r#"{"zeta":1,"alpha":2}"#).unwrap().to_serde_json();
        let back_keys: Vec<_> = back.as_object().unwrap().keys().cloned().collect();
        assert_eq!(back_keys, vec!["zeta", "alpha"]);
    }
}
