//! Semi-structured document tree.
//!
//! Schema bodies have no static shape beyond the `self` identity block, so
//! they are held as a tagged tree. The same tree is produced whether the
//! source was JSON or YAML: both deserialize through [`Document`]'s own
//! visitor rather than through a format-specific value type.
//!
//! Mappings keep their source order. Nothing here sorts; canonical ordering
//! is the hasher's job (see [`crate::canonical`]).

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// 2^127: every integral `f64` below this magnitude converts to `i128` exactly.
const I128_FLOAT_LIMIT: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;

/// A numeric scalar as it was decoded.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    PosInt(u64),
    NegInt(i64),
    Float(f64),
}

impl Number {
    /// The integral value this number denotes, if it denotes one exactly.
    ///
    /// Integral floats collapse onto integers, so `10` and `10.0` are the
    /// same number at any magnitude `i128` can hold.
    pub fn as_integer(&self) -> Option<i128> {
        match *self {
            Number::PosInt(u) => Some(i128::from(u)),
            Number::NegInt(i) => Some(i128::from(i)),
            Number::Float(f) => {
                if f.is_finite() && f.fract() == 0.0 && f.abs() < I128_FLOAT_LIMIT {
                    Some(f as i128)
                } else {
                    None
                }
            }
        }
    }

    pub fn is_finite(&self) -> bool {
        match *self {
            Number::Float(f) => f.is_finite(),
            _ => true,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self.as_integer(), other.as_integer()) {
            (Some(a), Some(b)) => a == b,
            (None, None) => match (self, other) {
                (Number::Float(a), Number::Float(b)) => a == b,
                _ => false,
            },
            _ => false,
        }
    }
}

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        Number::PosInt(value)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        if value >= 0 {
            Number::PosInt(value as u64)
        } else {
            Number::NegInt(value)
        }
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

/// A mapping/sequence/scalar tree.
#[derive(Debug, Clone)]
pub enum Document {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<Document>),
    /// Entries in source order. Keys are unique.
    Mapping(Vec<(String, Document)>),
    /// Raw bytes. Representable in YAML, not in the canonical form.
    Binary(Vec<u8>),
}

impl Document {
    /// Look up a mapping entry by key.
    pub fn get(&self, key: &str) -> Option<&Document> {
        match self {
            Document::Mapping(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Document::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&[(String, Document)]> {
        match self {
            Document::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Document::Null)
    }

    /// Short name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Document::Null => "null",
            Document::Bool(_) => "boolean",
            Document::Number(_) => "number",
            Document::String(_) => "string",
            Document::Sequence(_) => "sequence",
            Document::Mapping(_) => "mapping",
            Document::Binary(_) => "binary",
        }
    }

    /// Build a mapping from `(key, value)` pairs, keeping their order.
    ///
    /// Later duplicates replace earlier ones in place.
    pub fn mapping<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Document)>,
    {
        let mut out: Vec<(String, Document)> = Vec::new();
        for (key, value) in entries {
            let key = key.into();
            match out.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => out.push((key, value)),
            }
        }
        Document::Mapping(out)
    }
}

impl PartialEq for Document {
    /// Structural equality. Mapping entry order is not significant.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Document::Null, Document::Null) => true,
            (Document::Bool(a), Document::Bool(b)) => a == b,
            (Document::Number(a), Document::Number(b)) => a == b,
            (Document::String(a), Document::String(b)) => a == b,
            (Document::Sequence(a), Document::Sequence(b)) => a == b,
            (Document::Binary(a), Document::Binary(b)) => a == b,
            (Document::Mapping(a), Document::Mapping(b)) => {
                let a: BTreeMap<&str, &Document> = a.iter().map(|(k, v)| (k.as_str(), v)).collect();
                let b: BTreeMap<&str, &Document> = b.iter().map(|(k, v)| (k.as_str(), v)).collect();
                a == b
            }
            _ => false,
        }
    }
}

impl From<&str> for Document {
    fn from(value: &str) -> Self {
        Document::String(value.to_string())
    }
}

impl From<String> for Document {
    fn from(value: String) -> Self {
        Document::String(value)
    }
}

impl From<bool> for Document {
    fn from(value: bool) -> Self {
        Document::Bool(value)
    }
}

impl From<u64> for Document {
    fn from(value: u64) -> Self {
        Document::Number(value.into())
    }
}

impl From<i64> for Document {
    fn from(value: i64) -> Self {
        Document::Number(value.into())
    }
}

impl From<f64> for Document {
    fn from(value: f64) -> Self {
        Document::Number(value.into())
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Document::Null => serializer.serialize_unit(),
            Document::Bool(b) => serializer.serialize_bool(*b),
            Document::Number(Number::PosInt(u)) => serializer.serialize_u64(*u),
            Document::Number(Number::NegInt(i)) => serializer.serialize_i64(*i),
            Document::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            Document::String(s) => serializer.serialize_str(s),
            Document::Binary(bytes) => serializer.serialize_bytes(bytes),
            Document::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Document::Mapping(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DocumentVisitor)
    }
}

struct DocumentVisitor;

impl<'de> Visitor<'de> for DocumentVisitor {
    type Value = Document;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a mapping, sequence or scalar")
    }

    fn visit_unit<E>(self) -> Result<Document, E> {
        Ok(Document::Null)
    }

    fn visit_none<E>(self) -> Result<Document, E> {
        Ok(Document::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Document, D::Error> {
        Document::deserialize(deserializer)
    }

    fn visit_bool<E>(self, v: bool) -> Result<Document, E> {
        Ok(Document::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Document, E> {
        Ok(Document::Number(Number::from(v)))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Document, E> {
        Ok(Document::Number(Number::PosInt(v)))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Document, E> {
        Ok(Document::Number(Number::Float(v)))
    }

    fn visit_str<E>(self, v: &str) -> Result<Document, E> {
        Ok(Document::String(v.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<Document, E> {
        Ok(Document::String(v))
    }

    fn visit_bytes<E>(self, v: &[u8]) -> Result<Document, E> {
        Ok(Document::Binary(v.to_vec()))
    }

    fn visit_byte_buf<E>(self, v: Vec<u8>) -> Result<Document, E> {
        Ok(Document::Binary(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Document, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<Document>()? {
            items.push(item);
        }
        Ok(Document::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Document, A::Error> {
        let mut seen = BTreeSet::new();
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(key) = map.next_key::<String>()? {
            if !seen.insert(key.clone()) {
                return Err(de::Error::custom(format!("duplicate key `{key}`")));
            }
            let value = map.next_value::<Document>()?;
            entries.push((key, value));
        }
        Ok(Document::Mapping(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON_SOURCE: &str = r#"{
        "self": {"vendor": "com.acme", "name": "click", "format": "jsonschema", "version": "1-0-0"},
        "type": "object",
        "maxLength": 10,
        "required": ["id", "ts"],
        "additionalProperties": false,
        "description": null
    }"#;

    const YAML_SOURCE: &str = "
description: null
additionalProperties: false
required:
  - id
  - ts
maxLength: 10
type: object
self:
  version: 1-0-0
  format: jsonschema
  name: click
  vendor: com.acme
";

    #[test]
    fn json_and_yaml_produce_equal_trees() {
        let from_json: Document = serde_json::from_str(JSON_SOURCE).expect("json should parse");
        let from_yaml: Document = serde_yaml::from_str(YAML_SOURCE).expect("yaml should parse");
        assert_eq!(from_json, from_yaml);
    }

    #[test]
    fn mapping_keeps_source_order() {
        let doc: Document = serde_json::from_str(r#"{"b": 1, "a": 2, "c": 3}"#).unwrap();
        let keys: Vec<&str> = doc
            .as_mapping()
            .unwrap()
            .iter()
            .map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let err = serde_json::from_str::<Document>(r#"{"a": 1, "a": 2}"#).unwrap_err();
        assert!(err.to_string().contains("duplicate key `a`"));
    }

    #[test]
    fn yaml_non_finite_floats_survive_parsing() {
        let doc: Document = serde_yaml::from_str("limit: .nan").unwrap();
        match doc.get("limit") {
            Some(Document::Number(n)) => assert!(!n.is_finite()),
            other => panic!("expected a float, got {other:?}"),
        }
    }

    #[test]
    fn integral_floats_equal_integers() {
        assert_eq!(Number::Float(10.0), Number::PosInt(10));
        assert_eq!(Number::Float(-3.0), Number::NegInt(-3));
        assert_ne!(Number::Float(10.5), Number::PosInt(10));
        assert_eq!(Number::from(-0i64), Number::PosInt(0));
    }

    #[test]
    fn serialize_round_trips_through_json() {
        let doc: Document = serde_json::from_str(JSON_SOURCE).unwrap();
        let text = serde_json::to_string(&doc).unwrap();
        let back: Document = serde_json::from_str(&text).unwrap();
        assert_eq!(doc, back);
    }

    #[test]
    fn mapping_builder_replaces_duplicates_in_place() {
        let doc = Document::mapping([
            ("a", Document::from(1u64)),
            ("b", Document::from(true)),
            ("a", Document::from("x")),
        ]);
        let entries = doc.as_mapping().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], ("a".to_string(), Document::from("x")));
    }
}
