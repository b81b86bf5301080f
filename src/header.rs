// fht: FAIR-bioHeaders metadata conversion, validation, and file binding.
//
// Copyright 2025 Tommi Mäklin [tommi@maklin.fi].
//
// Copyrights in this project are retained by contributors. No copyright assignment
// is required to contribute to this project.
//
// Except as otherwise noted (below and/or in individual files), this
// project is licensed under the Apache License, Version 2.0
// <LICENSE-APACHE> or <http://www.apache.org/licenses/LICENSE-2.0> or
// the MIT license, <LICENSE-MIT> or <http://opensource.org/licenses/MIT>,
// at your option.
//

//! Encoding independent representation of an FHT header.
//!
//! A [Header] is an ordered mapping from field names to [Value]s. A value is
//! a [Scalar], a sequence of scalars or sub-records, or a nested [Header].
//!
//! Insertion order is kept so that encoding an unchanged header twice gives
//! byte-identical output, but it carries no meaning: two headers holding the
//! same fields in a different order compare equal.
//!
//! [Header] implements [Serialize](serde::Serialize) and
//! [Deserialize](serde::Deserialize) so that the JSON and YAML adapters can
//! use it directly. Deserializing rejects null values, non-finite floats,
//! empty or duplicate field names, and sequences nested in sequences.
//!
//! ## Usage
//!
//! ```rust
//! use fht::header::{Header, Scalar, Value};
//!
//! let mut taxon = Header::new();
//! taxon.insert("name", Value::from("Homo sapiens"));
//!
//! let mut header = Header::new();
//! header.insert("genome", Value::from("GRCh38"));
//! header.insert("taxon", Value::Record(taxon));
//! header.insert("genomeSynonym", Value::Sequence(vec![Value::from("hg38")]));
//!
//! assert_eq!(header.get("taxon.name"), Some(&Value::from("Homo sapiens")));
//! assert_eq!(header.get("genomeSynonym[0]"), Some(&Value::Scalar(Scalar::String("hg38".to_string()))));
//! assert_eq!(header.get("taxon.uri"), None);
//! ```
//!

use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::Encoding;

/// A numeric scalar.
///
/// Integers that fit in an [i64] are always stored as
/// [Integer](Number::Integer); [Unsigned](Number::Unsigned) only holds values
/// above [i64::MAX].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Unsigned(u64),
    Float(f64),
}

impl Number {
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(x) => *x as f64,
            Number::Unsigned(x) => *x as f64,
            Number::Float(x) => *x,
        }
    }

    /// True for integers and for floats without a fractional part.
    pub fn is_integral(&self) -> bool {
        match self {
            Number::Integer(_) | Number::Unsigned(_) => true,
            Number::Float(x) => x.is_finite() && x.fract() == 0.0,
        }
    }

    /// Parses an integer or a finite float from `text`.
    pub fn parse(text: &str) -> Option<Number> {
        if let Ok(x) = text.parse::<i64>() {
            return Some(Number::Integer(x));
        }
        if let Ok(x) = text.parse::<u64>() {
            return Some(Number::Unsigned(x));
        }
        match text.parse::<f64>() {
            Ok(x) if x.is_finite() => Some(Number::Float(x)),
            _ => None,
        }
    }
}

impl From<i64> for Number {
    fn from(x: i64) -> Self {
        Number::Integer(x)
    }
}

impl From<u64> for Number {
    fn from(x: u64) -> Self {
        match i64::try_from(x) {
            Ok(x) => Number::Integer(x),
            Err(_) => Number::Unsigned(x),
        }
    }
}

impl From<f64> for Number {
    fn from(x: f64) -> Self {
        Number::Float(x)
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Integer(x) => write!(f, "{}", x),
            Number::Unsigned(x) => write!(f, "{}", x),
            // Debug always keeps a '.' or an exponent so the value parses back as a float.
            Number::Float(x) => write!(f, "{:?}", x),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Number(Number),
    Boolean(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    /// Entries are scalars or records, never sequences.
    Sequence(Vec<Value>),
    Record(Header),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(Scalar::String(x)) => Some(x),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Header> {
        match self {
            Value::Record(x) => Some(x),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(x) => Some(x),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(x: &str) -> Self {
        Value::Scalar(Scalar::String(x.to_string()))
    }
}

impl From<String> for Value {
    fn from(x: String) -> Self {
        Value::Scalar(Scalar::String(x))
    }
}

impl From<i64> for Value {
    fn from(x: i64) -> Self {
        Value::Scalar(Scalar::Number(Number::from(x)))
    }
}

impl From<u64> for Value {
    fn from(x: u64) -> Self {
        Value::Scalar(Scalar::Number(Number::from(x)))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Scalar(Scalar::Number(Number::from(x)))
    }
}

impl From<bool> for Value {
    fn from(x: bool) -> Self {
        Value::Scalar(Scalar::Boolean(x))
    }
}

impl From<Header> for Value {
    fn from(x: Header) -> Self {
        Value::Record(x)
    }
}

/// An FHT header or one of its nested sub-records.
#[derive(Debug, Clone, Default)]
pub struct Header {
    fields: IndexMap<String, Value>,
    encoding_hint: Option<Encoding>,
}

impl PartialEq for Header {
    // IndexMap equality does not depend on insertion order.
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

enum Segment<'a> {
    Field(&'a str),
    Index(usize),
}

fn parse_path(path: &str) -> Option<Vec<Segment<'_>>> {
    let mut segments: Vec<Segment> = Vec::new();
    for part in path.split('.') {
        let (name, mut rest) = match part.find('[') {
            Some(idx) => (&part[..idx], &part[idx..]),
            None => (part, ""),
        };
        if name.is_empty() {
            return None
        }
        segments.push(Segment::Field(name));
        while !rest.is_empty() {
            let close = rest.find(']')?;
            let index = rest.strip_prefix('[')?.get(..close - 1)?.parse::<usize>().ok()?;
            segments.push(Segment::Index(index));
            rest = &rest[close + 1..];
        }
    }
    Some(segments)
}

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces `name`, returning the previous value.
    ///
    /// A replaced field keeps its original position.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: Value,
    ) -> Option<Value> {
        self.fields.insert(name.into(), value)
    }

    /// Removes `name`, keeping the order of the remaining fields.
    pub fn remove(
        &mut self,
        name: &str,
    ) -> Option<Value> {
        self.fields.shift_remove(name)
    }

    /// Value of the top level field `name`.
    pub fn field(
        &self,
        name: &str,
    ) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn contains(
        &self,
        name: &str,
    ) -> bool {
        self.fields.contains_key(name)
    }

    /// Looks up a dotted and indexed path such as `metadataAuthor[0].name`.
    ///
    /// Returns None if the path is malformed or any step does not exist.
    pub fn get(
        &self,
        path: &str,
    ) -> Option<&Value> {
        let segments = parse_path(path)?;
        let mut segments = segments.into_iter();

        let mut current: &Value = match segments.next()? {
            Segment::Field(name) => self.fields.get(name)?,
            Segment::Index(_) => return None,
        };
        for segment in segments {
            current = match (segment, current) {
                (Segment::Field(name), Value::Record(record)) => record.fields.get(name)?,
                (Segment::Index(idx), Value::Sequence(items)) => items.get(idx)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Iterates over the fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The adapter that produced this header, if it was decoded.
    ///
    /// Not part of the header contents and ignored by equality.
    pub fn encoding_hint(&self) -> Option<Encoding> {
        self.encoding_hint
    }

    pub fn set_encoding_hint(
        &mut self,
        encoding: Option<Encoding>,
    ) {
        self.encoding_hint = encoding;
    }
}

impl Serialize for Header {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Scalar(scalar) => scalar.serialize(serializer),
            Value::Sequence(items) => serializer.collect_seq(items),
            Value::Record(record) => record.serialize(serializer),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::String(x) => serializer.serialize_str(x),
            Scalar::Number(Number::Integer(x)) => serializer.serialize_i64(*x),
            Scalar::Number(Number::Unsigned(x)) => serializer.serialize_u64(*x),
            Scalar::Number(Number::Float(x)) => serializer.serialize_f64(*x),
            Scalar::Boolean(x) => serializer.serialize_bool(*x),
        }
    }
}

struct HeaderVisitor;

impl<'de> Visitor<'de> for HeaderVisitor {
    type Value = Header;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "a mapping of field names to values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Header, A::Error> {
        let mut header = Header::new();
        while let Some(name) = map.next_key::<String>()? {
            if name.is_empty() {
                return Err(de::Error::custom("field names must not be empty"));
            }
            if header.fields.contains_key(&name) {
                return Err(de::Error::custom(format!("duplicate field '{}'", name)));
            }
            let value = map.next_value::<Value>()?;
            header.fields.insert(name, value);
        }
        Ok(header)
    }
}

impl<'de> Deserialize<'de> for Header {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(HeaderVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "a string, number, boolean, sequence or mapping")
    }

    fn visit_bool<E: de::Error>(self, x: bool) -> Result<Value, E> {
        Ok(Value::from(x))
    }

    fn visit_i64<E: de::Error>(self, x: i64) -> Result<Value, E> {
        Ok(Value::from(x))
    }

    fn visit_u64<E: de::Error>(self, x: u64) -> Result<Value, E> {
        Ok(Value::from(x))
    }

    fn visit_f64<E: de::Error>(self, x: f64) -> Result<Value, E> {
        if !x.is_finite() {
            return Err(E::custom(format!("non-finite number {} cannot be stored in a header", x)));
        }
        Ok(Value::from(x))
    }

    fn visit_str<E: de::Error>(self, x: &str) -> Result<Value, E> {
        Ok(Value::from(x))
    }

    fn visit_string<E: de::Error>(self, x: String) -> Result<Value, E> {
        Ok(Value::from(x))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Err(E::custom("null values cannot be stored in a header"))
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        self.visit_unit()
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items: Vec<Value> = Vec::new();
        while let Some(item) = seq.next_element::<Value>()? {
            if let Value::Sequence(_) = item {
                return Err(de::Error::custom("sequences nested in sequences cannot be stored in a header"));
            }
            items.push(item);
        }
        Ok(Value::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Value, A::Error> {
        HeaderVisitor.visit_map(map).map(Value::Record)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

// Tests
#[cfg(test)]
mod tests {

    fn author(name: &str, uri: &str) -> super::Value {
        use super::{Header, Value};
        let mut record = Header::new();
        record.insert("name", Value::from(name));
        record.insert("uri", Value::from(uri));
        Value::Record(record)
    }

    #[test]
    fn get_nested_and_indexed_paths() {
        use super::{Header, Value};

        let mut header = Header::new();
        header.insert("metadataAuthor", Value::Sequence(vec![
            author("Adam Wright", "https://orcid.org/0000-0002-5719-4024"),
            author("Jane Doe", "https://orcid.org/0000-0000-0000-0000"),
        ]));

        assert_eq!(header.get("metadataAuthor[1].name"), Some(&Value::from("Jane Doe")));
        assert_eq!(header.get("metadataAuthor[2].name"), None);
        assert_eq!(header.get("metadataAuthor.name"), None);
        assert_eq!(header.get("metadataAuthor[x]"), None);
        assert_eq!(header.get(""), None);
    }

    #[test]
    fn equality_ignores_key_order_and_hint() {
        use super::{Header, Value};
        use crate::Encoding;

        let mut first = Header::new();
        first.insert("title", Value::from("x"));
        first.insert("organism", Value::from("y"));

        let mut second = Header::new();
        second.insert("organism", Value::from("y"));
        second.insert("title", Value::from("x"));
        second.set_encoding_hint(Some(Encoding::Yaml));

        assert_eq!(first, second);
    }

    #[test]
    fn equality_is_order_sensitive_for_sequences() {
        use super::{Header, Value};

        let mut first = Header::new();
        first.insert("instrument", Value::Sequence(vec![Value::from("a"), Value::from("b")]));
        let mut second = Header::new();
        second.insert("instrument", Value::Sequence(vec![Value::from("b"), Value::from("a")]));

        assert_ne!(first, second);
    }

    #[test]
    fn insert_keeps_position_of_replaced_field() {
        use super::{Header, Value};

        let mut header = Header::new();
        header.insert("a", Value::from(1_i64));
        header.insert("b", Value::from(2_i64));
        let old = header.insert("a", Value::from(3_i64));

        assert_eq!(old, Some(Value::from(1_i64)));
        let names: Vec<&String> = header.fields().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn number_from_u64_prefers_signed() {
        use super::Number;

        assert_eq!(Number::from(42_u64), Number::Integer(42));
        assert_eq!(Number::from(u64::MAX), Number::Unsigned(u64::MAX));
    }

    #[test]
    fn number_display_keeps_floats_floats() {
        use super::Number;

        assert_eq!(Number::Float(1.0).to_string(), "1.0");
        assert_eq!(Number::parse(&Number::Float(1e16).to_string()), Some(Number::Float(1e16)));
        assert_eq!(Number::parse("12"), Some(Number::Integer(12)));
        assert_eq!(Number::parse("inf"), None);
        assert_eq!(Number::parse("abc"), None);
    }
}
