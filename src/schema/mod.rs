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

//! Validation of [Header]s against a JSON Schema document.
//!
//! The validator is a generic interpreter over the schema document; it has
//! no knowledge of individual FHT fields. It never modifies the header and
//! keeps nothing between calls, so the same schema and header always give
//! the same [ValidationResult].
//!
//! Fields that the schema does not mention are accepted unless the schema
//! sets `additionalProperties` to `false` or to a schema they fail.
//!
//! Supported keywords: `type`, `enum`, `const`, `pattern`, `minLength`,
//! `maxLength`, `minimum`, `maximum`, `exclusiveMinimum`,
//! `exclusiveMaximum`, `required`, `properties`, `additionalProperties`,
//! `items`, `minItems`, `maxItems`, `uniqueItems`, `allOf`, `anyOf`,
//! `oneOf`, `not`, and local `$ref`s. `format` is treated as an annotation.
//!
//! ## Usage
//!
//! ```rust
//! use fht::parser::json::read_json;
//! use fht::schema::{validate, Constraint};
//!
//! let schema = serde_json::json!({
//!     "type": "object",
//!     "properties": { "title": { "type": "string" } },
//!     "required": ["title"]
//! });
//!
//! let header = read_json(r#"{"organism": "y"}"#).unwrap();
//! let result = validate(&header, &schema).unwrap();
//!
//! assert!(!result.is_valid());
//! assert_eq!(result.violations()[0].constraint, Constraint::Required("title".to_string()));
//! assert_eq!(result.violations()[0].field_path(), "title");
//! ```
//!

use std::collections::HashMap;

use regex::Regex;
use serde_json::Map;
use serde_json::Value as JsonValue;

use crate::error::FhtError;
use crate::header::{Header, Number, Scalar, Value};

/// Consecutive `$ref` hops allowed on one header value; more means a cycle.
const MAX_REFERENCE_HOPS: usize = 64;
const FHT_SCHEMA: &str = include_str!("fht.json");

/// The FHT schema bundled with this crate.
pub fn fht_schema() -> Result<JsonValue, FhtError> {
    serde_json::from_str(FHT_SCHEMA).map_err(|err| FhtError::InvalidSchema(err.to_string()))
}

/// A schema constraint that a header value did not meet.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Type(Vec<String>),
    /// Names the field missing from the record at the violation path.
    Required(String),
    Enum(Vec<JsonValue>),
    Const(JsonValue),
    Pattern(String),
    MinLength(u64),
    MaxLength(u64),
    Minimum(f64),
    Maximum(f64),
    ExclusiveMinimum(f64),
    ExclusiveMaximum(f64),
    MinItems(u64),
    MaxItems(u64),
    UniqueItems,
    /// The field is not declared and the schema forbids undeclared fields.
    AdditionalProperties,
    AnyOf,
    /// Number of `oneOf` subschemas that matched.
    OneOf(usize),
    Not,
    /// The value was checked against the `false` schema.
    Never,
}

impl std::fmt::Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Constraint::Type(types) => write!(f, "type {}", types.join(" or ")),
            Constraint::Required(name) => write!(f, "required field '{}'", name),
            Constraint::Enum(values) => write!(f, "one of {}", JsonValue::Array(values.clone())),
            Constraint::Const(value) => write!(f, "constant {}", value),
            Constraint::Pattern(pattern) => write!(f, "string matching /{}/", pattern),
            Constraint::MinLength(n) => write!(f, "at least {} characters", n),
            Constraint::MaxLength(n) => write!(f, "at most {} characters", n),
            Constraint::Minimum(x) => write!(f, "number >= {}", x),
            Constraint::Maximum(x) => write!(f, "number <= {}", x),
            Constraint::ExclusiveMinimum(x) => write!(f, "number > {}", x),
            Constraint::ExclusiveMaximum(x) => write!(f, "number < {}", x),
            Constraint::MinItems(n) => write!(f, "at least {} items", n),
            Constraint::MaxItems(n) => write!(f, "at most {} items", n),
            Constraint::UniqueItems => write!(f, "unique items"),
            Constraint::AdditionalProperties => write!(f, "no undeclared field"),
            Constraint::AnyOf => write!(f, "a match for at least one anyOf subschema"),
            Constraint::OneOf(n) => write!(f, "a match for exactly one oneOf subschema, matched {}", n),
            Constraint::Not => write!(f, "no match for the not subschema"),
            Constraint::Never => write!(f, "nothing, the schema is false"),
        }
    }
}

/// One failed constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// Path of the offending value, or of the parent record for
    /// [Required](Constraint::Required). Empty for the header itself.
    pub path: String,
    pub constraint: Constraint,
    /// Compact JSON rendering of the value found, `absent` for missing fields.
    pub found: String,
}

impl Violation {
    /// Path of the field the violation is about, including a missing field's name.
    pub fn field_path(&self) -> String {
        match &self.constraint {
            Constraint::Required(name) => child_path(&self.path, name),
            _ => self.path.clone(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let path = if self.path.is_empty() { "(root)" } else { &self.path };
        write!(f, "{}: expected {}, found {}", path, self.constraint, self.found)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    Valid,
    /// Violations in a deterministic order; never empty.
    Invalid(Vec<Violation>),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn violations(&self) -> &[Violation] {
        match self {
            ValidationResult::Valid => &[],
            ValidationResult::Invalid(violations) => violations,
        }
    }

    /// Turns an invalid result into [SchemaViolation](FhtError::SchemaViolation).
    pub fn into_result(self) -> Result<(), FhtError> {
        match self {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid(violations) => Err(FhtError::SchemaViolation(violations)),
        }
    }
}

fn child_path(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", path, name)
    }
}

fn index_path(path: &str, idx: usize) -> String {
    format!("{}[{}]", path, idx)
}

/// Resolves a local reference such as `#/definitions/orcidUri`.
pub(crate) fn resolve_reference<'s>(
    root: &'s JsonValue,
    reference: &str,
) -> Option<&'s JsonValue> {
    let pointer = reference.strip_prefix('#')?;
    if pointer.is_empty() {
        return Some(root)
    }
    root.pointer(pointer)
}

#[derive(Clone, Copy)]
enum Instance<'h> {
    Scalar(&'h Scalar),
    Sequence(&'h [Value]),
    Record(&'h Header),
}

impl<'h> From<&'h Value> for Instance<'h> {
    fn from(value: &'h Value) -> Self {
        match value {
            Value::Scalar(scalar) => Instance::Scalar(scalar),
            Value::Sequence(items) => Instance::Sequence(items),
            Value::Record(record) => Instance::Record(record),
        }
    }
}

impl Instance<'_> {
    fn render(&self) -> String {
        let rendered = match self {
            Instance::Scalar(scalar) => serde_json::to_string(scalar),
            Instance::Sequence(items) => serde_json::to_string(items),
            Instance::Record(record) => serde_json::to_string(record),
        };
        rendered.unwrap_or_else(|_| "?".to_string())
    }

    fn matches_type(&self, name: &str) -> Result<bool, FhtError> {
        Ok(match name {
            "string" => matches!(self, Instance::Scalar(Scalar::String(_))),
            "number" => matches!(self, Instance::Scalar(Scalar::Number(_))),
            "integer" => matches!(self, Instance::Scalar(Scalar::Number(x)) if x.is_integral()),
            "boolean" => matches!(self, Instance::Scalar(Scalar::Boolean(_))),
            "object" => matches!(self, Instance::Record(_)),
            "array" => matches!(self, Instance::Sequence(_)),
            "null" => false,
            other => return Err(FhtError::InvalidSchema(format!("unknown type '{}'", other))),
        })
    }

    fn equals(&self, expected: &JsonValue) -> bool {
        match (self, expected) {
            (Instance::Scalar(Scalar::String(x)), JsonValue::String(y)) => x == y,
            (Instance::Scalar(Scalar::Boolean(x)), JsonValue::Bool(y)) => x == y,
            (Instance::Scalar(Scalar::Number(x)), JsonValue::Number(y)) => number_equals(*x, y),
            (Instance::Sequence(items), JsonValue::Array(expected)) => {
                items.len() == expected.len()
                    && items.iter().zip(expected).all(|(item, y)| Instance::from(item).equals(y))
            },
            (Instance::Record(record), JsonValue::Object(expected)) => {
                record.len() == expected.len()
                    && expected.iter().all(|(name, y)| record.field(name).is_some_and(|x| Instance::from(x).equals(y)))
            },
            _ => false,
        }
    }
}

fn number_equals(x: Number, y: &serde_json::Number) -> bool {
    match (x, y.as_i64(), y.as_u64()) {
        (Number::Integer(a), Some(b), _) => a == b,
        (Number::Unsigned(a), _, Some(b)) => a == b,
        _ => y.as_f64().is_some_and(|b| x.as_f64() == b),
    }
}

fn invalid(keyword: &str, path: &str, expected: &str) -> FhtError {
    let path = if path.is_empty() { "(root)" } else { path };
    FhtError::InvalidSchema(format!("'{}' applied at {} must be {}", keyword, path, expected))
}

fn keyword_u64(keywords: &Map<String, JsonValue>, keyword: &str, path: &str) -> Result<Option<u64>, FhtError> {
    match keywords.get(keyword) {
        None => Ok(None),
        Some(value) => value.as_u64().map(Some).ok_or_else(|| invalid(keyword, path, "a non-negative integer")),
    }
}

fn keyword_f64(keywords: &Map<String, JsonValue>, keyword: &str, path: &str) -> Result<Option<f64>, FhtError> {
    match keywords.get(keyword) {
        None => Ok(None),
        Some(value) => value.as_f64().map(Some).ok_or_else(|| invalid(keyword, path, "a number")),
    }
}

fn keyword_array<'s>(keywords: &'s Map<String, JsonValue>, keyword: &str, path: &str) -> Result<Option<&'s Vec<JsonValue>>, FhtError> {
    match keywords.get(keyword) {
        None => Ok(None),
        Some(value) => value.as_array().map(Some).ok_or_else(|| invalid(keyword, path, "an array")),
    }
}

struct Validator<'s> {
    root: &'s JsonValue,
    patterns: HashMap<String, Regex>,
    violations: Vec<Violation>,
}

impl<'s> Validator<'s> {
    fn push(&mut self, path: &str, constraint: Constraint, found: String) {
        self.violations.push(Violation { path: path.to_string(), constraint, found });
    }

    fn is_match(&mut self, pattern: &str, text: &str) -> Result<bool, FhtError> {
        if !self.patterns.contains_key(pattern) {
            let regex = Regex::new(pattern)
                .map_err(|err| FhtError::InvalidSchema(format!("pattern /{}/ does not compile: {}", pattern, err)))?;
            self.patterns.insert(pattern.to_string(), regex);
        }
        Ok(self.patterns.get(pattern).is_some_and(|regex| regex.is_match(text)))
    }

    /// Checks `instance` without keeping the violations it produces.
    fn passes(&mut self, instance: Instance<'_>, schema: &'s JsonValue, path: &str, hops: usize) -> Result<bool, FhtError> {
        let before = self.violations.len();
        self.check(instance, schema, path, hops)?;
        let passed = self.violations.len() == before;
        self.violations.truncate(before);
        Ok(passed)
    }

    /// `hops` counts the `$ref`s followed since the walk reached `instance`.
    fn check(&mut self, instance: Instance<'_>, schema: &'s JsonValue, path: &str, hops: usize) -> Result<(), FhtError> {
        if hops > MAX_REFERENCE_HOPS {
            return Err(FhtError::InvalidSchema(format!("more than {} $ref hops without reaching a schema, the references form a cycle", MAX_REFERENCE_HOPS)))
        }
        let keywords = match schema {
            JsonValue::Bool(true) => return Ok(()),
            JsonValue::Bool(false) => {
                self.push(path, Constraint::Never, instance.render());
                return Ok(())
            },
            JsonValue::Object(keywords) => keywords,
            _ => return Err(invalid("schema", path, "an object or a boolean")),
        };

        if let Some(reference) = keywords.get("$ref") {
            let reference = reference.as_str().ok_or_else(|| invalid("$ref", path, "a string"))?;
            let target = resolve_reference(self.root, reference)
                .ok_or_else(|| FhtError::InvalidSchema(format!("cannot resolve $ref '{}'", reference)))?;
            self.check(instance, target, path, hops + 1)?;
        }

        if let Some(types) = keywords.get("type") {
            let names: Vec<&str> = match types {
                JsonValue::String(name) => vec![name.as_str()],
                JsonValue::Array(names) => names.iter()
                    .map(|name| name.as_str().ok_or_else(|| invalid("type", path, "a string or an array of strings")))
                    .collect::<Result<Vec<&str>, FhtError>>()?,
                _ => return Err(invalid("type", path, "a string or an array of strings")),
            };
            let mut matched = false;
            for name in &names {
                matched |= instance.matches_type(name)?;
            }
            if !matched {
                self.push(path, Constraint::Type(names.iter().map(|x| x.to_string()).collect()), instance.render());
            }
        }

        if let Some(allowed) = keyword_array(keywords, "enum", path)? {
            if !allowed.iter().any(|x| instance.equals(x)) {
                self.push(path, Constraint::Enum(allowed.clone()), instance.render());
            }
        }

        if let Some(expected) = keywords.get("const") {
            if !instance.equals(expected) {
                self.push(path, Constraint::Const(expected.clone()), instance.render());
            }
        }

        match instance {
            Instance::Scalar(Scalar::String(text)) => self.check_string(text, keywords, path)?,
            Instance::Scalar(Scalar::Number(number)) => self.check_number(*number, keywords, path)?,
            Instance::Scalar(Scalar::Boolean(_)) => {},
            Instance::Sequence(items) => self.check_sequence(items, keywords, path)?,
            Instance::Record(record) => self.check_record(record, keywords, path)?,
        }

        if let Some(schemas) = keyword_array(keywords, "allOf", path)? {
            for schema in schemas {
                self.check(instance, schema, path, hops)?;
            }
        }

        if let Some(schemas) = keyword_array(keywords, "anyOf", path)? {
            let mut any = false;
            for schema in schemas {
                if self.passes(instance, schema, path, hops)? {
                    any = true;
                    break
                }
            }
            if !any {
                self.push(path, Constraint::AnyOf, instance.render());
            }
        }

        if let Some(schemas) = keyword_array(keywords, "oneOf", path)? {
            let mut matched = 0;
            for schema in schemas {
                if self.passes(instance, schema, path, hops)? {
                    matched += 1;
                }
            }
            if matched != 1 {
                self.push(path, Constraint::OneOf(matched), instance.render());
            }
        }

        if let Some(schema) = keywords.get("not") {
            if self.passes(instance, schema, path, hops)? {
                self.push(path, Constraint::Not, instance.render());
            }
        }

        Ok(())
    }

    fn check_string(&mut self, text: &str, keywords: &'s Map<String, JsonValue>, path: &str) -> Result<(), FhtError> {
        let found = || JsonValue::String(text.to_string()).to_string();
        let len = text.chars().count() as u64;

        if let Some(min) = keyword_u64(keywords, "minLength", path)? {
            if len < min {
                self.push(path, Constraint::MinLength(min), found());
            }
        }
        if let Some(max) = keyword_u64(keywords, "maxLength", path)? {
            if len > max {
                self.push(path, Constraint::MaxLength(max), found());
            }
        }
        if let Some(pattern) = keywords.get("pattern") {
            let pattern = pattern.as_str().ok_or_else(|| invalid("pattern", path, "a string"))?;
            if !self.is_match(pattern, text)? {
                self.push(path, Constraint::Pattern(pattern.to_string()), found());
            }
        }
        Ok(())
    }

    fn check_number(&mut self, number: Number, keywords: &'s Map<String, JsonValue>, path: &str) -> Result<(), FhtError> {
        let x = number.as_f64();
        let found = number.to_string();

        if let Some(min) = keyword_f64(keywords, "minimum", path)? {
            if x < min {
                self.push(path, Constraint::Minimum(min), found.clone());
            }
        }
        if let Some(max) = keyword_f64(keywords, "maximum", path)? {
            if x > max {
                self.push(path, Constraint::Maximum(max), found.clone());
            }
        }
        if let Some(min) = keyword_f64(keywords, "exclusiveMinimum", path)? {
            if x <= min {
                self.push(path, Constraint::ExclusiveMinimum(min), found.clone());
            }
        }
        if let Some(max) = keyword_f64(keywords, "exclusiveMaximum", path)? {
            if x >= max {
                self.push(path, Constraint::ExclusiveMaximum(max), found);
            }
        }
        Ok(())
    }

    fn check_sequence(&mut self, items: &[Value], keywords: &'s Map<String, JsonValue>, path: &str) -> Result<(), FhtError> {
        let found = || Instance::Sequence(items).render();
        let len = items.len() as u64;

        if let Some(min) = keyword_u64(keywords, "minItems", path)? {
            if len < min {
                self.push(path, Constraint::MinItems(min), found());
            }
        }
        if let Some(max) = keyword_u64(keywords, "maxItems", path)? {
            if len > max {
                self.push(path, Constraint::MaxItems(max), found());
            }
        }
        if keywords.get("uniqueItems").and_then(JsonValue::as_bool).unwrap_or(false) {
            let duplicated = items.iter().enumerate().any(|(idx, item)| items[..idx].contains(item));
            if duplicated {
                self.push(path, Constraint::UniqueItems, found());
            }
        }

        match keywords.get("items") {
            None => {},
            // Older drafts validate positionally when `items` is an array.
            Some(JsonValue::Array(schemas)) => {
                for (idx, (item, schema)) in items.iter().zip(schemas).enumerate() {
                    self.check(Instance::from(item), schema, &index_path(path, idx), 0)?;
                }
            },
            Some(schema) => {
                for (idx, item) in items.iter().enumerate() {
                    self.check(Instance::from(item), schema, &index_path(path, idx), 0)?;
                }
            },
        }
        Ok(())
    }

    fn check_record(&mut self, record: &Header, keywords: &'s Map<String, JsonValue>, path: &str) -> Result<(), FhtError> {
        if let Some(required) = keyword_array(keywords, "required", path)? {
            for name in required {
                let name = name.as_str().ok_or_else(|| invalid("required", path, "an array of strings"))?;
                if !record.contains(name) {
                    self.push(path, Constraint::Required(name.to_string()), "absent".to_string());
                }
            }
        }

        let properties = match keywords.get("properties") {
            None => None,
            Some(JsonValue::Object(properties)) => Some(properties),
            Some(_) => return Err(invalid("properties", path, "an object")),
        };
        let additional = keywords.get("additionalProperties");

        for (name, value) in record.fields() {
            let field_path = child_path(path, name);
            match (properties.and_then(|x| x.get(name)), additional) {
                (Some(schema), _) => self.check(Instance::from(value), schema, &field_path, 0)?,
                (None, Some(JsonValue::Bool(false))) => {
                    self.push(&field_path, Constraint::AdditionalProperties, Instance::from(value).render());
                },
                (None, Some(schema)) => self.check(Instance::from(value), schema, &field_path, 0)?,
                (None, None) => {},
            }
        }
        Ok(())
    }
}

/// Validate `header` against `schema`.
///
/// Returns [Valid](ValidationResult::Valid) or the full, ordered list of
/// violations. Fails only when the schema itself cannot be interpreted, with
/// [InvalidSchema](FhtError::InvalidSchema).
///
/// Violations are ordered by where they occur: keywords are applied as
/// `$ref`, `type`, `enum`, `const`, value keywords, `allOf`, `anyOf`,
/// `oneOf`, `not`. Within a record, missing required fields come first in
/// the order the schema lists them, then the fields in header order.
///
pub fn validate(
    header: &Header,
    schema: &JsonValue,
) -> Result<ValidationResult, FhtError> {
    let mut validator = Validator { root: schema, patterns: HashMap::new(), violations: Vec::new() };
    validator.check(Instance::Record(header), schema, "", 0)?;

    if validator.violations.is_empty() {
        Ok(ValidationResult::Valid)
    } else {
        Ok(ValidationResult::Invalid(validator.violations))
    }
}

/// A position in a schema document, used to guide decoders whose text does
/// not carry value types.
#[derive(Clone, Copy)]
pub(crate) struct SchemaHint<'s> {
    root: &'s JsonValue,
    node: &'s JsonValue,
}

impl<'s> SchemaHint<'s> {
    pub(crate) fn new(root: &'s JsonValue) -> Self {
        SchemaHint { root, node: root }
    }

    /// Keywords of this node, following `$ref`s that stand in for the whole node.
    fn keywords(&self) -> Option<&'s Map<String, JsonValue>> {
        let mut node = self.node;
        for _ in 0..MAX_REFERENCE_HOPS {
            let keywords = node.as_object()?;
            match keywords.get("$ref").and_then(JsonValue::as_str) {
                Some(reference) if !keywords.contains_key("type") && !keywords.contains_key("properties") => {
                    node = resolve_reference(self.root, reference)?;
                },
                _ => return Some(keywords),
            }
        }
        None
    }

    pub(crate) fn property(&self, name: &str) -> Option<SchemaHint<'s>> {
        let keywords = self.keywords()?;
        let node = keywords.get("properties").and_then(|properties| properties.get(name))
            .or_else(|| keywords.get("additionalProperties").filter(|x| x.is_object()))?;
        Some(SchemaHint { root: self.root, node })
    }

    pub(crate) fn items(&self) -> Option<SchemaHint<'s>> {
        let node = self.keywords()?.get("items").filter(|x| x.is_object())?;
        Some(SchemaHint { root: self.root, node })
    }

    /// Declared `type` names, empty if the node does not declare any.
    pub(crate) fn types(&self) -> Vec<&'s str> {
        match self.keywords().and_then(|keywords| keywords.get("type")) {
            Some(JsonValue::String(name)) => vec![name.as_str()],
            Some(JsonValue::Array(names)) => names.iter().filter_map(JsonValue::as_str).collect(),
            _ => Vec::new(),
        }
    }
}
