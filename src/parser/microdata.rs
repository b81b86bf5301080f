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
use indexmap::IndexMap;

use crate::Encoding;
use crate::error::FhtError;
use crate::error::Position;
use crate::header::{Header, Number, Scalar, Value};
use crate::schema::SchemaHint;

const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img",
    "input", "link", "meta", "param", "source", "track", "wbr",
];
const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

/// Attribute marking an element as one entry of a sequence.
pub const SEQUENCE_MARKER: &str = "data-fht-sequence";
/// Value of [SEQUENCE_MARKER] on the placeholder of an empty sequence.
pub const EMPTY_SEQUENCE: &str = "empty";

#[derive(Debug)]
enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug)]
struct Element {
    name: String,
    attributes: Vec<(String, Option<String>)>,
    children: Vec<Node>,
    offset: usize,
}

impl Element {
    fn new(name: String, offset: usize) -> Self {
        Element { name, attributes: Vec::new(), children: Vec::new(), offset }
    }

    fn attribute(&self, name: &str) -> Option<Option<&str>> {
        self.attributes.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_deref())
    }

    fn has(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Attribute value, or "" for an attribute given without one.
    fn value_of(&self, name: &str) -> Option<&str> {
        self.attribute(name).map(|value| value.unwrap_or(""))
    }

    fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    fn text_content(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out);
        out
    }

    fn push_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => element.push_text(out),
            }
        }
    }
}

fn malformed_at(source: &str, offset: usize, message: impl Into<String>) -> FhtError {
    FhtError::malformed(Encoding::Microdata, message, Some(Position::from_offset(source, offset)))
}

/// Replaces HTML character references in `raw`.
///
/// `offset` is the position of `raw` in `source` and is only used for
/// error positions.
fn decode_references(
    raw: &str,
    offset: usize,
    source: &str,
) -> Result<String, FhtError> {
    if !raw.contains('&') {
        return Ok(raw.to_string())
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(idx) = rest.find('&') {
        out.push_str(&rest[..idx]);
        let start = offset + (raw.len() - rest.len()) + idx;
        let after = &rest[idx + 1..];

        if let Some(numeric) = after.strip_prefix('#') {
            let end = numeric.find(';').ok_or_else(|| malformed_at(source, start, "character reference is missing ';'"))?;
            let digits = &numeric[..end];
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => digits.parse::<u32>().ok(),
            };
            let decoded = code.and_then(char::from_u32).ok_or_else(|| {
                malformed_at(source, start, format!("invalid character reference '&#{};'", digits))
            })?;
            out.push(decoded);
            rest = &numeric[end + 1..];
        } else if after.starts_with(|c: char| c.is_ascii_alphabetic()) {
            let end = after.find(|c: char| !c.is_ascii_alphanumeric()).unwrap_or(after.len());
            if !after[end..].starts_with(';') {
                return Err(malformed_at(source, start, "character reference is missing ';'"))
            }
            let decoded = match &after[..end] {
                "amp" => '&',
                "lt" => '<',
                "gt" => '>',
                "quot" => '"',
                "apos" => '\'',
                "nbsp" => '\u{a0}',
                other => return Err(malformed_at(source, start, format!("unknown character reference '&{};'", other))),
            };
            out.push(decoded);
            rest = &after[end + 1..];
        } else {
            // A lone '&' is literal text.
            out.push('&');
            rest = after;
        }
    }
    out.push_str(rest);
    Ok(out)
}

fn skip_whitespace(bytes: &[u8], mut idx: usize) -> usize {
    while idx < bytes.len() && bytes[idx].is_ascii_whitespace() {
        idx += 1;
    }
    idx
}

/// Builds an element tree from an HTML fragment.
///
/// Only balanced markup is accepted: every non-void element must be closed
/// by a matching tag.
struct TreeBuilder<'a> {
    text: &'a str,
    pos: usize,
    stack: Vec<Element>,
}

impl<'a> TreeBuilder<'a> {
    fn new(text: &'a str) -> Self {
        TreeBuilder { text, pos: 0, stack: vec![Element::new("#document".to_string(), 0)] }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn append(&mut self, node: Node) {
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(node);
        }
    }

    fn build(mut self) -> Result<Element, FhtError> {
        while self.pos < self.text.len() {
            let rest = self.rest();
            if rest.starts_with("<!--") {
                let end = rest[4..].find("-->").ok_or_else(|| malformed_at(self.text, self.pos, "unterminated comment"))?;
                self.pos += 4 + end + 3;
            } else if rest.starts_with("</") {
                self.close_tag()?;
            } else if rest.starts_with("<!") || rest.starts_with("<?") {
                let end = rest.find('>').ok_or_else(|| malformed_at(self.text, self.pos, "unterminated markup declaration"))?;
                self.pos += end + 1;
            } else if rest.starts_with('<') && rest[1..].starts_with(|c: char| c.is_ascii_alphabetic()) {
                self.open_tag()?;
            } else {
                let first = rest.chars().next().map_or(1, char::len_utf8);
                let end = rest[first..].find('<').map(|idx| idx + first).unwrap_or(rest.len());
                let text = decode_references(&rest[..end], self.pos, self.text)?;
                self.append(Node::Text(text));
                self.pos += end;
            }
        }

        if self.stack.len() > 1 {
            let open = &self.stack[self.stack.len() - 1];
            return Err(malformed_at(self.text, open.offset, format!("<{}> is never closed", open.name)))
        }
        self.stack.pop().ok_or_else(|| malformed_at(self.text, 0, "empty document"))
    }

    fn close_tag(&mut self) -> Result<(), FhtError> {
        let start = self.pos;
        let rest = self.rest();
        let end = rest.find('>').ok_or_else(|| malformed_at(self.text, start, "unterminated closing tag"))?;
        let name = rest[2..end].trim().to_ascii_lowercase();
        self.pos += end + 1;

        if VOID_ELEMENTS.contains(&name.as_str()) {
            return Ok(())
        }
        if self.stack.len() < 2 {
            return Err(malformed_at(self.text, start, format!("</{}> has no matching opening tag", name)))
        }
        let open = &self.stack[self.stack.len() - 1];
        if open.name != name {
            return Err(malformed_at(self.text, start, format!(
                "</{}> does not match <{}> opened at {}",
                name, open.name, Position::from_offset(self.text, open.offset),
            )))
        }
        if let Some(element) = self.stack.pop() {
            self.append(Node::Element(element));
        }
        Ok(())
    }

    fn open_tag(&mut self) -> Result<(), FhtError> {
        let start = self.pos;
        let bytes = self.text.as_bytes();

        let mut idx = start + 1;
        while idx < bytes.len() && (bytes[idx].is_ascii_alphanumeric() || bytes[idx] == b'-' || bytes[idx] == b':') {
            idx += 1;
        }
        let mut element = Element::new(self.text[start + 1..idx].to_ascii_lowercase(), start);

        let mut self_closing = false;
        loop {
            idx = skip_whitespace(bytes, idx);
            if idx >= bytes.len() {
                return Err(malformed_at(self.text, start, format!("unterminated <{}> tag", element.name)))
            }
            match bytes[idx] {
                b'>' => {
                    idx += 1;
                    break
                },
                b'/' if bytes.get(idx + 1) == Some(&b'>') => {
                    self_closing = true;
                    idx += 2;
                    break
                },
                b'/' => {
                    idx += 1;
                    continue
                },
                _ => {},
            }

            let name_start = idx;
            while idx < bytes.len() && !bytes[idx].is_ascii_whitespace() && !matches!(bytes[idx], b'=' | b'>' | b'/' | b'"' | b'\'' | b'<') {
                idx += 1;
            }
            if idx == name_start {
                return Err(malformed_at(self.text, idx, format!("unexpected character in <{}> tag", element.name)))
            }
            let attribute = self.text[name_start..idx].to_ascii_lowercase();

            idx = skip_whitespace(bytes, idx);
            let mut value: Option<String> = None;
            if bytes.get(idx) == Some(&b'=') {
                idx = skip_whitespace(bytes, idx + 1);
                match bytes.get(idx) {
                    Some(&quote) if quote == b'"' || quote == b'\'' => {
                        let value_start = idx + 1;
                        let len = self.text[value_start..].find(quote as char)
                            .ok_or_else(|| malformed_at(self.text, idx, "unterminated attribute value"))?;
                        value = Some(decode_references(&self.text[value_start..value_start + len], value_start, self.text)?);
                        idx = value_start + len + 1;
                    },
                    Some(_) => {
                        let value_start = idx;
                        while idx < bytes.len() && !bytes[idx].is_ascii_whitespace() && bytes[idx] != b'>' {
                            idx += 1;
                        }
                        value = Some(decode_references(&self.text[value_start..idx], value_start, self.text)?);
                    },
                    None => return Err(malformed_at(self.text, start, format!("unterminated <{}> tag", element.name))),
                }
            }

            // Later duplicates of an attribute are ignored, as browsers do.
            if !element.has(&attribute) {
                element.attributes.push((attribute, value));
            }
        }
        self.pos = idx;

        if self_closing || VOID_ELEMENTS.contains(&element.name.as_str()) {
            self.append(Node::Element(element));
            return Ok(())
        }

        if RAW_TEXT_ELEMENTS.contains(&element.name.as_str()) {
            let closing = format!("</{}", element.name);
            let end = self.rest().to_ascii_lowercase().find(&closing)
                .ok_or_else(|| malformed_at(self.text, start, format!("<{}> is never closed", element.name)))?;
            element.children.push(Node::Text(self.rest()[..end].to_string()));
            self.pos += end;
        }

        self.stack.push(element);
        Ok(())
    }
}

/// Collects elements that carry `itemscope` but no `itemprop`.
fn top_level_items<'e>(
    element: &'e Element,
    out: &mut Vec<&'e Element>,
) {
    for child in element.elements() {
        if child.has("itemscope") && !child.has("itemprop") {
            out.push(child);
        }
        top_level_items(child, out);
    }
}

/// Collects the property elements of the item `element`, in document order.
///
/// Descends into elements that are not items themselves, since their
/// `itemprop` descendants still belong to `element`.
fn collect_properties<'e>(
    element: &'e Element,
    props: &mut IndexMap<String, Vec<&'e Element>>,
) {
    for child in element.elements() {
        if let Some(names) = child.value_of("itemprop") {
            for name in names.split_ascii_whitespace() {
                props.entry(name.to_string()).or_default().push(child);
            }
        }
        if !child.has("itemscope") {
            collect_properties(child, props);
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Kind {
    Text,
    Number,
    Boolean,
}

/// Types a property value from its markup, letting the schema upgrade plain text.
fn typed_scalar(
    text: String,
    kind: Kind,
    types: &[&str],
) -> Scalar {
    let wants_number = kind == Kind::Number
        || (kind == Kind::Text && !types.contains(&"string") && (types.contains(&"integer") || types.contains(&"number")));
    let wants_boolean = kind == Kind::Boolean
        || (kind == Kind::Text && !types.contains(&"string") && types.contains(&"boolean"));

    if wants_number {
        if let Some(number) = Number::parse(text.trim()) {
            return Scalar::Number(number)
        }
    }
    if wants_boolean {
        match text.trim() {
            "true" => return Scalar::Boolean(true),
            "false" => return Scalar::Boolean(false),
            _ => {},
        }
    }
    Scalar::String(text)
}

fn property_value(
    element: &Element,
    hint: Option<SchemaHint<'_>>,
) -> Result<Value, FhtError> {
    if element.has("itemscope") {
        return Ok(Value::Record(read_item(element, hint)?))
    }

    let attribute = |name: &str| element.value_of(name).unwrap_or("").to_string();
    let (text, kind) = match element.name.as_str() {
        "meta" => (attribute("content"), Kind::Boolean),
        "data" | "meter" => (attribute("value"), Kind::Number),
        "a" | "area" | "link" => (attribute("href"), Kind::Text),
        "audio" | "embed" | "iframe" | "img" | "source" | "track" | "video" => (attribute("src"), Kind::Text),
        "object" => (attribute("data"), Kind::Text),
        "time" if element.has("datetime") => (attribute("datetime"), Kind::Text),
        _ => (element.text_content(), Kind::Text),
    };

    let types = hint.map(|hint| hint.types()).unwrap_or_default();
    Ok(Value::Scalar(typed_scalar(text, kind, &types)))
}

fn read_item(
    element: &Element,
    hint: Option<SchemaHint<'_>>,
) -> Result<Header, FhtError> {
    if element.has("itemref") {
        log::warn!("Ignoring itemref on <{}> element; only self-contained items are read", element.name);
    }

    let mut props: IndexMap<String, Vec<&Element>> = IndexMap::new();
    collect_properties(element, &mut props);

    let mut header = Header::new();
    for (name, elements) in props {
        let prop_hint = hint.and_then(|hint| hint.property(&name));
        let types = prop_hint.map(|hint| hint.types()).unwrap_or_default();
        let declares_array = types.contains(&"array");
        let declares_single = !types.is_empty() && !declares_array;
        let entry_hint = if declares_array { prop_hint.and_then(|hint| hint.items()) } else { prop_hint };

        let mut marked = false;
        let mut values: Vec<Value> = Vec::with_capacity(elements.len());
        for element in elements {
            match element.attribute(SEQUENCE_MARKER) {
                Some(Some(EMPTY_SEQUENCE)) => {
                    marked = true;
                    continue
                },
                Some(_) => marked = true,
                None => {},
            }
            values.push(property_value(element, entry_hint)?);
        }

        if declares_single && !marked && values.len() > 1 {
            return Err(FhtError::ambiguous(Encoding::Microdata, format!(
                "property '{}' appears {} times but the schema declares a single value",
                name, values.len(),
            )))
        }

        let is_sequence = marked || declares_array || values.len() > 1;
        let value = match (is_sequence, values.len()) {
            (false, 1) => values.remove(0),
            _ => Value::Sequence(values),
        };
        header.insert(name, value);
    }

    Ok(header)
}

/// Parse a header embedded as microdata in an HTML fragment.
///
/// The fragment must contain exactly one top-level item (an element with
/// `itemscope` and `itemtype` but no `itemprop`). Its properties become the
/// header fields in document order. Repeated property names, or entries
/// marked with [SEQUENCE_MARKER], become sequences.
///
/// ## Usage
///
/// ```rust
/// use fht::parser::microdata::read_microdata;
/// use fht::header::Value;
///
/// let html = r#"<div itemscope itemtype="https://example.org/fht">
///   <span itemprop="genome">GRCh38</span>
///   <div itemprop="taxon" itemscope>
///     <span itemprop="name">Homo sapiens</span>
///   </div>
///   <span itemprop="instrument">PacBio</span>
///   <span itemprop="instrument">Illumina</span>
/// </div>"#;
///
/// let header = read_microdata(html).unwrap();
///
/// assert_eq!(header.get("taxon.name"), Some(&Value::from("Homo sapiens")));
/// assert_eq!(header.get("instrument[1]"), Some(&Value::from("Illumina")));
/// ```
///
pub fn read_microdata(
    text: &str,
) -> Result<Header, FhtError> {
    read_microdata_with_schema(text, None)
}

/// Parse a microdata header, using `schema` to resolve single/repeated
/// properties and to type plain-text values.
///
/// A property the schema declares as a single value that appears more than
/// once is reported as [AmbiguousStructure](FhtError::AmbiguousStructure)
/// instead of picking one of the occurrences.
///
pub fn read_microdata_with_schema(
    text: &str,
    schema: Option<&serde_json::Value>,
) -> Result<Header, FhtError> {
    let document = TreeBuilder::new(text).build()?;

    let mut items: Vec<&Element> = Vec::new();
    top_level_items(&document, &mut items);

    let item = match items.as_slice() {
        [] => return Err(FhtError::malformed(Encoding::Microdata, "no element carrying itemscope and itemtype was found", None)),
        [item] => *item,
        _ => {
            let mut types: Vec<&str> = items.iter().map(|item| item.value_of("itemtype").unwrap_or("(none)")).collect();
            types.dedup();
            return Err(FhtError::ambiguous(Encoding::Microdata, format!(
                "found {} top-level items with itemtype {}, expected exactly one",
                items.len(), types.join(", "),
            )))
        },
    };

    if item.value_of("itemtype").map_or(true, |itemtype| itemtype.trim().is_empty()) {
        return Err(malformed_at(text, item.offset, "top-level itemscope element has no itemtype"))
    }

    let mut header = read_item(item, schema.map(SchemaHint::new))?;
    header.set_encoding_hint(Some(Encoding::Microdata));
    Ok(header)
}

// Tests
#[cfg(test)]
mod tests {

    const ITEM: &str = r#"<div itemscope itemtype="https://raw.githubusercontent.com/FAIR-bioHeaders/FHR-Specification/main/fhr.json">"#;

    #[test]
    fn read_microdata_nested_records_and_sequences() {
        use super::read_microdata;
        use crate::header::Value;

        let data = format!(r#"{ITEM}
  <span itemprop="genome">GRCh38</span>
  <div itemprop="metadataAuthor" itemscope>
    <span itemprop="name">Adam Wright</span>
    <a itemprop="uri" href="https://orcid.org/0000-0002-5719-4024">ORCID</a>
  </div>
  <div itemprop="metadataAuthor" itemscope>
    <span itemprop="name">Jane Doe</span>
  </div>
</div>"#);
        let got = read_microdata(&data).unwrap();

        assert_eq!(got.get("genome"), Some(&Value::from("GRCh38")));
        assert_eq!(got.get("metadataAuthor[0].uri"), Some(&Value::from("https://orcid.org/0000-0002-5719-4024")));
        assert_eq!(got.get("metadataAuthor[1].name"), Some(&Value::from("Jane Doe")));
    }

    #[test]
    fn read_microdata_field_order_follows_document() {
        use super::read_microdata;

        let data = format!(r#"{ITEM}<span itemprop="title">x</span><p><span itemprop="organism">y</span></p></div>"#);
        let got = read_microdata(&data).unwrap();
        let names: Vec<&String> = got.fields().map(|(name, _)| name).collect();

        assert_eq!(names, vec!["title", "organism"]);
    }

    #[test]
    fn read_microdata_typed_elements() {
        use super::read_microdata;
        use crate::header::Value;

        let data = format!(r#"{ITEM}<data itemprop="schemaVersion" value="1.0">1.0</data><data itemprop="N50" value="42">42</data><meta itemprop="public" content="true"><span itemprop="label">42</span></div>"#);
        let got = read_microdata(&data).unwrap();

        assert_eq!(got.get("schemaVersion"), Some(&Value::from(1.0)));
        assert_eq!(got.get("N50"), Some(&Value::from(42_i64)));
        assert_eq!(got.get("public"), Some(&Value::from(true)));
        assert_eq!(got.get("label"), Some(&Value::from("42")));
    }

    #[test]
    fn read_microdata_sequence_markers() {
        use super::read_microdata;
        use crate::header::Value;

        let data = format!(r#"{ITEM}<span itemprop="genomeSynonym" data-fht-sequence>hg38</span><meta itemprop="instrument" data-fht-sequence="empty"></div>"#);
        let got = read_microdata(&data).unwrap();

        assert_eq!(got.get("genomeSynonym"), Some(&Value::Sequence(vec![Value::from("hg38")])));
        assert_eq!(got.get("instrument"), Some(&Value::Sequence(vec![])));
    }

    #[test]
    fn read_microdata_decodes_character_references() {
        use super::read_microdata;
        use crate::header::Value;

        let data = format!(r#"{ITEM}<span itemprop="funding">A &amp; B &lt;3&gt; &#x41;&#66; &quot;q&quot;</span><a itemprop="link" href="https://x.org/?a=1&amp;b=2">l</a></div>"#);
        let got = read_microdata(&data).unwrap();

        assert_eq!(got.get("funding"), Some(&Value::from("A & B <3> AB \"q\"")));
        assert_eq!(got.get("link"), Some(&Value::from("https://x.org/?a=1&b=2")));
    }

    #[test]
    fn read_microdata_unbalanced_is_malformed() {
        use super::read_microdata;
        use crate::error::FhtError;

        let unclosed = format!(r#"{ITEM}<span itemprop="title">x</div>"#);
        assert!(matches!(read_microdata(&unclosed), Err(FhtError::MalformedEncoding { position: Some(_), .. })));

        let never_closed = format!(r#"{ITEM}<span itemprop="title">x</span>"#);
        assert!(matches!(read_microdata(&never_closed), Err(FhtError::MalformedEncoding { .. })));

        let bad_reference = format!(r#"{ITEM}<span itemprop="title">&bogus;</span></div>"#);
        assert!(matches!(read_microdata(&bad_reference), Err(FhtError::MalformedEncoding { .. })));
    }

    #[test]
    fn read_microdata_without_item_is_malformed() {
        use super::read_microdata;
        use crate::error::FhtError;

        assert!(matches!(read_microdata("<p>no metadata here</p>"), Err(FhtError::MalformedEncoding { .. })));
        assert!(matches!(read_microdata(r#"<div itemscope><span itemprop="a">x</span></div>"#), Err(FhtError::MalformedEncoding { .. })));
    }

    #[test]
    fn read_microdata_conflicting_roots_is_ambiguous() {
        use super::read_microdata;
        use crate::error::FhtError;

        let data = r#"<div itemscope itemtype="https://a.org/A"><span itemprop="x">1</span></div><div itemscope itemtype="https://b.org/B"><span itemprop="x">2</span></div>"#;
        assert!(matches!(read_microdata(data), Err(FhtError::AmbiguousStructure { .. })));
    }

    #[test]
    fn read_microdata_with_schema_resolves_repeats() {
        use super::read_microdata_with_schema;
        use crate::error::FhtError;
        use crate::header::Value;

        let schema = serde_json::json!({
            "type": "object",
            "properties": {
                "genome": { "type": "string" },
                "instrument": { "type": "array", "items": { "type": "string" } },
                "vitalStats": { "$ref": "#/definitions/stats" }
            },
            "definitions": {
                "stats": { "type": "object", "properties": { "N50": { "type": "integer" } } }
            }
        });

        let single = format!(r#"{ITEM}<span itemprop="instrument">PacBio</span><div itemprop="vitalStats" itemscope><span itemprop="N50">1000</span></div></div>"#);
        let got = read_microdata_with_schema(&single, Some(&schema)).unwrap();
        assert_eq!(got.get("instrument"), Some(&Value::Sequence(vec![Value::from("PacBio")])));
        assert_eq!(got.get("vitalStats.N50"), Some(&Value::from(1000_i64)));

        let repeated = format!(r#"{ITEM}<span itemprop="genome">a</span><span itemprop="genome">b</span></div>"#);
        assert!(matches!(read_microdata_with_schema(&repeated, Some(&schema)), Err(FhtError::AmbiguousStructure { .. })));
    }

    #[test]
    fn read_microdata_skips_comments_and_doctype() {
        use super::read_microdata;
        use crate::header::Value;

        let data = format!("<!DOCTYPE html>\n<!-- <div itemscope> -->\n<html><body>{ITEM}<span itemprop=title>x</span><br></div></body></html>");
        let got = read_microdata(&data).unwrap();

        assert_eq!(got.get("title"), Some(&Value::from("x")));
    }

    #[test]
    fn read_microdata_non_ascii_text() {
        use super::read_microdata;
        use crate::error::FhtError;
        use crate::header::Value;

        let data = format!(r#"{ITEM}<span itemprop="name">Åsa</span><span itemprop="organism">Ångström</span><span itemprop="note">ü &amp; é</span></div>"#);
        let got = read_microdata(&data).unwrap();

        assert_eq!(got.get("name"), Some(&Value::from("Åsa")));
        assert_eq!(got.get("organism"), Some(&Value::from("Ångström")));
        assert_eq!(got.get("note"), Some(&Value::from("ü & é")));

        assert!(matches!(read_microdata("étude: x\n"), Err(FhtError::MalformedEncoding { .. })));
        assert!(matches!(read_microdata("Å<b>x</b>"), Err(FhtError::MalformedEncoding { .. })));
    }
}
