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
use crate::Encoding;
use crate::error::FhtError;
use crate::header::{Header, Scalar, Value};
use crate::parser::microdata::{EMPTY_SEQUENCE, SEQUENCE_MARKER};

/// Vocabulary URL written as the `itemtype` of the header root.
pub const FHT_VOCABULARY: &str = "https://raw.githubusercontent.com/FAIR-bioHeaders/FHR-Specification/main/fhr.json";

const INDENT: &str = "  ";

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped += "&amp;",
            '<' => escaped += "&lt;",
            '>' => escaped += "&gt;",
            _ => escaped.push(c),
        }
    }
    escaped
}

fn escape_attribute(text: &str) -> String {
    escape_text(text).replace('"', "&quot;")
}

fn check_name(name: &str) -> Result<(), FhtError> {
    if name.chars().any(|c| c.is_ascii_whitespace()) {
        return Err(FhtError::ambiguous(Encoding::Microdata, format!(
            "field name '{}' contains whitespace and cannot be an itemprop", name,
        )))
    }
    Ok(())
}

fn format_property(
    name: &str,
    value: &Value,
    in_sequence: bool,
    depth: usize,
    formatted: &mut String,
) -> Result<(), FhtError> {
    let indent = INDENT.repeat(depth);
    let name = escape_attribute(name);
    let marker = if in_sequence { format!(" {}", SEQUENCE_MARKER) } else { String::new() };

    match value {
        Value::Scalar(Scalar::String(x)) => {
            *formatted += &format!("{}<span itemprop=\"{}\"{}>{}</span>\n", indent, name, marker, escape_text(x));
        },
        Value::Scalar(Scalar::Number(x)) => {
            *formatted += &format!("{}<data itemprop=\"{}\"{} value=\"{}\">{}</data>\n", indent, name, marker, x, x);
        },
        Value::Scalar(Scalar::Boolean(x)) => {
            *formatted += &format!("{}<meta itemprop=\"{}\"{} content=\"{}\">\n", indent, name, marker, x);
        },
        Value::Record(record) => {
            *formatted += &format!("{}<div itemprop=\"{}\"{} itemscope>\n", indent, name, marker);
            format_fields(record, depth + 1, formatted)?;
            *formatted += &format!("{}</div>\n", indent);
        },
        Value::Sequence(_) => {
            return Err(FhtError::ambiguous(Encoding::Microdata, format!(
                "sequence nested in sequence '{}' cannot be written as microdata", name,
            )))
        },
    }
    Ok(())
}

fn format_fields(
    header: &Header,
    depth: usize,
    formatted: &mut String,
) -> Result<(), FhtError> {
    for (name, value) in header.fields() {
        check_name(name)?;
        match value {
            Value::Sequence(items) if items.is_empty() => {
                *formatted += &format!(
                    "{}<meta itemprop=\"{}\" {}=\"{}\">\n",
                    INDENT.repeat(depth), escape_attribute(name), SEQUENCE_MARKER, EMPTY_SEQUENCE,
                );
            },
            Value::Sequence(items) => {
                for item in items {
                    format_property(name, item, true, depth, formatted)?;
                }
            },
            _ => format_property(name, value, false, depth, formatted)?,
        }
    }
    Ok(())
}

/// Format a header as a microdata HTML fragment.
///
/// The root is a `<div>` with `itemscope` and an `itemtype` of
/// [FHT_VOCABULARY]. Strings are written as `<span>`, numbers as `<data>`,
/// booleans as `<meta>` and sub-records as nested `<div itemscope>`
/// elements. Each sequence entry is its own element carrying
/// [SEQUENCE_MARKER](crate::parser::microdata::SEQUENCE_MARKER), so
/// one-element and empty sequences decode back as sequences.
///
/// ## Usage
///
/// ```rust
/// use fht::header::{Header, Value};
/// use fht::printer::microdata::format_microdata;
///
/// let mut header = Header::new();
/// header.insert("genome", Value::from("GRCh38"));
/// header.insert("schemaVersion", Value::from(1_i64));
///
/// let expected = concat!(
///     "<div itemscope itemtype=\"https://raw.githubusercontent.com/FAIR-bioHeaders/FHR-Specification/main/fhr.json\">\n",
///     "  <span itemprop=\"genome\">GRCh38</span>\n",
///     "  <data itemprop=\"schemaVersion\" value=\"1\">1</data>\n",
///     "</div>\n",
/// );
///
/// assert_eq!(format_microdata(&header).unwrap(), expected);
/// ```
///
pub fn format_microdata(
    header: &Header,
) -> Result<String, FhtError> {
    let mut formatted = format!("<div itemscope itemtype=\"{}\">\n", escape_attribute(FHT_VOCABULARY));
    format_fields(header, 1, &mut formatted)?;
    formatted += "</div>\n";
    Ok(formatted)
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn format_microdata_sequences_and_records() {
        use super::format_microdata;
        use crate::header::{Header, Value};

        let mut author = Header::new();
        author.insert("name", Value::from("Adam Wright"));
        let mut data = Header::new();
        data.insert("assemblyAuthor", Value::Sequence(vec![Value::Record(author)]));
        data.insert("instrument", Value::Sequence(vec![]));
        data.insert("public", Value::from(false));

        let expected = concat!(
            "<div itemscope itemtype=\"https://raw.githubusercontent.com/FAIR-bioHeaders/FHR-Specification/main/fhr.json\">\n",
            "  <div itemprop=\"assemblyAuthor\" data-fht-sequence itemscope>\n",
            "    <span itemprop=\"name\">Adam Wright</span>\n",
            "  </div>\n",
            "  <meta itemprop=\"instrument\" data-fht-sequence=\"empty\">\n",
            "  <meta itemprop=\"public\" content=\"false\">\n",
            "</div>\n",
        );
        let got = format_microdata(&data).unwrap();

        assert_eq!(got, expected);
    }

    #[test]
    fn format_microdata_escapes_text() {
        use super::format_microdata;
        use crate::header::{Header, Value};

        let mut data = Header::new();
        data.insert("funding", Value::from("A & B <grant>"));

        let got = format_microdata(&data).unwrap();

        assert!(got.contains("<span itemprop=\"funding\">A &amp; B &lt;grant&gt;</span>"));
    }

    #[test]
    fn format_microdata_rejects_whitespace_in_names() {
        use super::format_microdata;
        use crate::error::FhtError;
        use crate::header::{Header, Value};

        let mut data = Header::new();
        data.insert("two words", Value::from("x"));

        assert!(matches!(format_microdata(&data), Err(FhtError::AmbiguousStructure { .. })));
    }

    #[test]
    fn format_microdata_round_trip() {
        use super::format_microdata;
        use crate::header::{Header, Value};
        use crate::parser::microdata::read_microdata;

        let mut stats = Header::new();
        stats.insert("N50", Value::from(52_i64));
        stats.insert("ratio", Value::from(0.5));
        let mut data = Header::new();
        data.insert("genome", Value::from("  padded\nname  "));
        data.insert("genomeSynonym", Value::Sequence(vec![Value::from("hg38")]));
        data.insert("vitalStats", Value::Record(stats));
        data.insert("count", Value::from(u64::MAX));

        let got = read_microdata(&format_microdata(&data).unwrap()).unwrap();

        assert_eq!(got, data);
    }
}
