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

//! fht is a library and a command-line client for FAIR-bioHeaders (FHT)
//! metadata headers:
//!
//!   - Converting headers between JSON, YAML and HTML microdata.
//!   - Validating headers against the FHT JSON Schema, or any other schema.
//!   - Stripping headers from FASTA and GFA files and combining them back.
//!
//! All encodings decode to the same [Header](header::Header) model, so a
//! header converted from one encoding to another and back decodes to the
//! header it started from.
//!
//! ## Usage
//!
//! ### Command line
//!
//! The fht CLI supports the following subcommands:
//!   - `fht convert` convert a header to another encoding.
//!   - `fht validate` validate a header against a schema.
//!   - `fht strip` split a FASTA or GFA file into header and body.
//!   - `fht combine` attach a header to a FASTA or GFA file.
//!
//! ### Rust API
//!
//! The facade functions [decode], [encode], [convert] and [validate_only]
//! operate on header text in memory. [decode_from_read],
//! [convert_from_read_to_write], [strip_from_read] and [combine_to_write]
//! wrap them for structs that implement [Read] and/or [Write].
//!
//! Lower level access is provided by:
//!   - [parser]: one `read_<encoding>` function per encoding.
//!   - [printer]: one `format_<encoding>` function per encoding.
//!   - [schema]: the validator and the bundled FHT schema.
//!   - [binding]: locating, stripping and combining header regions.
//!
//! ## Bound file format
//!
//! A header is attached to a FASTA or GFA file as a run of lines at the top
//! of the file. Each line starts with a marker, `;~` for FASTA and `#~` for
//! GFA, followed by one line of the header text in any of the supported
//! encodings:
//!
//! ```text
//! ;~title: x
//! ;~organism: y
//! >seq1
//! ACGT
//! ```
//!

use std::io::Read;
use std::io::Write;
use std::path::Path;

use serde_json::Value as JsonValue;

pub mod binding;
pub mod error;
pub mod header;
pub mod parser;
pub mod printer;
pub mod schema;

pub use binding::BodyFormat;
pub use binding::Detached;
pub use error::FhtError;
pub use header::Header;
pub use schema::ValidationResult;

/// Supported header encodings.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    Json,
    Yaml,
    Microdata,
}

impl std::str::FromStr for Encoding {
    type Err = FhtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Encoding::Json),
            "yaml" => Ok(Encoding::Yaml),
            "microdata" => Ok(Encoding::Microdata),
            _ => Err(FhtError::UnsupportedEncoding(s.to_string())),
        }
    }
}

impl std::fmt::Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Encoding::Json => write!(f, "json"),
            Encoding::Yaml => write!(f, "yaml"),
            Encoding::Microdata => write!(f, "microdata"),
        }
    }
}

impl Encoding {
    /// Infers the encoding from a file extension, ignoring a trailing `.gz`.
    pub fn from_extension(
        path: &Path,
    ) -> Option<Self> {
        match extension_without_gz(path)?.as_str() {
            "json" => Some(Encoding::Json),
            "yaml" | "yml" => Some(Encoding::Yaml),
            "html" | "htm" => Some(Encoding::Microdata),
            _ => None,
        }
    }
}

/// Lowercased extension of `path` after removing a trailing `.gz`.
pub(crate) fn extension_without_gz(
    path: &Path,
) -> Option<String> {
    let path = if path.extension().is_some_and(|ext| ext == "gz") {
        path.with_extension("")
    } else {
        path.to_path_buf()
    };
    path.extension().map(|ext| ext.to_string_lossy().to_lowercase())
}

/// Decode header `text` stored in `encoding`.
///
/// ## Usage
///
/// ```rust
/// use fht::{decode, Encoding};
/// use fht::header::Value;
///
/// let header = decode("title: x\norganism: y\n", Encoding::Yaml).unwrap();
///
/// assert_eq!(header.get("organism"), Some(&Value::from("y")));
/// assert_eq!(header.encoding_hint(), Some(Encoding::Yaml));
/// ```
///
pub fn decode(
    text: &str,
    encoding: Encoding,
) -> Result<Header, FhtError> {
    parser::read_header(text, encoding)
}

/// Encode `header` in `encoding`.
pub fn encode(
    header: &Header,
    encoding: Encoding,
) -> Result<String, FhtError> {
    printer::format_header(header, encoding)
}

/// Convert header text from one encoding to another.
///
/// If `schema` is given the decoded header is validated against it before
/// encoding, and a header that does not conform fails with
/// [SchemaViolation](FhtError::SchemaViolation) carrying every violation.
/// The schema also guides the microdata decoder.
///
/// ## Usage
///
/// ```rust
/// use fht::{convert, Encoding};
///
/// let yaml = convert(r#"{"title":"x","organism":"y"}"#, Encoding::Json, Encoding::Yaml, None).unwrap();
///
/// assert_eq!(yaml, "title: x\norganism: y\n");
/// ```
///
pub fn convert(
    source: &str,
    from: Encoding,
    to: Encoding,
    schema: Option<&JsonValue>,
) -> Result<String, FhtError> {
    let header = parser::read_header_with_schema(source, from, schema)?;
    if let Some(schema) = schema {
        schema::validate(&header, schema)?.into_result()?;
    }
    let target = printer::format_header(&header, to)?;
    log::debug!("Converted {} byte {} header to {} byte {} header", source.len(), from, target.len(), to);
    Ok(target)
}

/// Decode header `text` and validate it against `schema`.
///
/// ## Usage
///
/// ```rust
/// use fht::{validate_only, Encoding};
///
/// let schema = serde_json::json!({ "required": ["title"] });
/// let result = validate_only(r#"{"organism":"y"}"#, Encoding::Json, &schema).unwrap();
///
/// assert!(!result.is_valid());
/// assert_eq!(result.violations()[0].field_path(), "title");
/// ```
///
pub fn validate_only(
    text: &str,
    encoding: Encoding,
    schema: &JsonValue,
) -> Result<ValidationResult, FhtError> {
    let header = parser::read_header_with_schema(text, encoding, Some(schema))?;
    schema::validate(&header, schema)
}

fn read_text<R: Read>(
    conn_in: &mut R,
) -> Result<String, FhtError> {
    let mut text = String::new();
    conn_in.read_to_string(&mut text)?;
    Ok(text)
}

/// Decode a header from [Read](std::io::Read).
pub fn decode_from_read<R: Read>(
    encoding: Encoding,
    conn_in: &mut R,
) -> Result<Header, FhtError> {
    let text = read_text(conn_in)?;
    decode(&text, encoding)
}

/// Convert a header from [Read] to [Write].
///
/// Nothing is written unless the conversion succeeds.
///
/// ## Usage
///
/// ```rust
/// use fht::convert_from_read_to_write;
/// use fht::Encoding;
/// use std::io::Cursor;
///
/// let mut input: Cursor<Vec<u8>> = Cursor::new(b"title: x\nsize: 3\n".to_vec());
/// let mut output: Vec<u8> = Vec::new();
///
/// convert_from_read_to_write(Encoding::Yaml, Encoding::Json, None, &mut input, &mut output).unwrap();
///
/// assert_eq!(output, b"{\n  \"title\": \"x\",\n  \"size\": 3\n}\n".to_vec());
/// ```
///
pub fn convert_from_read_to_write<R: Read, W: Write>(
    from: Encoding,
    to: Encoding,
    schema: Option<&JsonValue>,
    conn_in: &mut R,
    conn_out: &mut W,
) -> Result<(), FhtError> {
    let text = read_text(conn_in)?;
    let target = convert(&text, from, to, schema)?;
    conn_out.write_all(target.as_bytes())?;
    conn_out.flush()?;
    Ok(())
}

/// Read a bound file from [Read] and split it into header text and body.
pub fn strip_from_read<R: Read>(
    format: BodyFormat,
    conn_in: &mut R,
) -> Result<Detached, FhtError> {
    let mut data: Vec<u8> = Vec::new();
    conn_in.read_to_end(&mut data)?;
    format.strip(&data)
}

/// Combine header text and body into a bound file written to [Write].
///
/// The file is built in memory first, so nothing is written if combining fails.
///
/// ## Usage
///
/// ```rust
/// use fht::{combine_to_write, BodyFormat};
///
/// let mut output: Vec<u8> = Vec::new();
/// combine_to_write(BodyFormat::Gfa, "title: x\n", b"S\t1\tACGT\n", &mut output).unwrap();
///
/// assert_eq!(output, b"#~title: x\nS\t1\tACGT\n".to_vec());
/// ```
///
pub fn combine_to_write<W: Write>(
    format: BodyFormat,
    header: &str,
    body: &[u8],
    conn_out: &mut W,
) -> Result<(), FhtError> {
    let combined = format.combine(header, body)?;
    conn_out.write_all(&combined)?;
    conn_out.flush()?;
    Ok(())
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn convert_json_to_yaml_keeps_order() {
        use super::{convert, Encoding};

        let got = convert(r#"{"title":"x","organism":"y"}"#, Encoding::Json, Encoding::Yaml, None).unwrap();
        assert_eq!(got, "title: x\norganism: y\n");
    }

    #[test]
    fn convert_through_every_encoding() {
        use super::{convert, decode, Encoding};

        let source = concat!(
            "title: x\n",
            "size: 42\n",
            "ratio: 0.5\n",
            "circular: false\n",
            "synonyms: [a, b]\n",
            "taxon:\n",
            "  name: Homo sapiens\n",
            "  id: 9606\n",
        );
        let expected = decode(source, Encoding::Yaml).unwrap();

        for from in [Encoding::Json, Encoding::Yaml, Encoding::Microdata] {
            let text = convert(source, Encoding::Yaml, from, None).unwrap();
            for to in [Encoding::Json, Encoding::Yaml, Encoding::Microdata] {
                let target = convert(&text, from, to, None).unwrap();
                assert_eq!(decode(&target, to).unwrap(), expected);
            }
        }
    }

    #[test]
    fn convert_non_ascii_through_microdata() {
        use super::{convert, decode, Encoding};

        let source = r#"{"organism":"Ångström","author":{"name":"Åsa"},"mot-clé":["é","日本"]}"#;
        let html = convert(source, Encoding::Json, Encoding::Microdata, None).unwrap();
        let json = convert(&html, Encoding::Microdata, Encoding::Json, None).unwrap();

        assert_eq!(decode(&json, Encoding::Json).unwrap(), decode(source, Encoding::Json).unwrap());
    }

    #[test]
    fn convert_with_schema_violation() {
        use super::{convert, Encoding, FhtError};

        let schema = serde_json::json!({
            "properties": { "title": { "type": "string" }, "size": { "type": "integer" } },
            "required": ["title", "organism"]
        });
        let got = convert(r#"{"title": 1, "size": "big"}"#, Encoding::Json, Encoding::Yaml, Some(&schema));

        match got {
            Err(FhtError::SchemaViolation(violations)) => {
                let paths: Vec<String> = violations.iter().map(|x| x.field_path()).collect();
                assert_eq!(paths, vec!["organism", "title", "size"]);
            },
            _ => panic!("expected SchemaViolation"),
        }
    }

    #[test]
    fn convert_microdata_with_schema_hint() {
        use super::{convert, Encoding};

        let schema = serde_json::json!({
            "properties": {
                "synonyms": { "type": "array", "items": { "type": "string" } },
                "size": { "type": "integer" }
            }
        });
        let source = concat!(
            "<div itemscope itemtype=\"https://example.org/fht\">\n",
            "  <span itemprop=\"synonyms\">GRCh38</span>\n",
            "  <span itemprop=\"size\">42</span>\n",
            "</div>\n",
        );

        let got = convert(source, Encoding::Microdata, Encoding::Json, Some(&schema)).unwrap();
        assert_eq!(got, "{\n  \"synonyms\": [\n    \"GRCh38\"\n  ],\n  \"size\": 42\n}\n");
    }

    #[test]
    fn convert_malformed_source() {
        use super::{convert, Encoding, FhtError};

        let got = convert("{\"title\": \"x\"", Encoding::Json, Encoding::Yaml, None);
        assert!(matches!(got, Err(FhtError::MalformedEncoding { encoding: Encoding::Json, .. })));
    }

    #[test]
    fn validate_only_scenario() {
        use super::{validate_only, Encoding};
        use crate::schema::Constraint;

        let schema = serde_json::json!({ "required": ["title"] });
        let got = validate_only(r#"{"organism":"y"}"#, Encoding::Json, &schema).unwrap();

        assert_eq!(got.violations().len(), 1);
        assert_eq!(got.violations()[0].constraint, Constraint::Required("title".to_string()));

        let got = validate_only("title: x\norganism: y\n", Encoding::Yaml, &schema).unwrap();
        assert!(got.is_valid());
    }

    #[test]
    fn encoding_from_str() {
        use super::{Encoding, FhtError};
        use std::str::FromStr;

        assert_eq!(Encoding::from_str("json").unwrap(), Encoding::Json);
        assert_eq!(Encoding::from_str("yaml").unwrap(), Encoding::Yaml);
        assert_eq!(Encoding::from_str("microdata").unwrap(), Encoding::Microdata);
        assert!(matches!(Encoding::from_str("toml"), Err(FhtError::UnsupportedEncoding(name)) if name == "toml"));
    }

    #[test]
    fn encoding_from_extension() {
        use super::Encoding;
        use std::path::Path;

        assert_eq!(Encoding::from_extension(Path::new("header.json")), Some(Encoding::Json));
        assert_eq!(Encoding::from_extension(Path::new("header.YML")), Some(Encoding::Yaml));
        assert_eq!(Encoding::from_extension(Path::new("header.yaml.gz")), Some(Encoding::Yaml));
        assert_eq!(Encoding::from_extension(Path::new("header.html")), Some(Encoding::Microdata));
        assert_eq!(Encoding::from_extension(Path::new("genome.fasta")), None);
        assert_eq!(Encoding::from_extension(Path::new("header")), None);
    }

    #[test]
    fn strip_from_read_then_combine_to_write() {
        use super::{combine_to_write, strip_from_read, BodyFormat};
        use std::io::Cursor;

        let file = b";~{\"title\":\"x\"}\n>seq1\nACGT\n".to_vec();
        let mut input: Cursor<Vec<u8>> = Cursor::new(file.clone());

        let (header, body) = strip_from_read(BodyFormat::Fasta, &mut input).unwrap().into_parts();
        assert_eq!(body, b">seq1\nACGT\n".to_vec());

        let mut output: Vec<u8> = Vec::new();
        combine_to_write(BodyFormat::Fasta, &header, &body, &mut output).unwrap();
        assert_eq!(output, file);
    }

    #[test]
    fn combine_to_write_writes_nothing_on_error() {
        use super::{combine_to_write, BodyFormat};

        let mut output: Vec<u8> = Vec::new();
        let got = combine_to_write(BodyFormat::Fasta, "{\"title\": ", b">seq1\nACGT\n", &mut output);

        assert!(got.is_err());
        assert!(output.is_empty());
    }

    #[test]
    fn decode_from_read_yaml() {
        use super::{decode_from_read, Encoding};
        use crate::header::Value;
        use std::io::Cursor;

        let mut input: Cursor<Vec<u8>> = Cursor::new(b"title: x\n".to_vec());
        let got = decode_from_read(Encoding::Yaml, &mut input).unwrap();

        assert_eq!(got.get("title"), Some(&Value::from("x")));
    }
}
