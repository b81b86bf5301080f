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

//! Decoders from the supported [Encoding]s to [Header].
//!
//! Each format has its own module with a `read_<format>` function taking the
//! complete header text. [read_header] dispatches on an [Encoding] and
//! [detect_encoding] finds an encoding that decodes an unlabelled text, as
//! needed when a header is cut out of a FASTA or GFA file.
//!

// Format specific implementations
pub mod json;
pub mod microdata;
pub mod yaml;

use crate::Encoding;
use crate::error::FhtError;
use crate::header::Header;

use json::read_json;
use microdata::read_microdata_with_schema;
use yaml::read_yaml;

/// Order in which [detect_encoding] tries the decoders.
///
/// JSON goes before YAML because YAML also accepts most JSON documents.
pub const DETECTION_ORDER: [Encoding; 3] = [Encoding::Json, Encoding::Microdata, Encoding::Yaml];

/// Decode `text` stored in `encoding`.
pub fn read_header(
    text: &str,
    encoding: Encoding,
) -> Result<Header, FhtError> {
    read_header_with_schema(text, encoding, None)
}

/// Decode `text` stored in `encoding`, letting `schema` guide decoders that
/// cannot recover value types from the text alone.
///
/// Only the microdata decoder uses the schema; JSON and YAML carry their own
/// types.
pub fn read_header_with_schema(
    text: &str,
    encoding: Encoding,
    schema: Option<&serde_json::Value>,
) -> Result<Header, FhtError> {
    match encoding {
        Encoding::Json => read_json(text),
        Encoding::Yaml => read_yaml(text),
        Encoding::Microdata => read_microdata_with_schema(text, schema),
    }
}

/// Finds the first encoding in [DETECTION_ORDER] that decodes `text`.
///
/// Returns None if no decoder accepts the text.
pub fn detect_encoding(
    text: &str,
) -> Option<(Encoding, Header)> {
    for encoding in DETECTION_ORDER {
        match read_header(text, encoding) {
            Ok(header) => return Some((encoding, header)),
            Err(err) => log::debug!("Header text is not {}: {}", encoding, err),
        }
    }
    None
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn detect_encoding_json() {
        use crate::Encoding;
        use super::detect_encoding;

        let (got, _) = detect_encoding("{\"title\": \"x\"}\n").unwrap();
        assert_eq!(got, Encoding::Json);
    }

    #[test]
    fn detect_encoding_yaml() {
        use crate::Encoding;
        use super::detect_encoding;

        let (got, header) = detect_encoding("title: x\norganism: y\n").unwrap();
        assert_eq!(got, Encoding::Yaml);
        assert_eq!(header.len(), 2);
    }

    #[test]
    fn detect_encoding_microdata() {
        use crate::Encoding;
        use super::detect_encoding;

        let data = "<div itemscope itemtype=\"https://example.org/fht\">\n  <span itemprop=\"title\">x</span>\n</div>\n";
        let (got, _) = detect_encoding(data).unwrap();
        assert_eq!(got, Encoding::Microdata);
    }

    #[test]
    fn detect_encoding_none() {
        use super::detect_encoding;

        assert!(detect_encoding(">seq1\nACGT\n").is_none());
        assert!(detect_encoding("").is_none());
        assert!(detect_encoding("{\"title\": ").is_none());
    }
}
