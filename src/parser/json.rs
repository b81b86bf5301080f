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
use serde_json::error::Category;

use crate::Encoding;
use crate::error::FhtError;
use crate::error::Position;
use crate::header::Header;

/// Drops the " at line L column C" suffix serde_json appends to messages.
pub(crate) fn strip_location(message: &str) -> &str {
    match message.rsplit_once(" at line ") {
        Some((head, _)) => head,
        None => message,
    }
}

/// Parse a header stored as a JSON object.
///
/// Syntax errors are reported as [MalformedEncoding](FhtError::MalformedEncoding)
/// with the position serde_json reports. Valid JSON that is not an object, or
/// that contains nulls, duplicate keys or nested arrays, is reported as
/// [AmbiguousStructure](FhtError::AmbiguousStructure).
///
pub fn read_json(
    text: &str,
) -> Result<Header, FhtError> {
    let mut header: Header = serde_json::from_str(text).map_err(|err| {
        let message = err.to_string();
        match err.classify() {
            Category::Data => FhtError::ambiguous(Encoding::Json, strip_location(&message)),
            _ => FhtError::malformed(
                Encoding::Json,
                strip_location(&message),
                Some(Position { line: err.line(), column: err.column() }),
            ),
        }
    })?;
    header.set_encoding_hint(Some(Encoding::Json));
    Ok(header)
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn read_json_keeps_field_order() {
        use super::read_json;

        let got = read_json(r#"{"title":"x","organism":"y","schemaVersion":1}"#).unwrap();
        let names: Vec<&String> = got.fields().map(|(name, _)| name).collect();

        assert_eq!(names, vec!["title", "organism", "schemaVersion"]);
    }

    #[test]
    fn read_json_integers_keep_precision() {
        use super::read_json;
        use crate::header::{Number, Scalar, Value};

        let got = read_json(r#"{"vitalStats":{"totalBasePairs":9007199254740993,"big":18446744073709551615}}"#).unwrap();

        assert_eq!(got.get("vitalStats.totalBasePairs"), Some(&Value::Scalar(Scalar::Number(Number::Integer(9007199254740993)))));
        assert_eq!(got.get("vitalStats.big"), Some(&Value::Scalar(Scalar::Number(Number::Unsigned(u64::MAX)))));
    }

    #[test]
    fn read_json_sets_encoding_hint() {
        use super::read_json;
        use crate::Encoding;

        let got = read_json(r#"{"title":"x"}"#).unwrap();
        assert_eq!(got.encoding_hint(), Some(Encoding::Json));
    }

    #[test]
    fn read_json_unbalanced_is_malformed() {
        use super::read_json;
        use crate::error::{FhtError, Position};

        let got = read_json("{\"title\":\n\"x\"");
        match got {
            Err(FhtError::MalformedEncoding { position, .. }) => assert_eq!(position.map(|x| x.line), Some(2)),
            other => panic!("expected MalformedEncoding, got {:?}", other),
        }
        assert!(matches!(read_json(r#"{"a":"\q"}"#), Err(FhtError::MalformedEncoding { position: Some(Position { line: 1, .. }), .. })));
    }

    #[test]
    fn read_json_wrong_shape_is_ambiguous() {
        use super::read_json;
        use crate::error::FhtError;

        assert!(matches!(read_json(r#"["title"]"#), Err(FhtError::AmbiguousStructure { .. })));
        assert!(matches!(read_json(r#"{"title":null}"#), Err(FhtError::AmbiguousStructure { .. })));
        assert!(matches!(read_json(r#"{"title":"x","title":"y"}"#), Err(FhtError::AmbiguousStructure { .. })));
        assert!(matches!(read_json(r#"{"grid":[[1,2],[3]]}"#), Err(FhtError::AmbiguousStructure { .. })));
    }
}
