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
use crate::header::Header;

/// Format a header as a JSON object.
///
/// Output is pretty-printed with two-space indentation, keeps field
/// insertion order, and ends in a newline.
///
pub fn format_json(
    header: &Header,
) -> Result<String, FhtError> {
    let mut formatted = serde_json::to_string_pretty(header)
        .map_err(|err| FhtError::ambiguous(Encoding::Json, err.to_string()))?;
    formatted += "\n";
    Ok(formatted)
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn format_json_nested() {
        use super::format_json;
        use crate::header::{Header, Value};

        let mut taxon = Header::new();
        taxon.insert("name", Value::from("Homo sapiens"));
        let mut data = Header::new();
        data.insert("schemaVersion", Value::from(1.0));
        data.insert("taxon", Value::Record(taxon));
        data.insert("instrument", Value::Sequence(vec![Value::from("PacBio")]));

        let expected = "{\n  \"schemaVersion\": 1.0,\n  \"taxon\": {\n    \"name\": \"Homo sapiens\"\n  },\n  \"instrument\": [\n    \"PacBio\"\n  ]\n}\n";
        let got = format_json(&data).unwrap();

        assert_eq!(got, expected);
    }

    #[test]
    fn format_json_is_deterministic() {
        use super::format_json;
        use crate::parser::json::read_json;

        let data = read_json(r#"{"z":1,"a":{"y":true,"b":[1,2]},"m":"x"}"#).unwrap();

        assert_eq!(format_json(&data).unwrap(), format_json(&data).unwrap());
        assert!(format_json(&data).unwrap().starts_with("{\n  \"z\": 1,\n  \"a\""));
    }
}
