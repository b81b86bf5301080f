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

/// Format a header as a block-style YAML mapping.
///
/// Keys are written in insertion order and are only quoted when YAML
/// requires it. Strings that would read back as another type, such as
/// `"1.0"` or `"true"`, are quoted.
///
pub fn format_yaml(
    header: &Header,
) -> Result<String, FhtError> {
    serde_yaml::to_string(header).map_err(|err| FhtError::ambiguous(Encoding::Yaml, err.to_string()))
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn format_yaml_block_style() {
        use super::format_yaml;
        use crate::header::{Header, Value};

        let mut author = Header::new();
        author.insert("name", Value::from("Adam Wright"));
        let mut data = Header::new();
        data.insert("genome", Value::from("GRCh38"));
        data.insert("metadataAuthor", Value::Sequence(vec![Value::Record(author)]));
        data.insert("vitalStats", Value::Record({
            let mut stats = Header::new();
            stats.insert("N50", Value::from(1000_i64));
            stats
        }));

        let expected = "genome: GRCh38\nmetadataAuthor:\n- name: Adam Wright\nvitalStats:\n  N50: 1000\n";
        let got = format_yaml(&data).unwrap();

        assert_eq!(got, expected);
    }

    #[test]
    fn format_yaml_quotes_ambiguous_strings() {
        use super::format_yaml;
        use crate::header::{Header, Value};
        use crate::parser::yaml::read_yaml;

        let mut data = Header::new();
        data.insert("version", Value::from("1.0"));
        data.insert("flag", Value::from("true"));

        let got = read_yaml(&format_yaml(&data).unwrap()).unwrap();

        assert_eq!(got, data);
    }
}
