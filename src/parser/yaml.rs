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
use serde::Deserialize;

use crate::Encoding;
use crate::error::FhtError;
use crate::error::Position;
use crate::header::Header;
use crate::parser::json::strip_location;

/// Parse a header stored as a YAML mapping.
///
/// Both block and flow styles are accepted. Aliases are expanded and `<<`
/// merge keys applied before the document is mapped to a [Header], so the
/// result never shares structure.
///
pub fn read_yaml(
    text: &str,
) -> Result<Header, FhtError> {
    let mut document: serde_yaml::Value = serde_yaml::from_str(text).map_err(|err| {
        let position = err.location().map(|loc| Position { line: loc.line(), column: loc.column() });
        FhtError::malformed(Encoding::Yaml, strip_location(&err.to_string()), position)
    })?;

    document.apply_merge().map_err(|err| {
        FhtError::ambiguous(Encoding::Yaml, strip_location(&err.to_string()))
    })?;

    let mut header = Header::deserialize(document).map_err(|err| {
        FhtError::ambiguous(Encoding::Yaml, strip_location(&err.to_string()))
    })?;
    header.set_encoding_hint(Some(Encoding::Yaml));
    Ok(header)
}
