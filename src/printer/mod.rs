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

//! Encoders from [Header] to the supported [Encoding]s.
//!
//! Each format has its own module with a `format_<format>` function
//! returning the complete header text. Encoding is deterministic: the same
//! header always gives byte-identical text.
//!

// Format specific implementations
pub mod json;
pub mod microdata;
pub mod yaml;

use crate::Encoding;
use crate::error::FhtError;
use crate::header::Header;

use json::format_json;
use microdata::format_microdata;
use yaml::format_yaml;

/// Encode `header` in `encoding`.
pub fn format_header(
    header: &Header,
    encoding: Encoding,
) -> Result<String, FhtError> {
    match encoding {
        Encoding::Json => format_json(header),
        Encoding::Yaml => format_yaml(header),
        Encoding::Microdata => format_microdata(header),
    }
}
