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

//! Attaching headers to and detaching them from FASTA and GFA files.
//!
//! Both formats keep the header at the top of the file as a run of comment
//! lines starting with a reserved marker:
//!   - FASTA: `;~`
//!   - GFA: `#~`
//!
//! Everything after the header region is the body. The body is never parsed
//! and is returned byte for byte.
//!
//! ## Usage
//!
//! ```rust
//! use fht::binding::BodyFormat;
//! use fht::Encoding;
//!
//! let file = b";~{\"title\":\"x\"}\n>seq1\nACGT\n";
//!
//! let detached = BodyFormat::Fasta.strip(file).unwrap();
//! assert_eq!(detached.header(), "{\"title\":\"x\"}\n");
//! assert_eq!(detached.body(), b">seq1\nACGT\n");
//! assert_eq!(detached.encoding(), Some(Encoding::Json));
//!
//! let (header, body) = detached.into_parts();
//! let combined = BodyFormat::Fasta.combine(&header, &body).unwrap();
//! assert_eq!(combined, file.to_vec());
//! ```
//!

use std::path::Path;

use crate::Encoding;
use crate::error::FhtError;
use crate::parser::detect_encoding;

pub mod region;

use region::fence;
use region::region_end;
use region::unfence;

/// Supported bound file formats.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyFormat {
    Fasta,
    Gfa,
}

impl std::str::FromStr for BodyFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fasta" => Ok(BodyFormat::Fasta),
            "gfa" => Ok(BodyFormat::Gfa),
            _ => Err(format!("'{}' is not a valid BodyFormat", s)),
        }
    }
}

impl std::fmt::Display for BodyFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BodyFormat::Fasta => write!(f, "fasta"),
            BodyFormat::Gfa => write!(f, "gfa"),
        }
    }
}

/// Where the header of a bound file is, if it has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Located {
    Headerless,
    /// The header region spans bytes `0..end`.
    HeaderFound { end: usize },
}

/// A header text and body split from a bound file.
///
/// Owns copies of both parts; the input buffer can be dropped after
/// [BodyFormat::strip] returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detached {
    header: String,
    body: Vec<u8>,
    encoding: Option<Encoding>,
}

impl Detached {
    /// Header text without the markers, empty for a headerless file.
    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Encoding the header text decoded as, None for a headerless file.
    pub fn encoding(&self) -> Option<Encoding> {
        self.encoding
    }

    pub fn into_parts(self) -> (String, Vec<u8>) {
        (self.header, self.body)
    }
}

impl BodyFormat {
    /// Marker that starts every header line.
    pub fn marker(&self) -> &'static str {
        match self {
            BodyFormat::Fasta => ";~",
            BodyFormat::Gfa => "#~",
        }
    }

    /// Infers the format from a file extension, ignoring a trailing `.gz`.
    pub fn from_extension(
        path: &Path,
    ) -> Option<Self> {
        match crate::extension_without_gz(path)?.as_str() {
            "fa" | "fasta" | "fna" | "fas" => Some(BodyFormat::Fasta),
            "gfa" => Some(BodyFormat::Gfa),
            _ => None,
        }
    }

    /// Find the header region of `data`.
    pub fn locate(
        &self,
        data: &[u8],
    ) -> Located {
        match region_end(data, self.marker().as_bytes()) {
            0 => Located::Headerless,
            end => {
                log::debug!("Found {} header region at bytes 0..{}", self, end);
                Located::HeaderFound { end }
            },
        }
    }

    /// Split `data` into header text and body.
    ///
    /// A file without a header gives an empty header text and the whole
    /// file as body. A header region that is not valid UTF-8, or that no
    /// decoder accepts, fails with
    /// [HeaderExtraction](FhtError::HeaderExtraction).
    ///
    pub fn strip(
        &self,
        data: &[u8],
    ) -> Result<Detached, FhtError> {
        let end = match self.locate(data) {
            Located::Headerless => {
                log::info!("No {} header found, body is {} bytes", self, data.len());
                return Ok(Detached { header: String::new(), body: data.to_vec(), encoding: None })
            },
            Located::HeaderFound { end } => end,
        };

        let extraction_error = |reason: &str| FhtError::HeaderExtraction { start: 0, end, reason: reason.to_string() };

        let header = String::from_utf8(unfence(&data[..end], self.marker().as_bytes()))
            .map_err(|_| extraction_error("header region is not valid UTF-8"))?;
        let (encoding, _) = detect_encoding(&header)
            .ok_or_else(|| extraction_error("header text does not decode as json, microdata or yaml"))?;

        log::info!("Detached {} header ({} bytes) from {} byte body", encoding, header.len(), data.len() - end);
        Ok(Detached { header, body: data[end..].to_vec(), encoding: Some(encoding) })
    }

    /// Prepend `header` to `body` as a fenced header region.
    ///
    /// An empty `header` returns `body` unchanged. A non-empty header must
    /// decode in one of the supported encodings, and `body` must not start
    /// with a marker line. A header followed by a non-empty body must end
    /// in a line terminator, otherwise the first body line would become
    /// part of the header. All of these are checked before anything is
    /// built, and fail with [HeaderExtraction](FhtError::HeaderExtraction).
    ///
    pub fn combine(
        &self,
        header: &str,
        body: &[u8],
    ) -> Result<Vec<u8>, FhtError> {
        let marker = self.marker().as_bytes();

        let body_region = region_end(body, marker);
        if body_region > 0 {
            return Err(FhtError::HeaderExtraction {
                start: 0,
                end: body_region,
                reason: format!("body already starts with {} header lines", self),
            })
        }

        if header.is_empty() {
            log::info!("Empty header, {} body passed through", self);
            return Ok(body.to_vec())
        }

        let (encoding, _) = detect_encoding(header).ok_or_else(|| FhtError::HeaderExtraction {
            start: 0,
            end: header.len(),
            reason: "header text does not decode as json, microdata or yaml".to_string(),
        })?;

        if !header.ends_with('\n') && !body.is_empty() {
            return Err(FhtError::HeaderExtraction {
                start: 0,
                end: header.len(),
                reason: "header text must end in a line terminator when a body follows it".to_string(),
            })
        }

        let mut combined = fence(header.as_bytes(), marker);
        combined.extend_from_slice(body);

        log::info!("Attached {} header ({} bytes) to {} byte {} body", encoding, header.len(), body.len(), self);
        Ok(combined)
    }
}
