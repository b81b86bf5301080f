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

//! Errors reported by the decoders, encoders, validator and binders.
//!
//! Every error is local to the call that produced it. A caller converting
//! many files can match on [FhtError] and carry on with the next file.

use thiserror::Error;

use crate::Encoding;
use crate::schema::Violation;

/// 1-based line and column of an offending character in the input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Computes the position of byte `offset` in `text`.
    ///
    /// Offsets past the end of `text` are clamped to the end.
    pub fn from_offset(text: &str, offset: usize) -> Self {
        let mut offset = offset.min(text.len());
        while !text.is_char_boundary(offset) {
            offset -= 1;
        }
        let before = &text[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map(|idx| idx + 1).unwrap_or(0);
        let column = before[line_start..].chars().count() + 1;
        Position { line, column }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

fn at(position: &Option<Position>) -> String {
    match position {
        Some(position) => format!(" at {}", position),
        None => String::new(),
    }
}

#[derive(Error, Debug)]
pub enum FhtError {
    /// Input text is not syntactically valid in the declared encoding.
    #[error("malformed {encoding} input{}: {message}", at(.position))]
    MalformedEncoding {
        encoding: Encoding,
        message: String,
        position: Option<Position>,
    },

    /// Input text parses but does not have the shape of a header.
    #[error("{encoding} input cannot be mapped to a header: {message}")]
    AmbiguousStructure {
        encoding: Encoding,
        message: String,
    },

    /// The header region of a bound file could not be located or decoded.
    #[error("header region at bytes {start}..{end} could not be extracted: {reason}")]
    HeaderExtraction {
        start: usize,
        end: usize,
        reason: String,
    },

    /// The decoded header does not conform to the schema.
    #[error("header failed schema validation with {} violation(s)", .0.len())]
    SchemaViolation(Vec<Violation>),

    #[error("unsupported encoding '{0}', expected one of json, yaml, microdata")]
    UnsupportedEncoding(String),

    /// The schema document itself cannot be interpreted.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FhtError {
    pub(crate) fn malformed(encoding: Encoding, message: impl Into<String>, position: Option<Position>) -> Self {
        FhtError::MalformedEncoding { encoding, message: message.into(), position }
    }

    pub(crate) fn ambiguous(encoding: Encoding, message: impl Into<String>) -> Self {
        FhtError::AmbiguousStructure { encoding, message: message.into() }
    }
}
