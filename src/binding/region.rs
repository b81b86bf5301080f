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

//! Line level handling of the marker-fenced header region.
//!
//! A header region is the maximal run of lines at the very start of a file
//! that begin with the format's marker. Line terminators are part of the
//! lines, so fencing and unfencing never change a byte of the header text.

use bstr::ByteSlice;

/// Returns the end offset of the header region, 0 if the first line is not a marker line.
pub(crate) fn region_end(
    data: &[u8],
    marker: &[u8],
) -> usize {
    let mut end = 0;
    for line in data.lines_with_terminator() {
        if !line.starts_with(marker) {
            break
        }
        end += line.len();
    }
    end
}

/// Removes `marker` from the start of every line in `region`.
pub(crate) fn unfence(
    region: &[u8],
    marker: &[u8],
) -> Vec<u8> {
    let mut text: Vec<u8> = Vec::with_capacity(region.len());
    region.lines_with_terminator().for_each(|line| {
        text.extend_from_slice(line.strip_prefix(marker).unwrap_or(line));
    });
    text
}

/// Prefixes every line of `text` with `marker`.
pub(crate) fn fence(
    text: &[u8],
    marker: &[u8],
) -> Vec<u8> {
    let mut region: Vec<u8> = Vec::with_capacity(text.len() + marker.len() * (text.lines().count() + 1));
    text.lines_with_terminator().for_each(|line| {
        region.extend_from_slice(marker);
        region.extend_from_slice(line);
    });
    region
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn region_end_stops_at_first_unmarked_line() {
        use super::region_end;

        let data = b";~title: x\n;~organism: y\n>seq1\n;~not header\nACGT\n";
        assert_eq!(region_end(data, b";~"), 26);
        assert_eq!(region_end(b">seq1\nACGT\n", b";~"), 0);
        assert_eq!(region_end(b"", b";~"), 0);
        assert_eq!(region_end(b";~title: x", b";~"), 10);
    }

    #[test]
    fn unfence_keeps_line_terminators() {
        use super::unfence;

        let got = unfence(b"#~title: x\r\n#~\n#~organism: y", b"#~");
        assert_eq!(got, b"title: x\r\n\norganism: y".to_vec());
    }

    #[test]
    fn fence_then_unfence() {
        use super::{fence, region_end, unfence};

        let text = b"{\n  \"title\": \"x\"\n}\n";
        let fenced = fence(text, b";~");

        assert_eq!(fenced, b";~{\n;~  \"title\": \"x\"\n;~}\n".to_vec());
        assert_eq!(region_end(&fenced, b";~"), fenced.len());
        assert_eq!(unfence(&fenced, b";~"), text.to_vec());
    }
}
