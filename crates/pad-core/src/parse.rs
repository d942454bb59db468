//! Building a [`LineStore`] from raw file bytes.
//!
//! Splitting happens on the byte stream before any decoding, so a malformed sequence can only
//! affect the line that contains it. Each line is then decoded on its own with a lossy policy:
//! every maximal invalid byte sequence becomes one U+FFFD REPLACEMENT CHARACTER, exactly as
//! [`String::from_utf8_lossy`] does.
//!
//! Only `'\n'` terminates a line. A `'\r'` before it is ordinary line content.

use tracing::{debug, warn};

use crate::error::Result;
use crate::line::Line;
use crate::settings::DEFAULT_BUCKET_CAPACITY;
use crate::storage::LineStore;

/// A freshly parsed document.
#[derive(Debug)]
pub struct ParseOutput {
    /// The populated store.
    pub store: LineStore,
    /// Number of invalid byte sequences replaced with U+FFFD.
    pub replaced_sequences: usize,
}

impl ParseOutput {
    /// Number of lines in the parsed store.
    pub fn line_count(&self) -> usize {
        self.store.line_count()
    }
}

/// Parse `bytes` into a store with the default bucket capacity.
pub fn parse(bytes: &[u8]) -> ParseOutput {
    parse_with_capacity(bytes, DEFAULT_BUCKET_CAPACITY).expect("non-zero capacity")
}

/// Parse `bytes` into a store whose buckets hold `capacity` lines.
///
/// Every `'\n'` closes a line. Input that does not end with `'\n'` still yields its trailing run
/// as a final line; empty input yields no lines at all.
pub fn parse_with_capacity(bytes: &[u8], capacity: usize) -> Result<ParseOutput> {
    let mut segments: Vec<&[u8]> = bytes.split(|&byte| byte == b'\n').collect();
    if bytes.is_empty() || bytes.ends_with(b"\n") {
        segments.pop();
    }

    let mut replaced_sequences = 0usize;
    let lines = segments.into_iter().map(|segment| {
        let (line, replaced) = decode_line(segment);
        replaced_sequences += replaced;
        line
    });
    let store = LineStore::from_lines(capacity, lines)?;

    if replaced_sequences > 0 {
        warn!(
            replaced_sequences,
            "input contained invalid UTF-8; replaced with U+FFFD"
        );
    }
    debug!(
        bytes = bytes.len(),
        line_count = store.line_count(),
        bucket_count = store.bucket_count(),
        "parsed document"
    );

    Ok(ParseOutput {
        store,
        replaced_sequences,
    })
}

fn decode_line(bytes: &[u8]) -> (Line, usize) {
    let mut chars = Vec::with_capacity(bytes.len());
    let mut replaced = 0;
    for chunk in bytes.utf8_chunks() {
        chars.extend(chunk.valid().chars());
        if !chunk.invalid().is_empty() {
            chars.push(char::REPLACEMENT_CHARACTER);
            replaced += 1;
        }
    }
    (Line::from_chars(chars), replaced)
}
