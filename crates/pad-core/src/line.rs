//! A single line of text stored as Unicode scalar values.

use std::fmt;
use std::ops::Range;

/// One line of a document, without its terminator.
///
/// Characters are stored one `char` per codepoint so that character indices used by the grid
/// mapper and the edit operations are plain slice indices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Line {
    chars: Vec<char>,
}

impl Line {
    /// Create an empty line.
    pub const fn new() -> Self {
        Self { chars: Vec::new() }
    }

    /// Create a line from already decoded characters.
    ///
    /// The characters must not contain `'\n'`.
    pub fn from_chars(chars: Vec<char>) -> Self {
        debug_assert!(!chars.contains(&'\n'), "line contains a terminator");
        Self { chars }
    }

    /// Create a line from a `&str` that contains no `'\n'`.
    pub fn from_text(text: &str) -> Self {
        Self::from_chars(text.chars().collect())
    }

    /// The characters of this line.
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Number of characters (codepoints) in this line.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Whether the line has no characters.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Number of `'\t'` characters inside `range`.
    pub(crate) fn tab_count(&self, range: Range<usize>) -> usize {
        self.chars[range].iter().filter(|&&ch| ch == '\t').count()
    }

    /// Append the UTF-8 encoding of this line to `out`.
    pub fn encode_utf8_into(&self, out: &mut Vec<u8>) {
        let mut buf = [0u8; 4];
        for ch in &self.chars {
            out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
        }
    }

    /// Replace `range` with `replacement`.
    ///
    /// The backing array is rebuilt rather than shifted in place: the new vector holds the prefix,
    /// the replacement and the suffix, and the old one is dropped.
    pub(crate) fn splice(&mut self, range: Range<usize>, replacement: &[char]) {
        debug_assert!(!replacement.contains(&'\n'), "line contains a terminator");
        let removed = range.end - range.start;
        let mut chars = Vec::with_capacity(self.chars.len() - removed + replacement.len());
        chars.extend_from_slice(&self.chars[..range.start]);
        chars.extend_from_slice(replacement);
        chars.extend_from_slice(&self.chars[range.end..]);
        self.chars = chars;
    }

    pub(crate) fn clear(&mut self) {
        self.chars = Vec::new();
    }

    /// Split the line at `at`, keeping `[0, at)` and returning `[at, len)`.
    pub(crate) fn split_off(&mut self, at: usize) -> Line {
        Line {
            chars: self.chars.split_off(at),
        }
    }

    /// Append another line's characters to the end of this one.
    pub(crate) fn append(&mut self, mut other: Line) {
        self.chars.append(&mut other.chars);
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.chars.iter().try_for_each(|ch| fmt::Write::write_char(f, *ch))
    }
}

impl From<&str> for Line {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}
