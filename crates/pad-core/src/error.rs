//! Error types for `pad-core`.

use thiserror::Error;

/// Errors produced by checked buffer, view and workspace operations.
///
/// Conditions an interactive frame is expected to hit (reading past the last line, editing at an
/// unresolved caret) are not errors; they are absorbed where they occur.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BufferError {
    #[error("line {index} is out of range (line count {line_count})")]
    /// A checked line access addressed a line that does not exist.
    LineOutOfRange {
        /// The requested line index.
        index: usize,
        /// The number of lines in the store.
        line_count: usize,
    },

    #[error("bucket capacity must be at least 1")]
    /// A line store was configured with zero lines per bucket.
    ZeroBucketCapacity,

    #[error("tab size must be at least 1")]
    /// Settings requested a zero-width tab.
    ZeroTabSize,

    #[error("invalid font metrics: char width {char_width}, line height {line_height}")]
    /// A text measurer reported a cell size that cannot be used for grid mapping.
    InvalidFontMetrics {
        /// Averaged glyph advance in pixels.
        char_width: f32,
        /// Line height in pixels.
        line_height: f32,
    },

    #[error("document {index} is out of range (open documents {count})")]
    /// A workspace operation addressed a document slot that does not exist.
    DocumentOutOfRange {
        /// The requested document index.
        index: usize,
        /// The number of open documents.
        count: usize,
    },
}

/// Result type used across `pad-core`.
pub type Result<T> = std::result::Result<T, BufferError>;
