//! Editor settings.
//!
//! `pad-core` reads no configuration files or environment variables. The host builds an
//! [`EditorSettings`] value (usually from `Default`) and hands it to each [`crate::Document`].

use crate::error::{BufferError, Result};

/// Default number of grid cells a `'\t'` occupies.
pub const DEFAULT_TAB_SIZE: usize = 4;

/// Default number of lines held by one bucket of a [`crate::LineStore`].
pub const DEFAULT_BUCKET_CAPACITY: usize = 100;

/// Default padding (in pixels) between the editor window edge and the first glyph cell.
pub const DEFAULT_TEXT_PADDING: f32 = 10.0;

/// Default number of rows scrolled per wheel unit.
pub const DEFAULT_SCROLL_SPEED: f32 = 4.0;

/// Default caret thickness as a fraction of one glyph cell width.
pub const DEFAULT_CARET_WIDTH_FACTOR: f32 = 0.15;

/// Per-document settings shared by storage, grid mapping and the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorSettings {
    /// Visual width of a tab, in grid cells.
    pub tab_size: usize,
    /// Lines per bucket in the line store.
    pub bucket_capacity: usize,
    /// Padding applied to both axes before the first glyph cell, in pixels.
    pub text_padding: f32,
    /// Rows scrolled per normalized wheel unit.
    pub scroll_speed: f32,
    /// Caret thickness relative to the glyph cell width.
    pub caret_width_factor: f32,
}

impl EditorSettings {
    /// Set the tab size (in cells).
    pub fn with_tab_size(mut self, tab_size: usize) -> Self {
        self.tab_size = tab_size;
        self
    }

    /// Set the bucket capacity used when building line stores.
    pub fn with_bucket_capacity(mut self, bucket_capacity: usize) -> Self {
        self.bucket_capacity = bucket_capacity;
        self
    }

    /// Set the text padding (in pixels).
    pub fn with_text_padding(mut self, text_padding: f32) -> Self {
        self.text_padding = text_padding;
        self
    }

    /// Set the scroll speed (rows per wheel unit).
    pub fn with_scroll_speed(mut self, scroll_speed: f32) -> Self {
        self.scroll_speed = scroll_speed;
        self
    }

    /// Set the caret width factor.
    pub fn with_caret_width_factor(mut self, caret_width_factor: f32) -> Self {
        self.caret_width_factor = caret_width_factor;
        self
    }

    /// Check the settings that would otherwise make indexing or tab expansion meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.tab_size == 0 {
            return Err(BufferError::ZeroTabSize);
        }
        if self.bucket_capacity == 0 {
            return Err(BufferError::ZeroBucketCapacity);
        }
        Ok(())
    }
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            tab_size: DEFAULT_TAB_SIZE,
            bucket_capacity: DEFAULT_BUCKET_CAPACITY,
            text_padding: DEFAULT_TEXT_PADDING,
            scroll_speed: DEFAULT_SCROLL_SPEED,
            caret_width_factor: DEFAULT_CARET_WIDTH_FACTOR,
        }
    }
}
