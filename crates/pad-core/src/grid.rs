//! Grid mapping between window pixels, glyph cells and logical positions.
//!
//! Three coordinate spaces are involved:
//!
//! - **window pixels**: pointer input, origin at the editor window's top-left, y grows down;
//! - **grid cells**: pixels divided by the fixed glyph cell size, clamped to non-negative integers;
//! - **logical positions**: a line index plus a character index into that line.
//!
//! The font is assumed to be fixed-width. A `'\t'` is stored as one character but occupies
//! `tab_size` cells; every other character occupies one cell.

use std::cmp::Ordering;

use tracing::{debug, trace};
use unicode_width::UnicodeWidthStr;

use crate::error::{BufferError, Result};
use crate::settings::{DEFAULT_TAB_SIZE, DEFAULT_TEXT_PADDING, EditorSettings};
use crate::storage::LineStore;
use crate::view::{Point, Viewport};

/// Sample rendered to measure the glyph cell width.
///
/// Measuring a single glyph drifts because the measurement routine rounds per call, so the width
/// is averaged over a multi-character run instead.
pub const METRICS_SAMPLE: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Text measurement provided by the rendering side.
pub trait TextMeasurer {
    /// Pixel width of `text` laid out on a single line.
    fn text_width(&self, text: &str) -> f32;

    /// Pixel distance between the tops of two consecutive lines.
    fn line_height(&self) -> f32;
}

/// A measurer for hosts that already draw on a cell grid (terminals, test harnesses).
///
/// Widths follow UAX #11 through `unicode-width`, scaled by the cell size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMeasurer {
    /// Width of one cell in pixels.
    pub cell_width: f32,
    /// Height of one cell in pixels.
    pub cell_height: f32,
}

impl CellMeasurer {
    /// Create a measurer with the given cell size.
    pub fn new(cell_width: f32, cell_height: f32) -> Self {
        Self {
            cell_width,
            cell_height,
        }
    }
}

impl TextMeasurer for CellMeasurer {
    fn text_width(&self, text: &str) -> f32 {
        UnicodeWidthStr::width(text) as f32 * self.cell_width
    }

    fn line_height(&self) -> f32 {
        self.cell_height
    }
}

/// Glyph cell size of the active font.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    /// Advance of one glyph in pixels.
    pub char_width: f32,
    /// Height of one line in pixels.
    pub line_height: f32,
}

impl FontMetrics {
    /// Create metrics from explicit sizes, rejecting non-finite or non-positive values.
    pub fn new(char_width: f32, line_height: f32) -> Result<Self> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(char_width) || !valid(line_height) {
            return Err(BufferError::InvalidFontMetrics {
                char_width,
                line_height,
            });
        }
        Ok(Self {
            char_width,
            line_height,
        })
    }

    /// Measure the cell size by averaging the width of [`METRICS_SAMPLE`].
    pub fn measure(measurer: &impl TextMeasurer) -> Result<Self> {
        let sample_len = METRICS_SAMPLE.chars().count() as f32;
        Self::new(
            measurer.text_width(METRICS_SAMPLE) / sample_len,
            measurer.line_height(),
        )
    }
}

impl Default for FontMetrics {
    /// An 8x16 cell, the shape of a 16px fixed-width font.
    fn default() -> Self {
        Self {
            char_width: 8.0,
            line_height: 16.0,
        }
    }
}

/// Position coordinates (line and column numbers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Zero-based logical line index.
    pub line: usize,
    /// Zero-based column in characters within the logical line.
    pub column: usize,
}

impl Position {
    /// Create a new logical position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then_with(|| self.column.cmp(&other.column))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The character a grid column lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharHit {
    /// Index of the character whose visual span ends at or after the column.
    pub char_index: usize,
    /// Cells between the column and the end of that character's span.
    ///
    /// Non-zero only when the column falls inside a tab.
    pub chars_to_offset_by: usize,
}

/// Visual width of one character, in cells.
pub fn char_visual_width(ch: char, tab_size: usize) -> usize {
    if ch == '\t' { tab_size } else { 1 }
}

/// Visual width of a whole line, in cells.
pub fn line_visual_width(chars: &[char], tab_size: usize) -> usize {
    chars.iter().map(|&ch| char_visual_width(ch, tab_size)).sum()
}

/// Visual column at which character `char_index` starts (the sum of the widths before it).
///
/// Indices past the end yield the width of the whole line.
pub fn visual_column_of(chars: &[char], char_index: usize, tab_size: usize) -> usize {
    let end = char_index.min(chars.len());
    line_visual_width(&chars[..end], tab_size)
}

/// Resolve a grid column to the character that owns it.
///
/// Walks the line accumulating visual widths until the running width reaches `grid_column`. The
/// character at that point is the one immediately left of a caret drawn at the column. Column 0
/// and empty lines have no such character. Columns past the end of the line resolve to the last
/// character.
pub fn resolve_char_index(chars: &[char], grid_column: usize, tab_size: usize) -> Option<CharHit> {
    if grid_column == 0 || chars.is_empty() {
        return None;
    }

    let mut width = 0usize;
    for (char_index, &ch) in chars.iter().enumerate() {
        width += char_visual_width(ch, tab_size);
        if width >= grid_column {
            return Some(CharHit {
                char_index,
                chars_to_offset_by: width - grid_column,
            });
        }
    }

    Some(CharHit {
        char_index: chars.len() - 1,
        chars_to_offset_by: 0,
    })
}

/// A caret location in both grid and logical terms.
///
/// Recomputed on every interaction from the pointer and the scroll offset, and after every edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorPosition {
    /// Logical line, which is also the grid row since lines never wrap.
    pub line: usize,
    /// Grid column of the caret after tab expansion.
    pub grid_column: usize,
    /// Character immediately left of the caret, if any.
    pub char_index: Option<usize>,
    /// Cells left until the end of `char_index`'s span when the caret sits inside a tab.
    pub chars_to_offset_by: usize,
}

impl CursorPosition {
    /// Build a cursor for `grid_column` on a line with characters `chars`.
    pub fn at_grid_column(line: usize, chars: &[char], grid_column: usize, tab_size: usize) -> Self {
        let hit = resolve_char_index(chars, grid_column, tab_size);
        Self {
            line,
            grid_column,
            char_index: hit.map(|hit| hit.char_index),
            chars_to_offset_by: hit.map_or(0, |hit| hit.chars_to_offset_by),
        }
    }

    /// Build a cursor that sits before character `char_offset` (after `char_offset` characters).
    pub fn at_char_offset(line: usize, chars: &[char], char_offset: usize, tab_size: usize) -> Self {
        let char_offset = char_offset.min(chars.len());
        Self {
            line,
            grid_column: visual_column_of(chars, char_offset, tab_size),
            char_index: char_offset.checked_sub(1),
            chars_to_offset_by: 0,
        }
    }

    /// Number of characters left of the caret; where typed text goes.
    pub fn char_offset(&self) -> usize {
        self.char_index.map_or(0, |index| index + 1)
    }

    /// The caret as a logical position.
    pub fn position(&self) -> Position {
        Position::new(self.line, self.char_offset())
    }
}

/// Converts pointer positions to cursors and cursors back to pixel positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMapper {
    metrics: FontMetrics,
    tab_size: usize,
    text_padding: f32,
}

impl GridMapper {
    /// Create a mapper for the given metrics and settings.
    pub fn new(metrics: FontMetrics, settings: &EditorSettings) -> Self {
        Self {
            metrics,
            tab_size: settings.tab_size.max(1),
            text_padding: settings.text_padding,
        }
    }

    /// Current cell size.
    pub fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    /// Tab width in cells.
    pub fn tab_size(&self) -> usize {
        self.tab_size
    }

    /// Padding between the window edge and the first cell.
    pub fn text_padding(&self) -> f32 {
        self.text_padding
    }

    /// Re-measure the cell size; call after the font or the window scale changes.
    pub fn refresh_font_metrics(&mut self, measurer: &impl TextMeasurer) -> Result<()> {
        self.metrics = FontMetrics::measure(measurer)?;
        debug!(
            char_width = self.metrics.char_width,
            line_height = self.metrics.line_height,
            "font metrics refreshed"
        );
        Ok(())
    }

    /// Top-left pixel of the first cell.
    pub fn text_origin(&self, viewport: &Viewport) -> Point {
        Point::new(
            viewport.origin.x + self.text_padding,
            viewport.origin.y + self.text_padding,
        )
    }

    /// Grid row (absolute, scroll applied) under a window-pixel y coordinate, not yet clamped to
    /// the document.
    pub fn grid_row_at(&self, viewport: &Viewport, y: f32) -> usize {
        let rel = (y - self.text_origin(viewport).y) / self.metrics.line_height;
        (rel.max(0.0) + viewport.scroll_rows()).floor() as usize
    }

    /// Grid column under a window-pixel x coordinate, not yet clamped to a line.
    pub fn grid_column_at(&self, viewport: &Viewport, x: f32) -> usize {
        let rel = (x - self.text_origin(viewport).x) / self.metrics.char_width;
        rel.max(0.0).floor() as usize
    }

    /// Map a pointer position to a cursor.
    ///
    /// The row is clamped to `[0, line_count]`; the column is clamped to `[0, width]` where
    /// `width` is the visual width of the line under the pointer.
    pub fn cursor_at(&self, store: &LineStore, viewport: &Viewport, point: Point) -> CursorPosition {
        let line = self.grid_row_at(viewport, point.y).min(store.line_count());
        let chars = store.get_line(line).chars();
        let grid_column = self
            .grid_column_at(viewport, point.x)
            .min(line_visual_width(chars, self.tab_size));

        let cursor = CursorPosition::at_grid_column(line, chars, grid_column, self.tab_size);
        trace!(x = point.x, y = point.y, ?cursor, "pointer mapped");
        cursor
    }

    /// Re-derive a cursor's character from its grid column against the current line contents.
    pub fn resolve(&self, store: &LineStore, cursor: &CursorPosition) -> CursorPosition {
        let chars = store.get_line(cursor.line).chars();
        let grid_column = cursor
            .grid_column
            .min(line_visual_width(chars, self.tab_size));
        CursorPosition::at_grid_column(cursor.line, chars, grid_column, self.tab_size)
    }

    /// Window-pixel position of the top-left corner of a cell.
    pub fn cell_origin(&self, viewport: &Viewport, line: usize, grid_column: usize) -> Point {
        let origin = self.text_origin(viewport);
        let screen_row = line as f32 - viewport.scroll_rows();
        Point::new(
            origin.x + grid_column as f32 * self.metrics.char_width,
            origin.y + screen_row * self.metrics.line_height,
        )
    }
}

impl Default for GridMapper {
    fn default() -> Self {
        Self {
            metrics: FontMetrics::default(),
            tab_size: DEFAULT_TAB_SIZE,
            text_padding: DEFAULT_TEXT_PADDING,
        }
    }
}
