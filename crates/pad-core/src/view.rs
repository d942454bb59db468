//! Viewport state and render output.
//!
//! The renderer is external. This module tells it which lines fall inside the scrolled window
//! and where to draw them, and where the caret goes.

use crate::grid::{CursorPosition, FontMetrics, GridMapper};
use crate::line::Line;
use crate::storage::LineStore;

/// A point in window pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate (grows downward).
    pub y: f32,
}

impl Point {
    /// Create a point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A size in window pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Size {
    /// Create a size.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// The editor's text window and how far it is scrolled.
///
/// The scroll offset is kept in (possibly fractional) rows so that wheel input moves smoothly.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// Window-pixel position of the text window's top-left corner.
    pub origin: Point,
    /// Size of the text window.
    pub size: Size,
    scroll_rows: f32,
}

impl Viewport {
    /// Create an unscrolled viewport.
    pub fn new(origin: Point, size: Size) -> Self {
        Self {
            origin,
            size,
            scroll_rows: 0.0,
        }
    }

    /// Scroll offset in rows.
    pub fn scroll_rows(&self) -> f32 {
        self.scroll_rows
    }

    /// First line at least partially visible.
    pub fn first_visible_row(&self) -> usize {
        self.scroll_rows.floor() as usize
    }

    /// Number of whole rows that fit in the window.
    pub fn visible_row_count(&self, metrics: FontMetrics) -> usize {
        (self.size.height / metrics.line_height).max(0.0).floor() as usize
    }

    /// Apply a normalized wheel delta (positive scrolls toward the top).
    ///
    /// The offset is clamped to `[0, line_count]`.
    pub fn scroll_by(&mut self, wheel_delta: f32, scroll_speed: f32, line_count: usize) {
        if !wheel_delta.is_finite() {
            return;
        }
        self.scroll_rows =
            (self.scroll_rows - wheel_delta * scroll_speed).clamp(0.0, line_count as f32);
    }

    /// Jump so that `row` is the first visible row.
    pub fn scroll_to_row(&mut self, row: usize, line_count: usize) {
        self.scroll_rows = row.min(line_count) as f32;
    }

    /// Scroll the minimum amount needed to show `row` entirely.
    pub fn ensure_visible(&mut self, row: usize, metrics: FontMetrics) {
        let row_f = row as f32;
        let rows = self.visible_row_count(metrics).max(1) as f32;
        if row_f < self.scroll_rows {
            self.scroll_rows = row_f;
        } else if row_f + 1.0 > self.scroll_rows + rows {
            self.scroll_rows = row_f + 1.0 - rows;
        }
    }
}

/// A line to draw, with its window-pixel position.
#[derive(Debug, Clone, Copy)]
pub struct VisibleLine<'a> {
    /// Logical line index.
    pub line_index: usize,
    /// Top-left pixel of the line's first cell.
    pub origin: Point,
    /// The characters to draw.
    pub line: &'a Line,
}

/// Lines inside the viewport, produced lazily from the first visible row.
///
/// A partially scrolled top row is included, as is a partially visible bottom row. Rows past the
/// last line are not produced.
pub fn visible_lines<'a>(
    store: &'a LineStore,
    viewport: &Viewport,
    mapper: &GridMapper,
) -> impl Iterator<Item = VisibleLine<'a>> + use<'a> {
    let first = viewport.first_visible_row();
    let mut rows = viewport.visible_row_count(mapper.metrics());
    if viewport.scroll_rows().fract() > 0.0 {
        rows += 1;
    }
    let viewport = *viewport;
    let mapper = *mapper;

    store
        .lines_from(first)
        .take(rows)
        .enumerate()
        .map(move |(i, line)| {
            let line_index = first + i;
            VisibleLine {
                line_index,
                origin: mapper.cell_origin(&viewport, line_index, 0),
                line,
            }
        })
}

/// A vertical caret segment in window pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaretSegment {
    /// Top end of the caret.
    pub start: Point,
    /// Bottom end of the caret.
    pub end: Point,
    /// Stroke width.
    pub thickness: f32,
}

/// Caret for `cursor`: spans from a quarter row above the row's top to three quarters below it.
pub fn caret_segment(
    cursor: &CursorPosition,
    viewport: &Viewport,
    mapper: &GridMapper,
    caret_width_factor: f32,
) -> CaretSegment {
    let metrics = mapper.metrics();
    let top = mapper.cell_origin(viewport, cursor.line, cursor.grid_column);
    CaretSegment {
        start: Point::new(top.x, top.y - metrics.line_height * 0.25),
        end: Point::new(top.x, top.y + metrics.line_height * 0.75),
        thickness: metrics.char_width * caret_width_factor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::EditorSettings;

    fn mapper() -> GridMapper {
        let settings = EditorSettings::default().with_text_padding(10.0);
        GridMapper::new(FontMetrics::new(8.0, 20.0).unwrap(), &settings)
    }

    fn store(count: usize) -> LineStore {
        LineStore::from_lines(4, (0..count).map(|i| Line::from_text(&format!("line {i}")))).unwrap()
    }

    #[test]
    fn test_scroll_clamps() {
        let mut viewport = Viewport::new(Point::default(), Size::new(100.0, 100.0));
        viewport.scroll_by(-2.0, 4.0, 50);
        assert_eq!(viewport.scroll_rows(), 8.0);
        viewport.scroll_by(10.0, 4.0, 50);
        assert_eq!(viewport.scroll_rows(), 0.0);
        viewport.scroll_by(-100.0, 4.0, 50);
        assert_eq!(viewport.scroll_rows(), 50.0);
        viewport.scroll_by(f32::NAN, 4.0, 50);
        assert_eq!(viewport.scroll_rows(), 50.0);
    }

    #[test]
    fn test_visible_lines_follow_scroll() {
        let store = store(20);
        let mapper = mapper();
        let mut viewport = Viewport::new(Point::new(100.0, 50.0), Size::new(300.0, 100.0));
        viewport.scroll_to_row(6, store.line_count());

        let lines: Vec<VisibleLine<'_>> = visible_lines(&store, &viewport, &mapper).collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0].line_index, 6);
        assert_eq!(lines[0].line.to_string(), "line 6");
        assert_eq!(lines[0].origin, Point::new(110.0, 60.0));
        assert_eq!(lines[4].origin, Point::new(110.0, 140.0));
    }

    #[test]
    fn test_visible_lines_stop_at_end() {
        let store = store(3);
        let viewport = Viewport::new(Point::default(), Size::new(300.0, 400.0));
        assert_eq!(visible_lines(&store, &viewport, &mapper()).count(), 3);
    }

    #[test]
    fn test_ensure_visible() {
        let metrics = FontMetrics::new(8.0, 20.0).unwrap();
        let mut viewport = Viewport::new(Point::default(), Size::new(100.0, 100.0));
        viewport.ensure_visible(12, metrics);
        assert_eq!(viewport.scroll_rows(), 8.0);
        viewport.ensure_visible(3, metrics);
        assert_eq!(viewport.scroll_rows(), 3.0);
        viewport.ensure_visible(5, metrics);
        assert_eq!(viewport.scroll_rows(), 3.0);
    }

    #[test]
    fn test_caret_segment() {
        let cursor = CursorPosition {
            line: 2,
            grid_column: 3,
            char_index: Some(2),
            chars_to_offset_by: 0,
        };
        let viewport = Viewport::new(Point::default(), Size::new(100.0, 100.0));
        let caret = caret_segment(&cursor, &viewport, &mapper(), 0.25);
        assert_eq!(caret.start, Point::new(34.0, 45.0));
        assert_eq!(caret.end, Point::new(34.0, 65.0));
        assert_eq!(caret.thickness, 2.0);
    }
}
