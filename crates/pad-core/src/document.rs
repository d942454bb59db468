//! An open document and its per-frame interaction state.
//!
//! A [`Document`] owns one [`LineStore`] together with everything needed to turn input events into
//! edits on it: the grid mapper (font metrics and tab size), the viewport, the cursor and the
//! selection. The host feeds it one [`InputBatch`] per interaction step and reads back the visible
//! lines and the caret segment to draw.
//!
//! # Example
//!
//! ```rust
//! use pad_core::{CellMeasurer, Document, EditorSettings, InputBatch, Point, Size};
//!
//! let mut doc = Document::open("notes.txt", b"\tfirst\nsecond\n".to_vec(), EditorSettings::default())
//!     .unwrap();
//! doc.refresh_font_metrics(&CellMeasurer::new(8.0, 16.0)).unwrap();
//! doc.set_viewport(Point::new(0.0, 0.0), Size::new(640.0, 480.0));
//!
//! // Click right after the tab on the first line and type.
//! doc.process(&InputBatch::new().pointer(Point::new(10.0 + 4.0 * 8.0, 12.0)).text("my "));
//! assert_eq!(doc.store().get_line(0).to_string(), "\tmy first");
//! assert!(doc.is_modified());
//! assert_eq!(doc.to_bytes(), b"\tmy first\nsecond\n");
//! ```

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::edit;
use crate::error::Result;
use crate::grid::{CursorPosition, GridMapper, Position, TextMeasurer};
use crate::parse::parse_with_capacity;
use crate::settings::EditorSettings;
use crate::storage::LineStore;
use crate::view::{self, CaretSegment, Point, Size, Viewport, VisibleLine};

/// Name given to documents that are not backed by a file.
pub const SCRATCH_NAME: &str = "**scratch**";

/// Selection range between an anchor and the caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Where the selection started.
    pub anchor: Position,
    /// Where the caret is now.
    pub head: Position,
}

impl Selection {
    /// Whether anchor and head coincide.
    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    /// The selection as an ordered `(start, end)` pair.
    pub fn ordered(&self) -> (Position, Position) {
        if self.anchor <= self.head {
            (self.anchor, self.head)
        } else {
            (self.head, self.anchor)
        }
    }
}

/// Input gathered by the host during one interaction step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputBatch {
    /// Pointer position, when the pointer placed or moved the caret this step.
    pub pointer: Option<Point>,
    /// Whether the pointer is dragging (extends the selection instead of collapsing it).
    pub drag: bool,
    /// Normalized wheel delta; positive scrolls toward the top.
    pub scroll_delta: f32,
    /// Number of backspace presses.
    pub backspaces: usize,
    /// Typed characters; `'\n'` starts a new line.
    pub text: Vec<char>,
}

impl InputBatch {
    /// An empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Place the caret at `point`.
    pub fn pointer(mut self, point: Point) -> Self {
        self.pointer = Some(point);
        self
    }

    /// Extend the selection to `point`.
    pub fn drag_to(mut self, point: Point) -> Self {
        self.pointer = Some(point);
        self.drag = true;
        self
    }

    /// Scroll by a wheel delta.
    pub fn scroll(mut self, delta: f32) -> Self {
        self.scroll_delta += delta;
        self
    }

    /// Press backspace `count` times.
    pub fn backspace(mut self, count: usize) -> Self {
        self.backspaces += count;
        self
    }

    /// Type `text`.
    pub fn text(mut self, text: &str) -> Self {
        self.text.extend(text.chars());
        self
    }
}

/// An open document.
#[derive(Debug)]
pub struct Document {
    name: String,
    path: Option<PathBuf>,
    bytes: Vec<u8>,
    modified: bool,
    version: u64,
    store: LineStore,
    settings: EditorSettings,
    mapper: GridMapper,
    viewport: Viewport,
    cursor: CursorPosition,
    anchor: Option<Position>,
}

impl Document {
    /// Create an empty document not backed by a file.
    pub fn scratch(settings: EditorSettings) -> Result<Self> {
        settings.validate()?;
        debug!("scratch document created");
        Ok(Self::from_parts(
            SCRATCH_NAME.to_string(),
            None,
            Vec::new(),
            LineStore::with_bucket_capacity(settings.bucket_capacity)?,
            settings,
        ))
    }

    /// Create a document from the bytes read from `path`.
    pub fn open(path: impl Into<PathBuf>, bytes: Vec<u8>, settings: EditorSettings) -> Result<Self> {
        settings.validate()?;
        let path = path.into();
        let parsed = parse_with_capacity(&bytes, settings.bucket_capacity)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        debug!(
            path = %path.display(),
            line_count = parsed.store.line_count(),
            "document opened"
        );
        Ok(Self::from_parts(
            name,
            Some(path),
            bytes,
            parsed.store,
            settings,
        ))
    }

    fn from_parts(
        name: String,
        path: Option<PathBuf>,
        bytes: Vec<u8>,
        store: LineStore,
        settings: EditorSettings,
    ) -> Self {
        Self {
            name,
            path,
            bytes,
            modified: false,
            version: 0,
            store,
            mapper: GridMapper::new(Default::default(), &settings),
            settings,
            viewport: Viewport::default(),
            cursor: CursorPosition::default(),
            anchor: None,
        }
    }

    /// Rebuild the line store from freshly read bytes.
    ///
    /// Cursor, selection, scroll position and the modified flag are reset.
    pub fn reload(&mut self, bytes: Vec<u8>) -> Result<()> {
        let parsed = parse_with_capacity(&bytes, self.settings.bucket_capacity)?;
        self.store = parsed.store;
        self.bytes = bytes;
        self.modified = false;
        self.version += 1;
        self.cursor = CursorPosition::default();
        self.anchor = None;
        self.viewport.scroll_to_row(0, 0);
        debug!(name = %self.name, line_count = self.store.line_count(), "document reloaded");
        Ok(())
    }

    /// Display name (file name, or [`SCRATCH_NAME`]).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Backing file path, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether this is a scratch document.
    pub fn is_scratch(&self) -> bool {
        self.path.is_none()
    }

    /// Whether the document changed since it was opened or last saved.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Incremented by every change to the text.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The byte snapshot taken at open or at the last save.
    pub fn saved_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The line store.
    pub fn store(&self) -> &LineStore {
        &self.store
    }

    /// Settings this document was created with.
    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    /// The grid mapper (font metrics, tab size, padding).
    pub fn mapper(&self) -> &GridMapper {
        &self.mapper
    }

    /// Current viewport.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Current cursor.
    pub fn cursor(&self) -> CursorPosition {
        self.cursor
    }

    /// Current selection, if the pointer has dragged since the last click or edit.
    pub fn selection(&self) -> Option<Selection> {
        let anchor = self.anchor?;
        let selection = Selection {
            anchor,
            head: self.cursor.position(),
        };
        (!selection.is_empty()).then_some(selection)
    }

    /// Serialize the current text: every line followed by `'\n'`.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.store.to_bytes()
    }

    /// Record a successful save: the snapshot becomes the current text and the modified flag
    /// clears.
    pub fn mark_saved(&mut self) {
        self.bytes = self.to_bytes();
        self.modified = false;
        debug!(name = %self.name, bytes = self.bytes.len(), "document saved");
    }

    /// Re-measure font metrics; call when the font or window scale changes.
    pub fn refresh_font_metrics(&mut self, measurer: &impl TextMeasurer) -> Result<()> {
        self.mapper.refresh_font_metrics(measurer)?;
        self.cursor = self.mapper.resolve(&self.store, &self.cursor);
        Ok(())
    }

    /// Move or resize the text window.
    pub fn set_viewport(&mut self, origin: Point, size: Size) {
        self.viewport.origin = origin;
        self.viewport.size = size;
    }

    /// Scroll by a normalized wheel delta.
    pub fn scroll(&mut self, wheel_delta: f32) {
        self.viewport.scroll_by(
            wheel_delta,
            self.settings.scroll_speed,
            self.store.line_count(),
        );
    }

    /// Place the caret under `point`, collapsing the selection.
    pub fn set_pointer(&mut self, point: Point) -> CursorPosition {
        self.cursor = self.mapper.cursor_at(&self.store, &self.viewport, point);
        self.anchor = Some(self.cursor.position());
        self.cursor
    }

    /// Move the caret under `point`, keeping the selection anchor.
    pub fn drag_to(&mut self, point: Point) -> CursorPosition {
        let anchor = self.anchor.unwrap_or_else(|| self.cursor.position());
        self.cursor = self.mapper.cursor_at(&self.store, &self.viewport, point);
        self.anchor = Some(anchor);
        self.cursor
    }

    /// Type `text` at the caret. Returns whether the document changed.
    pub fn insert(&mut self, text: &[char]) -> bool {
        let tab_size = self.mapper.tab_size();
        let cursor = edit::insert(&mut self.store, &self.cursor, text, tab_size);
        self.apply_edit(cursor)
    }

    /// Type a string at the caret.
    pub fn insert_str(&mut self, text: &str) -> bool {
        let chars: Vec<char> = text.chars().collect();
        self.insert(&chars)
    }

    /// Delete `count` characters left of the caret. Returns whether the document changed.
    pub fn delete(&mut self, count: usize) -> bool {
        let tab_size = self.mapper.tab_size();
        let cursor = edit::delete(&mut self.store, &self.cursor, count, tab_size);
        self.apply_edit(cursor)
    }

    /// Press backspace `count` times.
    ///
    /// Each press deletes the character left of the caret; at the start of a line it joins the
    /// line to the one above instead.
    pub fn backspace(&mut self, count: usize) -> bool {
        let tab_size = self.mapper.tab_size();
        let mut changed = false;
        for _ in 0..count {
            let cursor = self.mapper.resolve(&self.store, &self.cursor);
            let next = if cursor.char_index.is_some() {
                edit::delete(&mut self.store, &cursor, 1, tab_size)
            } else {
                edit::join_with_previous(&mut self.store, cursor.line, tab_size)
            };
            if !self.apply_edit(next) {
                break;
            }
            changed = true;
        }
        changed
    }

    fn apply_edit(&mut self, cursor: Option<CursorPosition>) -> bool {
        let Some(cursor) = cursor else {
            return false;
        };
        self.cursor = cursor;
        self.anchor = None;
        self.modified = true;
        self.version += 1;
        self.viewport
            .ensure_visible(cursor.line, self.mapper.metrics());
        true
    }

    /// Process one interaction step: scroll, then pointer, then backspaces, then typed text.
    pub fn process(&mut self, input: &InputBatch) -> bool {
        if input.scroll_delta != 0.0 {
            self.scroll(input.scroll_delta);
        }
        if let Some(point) = input.pointer {
            if input.drag {
                self.drag_to(point);
            } else {
                self.set_pointer(point);
            }
        }
        let deleted = self.backspace(input.backspaces);
        let inserted = self.insert(&input.text);
        deleted || inserted
    }

    /// The lines to draw this frame.
    pub fn visible_lines(&self) -> impl Iterator<Item = VisibleLine<'_>> {
        view::visible_lines(&self.store, &self.viewport, &self.mapper)
    }

    /// The caret to draw this frame.
    pub fn caret_segment(&self) -> CaretSegment {
        view::caret_segment(
            &self.cursor,
            &self.viewport,
            &self.mapper,
            self.settings.caret_width_factor,
        )
    }

    /// Text covered by the selection, lines joined with `'\n'`.
    pub fn selected_text(&self) -> Option<String> {
        let (start, end) = self.selection()?.ordered();
        let mut out = String::new();
        for (i, line) in self
            .store
            .lines_from(start.line)
            .take(end.line - start.line + 1)
            .enumerate()
        {
            let row = start.line + i;
            let chars = line.chars();
            let from = if row == start.line { start.column.min(chars.len()) } else { 0 };
            let to = if row == end.line { end.column.min(chars.len()) } else { chars.len() };
            if row > start.line {
                out.push('\n');
            }
            out.extend(&chars[from..to.max(from)]);
        }
        Some(out)
    }
}
