#![warn(missing_docs)]
//! Pad Core - Headless Line Buffer for a Fixed-Width Text Pad
//!
//! # Overview
//!
//! `pad-core` is the text-handling kernel of a small GUI text pad. It does not open windows, poll
//! events, load fonts or touch the file system: the host hands it raw file bytes and pixel-space
//! input, and gets back the lines to draw, the caret to draw and the bytes to save.
//!
//! # Core Features
//!
//! - **Bucketed line storage**: lines live in fixed-capacity buckets chained through owned links
//! - **Byte-level parsing**: split on terminators before decoding, lossy per-line UTF-8 decoding
//! - **Grid mapping**: pointer pixels to (line, character) under a fixed glyph cell, with tabs
//!   expanded to a fixed number of cells and the offset inside a tab reported explicitly
//! - **In-line editing**: insert and delete runs of characters at the caret, keeping the caret
//!   consistent with tab widths
//! - **Documents and workspace**: modified flag, scratch documents, open-document list
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Workspace / Document (input batches)       │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Viewport & Caret (render output)           │  ← Rendering Data
//! ├─────────────────────────────────────────────┤
//! │  Edit Operations (insert / delete)          │  ← Mutation
//! ├─────────────────────────────────────────────┤
//! │  Grid Mapper (pixels ↔ cells ↔ characters)  │  ← Coordinates
//! ├─────────────────────────────────────────────┤
//! │  Parser (bytes → lines)                     │  ← Loading
//! ├─────────────────────────────────────────────┤
//! │  Line Store (bucket chain)                  │  ← Text Storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use pad_core::{Workspace, EditorSettings, InputBatch, Point};
//! use std::path::Path;
//!
//! let mut workspace = Workspace::new(EditorSettings::default()).unwrap();
//! workspace.open(Path::new("main.go"), b"package main\n".to_vec()).unwrap();
//!
//! let doc = workspace.active_mut();
//! doc.process(&InputBatch::new().pointer(Point::new(1000.0, 12.0)).text("\n\nfunc main() {}"));
//!
//! assert_eq!(doc.store().line_count(), 3);
//! assert_eq!(doc.to_bytes(), b"package main\n\nfunc main() {}\n");
//! ```
//!
//! # Module Description
//!
//! - [`storage`] - bucketed line storage
//! - [`parse`] - raw bytes to a populated store
//! - [`grid`] - font metrics, tab expansion and pointer mapping
//! - [`edit`] - insert/delete at a cursor
//! - [`view`] - viewport, visible lines and caret geometry
//! - [`document`] - one open document and its interaction state
//! - [`workspace`] - the list of open documents
//!
//! # Threading
//!
//! Everything runs synchronously on the caller's thread. A document is owned and mutated by a
//! single input loop; nothing here locks.

pub mod document;
pub mod edit;
pub mod error;
pub mod grid;
pub mod line;
pub mod parse;
pub mod settings;
pub mod storage;
pub mod view;
pub mod workspace;

pub use document::{Document, InputBatch, SCRATCH_NAME, Selection};
pub use error::{BufferError, Result};
pub use grid::{
    CellMeasurer, CharHit, CursorPosition, FontMetrics, GridMapper, METRICS_SAMPLE, Position,
    TextMeasurer, char_visual_width, line_visual_width, resolve_char_index, visual_column_of,
};
pub use line::Line;
pub use parse::{ParseOutput, parse, parse_with_capacity};
pub use settings::EditorSettings;
pub use storage::{LineStore, Lines};
pub use view::{CaretSegment, Point, Size, Viewport, VisibleLine};
pub use workspace::Workspace;
