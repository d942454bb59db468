//! Workspace of open documents.
//!
//! The host's tab bar and file tree are outside `pad-core`; this module keeps the model behind
//! them: an ordered list of [`Document`]s and which one is active. There is always at least one
//! document, so an empty workspace holds a scratch document.

use std::path::Path;

use tracing::{debug, info};

use crate::document::Document;
use crate::error::{BufferError, Result};
use crate::settings::EditorSettings;

/// Ordered collection of open documents with one active document.
#[derive(Debug)]
pub struct Workspace {
    documents: Vec<Document>,
    active: usize,
    settings: EditorSettings,
}

impl Workspace {
    /// Create a workspace holding a single scratch document.
    pub fn new(settings: EditorSettings) -> Result<Self> {
        Ok(Self {
            documents: vec![Document::scratch(settings)?],
            active: 0,
            settings,
        })
    }

    /// Number of open documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Always `false`: a workspace keeps at least one document open.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// All open documents in tab order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Index of the active document.
    pub fn active_index(&self) -> usize {
        self.active
    }

    /// The active document.
    pub fn active(&self) -> &Document {
        &self.documents[self.active]
    }

    /// The active document, mutably.
    pub fn active_mut(&mut self) -> &mut Document {
        &mut self.documents[self.active]
    }

    /// Index of the document backed by `path`, if it is open.
    pub fn find_by_path(&self, path: &Path) -> Option<usize> {
        self.documents
            .iter()
            .position(|document| document.path() == Some(path))
    }

    /// Open the file at `path` whose contents the host already read into `bytes`.
    ///
    /// If the path is already open, that document is activated and `bytes` is ignored. Returns
    /// the index of the active document.
    pub fn open(&mut self, path: &Path, bytes: Vec<u8>) -> Result<usize> {
        if let Some(index) = self.find_by_path(path) {
            debug!(path = %path.display(), index, "already open; switching");
            self.active = index;
            return Ok(index);
        }

        let document = Document::open(path, bytes, self.settings)?;
        self.documents.push(document);
        self.active = self.documents.len() - 1;
        info!(path = %path.display(), index = self.active, "document opened");
        Ok(self.active)
    }

    /// Open a new scratch document and activate it.
    pub fn new_scratch(&mut self) -> Result<usize> {
        self.documents.push(Document::scratch(self.settings)?);
        self.active = self.documents.len() - 1;
        Ok(self.active)
    }

    /// Make document `index` the active one.
    pub fn set_active(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.active = index;
        Ok(())
    }

    /// Close document `index` and return it.
    ///
    /// The active document stays active when another one closes. Closing the last document opens
    /// a fresh scratch document in its place.
    pub fn close(&mut self, index: usize) -> Result<Document> {
        self.check_index(index)?;
        let closed = self.documents.remove(index);

        if self.documents.is_empty() {
            self.documents.push(Document::scratch(self.settings)?);
            self.active = 0;
        } else if index < self.active || self.active >= self.documents.len() {
            self.active -= 1;
        }

        info!(name = closed.name(), modified = closed.is_modified(), "document closed");
        Ok(closed)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.documents.len() {
            return Err(BufferError::DocumentOutOfRange {
                index,
                count: self.documents.len(),
            });
        }
        Ok(())
    }
}
