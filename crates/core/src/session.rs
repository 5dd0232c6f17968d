//! Editor session and command dispatch
//!
//! One session per active document: the annotation set, the selection and
//! the history travel together as explicit state, mutated only through
//! [`EditorSession::apply`]. Toolbar buttons, keyboard shortcuts and canvas
//! events all route through the same dispatch surface, so every input path
//! produces identical state transitions.

use crate::annotation::{Annotation, AnnotationId, BoxKind};
use crate::export::ValidationError;
use crate::history::History;
use crate::selection::Selection;
use crate::store::AnnotationSet;

/// A discrete editing command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Append a text label at a position
    AddText { x: f32, y: f32 },
    /// Append a box annotation with kind defaults
    AddBox { kind: BoxKind },
    /// Replace the geometry of one annotation (drag/resize completion)
    UpdateGeometry {
        id: AnnotationId,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    /// Resolve a click (plain or shift-click) on an annotation
    Select { id: AnnotationId, extend: bool },
    /// Empty the selection
    ClearSelection,
    /// Remove every selected annotation
    DeleteSelected,
    /// Step back one checkpoint
    Undo,
    /// Step forward one undone checkpoint
    Redo,
    /// Atomically replace the whole set (import path)
    Import { annotations: Vec<Annotation> },
}

/// Editing state for one document
///
/// Created empty when a document becomes active, or restored from the
/// persistence adapter via [`EditorSession::with_set`]. Switching documents
/// means dropping this session and creating a new one; sets never leak or
/// merge across documents.
#[derive(Debug, Clone)]
pub struct EditorSession {
    document: String,
    set: AnnotationSet,
    selection: Selection,
    history: History,
}

impl EditorSession {
    /// Start an empty session for a document
    pub fn new(document: impl Into<String>) -> Self {
        Self::with_set(document, AnnotationSet::new())
    }

    /// Start a session from a previously persisted set
    pub fn with_set(document: impl Into<String>, set: AnnotationSet) -> Self {
        Self {
            document: document.into(),
            set,
            selection: Selection::new(),
            history: History::new(),
        }
    }

    /// Document identity, the persistence key source
    pub fn document(&self) -> &str {
        &self.document
    }

    /// Current annotation set
    pub fn set(&self) -> &AnnotationSet {
        &self.set
    }

    /// Current selection
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Whether an undo step is available
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether a redo step is available
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Apply one command
    ///
    /// Structural mutations (add, delete, import) checkpoint history before
    /// they touch the set. Geometry updates do not checkpoint: drag and
    /// resize are not undoable, matching the observed product behavior.
    /// Failed validation leaves set, selection and history untouched.
    pub fn apply(&mut self, command: Command) -> Result<(), ValidationError> {
        match command {
            Command::AddText { x, y } => {
                self.history.checkpoint(&self.set);
                self.set.add_text(x, y);
            }
            Command::AddBox { kind } => {
                self.history.checkpoint(&self.set);
                self.set.add_box(kind);
            }
            Command::UpdateGeometry {
                id,
                x,
                y,
                width,
                height,
            } => {
                self.set.update_geometry(id, x, y, width, height);
            }
            Command::Select { id, extend } => {
                if self.set.contains(id) {
                    self.selection.click(id, extend);
                } else {
                    log::debug!("click on absent annotation {id}");
                }
            }
            Command::ClearSelection => {
                self.selection.clear();
            }
            Command::DeleteSelected => {
                if self.selection.is_empty() {
                    return Ok(());
                }
                self.history.checkpoint(&self.set);
                let ids = self.selection.to_id_set();
                self.set.remove(&ids);
                self.selection.retain_present(&self.set);
            }
            Command::Undo => {
                let current = std::mem::take(&mut self.set);
                self.set = self.history.undo(current);
                self.selection.retain_present(&self.set);
            }
            Command::Redo => {
                let current = std::mem::take(&mut self.set);
                self.set = self.history.redo(current);
                self.selection.retain_present(&self.set);
            }
            Command::Import { annotations } => {
                // Validate before checkpointing so a rejected import leaves
                // no trace in history.
                let replacement = AnnotationSet::from_annotations(annotations)?;
                self.history.checkpoint(&self.set);
                self.set = replacement;
                self.selection.retain_present(&self.set);
            }
        }
        Ok(())
    }
}
