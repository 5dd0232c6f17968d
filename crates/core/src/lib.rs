//! Marginalia Core Library
//!
//! Annotation state engine: data model, snapshot undo/redo history,
//! selection, command dispatch and portable JSON import/export.

pub mod annotation;
pub mod export;
pub mod history;
pub mod input;
pub mod selection;
pub mod session;
pub mod store;

pub use annotation::{
    Annotation, AnnotationId, BoxKind, Fill, Shape, DEFAULT_FONT_SIZE, DEFAULT_TEXT_CONTENT,
};
pub use export::{export_json, import_json, ValidationError};
pub use history::{History, DEFAULT_HISTORY_DEPTH};
pub use input::{command_for_key, Key, Modifiers};
pub use selection::Selection;
pub use session::{Command, EditorSession};
pub use store::AnnotationSet;
