//! Selection controller
//!
//! Tracks which annotations are currently selected and resolves
//! click/shift-click semantics. Selection is always a subset of the active
//! set's ids; removal paths prune it in the same step as the store
//! mutation. Carries no rendering logic.

use crate::annotation::AnnotationId;
use crate::store::AnnotationSet;
use std::collections::HashSet;

/// Set of currently selected annotation ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: HashSet<AnnotationId>,
}

impl Selection {
    /// Create an empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a click on an annotation
    ///
    /// Without `extend` the selection collapses to just this id. With
    /// `extend` (shift-click) the id's membership is toggled.
    pub fn click(&mut self, id: AnnotationId, extend: bool) {
        if extend {
            if !self.ids.remove(&id) {
                self.ids.insert(id);
            }
        } else {
            self.ids.clear();
            self.ids.insert(id);
        }
    }

    /// Empty the selection
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Whether this id is selected
    pub fn contains(&self, id: AnnotationId) -> bool {
        self.ids.contains(&id)
    }

    /// Selected ids, in no particular order
    pub fn ids(&self) -> impl Iterator<Item = AnnotationId> + '_ {
        self.ids.iter().copied()
    }

    /// Selected ids as an owned set
    pub fn to_id_set(&self) -> HashSet<AnnotationId> {
        self.ids.clone()
    }

    /// Number of selected annotations
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is selected
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Drop every id that is no longer present in `set`
    pub fn retain_present(&mut self, set: &AnnotationSet) {
        self.ids.retain(|id| set.contains(*id));
    }
}
