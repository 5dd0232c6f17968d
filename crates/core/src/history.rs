//! Snapshot-based undo/redo history
//!
//! Each checkpoint stores a full deep copy of the annotation set, taken
//! before the mutation is applied. Snapshots are independent values, so a
//! later edit can never retroactively alter a history entry.

use crate::store::AnnotationSet;
use std::collections::VecDeque;

/// Default maximum number of undo snapshots retained
pub const DEFAULT_HISTORY_DEPTH: usize = 100;

/// Undo/redo stacks of annotation set snapshots
///
/// The stacks are bounded: beyond `max_depth` the oldest undo snapshots are
/// evicted first. Pushing a new checkpoint clears the redo stack, so the two
/// stacks never hold overlapping futures.
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<AnnotationSet>,
    redo: Vec<AnnotationSet>,
    max_depth: usize,
}

impl History {
    /// Create a history with the default depth bound
    pub fn new() -> Self {
        Self::with_depth(DEFAULT_HISTORY_DEPTH)
    }

    /// Create a history retaining at most `max_depth` undo snapshots
    pub fn with_depth(max_depth: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Record the pre-mutation state
    ///
    /// Must be called before the mutation is applied so the snapshot
    /// captures the state undo should return to.
    pub fn checkpoint(&mut self, current: &AnnotationSet) {
        self.undo.push_back(current.clone());
        while self.undo.len() > self.max_depth {
            self.undo.pop_front();
        }
        self.redo.clear();
    }

    /// Step back one checkpoint
    ///
    /// Returns `current` unchanged when there is nothing to undo; otherwise
    /// moves `current` onto the redo stack and returns the popped snapshot.
    pub fn undo(&mut self, current: AnnotationSet) -> AnnotationSet {
        match self.undo.pop_back() {
            Some(snapshot) => {
                self.redo.push(current);
                snapshot
            }
            None => current,
        }
    }

    /// Step forward one undone checkpoint
    ///
    /// Returns `current` unchanged when there is nothing to redo; otherwise
    /// moves `current` onto the undo stack and returns the popped snapshot.
    pub fn redo(&mut self, current: AnnotationSet) -> AnnotationSet {
        match self.redo.pop() {
            Some(snapshot) => {
                self.undo.push_back(current);
                snapshot
            }
            None => current,
        }
    }

    /// Whether an undo step is available
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Whether a redo step is available
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::BoxKind;

    #[test]
    fn undo_restores_pre_mutation_state() {
        let mut history = History::new();
        let mut set = AnnotationSet::new();

        history.checkpoint(&set);
        set.add_box(BoxKind::Rect);

        let restored = history.undo(set);
        assert!(restored.is_empty());
    }

    #[test]
    fn undo_then_redo_round_trips() {
        let mut history = History::new();
        let mut set = AnnotationSet::new();

        history.checkpoint(&set);
        set.add_box(BoxKind::Rect);
        let after_mutation = set.clone();

        let undone = history.undo(set);
        assert!(undone.is_empty());

        let redone = history.redo(undone);
        assert_eq!(redone, after_mutation);
    }

    #[test]
    fn undo_on_empty_history_is_noop() {
        let mut history = History::new();
        let mut set = AnnotationSet::new();
        set.add_text(0.0, 0.0);
        let before = set.clone();

        let result = history.undo(set);
        assert_eq!(result, before);
        assert!(!history.can_redo());
    }

    #[test]
    fn checkpoint_clears_redo() {
        let mut history = History::new();
        let mut set = AnnotationSet::new();

        history.checkpoint(&set);
        set.add_box(BoxKind::Rect);

        let mut undone = history.undo(set);
        assert!(history.can_redo());

        // A new mutation after undo invalidates the redo branch.
        history.checkpoint(&undone);
        undone.add_text(0.0, 0.0);
        assert!(!history.can_redo());

        let unchanged = history.redo(undone.clone());
        assert_eq!(unchanged, undone);
    }

    #[test]
    fn depth_bound_evicts_oldest_first() {
        let mut history = History::with_depth(2);
        let mut set = AnnotationSet::new();

        for _ in 0..3 {
            history.checkpoint(&set);
            set.add_box(BoxKind::Highlight);
        }

        // Only the two most recent snapshots survive.
        let two = history.undo(set);
        assert_eq!(two.len(), 2);
        let one = history.undo(two);
        assert_eq!(one.len(), 1);
        let still_one = history.undo(one.clone());
        assert_eq!(still_one, one);
    }
}
