//! Annotation store
//!
//! Owns the ordered sequence of annotations for the active document.
//! Insertion order is the z-order: later entries draw on top. Pure data,
//! no I/O; persistence and rendering live in their own crates.

use crate::annotation::{Annotation, AnnotationId, BoxKind};
use crate::export::ValidationError;
use std::collections::HashSet;

/// Ordered annotation sequence scoped to one document
///
/// Ids are unique within a set at all times. Mutations referencing an absent
/// id are silent no-ops: event ordering can legitimately race a removal
/// against a pending geometry update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationSet {
    annotations: Vec<Annotation>,
}

impl AnnotationSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from a pre-validated sequence
    ///
    /// Fails if any element has non-finite geometry or a duplicate id;
    /// rejection is all-or-nothing.
    pub fn from_annotations(annotations: Vec<Annotation>) -> Result<Self, ValidationError> {
        let mut seen = HashSet::with_capacity(annotations.len());
        for (index, annotation) in annotations.iter().enumerate() {
            if !annotation.is_finite() {
                return Err(ValidationError::NonFiniteGeometry { index });
            }
            if !seen.insert(annotation.id()) {
                return Err(ValidationError::DuplicateId(annotation.id()));
            }
        }
        Ok(Self { annotations })
    }

    /// Append a text label with default content and a fresh id
    pub fn add_text(&mut self, x: f32, y: f32) -> AnnotationId {
        let annotation = Annotation::text(x, y);
        let id = annotation.id();
        self.annotations.push(annotation);
        id
    }

    /// Append a box annotation with kind-specific defaults and a fresh id
    pub fn add_box(&mut self, kind: BoxKind) -> AnnotationId {
        let annotation = Annotation::boxed(kind);
        let id = annotation.id();
        self.annotations.push(annotation);
        id
    }

    /// Replace the geometry of an annotation, preserving everything else
    ///
    /// No-op (returning `false`) when the id is absent or any value is
    /// non-finite, so the set never holds geometry that cannot be
    /// serialized.
    pub fn update_geometry(
        &mut self,
        id: AnnotationId,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> bool {
        if ![x, y, width, height].iter().all(|v| v.is_finite()) {
            log::debug!("ignoring non-finite geometry update for {id}");
            return false;
        }
        match self.annotations.iter_mut().find(|a| a.id() == id) {
            Some(annotation) => {
                annotation.set_geometry(x, y, width, height);
                true
            }
            None => {
                log::debug!("geometry update for absent annotation {id}");
                false
            }
        }
    }

    /// Remove every annotation whose id is in `ids`
    ///
    /// Absent ids are ignored. Returns the number of annotations removed.
    pub fn remove(&mut self, ids: &HashSet<AnnotationId>) -> usize {
        let before = self.annotations.len();
        self.annotations.retain(|a| !ids.contains(&a.id()));
        before - self.annotations.len()
    }

    /// Atomically swap the entire sequence
    ///
    /// Used by import, undo and redo. The replacement is validated as a
    /// whole first; on rejection the current sequence is untouched.
    pub fn replace_all(&mut self, annotations: Vec<Annotation>) -> Result<(), ValidationError> {
        *self = Self::from_annotations(annotations)?;
        Ok(())
    }

    /// Consume the set, yielding its annotations in z-order
    pub fn into_annotations(self) -> Vec<Annotation> {
        self.annotations
    }

    /// Look up an annotation by id
    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id() == id)
    }

    /// Whether an annotation with this id is present
    pub fn contains(&self, id: AnnotationId) -> bool {
        self.get(id).is_some()
    }

    /// Iterate annotations in z-order (bottom first)
    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter()
    }

    /// Ids currently in the set
    pub fn ids(&self) -> impl Iterator<Item = AnnotationId> + '_ {
        self.annotations.iter().map(Annotation::id)
    }

    /// Number of annotations
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::Shape;

    #[test]
    fn adds_preserve_insertion_order() {
        let mut set = AnnotationSet::new();
        let first = set.add_box(BoxKind::Rect);
        let second = set.add_text(50.0, 50.0);
        let third = set.add_box(BoxKind::Opaque);

        let order: Vec<_> = set.ids().collect();
        assert_eq!(order, vec![first, second, third]);
    }

    #[test]
    fn ids_are_unique_across_rapid_adds() {
        let mut set = AnnotationSet::new();
        for _ in 0..100 {
            set.add_text(0.0, 0.0);
            set.add_box(BoxKind::Highlight);
        }
        let ids: HashSet<_> = set.ids().collect();
        assert_eq!(ids.len(), set.len());
    }

    #[test]
    fn update_geometry_replaces_only_geometry() {
        let mut set = AnnotationSet::new();
        let id = set.add_box(BoxKind::Rect);

        assert!(set.update_geometry(id, 10.0, 20.0, 200.0, 80.0));

        let annotation = set.get(id).expect("annotation should exist");
        assert_eq!(annotation.x(), 10.0);
        assert_eq!(annotation.width(), Some(200.0));
        match annotation.shape() {
            Shape::Box { kind, fill, .. } => {
                assert_eq!(*kind, BoxKind::Rect);
                assert_eq!(fill.alpha, 0.3);
            }
            other => panic!("expected box shape, got {other:?}"),
        }
    }

    #[test]
    fn update_geometry_on_absent_id_is_noop() {
        let mut set = AnnotationSet::new();
        set.add_text(0.0, 0.0);
        let before = set.clone();

        assert!(!set.update_geometry(AnnotationId::new_v4(), 1.0, 1.0, 1.0, 1.0));
        assert_eq!(set, before);
    }

    #[test]
    fn update_geometry_rejects_non_finite_values() {
        let mut set = AnnotationSet::new();
        let id = set.add_box(BoxKind::Rect);
        let before = set.clone();

        assert!(!set.update_geometry(id, f32::INFINITY, 0.0, 10.0, 10.0));
        assert_eq!(set, before);
    }

    #[test]
    fn remove_ignores_absent_ids() {
        let mut set = AnnotationSet::new();
        let keep = set.add_text(0.0, 0.0);
        let drop = set.add_box(BoxKind::Rect);

        let ids: HashSet<_> = [drop, AnnotationId::new_v4()].into_iter().collect();
        assert_eq!(set.remove(&ids), 1);
        assert_eq!(set.len(), 1);
        assert!(set.contains(keep));
    }

    #[test]
    fn replace_all_rejects_duplicate_ids_atomically() {
        let mut set = AnnotationSet::new();
        set.add_text(0.0, 0.0);
        let before = set.clone();

        let duplicate = Annotation::text(0.0, 0.0);
        let result = set.replace_all(vec![duplicate.clone(), duplicate]);
        assert!(matches!(result, Err(ValidationError::DuplicateId(_))));
        assert_eq!(set, before);
    }

    #[test]
    fn replace_all_rejects_non_finite_geometry() {
        let mut set = AnnotationSet::new();
        let mut bad = Annotation::text(0.0, 0.0);
        bad.set_geometry(0.0, f32::NAN, 1.0, 1.0);

        let result = set.replace_all(vec![bad]);
        assert!(matches!(
            result,
            Err(ValidationError::NonFiniteGeometry { index: 0 })
        ));
        assert!(set.is_empty());
    }
}
