//! Durable keyed storage for annotation sets
//!
//! One JSON slot file per document under a storage root, keyed
//! `annotations-<document>`. The payload is the portable export format, so a
//! stored slot and an exported file are interchangeable. Save failures are
//! surfaced to the caller; a corrupt slot on load degrades to an absent set
//! rather than crashing the session.

use marginalia_core::{export_json, import_json, AnnotationSet};
use std::fs;
use std::path::{Path, PathBuf};

const KEY_PREFIX: &str = "annotations-";

/// Errors for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("unable to resolve local data directory")]
    NoDataDirectory,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialize(String),
}

/// Filesystem-backed keyed store for annotation sets
#[derive(Debug, Clone)]
pub struct AnnotationStorage {
    root: PathBuf,
}

impl AnnotationStorage {
    /// Open the store under the platform-local data directory
    pub fn from_default_project() -> Result<Self, StorageError> {
        let dirs = directories::ProjectDirs::from("dev", "Marginalia", "Marginalia")
            .ok_or(StorageError::NoDataDirectory)?;

        Ok(Self {
            root: dirs.data_local_dir().to_path_buf(),
        })
    }

    /// Open the store under an explicit root (tests, scripting)
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Storage root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist the annotation set for a document
    ///
    /// Overwrites any prior value for the key. The write is atomic (temp
    /// file + rename), so a crash mid-save never leaves a torn slot.
    pub fn save(&self, document: &str, set: &AnnotationSet) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root)?;

        let bytes = export_json(set).map_err(|e| StorageError::Serialize(e.to_string()))?;

        let path = self.slot_path(document);
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;
        Ok(())
    }

    /// Load the annotation set for a document, if one was saved
    ///
    /// An absent slot returns `None`. A corrupt or malformed payload is
    /// treated as absent with a warning; it never propagates as an error.
    pub fn load(&self, document: &str) -> Result<Option<AnnotationSet>, StorageError> {
        let path = self.slot_path(document);
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        match import_json(&bytes) {
            Ok(set) => Ok(Some(set)),
            Err(e) => {
                log::warn!("discarding corrupt annotation slot for {document:?}: {e}");
                Ok(None)
            }
        }
    }

    /// Delete the slot for a document, if present
    pub fn delete(&self, document: &str) -> Result<(), StorageError> {
        let path = self.slot_path(document);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Whether a slot exists for a document
    pub fn exists(&self, document: &str) -> bool {
        self.slot_path(document).exists()
    }

    /// Slot file path for a document key
    ///
    /// The key is derived solely from the document name, so two documents
    /// never share a slot and switching documents cannot merge sets.
    fn slot_path(&self, document: &str) -> PathBuf {
        self.root
            .join(format!("{KEY_PREFIX}{}.json", sanitize(document)))
    }
}

/// Make a document name safe as a file name component
///
/// Bytes outside `[A-Za-z0-9._-]` are percent-encoded. The encoding is
/// injective (`%` itself is never passed through), so two distinct document
/// names can never map onto the same slot file.
fn sanitize(document: &str) -> String {
    let mut out = String::with_capacity(document.len());
    for byte in document.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'_' | b'-' => out.push(byte as char),
            other => out.push_str(&format!("%{other:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use marginalia_core::BoxKind;

    fn sample_set() -> AnnotationSet {
        let mut set = AnnotationSet::new();
        set.add_text(50.0, 50.0);
        set.add_box(BoxKind::Highlight);
        set
    }

    #[test]
    fn save_and_load_round_trip() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let store = AnnotationStorage::with_root(temp.path());

        let set = sample_set();
        store.save("report.pdf", &set).expect("save should succeed");

        let loaded = store.load("report.pdf").expect("load should succeed");
        assert_eq!(loaded, Some(set));
    }

    #[test]
    fn load_absent_slot_returns_none() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let store = AnnotationStorage::with_root(temp.path());
        assert_eq!(store.load("never-saved.png").unwrap(), None);
    }

    #[test]
    fn corrupt_slot_is_treated_as_absent() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let store = AnnotationStorage::with_root(temp.path());

        store.save("doc.pdf", &sample_set()).unwrap();
        fs::write(store.root().join("annotations-doc.pdf.json"), b"{garbage").unwrap();

        assert_eq!(store.load("doc.pdf").unwrap(), None);
    }

    #[test]
    fn documents_get_separate_slots() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let store = AnnotationStorage::with_root(temp.path());

        let first = sample_set();
        store.save("a.pdf", &first).unwrap();
        store.save("b.pdf", &AnnotationSet::new()).unwrap();

        assert_eq!(store.load("a.pdf").unwrap(), Some(first));
        assert_eq!(store.load("b.pdf").unwrap(), Some(AnnotationSet::new()));
    }

    #[test]
    fn save_overwrites_prior_value() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let store = AnnotationStorage::with_root(temp.path());

        store.save("doc.pdf", &sample_set()).unwrap();
        let replacement = AnnotationSet::new();
        store.save("doc.pdf", &replacement).unwrap();

        assert_eq!(store.load("doc.pdf").unwrap(), Some(replacement));
    }

    #[test]
    fn delete_is_idempotent() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let store = AnnotationStorage::with_root(temp.path());

        store.save("doc.pdf", &sample_set()).unwrap();
        assert!(store.exists("doc.pdf"));

        store.delete("doc.pdf").unwrap();
        assert!(!store.exists("doc.pdf"));
        store.delete("doc.pdf").unwrap();
    }

    #[test]
    fn document_names_are_sanitized_for_the_filesystem() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let store = AnnotationStorage::with_root(temp.path());

        let set = sample_set();
        store.save("weird/name with spaces?.pdf", &set).unwrap();
        assert_eq!(
            store.load("weird/name with spaces?.pdf").unwrap(),
            Some(set)
        );

        // The slot file lives directly under the root.
        let entries: Vec<_> = fs::read_dir(store.root())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(
            entries,
            vec!["annotations-weird%2Fname%20with%20spaces%3F.pdf.json"]
        );
    }

    #[test]
    fn similar_document_names_never_share_a_slot() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let store = AnnotationStorage::with_root(temp.path());

        store.save("a/b.pdf", &sample_set()).unwrap();

        // A name that would collide under a lossy escape scheme stays absent.
        assert_eq!(store.load("a_b.pdf").unwrap(), None);
        assert_eq!(store.load("a b.pdf").unwrap(), None);
        assert!(store.load("a/b.pdf").unwrap().is_some());
    }
}
