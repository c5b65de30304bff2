//! File-backed JSON snapshot store

use std::fs;
use std::path::PathBuf;

use crate::error::LibraryResult;
use crate::state::LibraryState;

use super::SnapshotStore;

/// Stores the library state as one pretty-printed JSON file.
///
/// Saves go through a temp-then-rename sequence so a crash mid-write never
/// leaves a truncated snapshot behind.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl SnapshotStore for JsonStore {
    fn load(&self) -> LibraryResult<LibraryState> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no snapshot found, starting empty");
            return Ok(LibraryState::default());
        }
        let raw = fs::read_to_string(&self.path)?;
        let state = serde_json::from_str(&raw)?;
        Ok(state)
    }

    fn save(&mut self, state: &LibraryState) -> LibraryResult<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let json = serde_json::to_string_pretty(state)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), "snapshot saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_returns_empty_state_when_file_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("library.json"));
        let state = store.load().unwrap();
        assert!(state.users.is_empty());
        assert!(state.books.is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonStore::new(dir.path().join("nested/dir/library.json"));

        let mut state = LibraryState::default();
        let id = uuid::Uuid::new_v4();
        state.books.insert(
            id,
            crate::models::Book {
                id,
                title: "Le Petit Prince".into(),
                author: "Antoine de Saint-Exupéry".into(),
                category: "novel".into(),
                copies: vec![crate::models::BookCopy::new()],
                ratings: Vec::new(),
                comments: Vec::new(),
                loan_history: Vec::new(),
            },
        );

        store.save(&state).unwrap();
        assert_eq!(store.load().unwrap(), state);

        // No temp file left behind after a successful save.
        assert!(!store.path().with_extension("tmp").exists());
    }

    #[test]
    fn malformed_snapshot_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.json");
        fs::write(&path, "{ not json").unwrap();
        let store = JsonStore::new(path);
        assert!(matches!(
            store.load(),
            Err(crate::error::LibraryError::Snapshot(_))
        ));
    }
}
