//! In-memory snapshot store for embedding and tests

use crate::error::LibraryResult;
use crate::state::LibraryState;

use super::SnapshotStore;

/// Keeps the snapshot in memory. Useful as a test double and for embedders
/// that manage durability themselves.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: LibraryState,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a pre-seeded snapshot
    pub fn with_state(state: LibraryState) -> Self {
        Self { state }
    }

    /// The last saved snapshot
    pub fn snapshot(&self) -> &LibraryState {
        &self.state
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> LibraryResult<LibraryState> {
        Ok(self.state.clone())
    }

    fn save(&mut self, state: &LibraryState) -> LibraryResult<()> {
        self.state = state.clone();
        Ok(())
    }
}
