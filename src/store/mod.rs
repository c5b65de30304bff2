//! Snapshot persistence layer.
//!
//! The core persists the whole [`LibraryState`] after every mutation through
//! the [`SnapshotStore`] trait. Writing the same snapshot twice is harmless,
//! so a failed save can simply be retried.

pub mod json;
pub mod memory;

pub use json::JsonStore;
pub use memory::MemoryStore;

use crate::error::LibraryResult;
use crate::state::LibraryState;

/// Durable storage for a whole-state snapshot
#[cfg_attr(test, mockall::automock)]
pub trait SnapshotStore {
    /// Load the last snapshot, or an empty state if none exists yet
    fn load(&self) -> LibraryResult<LibraryState>;

    /// Persist the full state snapshot
    fn save(&mut self, state: &LibraryState) -> LibraryResult<()>;
}
