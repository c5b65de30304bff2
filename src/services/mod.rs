//! Business logic services.
//!
//! [`LibraryService`] owns the in-memory [`LibraryState`] and the snapshot
//! store, and is the single writer: every mutating operation applies its
//! checks, mutates the aggregate, then persists the whole snapshot. The
//! operations are grouped by concern into the submodules of this module.

pub mod auth;
pub mod catalog;
pub mod loans;
pub mod reservations;
pub mod stats;
pub mod users;

use chrono::{NaiveDate, Utc};

use crate::{error::LibraryResult, state::LibraryState, store::SnapshotStore};

use auth::{CredentialVerifier, PlaintextVerifier};

pub use stats::{BookLoanCount, LibraryStats, UserLoanCount};

/// The library domain service
pub struct LibraryService<S: SnapshotStore> {
    store: S,
    state: LibraryState,
    verifier: Box<dyn CredentialVerifier>,
}

impl<S: SnapshotStore> LibraryService<S> {
    /// Create a service seeded from the store's last snapshot, with plain
    /// credential comparison
    pub fn new(store: S) -> LibraryResult<Self> {
        Self::with_verifier(store, Box::new(PlaintextVerifier))
    }

    /// Create a service with a custom credential verifier
    pub fn with_verifier(
        store: S,
        verifier: Box<dyn CredentialVerifier>,
    ) -> LibraryResult<Self> {
        let state = store.load()?;
        Ok(Self {
            store,
            state,
            verifier,
        })
    }

    /// Read access to the aggregate for display collaborators
    pub fn state(&self) -> &LibraryState {
        &self.state
    }

    /// Persist the whole state snapshot. A failure leaves the in-memory
    /// mutations in place; the caller may retry the save.
    fn persist(&mut self) -> LibraryResult<()> {
        self.store.save(&self.state)
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LibraryError;
    use crate::models::SubscriptionType;
    use crate::store::MockSnapshotStore;

    #[test]
    fn save_failure_surfaces_without_discarding_memory_state() {
        let mut store = MockSnapshotStore::new();
        store
            .expect_load()
            .times(1)
            .returning(|| Ok(LibraryState::default()));
        store.expect_save().times(1).returning(|_| {
            Err(LibraryError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only filesystem",
            )))
        });

        let mut service = LibraryService::new(store).unwrap();
        let result =
            service.create_user("ada", "pw", false, SubscriptionType::Basic, 365);

        assert!(matches!(result, Err(LibraryError::Io(_))));
        // The in-memory mutation is kept; disk and memory may diverge until
        // the next successful save.
        assert_eq!(service.state().users.len(), 1);
    }

    #[test]
    fn construction_loads_the_snapshot_once() {
        let mut store = MockSnapshotStore::new();
        store
            .expect_load()
            .times(1)
            .returning(|| Ok(LibraryState::default()));

        let service = LibraryService::new(store).unwrap();
        assert!(service.state().users.is_empty());
    }
}
