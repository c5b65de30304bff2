//! Reservation queue operations

use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::{LibraryError, LibraryResult},
    models::Reservation,
    store::SnapshotStore,
};

use super::LibraryService;

impl<S: SnapshotStore> LibraryService<S> {
    /// Join the waiting queue of a fully checked-out book.
    ///
    /// Refused while a copy is still available, and a user holds at most one
    /// reservation per book.
    pub fn reserve_book(&mut self, user_id: Uuid, book_id: Uuid) -> LibraryResult<Reservation> {
        self.get_user(user_id)?;
        let book = self.get_book(book_id)?;

        if book.available_copy().is_some() {
            return Err(LibraryError::CopyAvailable);
        }
        if self
            .state
            .reservations
            .values()
            .any(|r| r.user_id == user_id && r.book_id == book_id)
        {
            return Err(LibraryError::DuplicateReservation { user_id, book_id });
        }

        let reservation = Reservation {
            id: Uuid::new_v4(),
            user_id,
            book_id,
            created_at: Utc::now(),
            notified: false,
        };

        tracing::info!(
            reservation_id = %reservation.id,
            user_id = %user_id,
            book_id = %book_id,
            "reservation created"
        );
        self.state
            .reservations
            .insert(reservation.id, reservation.clone());
        self.persist()?;
        Ok(reservation)
    }

    /// Remove a reservation. No-op if it is already gone.
    pub fn cancel_reservation(&mut self, reservation_id: Uuid) -> LibraryResult<()> {
        if self
            .state
            .reservations
            .shift_remove(&reservation_id)
            .is_some()
        {
            tracing::info!(reservation_id = %reservation_id, "reservation cancelled");
            self.persist()?;
        }
        Ok(())
    }

    /// Notify the longest-waiting un-notified reservation for a book.
    ///
    /// Appends a message to that user's notification list and marks the
    /// reservation notified. Returns the notified reservation, or `None`
    /// when the queue holds nothing to notify. Callers decide when a copy
    /// has freed up; returning a book does not trigger this by itself.
    pub fn notify_next_reservation(
        &mut self,
        book_id: Uuid,
    ) -> LibraryResult<Option<Reservation>> {
        let title = self.get_book(book_id)?.title.clone();

        let mut pending: Vec<&Reservation> = self
            .state
            .reservations
            .values()
            .filter(|r| r.book_id == book_id && !r.notified)
            .collect();
        pending.sort_by_key(|r| r.created_at);
        let Some((reservation_id, user_id)) = pending.first().map(|r| (r.id, r.user_id)) else {
            return Ok(None);
        };

        let user = self
            .state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| LibraryError::NotFound(format!("user {} not found", user_id)))?;
        user.notifications
            .push(format!("Reserved book '{}' is now available", title));

        let reservation = self
            .state
            .reservations
            .get_mut(&reservation_id)
            .ok_or_else(|| {
                LibraryError::NotFound(format!("reservation {} not found", reservation_id))
            })?;
        reservation.notified = true;
        let notified = reservation.clone();

        tracing::info!(
            reservation_id = %notified.id,
            user_id = %user_id,
            book_id = %book_id,
            "reservation holder notified"
        );
        self.persist()?;
        Ok(Some(notified))
    }
}
