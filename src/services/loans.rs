//! Borrow and return operations

use chrono::Duration;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    error::{LibraryError, LibraryResult},
    models::{CopyStatus, Loan},
    store::SnapshotStore,
};

use super::LibraryService;

impl<S: SnapshotStore> LibraryService<S> {
    pub fn get_loan(&self, loan_id: Uuid) -> LibraryResult<&Loan> {
        self.state
            .loans
            .get(&loan_id)
            .ok_or_else(|| LibraryError::NotFound(format!("loan {} not found", loan_id)))
    }

    /// Currently active loans of one user, in storage order
    pub fn active_loans_for_user(&self, user_id: Uuid) -> Vec<&Loan> {
        self.state.active_loans_for_user(user_id)
    }

    /// Borrow a book for a user.
    ///
    /// Checks eligibility, takes the first available copy in storage order,
    /// and applies all side effects (copy marked loaned, loan recorded in
    /// the book history, monthly counter bumped) before the snapshot is
    /// persisted.
    pub fn borrow_book(&mut self, user_id: Uuid, book_id: Uuid) -> LibraryResult<Loan> {
        let today = Self::today();

        if !self.state.books.contains_key(&book_id) {
            return Err(LibraryError::NotFound(format!("book {} not found", book_id)));
        }
        let active_loans = self.state.active_loans_for_user(user_id).len();

        let user = self
            .state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| LibraryError::NotFound(format!("user {} not found", user_id)))?;
        user.can_borrow(active_loans, today)
            .map_err(|denial| LibraryError::NotEligible(denial.to_string()))?;
        let policy = user.subscription.policy();

        let book = self
            .state
            .books
            .get_mut(&book_id)
            .ok_or_else(|| LibraryError::NotFound(format!("book {} not found", book_id)))?;
        let copy = book
            .available_copy_mut()
            .ok_or(LibraryError::NoCopyAvailable)?;
        copy.status = CopyStatus::Loaned;
        let copy_id = copy.id;

        let loan = Loan {
            id: Uuid::new_v4(),
            user_id,
            book_id,
            copy_id,
            borrowed_at: today,
            due_date: today + Duration::days(policy.loan_days),
            returned_at: None,
            penalty_applied: Decimal::ZERO,
        };

        book.loan_history.push(loan.id);
        user.register_loan(today);
        self.state.loans.insert(loan.id, loan.clone());

        tracing::info!(
            loan_id = %loan.id,
            user_id = %user_id,
            book_id = %book_id,
            due_date = %loan.due_date,
            "book borrowed"
        );
        self.persist()?;
        Ok(loan)
    }

    /// Record the return of a loan.
    ///
    /// Idempotent: returning an already-inactive loan is a no-op. Restores
    /// the copy to available (silently skipped if the copy is gone) and
    /// applies the late penalty for the user's tier.
    pub fn return_book(&mut self, loan_id: Uuid) -> LibraryResult<()> {
        let today = Self::today();

        let loan = self.get_loan(loan_id)?;
        if !loan.is_active() {
            return Ok(());
        }
        let (user_id, book_id, copy_id, due_date) =
            (loan.user_id, loan.book_id, loan.copy_id, loan.due_date);
        let user = self.get_user(user_id)?;
        let penalty_rate = user.subscription.policy().penalty_per_day;

        let loan = self
            .state
            .loans
            .get_mut(&loan_id)
            .ok_or_else(|| LibraryError::NotFound(format!("loan {} not found", loan_id)))?;
        loan.returned_at = Some(today);

        if let Some(book) = self.state.books.get_mut(&book_id) {
            if let Some(copy) = book.copies.iter_mut().find(|c| c.id == copy_id) {
                copy.status = CopyStatus::Available;
            }
        }

        if today > due_date && penalty_rate > Decimal::ZERO {
            let days_late = (today - due_date).num_days().max(1);
            let penalty = Decimal::from(days_late) * penalty_rate;
            loan.penalty_applied = penalty;
            let user = self
                .state
                .users
                .get_mut(&user_id)
                .ok_or_else(|| LibraryError::NotFound(format!("user {} not found", user_id)))?;
            user.penalties_due += penalty;
            tracing::info!(
                loan_id = %loan_id,
                user_id = %user_id,
                days_late,
                penalty = %penalty,
                "late return penalized"
            );
        } else {
            tracing::info!(loan_id = %loan_id, user_id = %user_id, "book returned");
        }

        self.persist()
    }
}
