//! Ratings, reviews and aggregate statistics

use indexmap::IndexMap;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::{LibraryError, LibraryResult},
    models::{Book, Comment},
    store::SnapshotStore,
};

use super::LibraryService;

/// Aggregate statistics report
#[derive(Debug, Clone, Serialize)]
pub struct LibraryStats {
    /// Percentage of copies currently out on loan
    pub occupation_rate: f64,
    /// Top 5 books by total loan count
    pub popular_books: Vec<BookLoanCount>,
    /// Top 5 users by total loan count
    pub active_users: Vec<UserLoanCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookLoanCount {
    pub book_id: Uuid,
    pub title: String,
    pub author: String,
    pub loans: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserLoanCount {
    pub user_id: Uuid,
    pub username: String,
    pub loans: usize,
}

impl<S: SnapshotStore> LibraryService<S> {
    /// Rate a book the user has borrowed at least once (active or past),
    /// with an optional comment
    pub fn rate_book(
        &mut self,
        user_id: Uuid,
        book_id: Uuid,
        rating: u8,
        comment: &str,
    ) -> LibraryResult<()> {
        if !(1..=5).contains(&rating) {
            return Err(LibraryError::InvalidRating(rating));
        }
        self.get_book(book_id)?;
        if !self
            .state
            .loans
            .values()
            .any(|l| l.user_id == user_id && l.book_id == book_id)
        {
            return Err(LibraryError::NotEligible(
                "the book was never borrowed by this user".to_string(),
            ));
        }

        let book = self
            .state
            .books
            .get_mut(&book_id)
            .ok_or_else(|| LibraryError::NotFound(format!("book {} not found", book_id)))?;
        book.ratings.push(rating);
        if !comment.is_empty() {
            book.comments.push(Comment {
                user_id,
                text: comment.to_string(),
            });
        }
        self.persist()
    }

    /// Reader comments for a book, in submission order
    pub fn get_book_reviews(&self, book_id: Uuid) -> LibraryResult<&[Comment]> {
        Ok(&self.get_book(book_id)?.comments)
    }

    /// Books by total loan count, most borrowed first
    pub fn popular_books(&self, limit: usize) -> Vec<&Book> {
        let mut books: Vec<&Book> = self.state.books.values().collect();
        books.sort_by_key(|b| std::cmp::Reverse(b.loan_history.len()));
        books.truncate(limit);
        books
    }

    /// Library-wide aggregate statistics.
    ///
    /// Ties in the top-5 lists are broken by storage order.
    pub fn statistics(&self) -> LibraryStats {
        let total_copies = self.state.total_copies();
        let active_loans = self.state.active_loan_count();
        let occupation_rate = if total_copies == 0 {
            0.0
        } else {
            (active_loans as f64 / total_copies as f64) * 100.0
        };

        let mut popular_books: Vec<BookLoanCount> = self
            .state
            .books
            .values()
            .map(|b| BookLoanCount {
                book_id: b.id,
                title: b.title.clone(),
                author: b.author.clone(),
                loans: b.loan_history.len(),
            })
            .collect();
        popular_books.sort_by_key(|b| std::cmp::Reverse(b.loans));
        popular_books.truncate(5);

        let mut loan_counts: IndexMap<Uuid, usize> = IndexMap::new();
        for loan in self.state.loans.values() {
            *loan_counts.entry(loan.user_id).or_insert(0) += 1;
        }
        let mut active_users: Vec<UserLoanCount> = loan_counts
            .into_iter()
            .filter_map(|(user_id, loans)| {
                self.state.users.get(&user_id).map(|u| UserLoanCount {
                    user_id,
                    username: u.username.clone(),
                    loans,
                })
            })
            .collect();
        active_users.sort_by_key(|u| std::cmp::Reverse(u.loans));
        active_users.truncate(5);

        LibraryStats {
            occupation_rate,
            popular_books,
            active_users,
        }
    }
}
