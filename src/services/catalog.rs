//! Catalog management operations

use uuid::Uuid;

use crate::{
    error::{LibraryError, LibraryResult},
    models::{Book, BookCopy, CopyStatus, Loan},
    store::SnapshotStore,
};

use super::LibraryService;

impl<S: SnapshotStore> LibraryService<S> {
    /// Add a title with `copies` fresh available copies
    pub fn add_book(
        &mut self,
        title: &str,
        author: &str,
        category: &str,
        copies: usize,
    ) -> LibraryResult<Book> {
        let book = Book {
            id: Uuid::new_v4(),
            title: title.to_string(),
            author: author.to_string(),
            category: category.to_string(),
            copies: (0..copies).map(|_| BookCopy::new()).collect(),
            ratings: Vec::new(),
            comments: Vec::new(),
            loan_history: Vec::new(),
        };

        tracing::info!(book_id = %book.id, title, copies, "book added");
        self.state.books.insert(book.id, book.clone());
        self.persist()?;
        Ok(book)
    }

    pub fn get_book(&self, book_id: Uuid) -> LibraryResult<&Book> {
        self.state
            .books
            .get(&book_id)
            .ok_or_else(|| LibraryError::NotFound(format!("book {} not found", book_id)))
    }

    /// Remove a title and cascade deletion to its reservations.
    ///
    /// Refused while any loan on the book is still active.
    pub fn remove_book(&mut self, book_id: Uuid) -> LibraryResult<()> {
        self.get_book(book_id)?;
        if self.state.book_has_active_loans(book_id) {
            return Err(LibraryError::BookHasActiveLoans);
        }

        self.state.books.shift_remove(&book_id);
        self.state
            .reservations
            .retain(|_, r| r.book_id != book_id);
        tracing::info!(book_id = %book_id, "book removed");
        self.persist()
    }

    /// Append `count` fresh available copies to a title
    pub fn add_copies(&mut self, book_id: Uuid, count: usize) -> LibraryResult<()> {
        let book = self
            .state
            .books
            .get_mut(&book_id)
            .ok_or_else(|| LibraryError::NotFound(format!("book {} not found", book_id)))?;
        for _ in 0..count {
            book.copies.push(BookCopy::new());
        }
        self.persist()
    }

    /// Overwrite a copy's status. Any transition is allowed.
    pub fn set_copy_status(
        &mut self,
        book_id: Uuid,
        copy_id: Uuid,
        status: CopyStatus,
    ) -> LibraryResult<()> {
        let book = self
            .state
            .books
            .get_mut(&book_id)
            .ok_or_else(|| LibraryError::NotFound(format!("book {} not found", book_id)))?;
        let copy = book
            .copies
            .iter_mut()
            .find(|c| c.id == copy_id)
            .ok_or_else(|| LibraryError::NotFound(format!("copy {} not found", copy_id)))?;
        copy.status = status;
        self.persist()
    }

    /// Search the catalog.
    ///
    /// A non-empty `query` is matched case-insensitively as a substring of
    /// title or author; `category` and `author` filter by case-insensitive
    /// equality. All filters are AND-combined. Results come back in storage
    /// order.
    pub fn search_books(
        &self,
        query: &str,
        category: Option<&str>,
        author: Option<&str>,
    ) -> Vec<&Book> {
        let q = query.to_lowercase();
        self.state
            .books
            .values()
            .filter(|book| {
                if !q.is_empty()
                    && !book.title.to_lowercase().contains(&q)
                    && !book.author.to_lowercase().contains(&q)
                {
                    return false;
                }
                if let Some(category) = category {
                    if book.category.to_lowercase() != category.to_lowercase() {
                        return false;
                    }
                }
                if let Some(author) = author {
                    if book.author.to_lowercase() != author.to_lowercase() {
                        return false;
                    }
                }
                true
            })
            .collect()
    }

    /// Full loan history of a title, in recorded order
    pub fn book_history(&self, book_id: Uuid) -> LibraryResult<Vec<&Loan>> {
        let book = self.get_book(book_id)?;
        book.loan_history
            .iter()
            .map(|loan_id| {
                self.state
                    .loans
                    .get(loan_id)
                    .ok_or_else(|| LibraryError::NotFound(format!("loan {} not found", loan_id)))
            })
            .collect()
    }
}
