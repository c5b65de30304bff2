//! Error types for the Biblion core

use thiserror::Error;
use uuid::Uuid;

/// Main library error type
#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("username '{0}' is already taken")]
    DuplicateUsername(String),

    #[error("user {user_id} already holds a reservation for book {book_id}")]
    DuplicateReservation { user_id: Uuid, book_id: Uuid },

    #[error("user is not eligible: {0}")]
    NotEligible(String),

    #[error("no copy of the book is available")]
    NoCopyAvailable,

    #[error("at least one copy is available, reservation is pointless")]
    CopyAvailable,

    #[error("book still has active loans")]
    BookHasActiveLoans,

    #[error("rating {0} is out of range (expected 1..=5)")]
    InvalidRating(u8),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// Result type alias for library operations
pub type LibraryResult<T> = Result<T, LibraryError>;
