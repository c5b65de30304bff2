//! Book, physical copy and review models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lending status of a single physical copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CopyStatus {
    #[default]
    Available,
    Loaned,
    Damaged,
    Lost,
}

impl CopyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CopyStatus::Available => "available",
            CopyStatus::Loaned => "loaned",
            CopyStatus::Damaged => "damaged",
            CopyStatus::Lost => "lost",
        }
    }
}

impl std::fmt::Display for CopyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CopyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "available" => Ok(CopyStatus::Available),
            "loaned" => Ok(CopyStatus::Loaned),
            "damaged" => Ok(CopyStatus::Damaged),
            "lost" => Ok(CopyStatus::Lost),
            _ => Err(format!("Invalid copy status: {}", s)),
        }
    }
}

/// One physical lending unit of a book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookCopy {
    pub id: Uuid,
    #[serde(default)]
    pub status: CopyStatus,
}

impl BookCopy {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            status: CopyStatus::Available,
        }
    }
}

impl Default for BookCopy {
    fn default() -> Self {
        Self::new()
    }
}

/// Reader comment attached to a book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub user_id: Uuid,
    pub text: String,
}

/// A catalog title owning its physical copies and full loan history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub category: String,
    #[serde(default)]
    pub copies: Vec<BookCopy>,
    /// Ratings in the 1..=5 range
    #[serde(default)]
    pub ratings: Vec<u8>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Append-only list of loan ids, in borrow order
    #[serde(default)]
    pub loan_history: Vec<Uuid>,
}

impl Book {
    /// First available copy in storage order, if any
    pub fn available_copy(&self) -> Option<&BookCopy> {
        self.copies
            .iter()
            .find(|c| c.status == CopyStatus::Available)
    }

    pub fn available_copy_mut(&mut self) -> Option<&mut BookCopy> {
        self.copies
            .iter_mut()
            .find(|c| c.status == CopyStatus::Available)
    }

    /// Mean of all ratings, `None` when the book has none
    pub fn average_rating(&self) -> Option<f64> {
        if self.ratings.is_empty() {
            return None;
        }
        let sum: u32 = self.ratings.iter().map(|r| u32::from(*r)).sum();
        Some(f64::from(sum) / self.ratings.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book_with_statuses(statuses: &[CopyStatus]) -> Book {
        Book {
            id: Uuid::new_v4(),
            title: "Dune".into(),
            author: "Frank Herbert".into(),
            category: "sf".into(),
            copies: statuses
                .iter()
                .map(|s| BookCopy {
                    id: Uuid::new_v4(),
                    status: *s,
                })
                .collect(),
            ratings: Vec::new(),
            comments: Vec::new(),
            loan_history: Vec::new(),
        }
    }

    #[test]
    fn available_copy_picks_first_in_storage_order() {
        let book = book_with_statuses(&[
            CopyStatus::Loaned,
            CopyStatus::Available,
            CopyStatus::Available,
        ]);
        let copy = book.available_copy().unwrap();
        assert_eq!(copy.id, book.copies[1].id);
    }

    #[test]
    fn no_available_copy_when_all_are_out() {
        let book = book_with_statuses(&[CopyStatus::Loaned, CopyStatus::Lost]);
        assert!(book.available_copy().is_none());
    }

    #[test]
    fn average_rating_is_none_without_ratings() {
        let book = book_with_statuses(&[]);
        assert_eq!(book.average_rating(), None);
    }

    #[test]
    fn average_rating_is_the_mean() {
        let mut book = book_with_statuses(&[]);
        book.ratings = vec![2, 3, 4];
        assert_eq!(book.average_rating(), Some(3.0));
    }
}
