//! Loan model

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single borrow of one copy by one user.
///
/// Created by `borrow_book`, mutated once by `return_book`, never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub copy_id: Uuid,
    pub borrowed_at: NaiveDate,
    pub due_date: NaiveDate,
    /// Absent while the loan is active
    #[serde(default)]
    pub returned_at: Option<NaiveDate>,
    /// Late penalty computed at return time
    #[serde(default)]
    pub penalty_applied: Decimal,
}

impl Loan {
    pub fn is_active(&self) -> bool {
        self.returned_at.is_none()
    }
}
