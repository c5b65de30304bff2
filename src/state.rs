//! The aggregate root holding every entity collection.
//!
//! `LibraryState` is a pure data container: the service layer is its single
//! writer and the whole object is persisted after every mutation. Collections
//! are `IndexMap`s so iteration, serialization and search results keep a
//! deterministic (insertion) order for a fixed state.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Book, Loan, Reservation, User};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LibraryState {
    #[serde(default)]
    pub users: IndexMap<Uuid, User>,
    #[serde(default)]
    pub books: IndexMap<Uuid, Book>,
    #[serde(default)]
    pub loans: IndexMap<Uuid, Loan>,
    #[serde(default)]
    pub reservations: IndexMap<Uuid, Reservation>,
}

impl LibraryState {
    /// Active loans held by one user, in storage order
    pub fn active_loans_for_user(&self, user_id: Uuid) -> Vec<&Loan> {
        self.loans
            .values()
            .filter(|l| l.user_id == user_id && l.is_active())
            .collect()
    }

    /// Whether any loan on the given book is still active
    pub fn book_has_active_loans(&self, book_id: Uuid) -> bool {
        self.loans
            .values()
            .any(|l| l.book_id == book_id && l.is_active())
    }

    /// Total number of physical copies across the whole catalog
    pub fn total_copies(&self) -> usize {
        self.books.values().map(|b| b.copies.len()).sum()
    }

    /// Number of currently active loans
    pub fn active_loan_count(&self) -> usize {
        self.loans.values().filter(|l| l.is_active()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        BookCopy, Comment, CopyStatus, Role, Subscription, SubscriptionType,
    };
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;

    fn sample_state() -> LibraryState {
        let mut state = LibraryState::default();

        let user_id = Uuid::new_v4();
        state.users.insert(
            user_id,
            User {
                id: user_id,
                username: "marguerite".into(),
                password: "pw".into(),
                role: Role::Admin,
                subscription: Subscription::new(
                    SubscriptionType::Premium,
                    NaiveDate::from_ymd_opt(2027, 6, 1).unwrap(),
                ),
                penalties_due: Decimal::new(125, 2),
                monthly_loan_counter: 3,
                monthly_counter_year_month: "2026-08".into(),
                notifications: vec!["Reserved book 'Dune' is now available".into()],
            },
        );

        let book_id = Uuid::new_v4();
        let copy_id = Uuid::new_v4();
        let loan_id = Uuid::new_v4();
        state.books.insert(
            book_id,
            Book {
                id: book_id,
                title: "Dune".into(),
                author: "Frank Herbert".into(),
                category: "sf".into(),
                copies: vec![BookCopy {
                    id: copy_id,
                    status: CopyStatus::Loaned,
                }],
                ratings: vec![5, 4],
                comments: vec![Comment {
                    user_id,
                    text: "great".into(),
                }],
                loan_history: vec![loan_id],
            },
        );

        state.loans.insert(
            loan_id,
            Loan {
                id: loan_id,
                user_id,
                book_id,
                copy_id,
                borrowed_at: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
                due_date: NaiveDate::from_ymd_opt(2026, 8, 22).unwrap(),
                returned_at: None,
                penalty_applied: Decimal::ZERO,
            },
        );

        let reservation_id = Uuid::new_v4();
        state.reservations.insert(
            reservation_id,
            Reservation {
                id: reservation_id,
                user_id,
                book_id,
                created_at: Utc.with_ymd_and_hms(2026, 8, 2, 9, 30, 0).unwrap(),
                notified: false,
            },
        );

        state
    }

    #[test]
    fn snapshot_round_trip_is_lossless() {
        let state = sample_state();
        let json = serde_json::to_string_pretty(&state).unwrap();
        let restored: LibraryState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn snapshot_uses_stable_field_names() {
        let state = sample_state();
        let value = serde_json::to_value(&state).unwrap();

        let user = value["users"].as_object().unwrap().values().next().unwrap();
        assert_eq!(user["role"], "admin");
        assert!(user["subscription"]["type"].is_string());
        assert!(user["subscription"]["expires_at"].is_string());
        assert!(user["monthly_counter_year_month"].is_string());

        let book = value["books"].as_object().unwrap().values().next().unwrap();
        assert_eq!(book["copies"][0]["status"], "loaned");
        assert!(book["loan_history"].is_array());

        let loan = value["loans"].as_object().unwrap().values().next().unwrap();
        assert!(loan["returned_at"].is_null());
    }

    #[test]
    fn missing_required_field_fails_the_parse() {
        // A user without a username must not deserialize silently.
        let raw = r#"{
            "users": {
                "8b6fbc4e-12aa-41a9-9d24-3a5c0b6f7a10": {
                    "id": "8b6fbc4e-12aa-41a9-9d24-3a5c0b6f7a10",
                    "password": "pw",
                    "subscription": {"type": "basic", "expires_at": "2027-01-01"}
                }
            }
        }"#;
        assert!(serde_json::from_str::<LibraryState>(raw).is_err());
    }

    #[test]
    fn optional_fields_default_on_load() {
        let raw = r#"{
            "users": {
                "8b6fbc4e-12aa-41a9-9d24-3a5c0b6f7a10": {
                    "id": "8b6fbc4e-12aa-41a9-9d24-3a5c0b6f7a10",
                    "username": "bob",
                    "password": "pw",
                    "subscription": {"type": "basic", "expires_at": "2027-01-01"}
                }
            }
        }"#;
        let state: LibraryState = serde_json::from_str(raw).unwrap();
        let user = state.users.values().next().unwrap();
        assert_eq!(user.role, Role::User);
        assert_eq!(user.penalties_due, Decimal::ZERO);
        assert_eq!(user.monthly_loan_counter, 0);
        assert!(user.monthly_counter_year_month.is_empty());
        assert!(user.notifications.is_empty());
    }

    #[test]
    fn aggregate_queries_count_only_active_loans() {
        let mut state = sample_state();
        assert_eq!(state.active_loan_count(), 1);
        assert_eq!(state.total_copies(), 1);

        let loan = state.loans.values_mut().next().unwrap();
        let user_id = loan.user_id;
        loan.returned_at = Some(NaiveDate::from_ymd_opt(2026, 8, 10).unwrap());
        assert_eq!(state.active_loan_count(), 0);
        assert!(state.active_loans_for_user(user_id).is_empty());
    }
}
