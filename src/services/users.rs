//! User management operations

use chrono::Duration;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    error::{LibraryError, LibraryResult},
    models::{Loan, Reservation, Role, Subscription, SubscriptionType, User},
    store::SnapshotStore,
};

use super::LibraryService;

impl<S: SnapshotStore> LibraryService<S> {
    /// Create a new user account.
    ///
    /// Usernames are unique (case-sensitive exact match); the subscription
    /// expires `subscription_duration_days` from today.
    pub fn create_user(
        &mut self,
        username: &str,
        password: &str,
        is_admin: bool,
        subscription_type: SubscriptionType,
        subscription_duration_days: i64,
    ) -> LibraryResult<User> {
        if self.state.users.values().any(|u| u.username == username) {
            return Err(LibraryError::DuplicateUsername(username.to_string()));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password: password.to_string(),
            role: if is_admin { Role::Admin } else { Role::User },
            subscription: Subscription::new(
                subscription_type,
                Self::today() + Duration::days(subscription_duration_days),
            ),
            penalties_due: Decimal::ZERO,
            monthly_loan_counter: 0,
            monthly_counter_year_month: Self::today().format("%Y-%m").to_string(),
            notifications: Vec::new(),
        };

        tracing::info!(user_id = %user.id, username, "user created");
        self.state.users.insert(user.id, user.clone());
        self.persist()?;
        Ok(user)
    }

    /// Return the first user matching both username and credential, if any.
    /// Absence is the signal; there is no distinct error.
    pub fn authenticate(&self, username: &str, password: &str) -> Option<&User> {
        self.state
            .users
            .values()
            .find(|u| u.username == username && self.verifier.verify(password, &u.password))
    }

    pub fn get_user(&self, user_id: Uuid) -> LibraryResult<&User> {
        self.state
            .users
            .get(&user_id)
            .ok_or_else(|| LibraryError::NotFound(format!("user {} not found", user_id)))
    }

    /// Loans for a user, most recent first
    pub fn get_user_loans(
        &self,
        user_id: Uuid,
        active_only: bool,
    ) -> LibraryResult<Vec<&Loan>> {
        self.get_user(user_id)?;
        let mut loans: Vec<&Loan> = self
            .state
            .loans
            .values()
            .filter(|l| l.user_id == user_id && (!active_only || l.is_active()))
            .collect();
        loans.sort_by_key(|l| std::cmp::Reverse(l.borrowed_at));
        Ok(loans)
    }

    /// Reservations for a user, oldest first
    pub fn get_user_reservations(&self, user_id: Uuid) -> LibraryResult<Vec<&Reservation>> {
        self.get_user(user_id)?;
        let mut reservations: Vec<&Reservation> = self
            .state
            .reservations
            .values()
            .filter(|r| r.user_id == user_id)
            .collect();
        reservations.sort_by_key(|r| r.created_at);
        Ok(reservations)
    }

    /// Switch tier and extend the expiry.
    ///
    /// The new expiry counts from whichever is later of today and the current
    /// expiry, so remaining paid time is never lost.
    pub fn change_subscription(
        &mut self,
        user_id: Uuid,
        new_type: SubscriptionType,
        extra_days: i64,
    ) -> LibraryResult<()> {
        let today = Self::today();
        let user = self
            .state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| LibraryError::NotFound(format!("user {} not found", user_id)))?;

        let base = user.subscription.expires_at.max(today);
        user.subscription.kind = new_type;
        user.subscription.expires_at = base + Duration::days(extra_days);
        tracing::info!(user_id = %user_id, tier = %new_type, "subscription changed");
        self.persist()
    }

    /// Settle all outstanding penalties for a user
    pub fn pay_penalties(&mut self, user_id: Uuid) -> LibraryResult<()> {
        let user = self
            .state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| LibraryError::NotFound(format!("user {} not found", user_id)))?;
        let paid = user.penalties_due;
        user.penalties_due = Decimal::ZERO;
        tracing::info!(user_id = %user_id, amount = %paid, "penalties settled");
        self.persist()
    }

    /// Drain the stored notification list for a user
    pub fn take_notifications(&mut self, user_id: Uuid) -> LibraryResult<Vec<String>> {
        let user = self
            .state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| LibraryError::NotFound(format!("user {} not found", user_id)))?;
        let notifications = std::mem::take(&mut user.notifications);
        if !notifications.is_empty() {
            self.persist()?;
        }
        Ok(notifications)
    }
}
