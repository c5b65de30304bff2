//! User model and borrowing eligibility rules

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::subscription::Subscription;

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// Reason a borrow attempt was denied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorrowDenial {
    OutstandingPenalties,
    SubscriptionExpired,
    ActiveLoanLimit,
    MonthlyCapReached,
}

impl std::fmt::Display for BorrowDenial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BorrowDenial::OutstandingPenalties => "outstanding penalties must be paid first",
            BorrowDenial::SubscriptionExpired => "subscription has expired",
            BorrowDenial::ActiveLoanLimit => "simultaneous loan limit reached",
            BorrowDenial::MonthlyCapReached => "monthly loan cap reached",
        };
        write!(f, "{}", label)
    }
}

/// A library member account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    /// Opaque credential, compared by a [`CredentialVerifier`](crate::services::auth::CredentialVerifier)
    pub password: String,
    #[serde(default)]
    pub role: Role,
    pub subscription: Subscription,
    #[serde(default)]
    pub penalties_due: Decimal,
    #[serde(default)]
    pub monthly_loan_counter: u32,
    /// "YYYY-MM" token marking the period the counter applies to.
    /// An empty or stale token forces a reset on the next counter access.
    #[serde(default)]
    pub monthly_counter_year_month: String,
    #[serde(default)]
    pub notifications: Vec<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Reset the monthly counter if the stored period token is not `today`'s.
    fn refresh_month_counter(&mut self, today: NaiveDate) {
        let current_ym = today.format("%Y-%m").to_string();
        if self.monthly_counter_year_month != current_ym {
            self.monthly_counter_year_month = current_ym;
            self.monthly_loan_counter = 0;
        }
    }

    /// Borrowing eligibility check, short-circuiting on the first failing
    /// condition. The monthly rollover is the only side effect.
    pub fn can_borrow(
        &mut self,
        active_loans_count: usize,
        today: NaiveDate,
    ) -> Result<(), BorrowDenial> {
        self.refresh_month_counter(today);

        if self.penalties_due > Decimal::ZERO {
            return Err(BorrowDenial::OutstandingPenalties);
        }
        if self.subscription.expires_at < today {
            return Err(BorrowDenial::SubscriptionExpired);
        }

        let policy = self.subscription.policy();
        if active_loans_count >= policy.max_active_loans {
            return Err(BorrowDenial::ActiveLoanLimit);
        }
        if self.monthly_loan_counter >= policy.monthly_loan_cap {
            return Err(BorrowDenial::MonthlyCapReached);
        }

        Ok(())
    }

    /// Count a freshly created loan against the monthly cap.
    pub fn register_loan(&mut self, today: NaiveDate) {
        self.refresh_month_counter(today);
        self.monthly_loan_counter += 1;
    }
}
