//! Subscription tiers and the per-tier borrowing policy table

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Subscription tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionType {
    Basic,
    Premium,
    Vip,
}

impl SubscriptionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionType::Basic => "basic",
            SubscriptionType::Premium => "premium",
            SubscriptionType::Vip => "vip",
        }
    }

    /// Borrowing limits for this tier
    pub fn policy(&self) -> SubscriptionPolicy {
        match self {
            SubscriptionType::Basic => SubscriptionPolicy {
                max_active_loans: 1,
                loan_days: 14,
                penalty_per_day: Decimal::new(50, 2),
                monthly_loan_cap: 5,
            },
            SubscriptionType::Premium => SubscriptionPolicy {
                max_active_loans: 3,
                loan_days: 21,
                penalty_per_day: Decimal::new(25, 2),
                monthly_loan_cap: 10,
            },
            SubscriptionType::Vip => SubscriptionPolicy {
                max_active_loans: 5,
                loan_days: 28,
                penalty_per_day: Decimal::ZERO,
                monthly_loan_cap: 999,
            },
        }
    }
}

impl std::fmt::Display for SubscriptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SubscriptionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(SubscriptionType::Basic),
            "premium" => Ok(SubscriptionType::Premium),
            "vip" => Ok(SubscriptionType::Vip),
            _ => Err(format!("Invalid subscription type: {}", s)),
        }
    }
}

/// Per-tier borrowing limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionPolicy {
    /// Maximum simultaneous active loans
    pub max_active_loans: usize,
    /// Loan duration in days
    pub loan_days: i64,
    /// Late-return penalty per day
    pub penalty_per_day: Decimal,
    /// Maximum loans per calendar month
    pub monthly_loan_cap: u32,
}

/// A user's subscription: tier plus expiry date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    #[serde(rename = "type")]
    pub kind: SubscriptionType,
    pub expires_at: NaiveDate,
}

impl Subscription {
    pub fn new(kind: SubscriptionType, expires_at: NaiveDate) -> Self {
        Self { kind, expires_at }
    }

    /// Borrowing limits for the current tier
    pub fn policy(&self) -> SubscriptionPolicy {
        self.kind.policy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vip_policy_has_no_penalty() {
        let policy = SubscriptionType::Vip.policy();
        assert_eq!(policy.penalty_per_day, Decimal::ZERO);
        assert_eq!(policy.max_active_loans, 5);
    }

    #[test]
    fn basic_policy_matches_table() {
        let policy = SubscriptionType::Basic.policy();
        assert_eq!(policy.max_active_loans, 1);
        assert_eq!(policy.loan_days, 14);
        assert_eq!(policy.penalty_per_day, Decimal::new(50, 2));
        assert_eq!(policy.monthly_loan_cap, 5);
    }

    #[test]
    fn subscription_type_round_trips_through_str() {
        for kind in [
            SubscriptionType::Basic,
            SubscriptionType::Premium,
            SubscriptionType::Vip,
        ] {
            assert_eq!(kind.as_str().parse::<SubscriptionType>().unwrap(), kind);
        }
    }
}
