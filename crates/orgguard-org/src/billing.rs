//! Billing accounts and plans
//!
//! Each organization has one billing account. Only roles with a grant on the
//! `Billing` subject may read it.

use orgguard_ability::{AbilityResult, Subject, SubjectType};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Subscription plan for an organization.
///
/// # Examples
///
/// ```
/// use orgguard_org::Plan;
///
/// assert_eq!(Plan::Free.seat_limit(), Some(5));
/// assert_eq!(Plan::Enterprise.seat_limit(), None);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    /// Free plan
    Free,

    /// Paid team plan
    Team,

    /// Enterprise plan
    Enterprise,
}

impl Plan {
    /// Maximum number of seats, `None` meaning unlimited.
    pub fn seat_limit(&self) -> Option<u32> {
        match self {
            Plan::Free => Some(5),
            Plan::Team => Some(100),
            Plan::Enterprise => None,
        }
    }
}

impl Default for Plan {
    fn default() -> Self {
        Self::Free
    }
}

/// An organization's billing account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingAccount {
    /// Organization the account belongs to
    pub organization_id: Uuid,

    /// Owner of the organization at the time of reading
    pub owner_id: Uuid,

    /// Current plan
    pub plan: Plan,

    /// Invoice recipient
    pub billing_email: Option<String>,
}

impl BillingAccount {
    /// Creates a free-plan account.
    pub fn new(organization_id: Uuid, owner_id: Uuid) -> Self {
        Self {
            organization_id,
            owner_id,
            plan: Plan::default(),
            billing_email: None,
        }
    }

    /// Check if another seat fits in the plan, given the seats already taken
    /// by members and pending invites.
    pub fn has_seat_for(&self, seats_in_use: u32) -> bool {
        self.plan
            .seat_limit()
            .map(|limit| seats_in_use < limit)
            .unwrap_or(true)
    }

    /// The authorization subject for this account.
    pub fn subject(&self) -> AbilityResult<Subject> {
        Subject::owned_by(SubjectType::Billing, self.owner_id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_limits() {
        let mut account = BillingAccount::new(Uuid::now_v7(), Uuid::now_v7());
        assert!(account.has_seat_for(4));
        assert!(!account.has_seat_for(5));

        account.plan = Plan::Team;
        assert!(account.has_seat_for(99));
        assert!(!account.has_seat_for(100));

        account.plan = Plan::Enterprise;
        assert!(account.has_seat_for(10_000));
    }

    #[test]
    fn test_subject_type() {
        let account = BillingAccount::new(Uuid::now_v7(), Uuid::now_v7());
        assert_eq!(account.subject().unwrap().kind(), SubjectType::Billing);
    }
}
