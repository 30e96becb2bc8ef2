//! Membership domain models and resolution
//!
//! A membership links a user to an organization with exactly one role.
//! Resolving the membership is the step that runs before any ability is
//! built: no membership means no role, and no role means every guarded
//! operation is denied.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use orgguard_ability::{AbilityUser, Role};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::OrgResult;

/// Organization membership linking a user to an organization.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use orgguard_ability::Role;
/// use orgguard_org::OrganizationMembership;
///
/// let org_id = Uuid::now_v7();
/// let user_id = Uuid::now_v7();
/// let membership = OrganizationMembership::new(org_id, user_id, Role::Member);
/// assert_eq!(membership.role, Role::Member);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationMembership {
    /// Unique membership ID
    pub id: Uuid,

    /// Organization ID
    pub organization_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// Role within the organization
    pub role: Role,

    /// When the user joined
    pub joined_at: DateTime<Utc>,
}

impl OrganizationMembership {
    /// Creates a new organization membership.
    pub fn new(organization_id: Uuid, user_id: Uuid, role: Role) -> Self {
        Self {
            id: Uuid::now_v7(),
            organization_id,
            user_id,
            role,
            joined_at: Utc::now(),
        }
    }
}

/// How a caller names the organization it acts on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationRef {
    /// By organization ID
    Id(Uuid),
    /// By organization slug
    Slug(String),
}

impl OrganizationRef {
    /// Reference an organization by slug.
    pub fn slug(slug: impl Into<String>) -> Self {
        OrganizationRef::Slug(slug.into())
    }
}

impl fmt::Display for OrganizationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrganizationRef::Id(id) => write!(f, "{}", id),
            OrganizationRef::Slug(slug) => f.write_str(slug),
        }
    }
}

impl From<Uuid> for OrganizationRef {
    fn from(id: Uuid) -> Self {
        OrganizationRef::Id(id)
    }
}

impl From<&str> for OrganizationRef {
    fn from(slug: &str) -> Self {
        OrganizationRef::Slug(slug.to_string())
    }
}

/// Outcome of a successful membership lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedMembership {
    /// The acting user
    pub user_id: Uuid,
    /// The organization the membership belongs to
    pub organization_id: Uuid,
    /// The user's role there
    pub role: Role,
}

impl ResolvedMembership {
    /// The input ability construction needs: the user id and the role.
    pub fn ability_user(&self) -> AbilityUser {
        AbilityUser::new(self.user_id.to_string(), self.role)
    }
}

impl From<&OrganizationMembership> for ResolvedMembership {
    fn from(membership: &OrganizationMembership) -> Self {
        Self {
            user_id: membership.user_id,
            organization_id: membership.organization_id,
            role: membership.role,
        }
    }
}

/// Resolves `(user, organization)` to a role.
///
/// `Ok(None)` means the user is not a member; callers must treat that as
/// "deny everything" and never build an ability for it.
#[async_trait]
pub trait MembershipResolver: Send + Sync {
    /// Look up `user_id`'s membership in `organization`.
    async fn resolve_membership(
        &self,
        user_id: Uuid,
        organization: &OrganizationRef,
    ) -> OrgResult<Option<ResolvedMembership>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_membership_feeds_ability_user() {
        let membership = OrganizationMembership::new(Uuid::now_v7(), Uuid::now_v7(), Role::Admin);
        let resolved = ResolvedMembership::from(&membership);
        let user = resolved.ability_user();
        assert_eq!(user.id, membership.user_id.to_string());
        assert_eq!(user.role, Role::Admin);
    }

    #[test]
    fn test_organization_ref_display() {
        assert_eq!(OrganizationRef::slug("acme").to_string(), "acme");
        let id = Uuid::now_v7();
        assert_eq!(OrganizationRef::from(id).to_string(), id.to_string());
    }
}
