//! Persistence boundary
//!
//! The guarded service reads and writes through this trait. Implementations
//! own their query and error wrapping; the service only sees [`OrgResult`].

use async_trait::async_trait;
use uuid::Uuid;

use crate::billing::BillingAccount;
use crate::error::OrgResult;
use crate::invite::Invite;
use crate::membership::OrganizationRef;
use orgguard_ability::Role;
use crate::organization::Organization;
use crate::project::Project;

/// Storage operations used by [`crate::OrganizationService`].
#[async_trait]
pub trait OrganizationStore: Send + Sync {
    /// Find an organization by ID or slug.
    async fn find_organization(&self, organization: &OrganizationRef)
        -> OrgResult<Option<Organization>>;

    /// Persist changes to an existing organization.
    async fn save_organization(&self, organization: Organization) -> OrgResult<()>;

    /// Remove an organization with its projects, invites, memberships and
    /// billing account.
    async fn delete_organization(&self, organization_id: Uuid) -> OrgResult<()>;

    /// Find a project inside an organization.
    async fn find_project(&self, organization_id: Uuid, project_id: Uuid)
        -> OrgResult<Option<Project>>;

    /// Insert a new project. Fails with `Conflict` on a duplicate slug.
    async fn insert_project(&self, project: Project) -> OrgResult<()>;

    /// Persist changes to an existing project.
    async fn save_project(&self, project: Project) -> OrgResult<()>;

    /// Remove a project.
    async fn delete_project(&self, project_id: Uuid) -> OrgResult<()>;

    /// Change a member's role. Fails with `NotFound` when the user is not a
    /// member.
    async fn set_member_role(&self, organization_id: Uuid, user_id: Uuid, role: Role)
        -> OrgResult<()>;

    /// Seats taken in an organization: members plus pending invites.
    async fn seats_in_use(&self, organization_id: Uuid) -> OrgResult<u32>;

    /// The organization's billing account, if any.
    async fn find_billing(&self, organization_id: Uuid) -> OrgResult<Option<BillingAccount>>;

    /// Pending invites of an organization.
    async fn list_invites(&self, organization_id: Uuid) -> OrgResult<Vec<Invite>>;

    /// Find an invite inside an organization.
    async fn find_invite(&self, organization_id: Uuid, invite_id: Uuid)
        -> OrgResult<Option<Invite>>;

    /// Insert a new invite. Fails with `Conflict` on a duplicate email.
    async fn insert_invite(&self, invite: Invite) -> OrgResult<()>;

    /// Remove an invite.
    async fn delete_invite(&self, invite_id: Uuid) -> OrgResult<()>;
}
