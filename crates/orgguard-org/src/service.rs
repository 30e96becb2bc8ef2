//! Guarded organization operations
//!
//! Every mutation follows the same sequence: resolve the actor's membership,
//! build the ability for their role, check the action against the target
//! subject, then write. A denial at any step returns before the store is
//! touched.

use orgguard_ability::{Ability, Action, Role, RoleRegistry, SubjectRef, SubjectType};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::billing::BillingAccount;
use crate::error::{OrgError, OrgResult};
use crate::invite::Invite;
use crate::membership::{MembershipResolver, OrganizationRef, ResolvedMembership};
use crate::organization::{Organization, OrganizationUpdate};
use crate::project::{NewProject, Project, ProjectUpdate};
use crate::store::OrganizationStore;

/// An actor's compiled ability inside one organization.
#[derive(Debug, Clone)]
pub struct Authorized {
    /// The membership the ability was built from
    pub membership: ResolvedMembership,
    /// The compiled ability
    pub ability: Ability,
}

impl Authorized {
    /// Fail with `Forbidden` unless the ability allows `action` on `subject`.
    pub fn ensure<'a>(
        &self,
        action: Action,
        subject: impl Into<SubjectRef<'a>>,
    ) -> OrgResult<()> {
        let subject = subject.into();
        if self.ability.cannot(action, subject) {
            warn!(
                actor = %self.membership.user_id,
                organization = %self.membership.organization_id,
                action = %action,
                subject = %subject.subject_type(),
                "Ability check denied"
            );
            return Err(OrgError::forbidden(action, subject.subject_type()));
        }
        Ok(())
    }
}

/// Organization service enforcing ability checks before every write.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use uuid::Uuid;
/// use orgguard_ability::Role;
/// use orgguard_org::{MemoryStore, Organization, OrganizationRef, OrganizationService};
///
/// # #[tokio::main]
/// # async fn main() {
/// let store = MemoryStore::new();
/// let owner = Uuid::now_v7();
/// let org = Organization::new("Acme", "acme", owner);
/// let org_id = org.id;
/// store.add_organization(org).await;
/// store.add_member(org_id, owner, Role::Admin).await;
///
/// let service = OrganizationService::new(Arc::new(store.clone()), Arc::new(store));
/// let billing = service.get_billing(owner, &OrganizationRef::slug("acme")).await;
/// assert!(billing.is_err()); // no billing account seeded
/// # }
/// ```
#[derive(Clone)]
pub struct OrganizationService {
    store: Arc<dyn OrganizationStore>,
    memberships: Arc<dyn MembershipResolver>,
    registry: RoleRegistry,
}

impl std::fmt::Debug for OrganizationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrganizationService")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl OrganizationService {
    /// Create a service using the standard role registry.
    pub fn new(
        store: Arc<dyn OrganizationStore>,
        memberships: Arc<dyn MembershipResolver>,
    ) -> Self {
        Self {
            store,
            memberships,
            registry: RoleRegistry::standard(),
        }
    }

    /// Replace the role registry.
    pub fn with_registry(mut self, registry: RoleRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Resolve `actor`'s membership in `organization` and compile their ability.
    ///
    /// Fails with [`OrgError::NotAMember`] when there is no membership; no
    /// ability is built in that case.
    pub async fn ability_for(
        &self,
        actor: Uuid,
        organization: &OrganizationRef,
    ) -> OrgResult<Authorized> {
        let membership = match self
            .memberships
            .resolve_membership(actor, organization)
            .await?
        {
            Some(membership) => membership,
            None => {
                warn!(
                    actor = %actor,
                    organization = %organization,
                    "Actor is not a member"
                );
                return Err(OrgError::NotAMember(organization.to_string()));
            }
        };

        let ability = self
            .registry
            .define_ability_for(&membership.ability_user())?;

        debug!(
            actor = %actor,
            organization = %membership.organization_id,
            role = %membership.role,
            "Ability resolved"
        );

        Ok(Authorized {
            membership,
            ability,
        })
    }

    /// Update an organization's profile. Requires `update` on the organization.
    pub async fn update_organization(
        &self,
        actor: Uuid,
        organization: &OrganizationRef,
        update: OrganizationUpdate,
    ) -> OrgResult<Organization> {
        let auth = self.ability_for(actor, organization).await?;
        let mut org = self.load_organization(organization).await?;
        auth.ensure(Action::Update, &org.subject()?)?;

        if update.is_empty() {
            return Ok(org);
        }
        update.apply_to(&mut org);
        self.store.save_organization(org.clone()).await?;

        info!(actor = %actor, organization = %org.id, "Organization updated");
        Ok(org)
    }

    /// Delete an organization and everything it owns. Requires `delete` on
    /// the organization.
    pub async fn shutdown_organization(
        &self,
        actor: Uuid,
        organization: &OrganizationRef,
    ) -> OrgResult<()> {
        let auth = self.ability_for(actor, organization).await?;
        let org = self.load_organization(organization).await?;
        auth.ensure(Action::Delete, &org.subject()?)?;

        self.store.delete_organization(org.id).await?;

        info!(actor = %actor, organization = %org.id, "Organization shut down");
        Ok(())
    }

    /// Hand ownership to another member. Requires `transfer_ownership` on the
    /// organization.
    ///
    /// The new owner is promoted to `ADMIN`, since only admins hold the
    /// owner-conditional grants on the organization.
    pub async fn transfer_ownership(
        &self,
        actor: Uuid,
        organization: &OrganizationRef,
        new_owner: Uuid,
    ) -> OrgResult<Organization> {
        let auth = self.ability_for(actor, organization).await?;
        let mut org = self.load_organization(organization).await?;
        auth.ensure(Action::TransferOwnership, &org.subject()?)?;

        let target = self
            .memberships
            .resolve_membership(new_owner, &OrganizationRef::Id(org.id))
            .await?
            .ok_or_else(|| {
                OrgError::NotFound(format!("member {} in organization {}", new_owner, org.id))
            })?;

        if target.role != Role::Admin {
            self.store
                .set_member_role(org.id, new_owner, Role::Admin)
                .await?;
            info!(
                organization = %org.id,
                member = %new_owner,
                from = %target.role,
                "Member promoted to admin for ownership"
            );
        }

        let previous = org.owner_id;
        org.owner_id = new_owner;
        org.updated_at = chrono::Utc::now();
        self.store.save_organization(org.clone()).await?;

        info!(
            actor = %actor,
            organization = %org.id,
            from = %previous,
            to = %new_owner,
            "Ownership transferred"
        );
        Ok(org)
    }

    /// Create a project owned by `actor`. Requires `create` on the project.
    pub async fn create_project(
        &self,
        actor: Uuid,
        organization: &OrganizationRef,
        input: NewProject,
    ) -> OrgResult<Project> {
        let auth = self.ability_for(actor, organization).await?;
        let project = input.into_project(auth.membership.organization_id, actor);
        auth.ensure(Action::Create, &project.subject()?)?;

        self.store.insert_project(project.clone()).await?;

        info!(actor = %actor, project = %project.id, "Project created");
        Ok(project)
    }

    /// Update a project. Requires `update` on the project.
    pub async fn update_project(
        &self,
        actor: Uuid,
        organization: &OrganizationRef,
        project_id: Uuid,
        update: ProjectUpdate,
    ) -> OrgResult<Project> {
        let auth = self.ability_for(actor, organization).await?;
        let mut project = self.load_project(&auth, project_id).await?;
        auth.ensure(Action::Update, &project.subject()?)?;

        update.apply_to(&mut project);
        self.store.save_project(project.clone()).await?;

        info!(actor = %actor, project = %project.id, "Project updated");
        Ok(project)
    }

    /// Delete a project. Requires `delete` on the project.
    pub async fn delete_project(
        &self,
        actor: Uuid,
        organization: &OrganizationRef,
        project_id: Uuid,
    ) -> OrgResult<()> {
        let auth = self.ability_for(actor, organization).await?;
        let project = self.load_project(&auth, project_id).await?;
        auth.ensure(Action::Delete, &project.subject()?)?;

        self.store.delete_project(project.id).await?;

        info!(actor = %actor, project = %project.id, "Project deleted");
        Ok(())
    }

    /// Read the billing account. Requires `get` on billing.
    pub async fn get_billing(
        &self,
        actor: Uuid,
        organization: &OrganizationRef,
    ) -> OrgResult<BillingAccount> {
        let auth = self.ability_for(actor, organization).await?;
        let account = self
            .store
            .find_billing(auth.membership.organization_id)
            .await?
            .ok_or_else(|| {
                OrgError::NotFound(format!(
                    "billing account for {}",
                    auth.membership.organization_id
                ))
            })?;
        auth.ensure(Action::Get, &account.subject()?)?;
        Ok(account)
    }

    /// Invite an email address with a role. Requires `create` on the invite.
    ///
    /// Fails with `Conflict` when members plus pending invites already fill
    /// the organization's plan.
    pub async fn create_invite(
        &self,
        actor: Uuid,
        organization: &OrganizationRef,
        email: &str,
        role: Role,
    ) -> OrgResult<Invite> {
        let auth = self.ability_for(actor, organization).await?;
        let organization_id = auth.membership.organization_id;
        let invite = Invite::new(organization_id, email, role, actor);
        auth.ensure(Action::Create, &invite.subject()?)?;

        if let Some(account) = self.store.find_billing(organization_id).await? {
            let seats_in_use = self.store.seats_in_use(organization_id).await?;
            if !account.has_seat_for(seats_in_use) {
                return Err(OrgError::Conflict(format!(
                    "plan {:?} has no free seat ({} in use)",
                    account.plan, seats_in_use
                )));
            }
        }

        self.store.insert_invite(invite.clone()).await?;

        info!(actor = %actor, invite = %invite.id, role = %role, "Invite created");
        Ok(invite)
    }

    /// List pending invites. Requires `get` on invites.
    pub async fn list_invites(
        &self,
        actor: Uuid,
        organization: &OrganizationRef,
    ) -> OrgResult<Vec<Invite>> {
        let auth = self.ability_for(actor, organization).await?;
        auth.ensure(Action::Get, SubjectType::Invite)?;
        self.store
            .list_invites(auth.membership.organization_id)
            .await
    }

    /// Revoke an invite. Requires `delete` on the invite.
    pub async fn revoke_invite(
        &self,
        actor: Uuid,
        organization: &OrganizationRef,
        invite_id: Uuid,
    ) -> OrgResult<()> {
        let auth = self.ability_for(actor, organization).await?;
        let invite = self
            .store
            .find_invite(auth.membership.organization_id, invite_id)
            .await?
            .ok_or_else(|| OrgError::NotFound(format!("invite {}", invite_id)))?;
        auth.ensure(Action::Delete, &invite.subject()?)?;

        self.store.delete_invite(invite.id).await?;

        info!(actor = %actor, invite = %invite.id, "Invite revoked");
        Ok(())
    }

    async fn load_organization(&self, organization: &OrganizationRef) -> OrgResult<Organization> {
        self.store
            .find_organization(organization)
            .await?
            .ok_or_else(|| OrgError::NotFound(format!("organization {}", organization)))
    }

    async fn load_project(&self, auth: &Authorized, project_id: Uuid) -> OrgResult<Project> {
        self.store
            .find_project(auth.membership.organization_id, project_id)
            .await?
            .ok_or_else(|| OrgError::NotFound(format!("project {}", project_id)))
    }
}
