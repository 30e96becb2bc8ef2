//! In-memory store
//!
//! Implements both [`OrganizationStore`] and [`MembershipResolver`]. Suitable
//! for single-process use and tests; production deployments back the traits
//! with their database.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::billing::BillingAccount;
use crate::error::{OrgError, OrgResult};
use crate::invite::Invite;
use crate::membership::{
    MembershipResolver, OrganizationMembership, OrganizationRef, ResolvedMembership,
};
use crate::organization::Organization;
use crate::project::Project;
use crate::store::OrganizationStore;
use orgguard_ability::Role;

#[derive(Debug, Default)]
struct MemoryState {
    organizations: HashMap<Uuid, Organization>,
    memberships: Vec<OrganizationMembership>,
    projects: HashMap<Uuid, Project>,
    invites: HashMap<Uuid, Invite>,
    billing: HashMap<Uuid, BillingAccount>,
}

impl MemoryState {
    fn organization_id(&self, organization: &OrganizationRef) -> Option<Uuid> {
        match organization {
            OrganizationRef::Id(id) => self.organizations.contains_key(id).then_some(*id),
            OrganizationRef::Slug(slug) => self
                .organizations
                .values()
                .find(|org| &org.slug == slug)
                .map(|org| org.id),
        }
    }
}

/// In-memory organization store and membership directory.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore").finish_non_exhaustive()
    }
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an organization. Its owner is not made a member automatically.
    pub async fn add_organization(&self, organization: Organization) {
        let mut state = self.state.write().await;
        state.organizations.insert(organization.id, organization);
    }

    /// Seed a membership, replacing any existing one for the same user and
    /// organization.
    pub async fn add_membership(&self, membership: OrganizationMembership) {
        let mut state = self.state.write().await;
        state.memberships.retain(|m| {
            !(m.organization_id == membership.organization_id && m.user_id == membership.user_id)
        });
        state.memberships.push(membership);
    }

    /// Seed a membership from its parts.
    pub async fn add_member(&self, organization_id: Uuid, user_id: Uuid, role: Role) {
        self.add_membership(OrganizationMembership::new(organization_id, user_id, role))
            .await;
    }

    /// Seed a billing account.
    pub async fn add_billing(&self, account: BillingAccount) {
        let mut state = self.state.write().await;
        state.billing.insert(account.organization_id, account);
    }

    /// Look up a project by ID, regardless of organization.
    pub async fn project(&self, project_id: Uuid) -> Option<Project> {
        self.state.read().await.projects.get(&project_id).cloned()
    }

    /// Look up an organization by ID.
    pub async fn organization(&self, organization_id: Uuid) -> Option<Organization> {
        self.state
            .read()
            .await
            .organizations
            .get(&organization_id)
            .cloned()
    }
}

#[async_trait]
impl MembershipResolver for MemoryStore {
    async fn resolve_membership(
        &self,
        user_id: Uuid,
        organization: &OrganizationRef,
    ) -> OrgResult<Option<ResolvedMembership>> {
        let state = self.state.read().await;
        let Some(organization_id) = state.organization_id(organization) else {
            return Ok(None);
        };

        Ok(state
            .memberships
            .iter()
            .find(|m| m.organization_id == organization_id && m.user_id == user_id)
            .map(ResolvedMembership::from))
    }
}

#[async_trait]
impl OrganizationStore for MemoryStore {
    async fn find_organization(
        &self,
        organization: &OrganizationRef,
    ) -> OrgResult<Option<Organization>> {
        let state = self.state.read().await;
        Ok(state
            .organization_id(organization)
            .and_then(|id| state.organizations.get(&id).cloned()))
    }

    async fn save_organization(&self, organization: Organization) -> OrgResult<()> {
        let mut state = self.state.write().await;
        if !state.organizations.contains_key(&organization.id) {
            return Err(OrgError::NotFound(format!("organization {}", organization.id)));
        }
        if state
            .organizations
            .values()
            .any(|other| other.id != organization.id && other.slug == organization.slug)
        {
            return Err(OrgError::Conflict(format!(
                "organization slug '{}' is taken",
                organization.slug
            )));
        }
        state.organizations.insert(organization.id, organization);
        Ok(())
    }

    async fn delete_organization(&self, organization_id: Uuid) -> OrgResult<()> {
        let mut state = self.state.write().await;
        if state.organizations.remove(&organization_id).is_none() {
            return Err(OrgError::NotFound(format!("organization {}", organization_id)));
        }
        state
            .memberships
            .retain(|m| m.organization_id != organization_id);
        state
            .projects
            .retain(|_, p| p.organization_id != organization_id);
        state
            .invites
            .retain(|_, i| i.organization_id != organization_id);
        state.billing.remove(&organization_id);
        Ok(())
    }

    async fn find_project(
        &self,
        organization_id: Uuid,
        project_id: Uuid,
    ) -> OrgResult<Option<Project>> {
        let state = self.state.read().await;
        Ok(state
            .projects
            .get(&project_id)
            .filter(|p| p.organization_id == organization_id)
            .cloned())
    }

    async fn insert_project(&self, project: Project) -> OrgResult<()> {
        let mut state = self.state.write().await;
        if state
            .projects
            .values()
            .any(|p| p.organization_id == project.organization_id && p.slug == project.slug)
        {
            return Err(OrgError::Conflict(format!(
                "project slug '{}' is taken",
                project.slug
            )));
        }
        state.projects.insert(project.id, project);
        Ok(())
    }

    async fn save_project(&self, project: Project) -> OrgResult<()> {
        let mut state = self.state.write().await;
        match state.projects.get_mut(&project.id) {
            Some(existing) => {
                *existing = project;
                Ok(())
            }
            None => Err(OrgError::NotFound(format!("project {}", project.id))),
        }
    }

    async fn delete_project(&self, project_id: Uuid) -> OrgResult<()> {
        let mut state = self.state.write().await;
        state
            .projects
            .remove(&project_id)
            .map(|_| ())
            .ok_or_else(|| OrgError::NotFound(format!("project {}", project_id)))
    }

    async fn set_member_role(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
        role: Role,
    ) -> OrgResult<()> {
        let mut state = self.state.write().await;
        let membership = state
            .memberships
            .iter_mut()
            .find(|m| m.organization_id == organization_id && m.user_id == user_id)
            .ok_or_else(|| {
                OrgError::NotFound(format!(
                    "member {} in organization {}",
                    user_id, organization_id
                ))
            })?;
        membership.role = role;
        Ok(())
    }

    async fn seats_in_use(&self, organization_id: Uuid) -> OrgResult<u32> {
        let state = self.state.read().await;
        let members = state
            .memberships
            .iter()
            .filter(|m| m.organization_id == organization_id)
            .count();
        let pending = state
            .invites
            .values()
            .filter(|i| i.organization_id == organization_id)
            .count();
        u32::try_from(members + pending)
            .map_err(|_| OrgError::Store("seat count overflows u32".to_string()))
    }

    async fn find_billing(&self, organization_id: Uuid) -> OrgResult<Option<BillingAccount>> {
        Ok(self.state.read().await.billing.get(&organization_id).cloned())
    }

    async fn list_invites(&self, organization_id: Uuid) -> OrgResult<Vec<Invite>> {
        let state = self.state.read().await;
        let mut invites: Vec<Invite> = state
            .invites
            .values()
            .filter(|i| i.organization_id == organization_id)
            .cloned()
            .collect();
        invites.sort_by_key(|i| i.created_at);
        Ok(invites)
    }

    async fn find_invite(
        &self,
        organization_id: Uuid,
        invite_id: Uuid,
    ) -> OrgResult<Option<Invite>> {
        let state = self.state.read().await;
        Ok(state
            .invites
            .get(&invite_id)
            .filter(|i| i.organization_id == organization_id)
            .cloned())
    }

    async fn insert_invite(&self, invite: Invite) -> OrgResult<()> {
        let mut state = self.state.write().await;
        if state
            .invites
            .values()
            .any(|i| i.organization_id == invite.organization_id && i.email == invite.email)
        {
            return Err(OrgError::Conflict(format!(
                "'{}' is already invited",
                invite.email
            )));
        }
        state.invites.insert(invite.id, invite);
        Ok(())
    }

    async fn delete_invite(&self, invite_id: Uuid) -> OrgResult<()> {
        let mut state = self.state.write().await;
        state
            .invites
            .remove(&invite_id)
            .map(|_| ())
            .ok_or_else(|| OrgError::NotFound(format!("invite {}", invite_id)))
    }
}
