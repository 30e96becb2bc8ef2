//! End-to-end tests for guarded organization mutations.
//!
//! A counting store wraps [`MemoryStore`] so the tests can assert that a
//! denied operation never reaches the store's write methods.
//!
//! Flows covered:
//! 1. Organization update and ownership transfer: owner-only for admins
//! 2. Project delete: members only touch their own projects
//! 3. Billing: the billing role reads billing and nothing else
//! 4. Non-members: denied before any ability exists

use async_trait::async_trait;
use orgguard_ability::{Action, Role, SubjectType};
use orgguard_org::{
    BillingAccount, Invite, MemoryStore, NewProject, OrgError, OrgResult, Organization,
    OrganizationRef, OrganizationService, OrganizationStore, OrganizationUpdate, Project,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Store wrapper counting every write that reaches it.
#[derive(Debug, Default)]
struct CountingStore {
    inner: MemoryStore,
    writes: AtomicUsize,
    deletes: AtomicUsize,
}

impl CountingStore {
    fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }

    fn record_delete(&self) {
        self.deletes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl OrganizationStore for CountingStore {
    async fn find_organization(
        &self,
        organization: &OrganizationRef,
    ) -> OrgResult<Option<Organization>> {
        self.inner.find_organization(organization).await
    }

    async fn save_organization(&self, organization: Organization) -> OrgResult<()> {
        self.record_write();
        self.inner.save_organization(organization).await
    }

    async fn delete_organization(&self, organization_id: Uuid) -> OrgResult<()> {
        self.record_delete();
        self.inner.delete_organization(organization_id).await
    }

    async fn find_project(
        &self,
        organization_id: Uuid,
        project_id: Uuid,
    ) -> OrgResult<Option<Project>> {
        self.inner.find_project(organization_id, project_id).await
    }

    async fn insert_project(&self, project: Project) -> OrgResult<()> {
        self.record_write();
        self.inner.insert_project(project).await
    }

    async fn save_project(&self, project: Project) -> OrgResult<()> {
        self.record_write();
        self.inner.save_project(project).await
    }

    async fn delete_project(&self, project_id: Uuid) -> OrgResult<()> {
        self.record_delete();
        self.inner.delete_project(project_id).await
    }

    async fn set_member_role(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
        role: Role,
    ) -> OrgResult<()> {
        self.record_write();
        self.inner.set_member_role(organization_id, user_id, role).await
    }

    async fn seats_in_use(&self, organization_id: Uuid) -> OrgResult<u32> {
        self.inner.seats_in_use(organization_id).await
    }

    async fn find_billing(&self, organization_id: Uuid) -> OrgResult<Option<BillingAccount>> {
        self.inner.find_billing(organization_id).await
    }

    async fn list_invites(&self, organization_id: Uuid) -> OrgResult<Vec<Invite>> {
        self.inner.list_invites(organization_id).await
    }

    async fn find_invite(
        &self,
        organization_id: Uuid,
        invite_id: Uuid,
    ) -> OrgResult<Option<Invite>> {
        self.inner.find_invite(organization_id, invite_id).await
    }

    async fn insert_invite(&self, invite: Invite) -> OrgResult<()> {
        self.record_write();
        self.inner.insert_invite(invite).await
    }

    async fn delete_invite(&self, invite_id: Uuid) -> OrgResult<()> {
        self.record_delete();
        self.inner.delete_invite(invite_id).await
    }
}

/// Test fixture: one organization owned by an admin, plus a counting store.
struct TestFixture {
    store: Arc<CountingStore>,
    service: OrganizationService,
    org_id: Uuid,
    owner: Uuid,
}

impl TestFixture {
    async fn new() -> Self {
        let store = Arc::new(CountingStore::default());
        let owner = Uuid::now_v7();
        let org = Organization::new("Acme Corp", "acme-corp", owner);
        let org_id = org.id;
        store.inner.add_organization(org).await;
        store.inner.add_member(org_id, owner, Role::Admin).await;
        store
            .inner
            .add_billing(BillingAccount::new(org_id, owner))
            .await;

        let memberships = Arc::new(store.inner.clone());
        let service = OrganizationService::new(store.clone(), memberships);

        Self {
            store,
            service,
            org_id,
            owner,
        }
    }

    async fn join(&self, role: Role) -> Uuid {
        let user = Uuid::now_v7();
        self.store.inner.add_member(self.org_id, user, role).await;
        user
    }

    fn acme(&self) -> OrganizationRef {
        OrganizationRef::slug("acme-corp")
    }
}

#[tokio::test]
async fn test_admin_cannot_transfer_foreign_organization() {
    let fx = TestFixture::new().await;
    let other_admin = fx.join(Role::Admin).await;

    let err = fx
        .service
        .transfer_ownership(other_admin, &fx.acme(), other_admin)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        OrgError::Forbidden {
            action: Action::TransferOwnership,
            subject: SubjectType::Organization
        }
    ));
    assert_eq!(err.status_code(), 403);
    assert_eq!(fx.store.writes(), 0);

    let org = fx.store.inner.organization(fx.org_id).await.unwrap();
    assert_eq!(org.owner_id, fx.owner);
}

#[tokio::test]
async fn test_owner_transfers_organization() {
    let fx = TestFixture::new().await;
    let successor = fx.join(Role::Admin).await;

    let org = fx
        .service
        .transfer_ownership(fx.owner, &fx.acme(), successor)
        .await
        .unwrap();

    assert_eq!(org.owner_id, successor);
    assert_eq!(fx.store.writes(), 1);

    // The successor may now rename; the former owner may not.
    let rename = OrganizationUpdate {
        name: Some("Acme Inc".to_string()),
        ..Default::default()
    };
    fx.service
        .update_organization(successor, &fx.acme(), rename.clone())
        .await
        .unwrap();
    assert!(fx
        .service
        .update_organization(fx.owner, &fx.acme(), rename)
        .await
        .unwrap_err()
        .is_denied());
}

#[tokio::test]
async fn test_transfer_to_member_keeps_organization_manageable() {
    let fx = TestFixture::new().await;
    let member = fx.join(Role::Member).await;

    fx.service
        .transfer_ownership(fx.owner, &fx.acme(), member)
        .await
        .unwrap();
    // Role promotion plus the organization save.
    assert_eq!(fx.store.writes(), 2);

    let rename = OrganizationUpdate {
        name: Some("Acme Inc".to_string()),
        ..Default::default()
    };
    let org = fx
        .service
        .update_organization(member, &fx.acme(), rename)
        .await
        .unwrap();
    assert_eq!(org.name, "Acme Inc");
}

#[tokio::test]
async fn test_member_delete_of_foreign_project_never_reaches_store() {
    let fx = TestFixture::new().await;
    let author = fx.join(Role::Member).await;
    let intruder = fx.join(Role::Member).await;

    let project = fx
        .service
        .create_project(author, &fx.acme(), NewProject::new("Roadmap", "roadmap"))
        .await
        .unwrap();

    let err = fx
        .service
        .delete_project(intruder, &fx.acme(), project.id)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        OrgError::Forbidden {
            action: Action::Delete,
            subject: SubjectType::Project
        }
    ));
    assert_eq!(err.status_code(), 403);
    assert_eq!(fx.store.deletes(), 0);
    assert!(fx.store.inner.project(project.id).await.is_some());

    fx.service
        .delete_project(author, &fx.acme(), project.id)
        .await
        .unwrap();
    assert_eq!(fx.store.deletes(), 1);
}

#[tokio::test]
async fn test_admin_deletes_any_project() {
    let fx = TestFixture::new().await;
    let author = fx.join(Role::Member).await;
    let project = fx
        .service
        .create_project(author, &fx.acme(), NewProject::new("Roadmap", "roadmap"))
        .await
        .unwrap();

    fx.service
        .delete_project(fx.owner, &fx.acme(), project.id)
        .await
        .unwrap();
    assert!(fx.store.inner.project(project.id).await.is_none());
}

#[tokio::test]
async fn test_billing_role_reads_billing_only() {
    let fx = TestFixture::new().await;
    let accountant = fx.join(Role::Billing).await;

    let account = fx.service.get_billing(accountant, &fx.acme()).await.unwrap();
    assert_eq!(account.organization_id, fx.org_id);

    let err = fx
        .service
        .create_project(accountant, &fx.acme(), NewProject::new("Ledger", "ledger"))
        .await
        .unwrap_err();
    assert!(err.is_denied());

    let err = fx
        .service
        .create_invite(accountant, &fx.acme(), "new@acme.test", Role::Member)
        .await
        .unwrap_err();
    assert!(err.is_denied());
    assert_eq!(fx.store.writes(), 0);
}

#[tokio::test]
async fn test_non_member_is_denied_everything() {
    let fx = TestFixture::new().await;
    let stranger = Uuid::now_v7();

    let err = fx
        .service
        .shutdown_organization(stranger, &fx.acme())
        .await
        .unwrap_err();
    assert!(matches!(err, OrgError::NotAMember(_)));
    assert_eq!(err.status_code(), 403);

    assert!(fx
        .service
        .get_billing(stranger, &fx.acme())
        .await
        .unwrap_err()
        .is_denied());
    assert!(fx
        .service
        .ability_for(stranger, &fx.acme())
        .await
        .is_err());

    assert_eq!(fx.store.deletes(), 0);
    assert!(fx.store.inner.organization(fx.org_id).await.is_some());
}

#[tokio::test]
async fn test_shutdown_cascades_for_admin() {
    let fx = TestFixture::new().await;
    let member = fx.join(Role::Member).await;
    let project = fx
        .service
        .create_project(member, &fx.acme(), NewProject::new("Roadmap", "roadmap"))
        .await
        .unwrap();

    fx.service
        .shutdown_organization(fx.owner, &fx.acme())
        .await
        .unwrap();

    assert_eq!(fx.store.deletes(), 1);
    assert!(fx.store.inner.project(project.id).await.is_none());
    assert!(matches!(
        fx.service.ability_for(fx.owner, &fx.acme()).await,
        Err(OrgError::NotAMember(_))
    ));
}
