//! # Orgguard Organization Management
//!
//! Multi-tenant organizations whose every mutation is guarded by an
//! `orgguard-ability` check.
//!
//! ## Overview
//!
//! The orgguard-org crate handles:
//! - **Organizations**: Top-level tenants with an owner
//! - **Projects**: Workspaces inside an organization, owned by their creator
//! - **Memberships**: One role per user per organization
//! - **Invites**: Pending offers of a role to an email address
//! - **Billing**: One billing account per organization
//! - **Service**: Guarded operations over a pluggable store
//!
//! ## Request Flow
//!
//! ```text
//! (actor, organization)
//!   └─ MembershipResolver ─→ role        (none → NotAMember)
//!        └─ RoleRegistry ─→ Ability
//!             └─ cannot(action, subject) ─→ Forbidden
//!                  └─ OrganizationStore write
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use uuid::Uuid;
//! use orgguard_ability::Role;
//! use orgguard_org::{MemoryStore, NewProject, Organization, OrganizationRef, OrganizationService};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let store = MemoryStore::new();
//! let owner = Uuid::now_v7();
//! let org = Organization::new("Acme Corp", "acme-corp", owner);
//! let org_id = org.id;
//! store.add_organization(org).await;
//!
//! let member = Uuid::now_v7();
//! store.add_member(org_id, member, Role::Member).await;
//!
//! let service = OrganizationService::new(Arc::new(store.clone()), Arc::new(store));
//! let acme = OrganizationRef::slug("acme-corp");
//!
//! let project = service
//!     .create_project(member, &acme, NewProject::new("Docs", "docs"))
//!     .await
//!     .unwrap();
//! assert_eq!(project.owner_id, member);
//!
//! // Members cannot shut the organization down.
//! let err = service.shutdown_organization(member, &acme).await.unwrap_err();
//! assert!(err.is_denied());
//! # }
//! ```

pub mod billing;
pub mod error;
pub mod invite;
pub mod membership;
pub mod memory;
pub mod organization;
pub mod project;
pub mod service;
pub mod store;

pub use billing::{BillingAccount, Plan};
pub use error::{OrgError, OrgResult};
pub use invite::Invite;
pub use membership::{
    MembershipResolver, OrganizationMembership, OrganizationRef, ResolvedMembership,
};
pub use memory::MemoryStore;
pub use organization::{Organization, OrganizationUpdate};
pub use project::{NewProject, Project, ProjectUpdate};
pub use service::{Authorized, OrganizationService};
pub use store::OrganizationStore;
