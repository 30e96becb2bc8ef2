//! # orgguard ability
//!
//! Compiles a member's role into an immutable, queryable [`Ability`] used to
//! gate every organization, project, billing and invite mutation.
//!
//! ## Overview
//!
//! - **Roles**: `ADMIN`, `MEMBER`, `BILLING`, each mapped to a pure permission
//!   function in a constant [`RoleRegistry`]
//! - **Rules**: ordered grant/deny entries over actions and subject types,
//!   optionally narrowed by an attribute [`Condition`]
//! - **Ability**: answers `can`/`cannot` for an `(action, subject)` pair
//! - **Subjects**: typed records carrying an explicit discriminant, or bare
//!   type tags for class-level checks
//!
//! ## Evaluation
//!
//! ```text
//! rules (declaration order)
//!   ├─ keep: rule.subject == subject type  || rule.subject == all
//!   ├─ keep: rule.actions ∋ action         || rule.actions ∋ manage
//!   ├─ keep: condition holds on instance   (absent attribute ⇒ skip)
//!   └─ last kept rule decides; none kept ⇒ deny
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use orgguard_ability::{define_ability_for, AbilityUser, Action, Role, Subject, SubjectType};
//!
//! let ability = define_ability_for(&AbilityUser::new("u2", Role::Member)).unwrap();
//!
//! let project = Subject::owned_by(SubjectType::Project, "u9").unwrap();
//! assert!(ability.cannot(Action::Delete, &project));
//! assert!(ability.can(Action::Create, SubjectType::Project));
//! ```
//!
//! The engine performs no I/O and holds no shared state. Membership lookup
//! happens before it is invoked; see `orgguard-org`.

pub mod ability;
pub mod actions;
pub mod builder;
pub mod conditions;
pub mod error;
pub mod resolver;
pub mod roles;
pub mod rules;
pub mod subjects;

// Re-export main types for convenience
pub use ability::Ability;
pub use actions::Action;
pub use builder::{AbilityBuilder, BuildOptions};
pub use conditions::Condition;
pub use error::{AbilityError, AbilityResult};
pub use resolver::{DiscriminantResolver, SubjectResolver};
pub use roles::{define_ability_for, AbilityUser, PermissionFn, Role, RoleRegistry};
pub use rules::{Effect, Rule};
pub use subjects::{Subject, SubjectRef, SubjectType, DISCRIMINANT_FIELD, OWNER_ID};
