//! # Roles and the role registry
//!
//! Each membership role maps to a pure permission function that declares the
//! role's rules into an [`AbilityBuilder`]. The standard registry is a
//! constant table; nothing mutates it at runtime.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ability::Ability;
use crate::actions::Action;
use crate::builder::{AbilityBuilder, BuildOptions};
use crate::conditions::Condition;
use crate::error::{AbilityError, AbilityResult};
use crate::subjects::SubjectType;

/// Role held by a member within one organization.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Manages everything; transfers or updates only organizations they own.
    Admin,
    /// Works on projects; edits only the projects they own.
    Member,
    /// Manages the organization's billing and nothing else.
    Billing,
}

impl Role {
    /// Every membership role.
    pub const ALL: [Role; 3] = [Role::Admin, Role::Member, Role::Billing];

    /// Get the string representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Member => "MEMBER",
            Role::Billing => "BILLING",
        }
    }

    /// Parse role from string representation (case-insensitive).
    ///
    /// # Example
    ///
    /// ```
    /// use orgguard_ability::Role;
    ///
    /// assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
    /// assert_eq!(Role::parse("billing"), Some(Role::Billing));
    /// assert_eq!(Role::parse("owner"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "ADMIN" => Some(Role::Admin),
            "MEMBER" => Some(Role::Member),
            "BILLING" => Some(Role::Billing),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AbilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s).ok_or_else(|| AbilityError::UnknownRole(s.to_string()))
    }
}

/// The authenticated user an ability is compiled for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbilityUser {
    /// Authenticated user id.
    pub id: String,
    /// Role resolved from the user's membership.
    pub role: Role,
}

impl AbilityUser {
    /// Create a new ability user.
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }
}

/// A role's rule declarations.
pub type PermissionFn = fn(&AbilityUser, &mut AbilityBuilder);

fn admin_permissions(user: &AbilityUser, builder: &mut AbilityBuilder) {
    let owner_only = [Action::TransferOwnership, Action::Update];

    // Order matters: the conditional grant must follow the blanket deny.
    builder
        .can([Action::Manage], SubjectType::All)
        .cannot(owner_only, SubjectType::Organization)
        .can_if(
            owner_only,
            SubjectType::Organization,
            Condition::owned_by(user.id.as_str()),
        );
}

fn member_permissions(user: &AbilityUser, builder: &mut AbilityBuilder) {
    builder
        .can([Action::Get], SubjectType::User)
        .can([Action::Create, Action::Get], SubjectType::Project)
        .can_if(
            [Action::Update, Action::Delete],
            SubjectType::Project,
            Condition::owned_by(user.id.as_str()),
        );
}

fn billing_permissions(_user: &AbilityUser, builder: &mut AbilityBuilder) {
    builder.can([Action::Manage], SubjectType::Billing);
}

const STANDARD_ENTRIES: &[(Role, PermissionFn)] = &[
    (Role::Admin, admin_permissions),
    (Role::Member, member_permissions),
    (Role::Billing, billing_permissions),
];

/// Immutable role → permission function table.
///
/// # Example
///
/// ```
/// use orgguard_ability::{AbilityUser, Action, Role, RoleRegistry, SubjectType};
///
/// let ability = RoleRegistry::standard()
///     .define_ability_for(&AbilityUser::new("u3", Role::Billing))
///     .unwrap();
/// assert!(ability.can(Action::Manage, SubjectType::Billing));
/// assert!(ability.cannot(Action::Create, SubjectType::Project));
/// ```
#[derive(Clone, Copy)]
pub struct RoleRegistry {
    entries: &'static [(Role, PermissionFn)],
}

impl fmt::Debug for RoleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoleRegistry")
            .field("roles", &self.roles().collect::<Vec<_>>())
            .finish()
    }
}

impl RoleRegistry {
    /// The registry every production call site uses.
    pub const fn standard() -> Self {
        Self {
            entries: STANDARD_ENTRIES,
        }
    }

    /// A registry over a custom table.
    ///
    /// Roles missing from `entries` fail ability construction with a
    /// configuration error.
    pub const fn with_entries(entries: &'static [(Role, PermissionFn)]) -> Self {
        Self { entries }
    }

    /// Look up the permission function for `role`.
    pub fn permissions_for(&self, role: Role) -> AbilityResult<PermissionFn> {
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == role)
            .map(|(_, declare)| *declare)
            .ok_or_else(|| AbilityError::unknown_role_config(role))
    }

    /// Roles with a registry entry, in table order.
    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.entries.iter().map(|(role, _)| *role)
    }

    /// Compile the ability for `user` with the default subject resolver.
    pub fn define_ability_for(&self, user: &AbilityUser) -> AbilityResult<Ability> {
        self.define_ability_with(user, BuildOptions::default())
    }

    /// Compile the ability for `user` with explicit build options.
    pub fn define_ability_with(
        &self,
        user: &AbilityUser,
        options: BuildOptions,
    ) -> AbilityResult<Ability> {
        let declare = self.permissions_for(user.role).map_err(|err| {
            tracing::error!(user_id = %user.id, role = %user.role, "no permission function for role");
            err
        })?;

        let mut builder = AbilityBuilder::new();
        declare(user, &mut builder);
        let ability = builder.build(options);

        tracing::debug!(
            user_id = %user.id,
            role = %user.role,
            rules = ability.rules().len(),
            "ability compiled"
        );
        Ok(ability)
    }
}

impl Default for RoleRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Compile the ability for `user` from the standard registry.
///
/// This is the single entry point call sites use before gating a mutation.
///
/// # Example
///
/// ```
/// use orgguard_ability::{define_ability_for, AbilityUser, Action, Role, Subject, SubjectType};
///
/// let ability = define_ability_for(&AbilityUser::new("u1", Role::Admin)).unwrap();
/// let theirs = Subject::owned_by(SubjectType::Organization, "u2").unwrap();
/// assert!(ability.cannot(Action::TransferOwnership, &theirs));
/// ```
pub fn define_ability_for(user: &AbilityUser) -> AbilityResult<Ability> {
    RoleRegistry::standard().define_ability_for(user)
}
