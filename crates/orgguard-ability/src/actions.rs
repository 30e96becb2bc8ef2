//! # Actions
//!
//! The closed vocabulary of verbs that rules grant or deny.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AbilityError;

/// Actions that can be checked against a subject.
///
/// - **Manage**: wildcard, satisfies any action check for its subject type
/// - **Get**: view a subject
/// - **Create**: create a new subject
/// - **Update**: modify an existing subject
/// - **Delete**: remove a subject
/// - **TransferOwnership**: hand a subject over to another owner
/// - **Export**: download or export subject data
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Wildcard action.
    ///
    /// A rule listing `Manage` matches every action queried on its subject type.
    Manage,

    /// View a subject.
    Get,

    /// Create a new subject.
    Create,

    /// Modify an existing subject.
    Update,

    /// Remove a subject.
    Delete,

    /// Transfer ownership of a subject to another user.
    TransferOwnership,

    /// Export subject data.
    Export,
}

impl Action {
    /// Every action in the vocabulary.
    pub const ALL: [Action; 7] = [
        Action::Manage,
        Action::Get,
        Action::Create,
        Action::Update,
        Action::Delete,
        Action::TransferOwnership,
        Action::Export,
    ];

    /// Get the string representation of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Manage => "manage",
            Action::Get => "get",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::TransferOwnership => "transfer_ownership",
            Action::Export => "export",
        }
    }

    /// Parse action from string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive)
    ///
    /// # Returns
    ///
    /// `Some(Action)` if valid, `None` otherwise
    ///
    /// # Example
    ///
    /// ```
    /// use orgguard_ability::Action;
    ///
    /// assert_eq!(Action::parse("get"), Some(Action::Get));
    /// assert_eq!(Action::parse("read"), None);
    /// assert_eq!(Action::parse("transfer_ownership"), Some(Action::TransferOwnership));
    /// assert_eq!(Action::parse("invalid"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "manage" => Some(Action::Manage),
            "get" => Some(Action::Get),
            "create" => Some(Action::Create),
            "update" => Some(Action::Update),
            "delete" => Some(Action::Delete),
            "transfer_ownership" => Some(Action::TransferOwnership),
            "export" => Some(Action::Export),
            _ => None,
        }
    }

    /// Check if this is the `manage` wildcard.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Action::Manage)
    }

    /// Check if a rule declaring this action covers a queried action.
    ///
    /// `Manage` covers every action; any other action covers only itself.
    ///
    /// # Example
    ///
    /// ```
    /// use orgguard_ability::Action;
    ///
    /// assert!(Action::Manage.covers(Action::Delete));
    /// assert!(Action::Update.covers(Action::Update));
    /// assert!(!Action::Update.covers(Action::Manage));
    /// ```
    pub fn covers(&self, queried: Action) -> bool {
        self.is_wildcard() || *self == queried
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = AbilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::parse(s).ok_or_else(|| AbilityError::UnknownAction(s.to_string()))
    }
}
