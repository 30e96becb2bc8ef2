//! Error types for guarded organization operations
//!
//! Every variant aborts the operation before any write happens.

use orgguard_ability::{AbilityError, Action, SubjectType};
use thiserror::Error;

/// Organization operation error types.
#[derive(Debug, Error)]
pub enum OrgError {
    /// The acting user's ability does not allow the action.
    #[error("Forbidden: cannot {action} {subject}")]
    Forbidden {
        /// The denied action
        action: Action,
        /// The subject type it was checked against
        subject: SubjectType,
    },

    /// The acting user has no membership in the organization.
    ///
    /// Treated as "deny everything": the ability is never built.
    #[error("Not a member of organization {0}")]
    NotAMember(String),

    /// A referenced entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A write would violate a uniqueness constraint.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The ability could not be built or the subject could not be typed.
    #[error(transparent)]
    Ability(#[from] AbilityError),

    /// The backing store failed.
    #[error("Store error: {0}")]
    Store(String),
}

/// Result type for organization operations.
pub type OrgResult<T> = Result<T, OrgError>;

impl OrgError {
    /// Build an authorization-denied error.
    pub fn forbidden(action: Action, subject: SubjectType) -> Self {
        OrgError::Forbidden { action, subject }
    }

    /// Check if this is an authorization denial (including non-membership).
    pub fn is_denied(&self) -> bool {
        matches!(self, OrgError::Forbidden { .. } | OrgError::NotAMember(_))
    }

    /// Check if this error should be logged at error level.
    pub fn is_server_error(&self) -> bool {
        match self {
            OrgError::Store(_) => true,
            OrgError::Ability(err) => err.is_server_error(),
            _ => false,
        }
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            OrgError::Forbidden { .. } | OrgError::NotAMember(_) => 403,
            OrgError::NotFound(_) => 404,
            OrgError::Conflict(_) => 409,
            OrgError::Ability(err) => err.status_code(),
            OrgError::Store(_) => 500,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            OrgError::Forbidden { .. } => "FORBIDDEN",
            OrgError::NotAMember(_) => "NOT_A_MEMBER",
            OrgError::NotFound(_) => "NOT_FOUND",
            OrgError::Conflict(_) => "CONFLICT",
            OrgError::Ability(err) => err.error_code(),
            OrgError::Store(_) => "STORE_ERROR",
        }
    }
}
