//! Error types for ability construction and subject resolution
//!
//! The engine never reports a legitimate "no permission" outcome as an error:
//! `Ability::can` returns `false` for that. The variants below describe
//! defects in how the ability or its inputs were assembled, and every one of
//! them must abort the guarded operation.

use thiserror::Error;

/// Ability error types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AbilityError {
    /// The role registry has no permission function for the role.
    ///
    /// This is a deployment or programmer defect, never user input.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A subject record is missing its discriminant or carries one that is
    /// not a known subject type.
    #[error("Subject type mismatch: {0}")]
    TypeMismatch(String),

    /// An action string outside the closed action vocabulary.
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// A subject type string outside the closed subject vocabulary.
    #[error("Unknown subject type: {0}")]
    UnknownSubjectType(String),

    /// A role string that is not one of the membership roles.
    #[error("Unknown role: {0}")]
    UnknownRole(String),
}

/// Result type for ability operations.
pub type AbilityResult<T> = Result<T, AbilityError>;

impl AbilityError {
    /// Build the error raised when a role has no registry entry.
    pub fn unknown_role_config(role: impl std::fmt::Display) -> Self {
        AbilityError::Configuration(format!("unknown role '{}'", role))
    }

    /// Check if this error indicates a server-side defect.
    ///
    /// Configuration and subject type errors come from the calling code, not
    /// from the requester, and should be logged at error level.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            AbilityError::Configuration(_) | AbilityError::TypeMismatch(_)
        )
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AbilityError::Configuration(_) | AbilityError::TypeMismatch(_) => 500,
            AbilityError::UnknownAction(_)
            | AbilityError::UnknownSubjectType(_)
            | AbilityError::UnknownRole(_) => 400,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            AbilityError::Configuration(_) => "CONFIG_ERROR",
            AbilityError::TypeMismatch(_) => "SUBJECT_TYPE_MISMATCH",
            AbilityError::UnknownAction(_) => "UNKNOWN_ACTION",
            AbilityError::UnknownSubjectType(_) => "UNKNOWN_SUBJECT_TYPE",
            AbilityError::UnknownRole(_) => "UNKNOWN_ROLE",
        }
    }
}
