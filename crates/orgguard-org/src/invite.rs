//! Organization invites
//!
//! An invite offers a membership role to an email address. The author is
//! recorded as the invite's owner.

use chrono::{DateTime, Utc};
use orgguard_ability::{AbilityResult, Role, Subject, SubjectType};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A pending invitation to join an organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invite {
    /// Unique invite ID
    pub id: Uuid,

    /// Organization the invite is for
    pub organization_id: Uuid,

    /// Invited email address (stored lowercase)
    pub email: String,

    /// Role granted on acceptance
    pub role: Role,

    /// User who created the invite
    pub author_id: Uuid,

    /// When the invite was created
    pub created_at: DateTime<Utc>,
}

impl Invite {
    /// Creates a new invite.
    pub fn new(organization_id: Uuid, email: impl AsRef<str>, role: Role, author_id: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            organization_id,
            email: email.as_ref().trim().to_lowercase(),
            role,
            author_id,
            created_at: Utc::now(),
        }
    }

    /// The authorization subject for this invite.
    pub fn subject(&self) -> AbilityResult<Subject> {
        Ok(Subject::owned_by(SubjectType::Invite, self.author_id.to_string())?
            .with_attr("role", self.role.as_str()))
    }
}
