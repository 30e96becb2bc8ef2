//! Project domain models
//!
//! Projects live inside an organization. Members may edit or delete only the
//! projects they own, so every project carries an `owner_id`.

use chrono::{DateTime, Utc};
use orgguard_ability::{AbilityResult, Subject, SubjectType};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A project within an organization.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use orgguard_org::Project;
///
/// let org_id = Uuid::now_v7();
/// let user_id = Uuid::now_v7();
/// let project = Project::new(org_id, "Marketing Docs", "marketing-docs", user_id);
/// assert_eq!(project.owner_id, user_id);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier for the project
    pub id: Uuid,

    /// Organization this project belongs to
    pub organization_id: Uuid,

    /// Human-readable name
    pub name: String,

    /// URL-friendly slug (unique within organization)
    pub slug: String,

    /// Project description
    pub description: Option<String>,

    /// User who owns the project
    pub owner_id: Uuid,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Creates a new project owned by `owner_id`.
    pub fn new(
        organization_id: Uuid,
        name: impl Into<String>,
        slug: impl Into<String>,
        owner_id: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            organization_id,
            name: name.into(),
            slug: slug.into(),
            description: None,
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// The authorization subject for this project.
    pub fn subject(&self) -> AbilityResult<Subject> {
        Ok(Subject::owned_by(SubjectType::Project, self.owner_id.to_string())?
            .with_attr("organizationId", self.organization_id.to_string()))
    }
}

/// Input for creating a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProject {
    /// Human-readable name
    pub name: String,

    /// URL-friendly slug
    pub slug: String,

    /// Optional description
    pub description: Option<String>,
}

impl NewProject {
    /// Create project input without a description.
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            description: None,
        }
    }

    /// Build the project record, owned by the creating user.
    pub fn into_project(self, organization_id: Uuid, owner_id: Uuid) -> Project {
        let mut project = Project::new(organization_id, self.name, self.slug, owner_id);
        project.description = self.description;
        project
    }
}

/// Changes applied by a project update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectUpdate {
    /// New name
    pub name: Option<String>,

    /// New description
    pub description: Option<String>,
}

impl ProjectUpdate {
    /// Apply the changes and bump `updated_at`.
    pub fn apply_to(self, project: &mut Project) {
        if let Some(name) = self.name {
            project.name = name;
        }
        if let Some(description) = self.description {
            project.description = Some(description);
        }
        project.updated_at = Utc::now();
    }
}
