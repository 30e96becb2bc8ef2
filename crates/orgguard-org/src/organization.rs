//! Organization domain models
//!
//! Organizations are the tenants that own projects, invites, a billing
//! account and a member list. The `owner_id` is what the admin ownership
//! condition is evaluated against.

use chrono::{DateTime, Utc};
use orgguard_ability::{AbilityResult, Subject, SubjectType};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An organization represents a tenant in the multi-tenant system.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use orgguard_org::Organization;
///
/// let owner_id = Uuid::now_v7();
/// let org = Organization::new("Acme Corp", "acme-corp", owner_id);
/// assert_eq!(org.name, "Acme Corp");
/// assert_eq!(org.owner_id, owner_id);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    /// Unique identifier for the organization
    pub id: Uuid,

    /// Human-readable name
    pub name: String,

    /// URL-friendly slug (unique across the platform)
    pub slug: String,

    /// Optional description
    pub description: Option<String>,

    /// Owner user ID
    pub owner_id: Uuid,

    /// When the organization was created
    pub created_at: DateTime<Utc>,

    /// When the organization was last updated
    pub updated_at: DateTime<Utc>,
}

impl Organization {
    /// Creates a new active organization owned by `owner_id`.
    pub fn new(name: impl Into<String>, slug: impl Into<String>, owner_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            slug: slug.into(),
            description: None,
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// The authorization subject for this organization.
    ///
    /// # Examples
    ///
    /// ```
    /// use uuid::Uuid;
    /// use orgguard_ability::SubjectType;
    /// use orgguard_org::Organization;
    ///
    /// let owner_id = Uuid::now_v7();
    /// let org = Organization::new("Acme Corp", "acme-corp", owner_id);
    /// let subject = org.subject().unwrap();
    /// assert_eq!(subject.kind(), SubjectType::Organization);
    /// assert_eq!(subject.owner_id(), Some(owner_id.to_string().as_str()));
    /// ```
    pub fn subject(&self) -> AbilityResult<Subject> {
        Ok(Subject::owned_by(SubjectType::Organization, self.owner_id.to_string())?
            .with_attr("id", self.id.to_string()))
    }
}

/// Changes applied by an organization update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganizationUpdate {
    /// New name
    pub name: Option<String>,

    /// New slug
    pub slug: Option<String>,

    /// New description
    pub description: Option<String>,
}

impl OrganizationUpdate {
    /// Check if the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.slug.is_none() && self.description.is_none()
    }

    /// Apply the changes and bump `updated_at`.
    pub fn apply_to(self, org: &mut Organization) {
        if let Some(name) = self.name {
            org.name = name;
        }
        if let Some(slug) = self.slug {
            org.slug = slug;
        }
        if let Some(description) = self.description {
            org.description = Some(description);
        }
        org.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_organization_creation() {
        let owner_id = Uuid::now_v7();
        let org = Organization::new("Acme Corp", "acme-corp", owner_id);

        assert_eq!(org.slug, "acme-corp");
        assert_eq!(org.owner_id, owner_id);
    }

    #[test]
    fn test_subject_carries_owner() {
        let owner_id = Uuid::now_v7();
        let org = Organization::new("Acme Corp", "acme-corp", owner_id);
        let subject = org.subject().unwrap();
        assert_eq!(subject.kind(), SubjectType::Organization);
        assert_eq!(subject.owner_id(), Some(owner_id.to_string().as_str()));
    }

    #[test]
    fn test_update_applies_only_set_fields() {
        let mut org = Organization::new("Acme Corp", "acme-corp", Uuid::now_v7());
        let update = OrganizationUpdate {
            name: Some("Acme Inc".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
        update.apply_to(&mut org);

        assert_eq!(org.name, "Acme Inc");
        assert_eq!(org.slug, "acme-corp");
        assert!(OrganizationUpdate::default().is_empty());
    }
}
