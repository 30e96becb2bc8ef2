//! # Subjects
//!
//! Subject types are the closed set of tags rules are declared against.
//! A [`Subject`] is a transient, typed record rebuilt from a persisted entity
//! for the duration of one authorization check: it always carries its
//! discriminant plus whatever attributes the role conditions read.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::{AbilityError, AbilityResult};

/// Attribute holding the owning user's id.
pub const OWNER_ID: &str = "ownerId";

/// Default field carrying the subject type on raw records.
pub const DISCRIMINANT_FIELD: &str = "__type";

/// Subject types that rules can be declared for.
///
/// `All` is the wildcard: a rule declared on `All` matches any subject type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SubjectType {
    /// A platform user.
    User,
    /// A project inside an organization.
    Project,
    /// An organization (tenant).
    Organization,
    /// A pending invitation to join an organization.
    Invite,
    /// The billing account of an organization.
    Billing,
    /// Wildcard subject type.
    #[serde(rename = "all")]
    All,
}

impl SubjectType {
    /// Every concrete subject type, excluding the `All` wildcard.
    pub const CONCRETE: [SubjectType; 5] = [
        SubjectType::User,
        SubjectType::Project,
        SubjectType::Organization,
        SubjectType::Invite,
        SubjectType::Billing,
    ];

    /// Get the string representation of the subject type.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectType::User => "User",
            SubjectType::Project => "Project",
            SubjectType::Organization => "Organization",
            SubjectType::Invite => "Invite",
            SubjectType::Billing => "Billing",
            SubjectType::All => "all",
        }
    }

    /// Parse subject type from string representation.
    ///
    /// # Example
    ///
    /// ```
    /// use orgguard_ability::SubjectType;
    ///
    /// assert_eq!(SubjectType::parse("Project"), Some(SubjectType::Project));
    /// assert_eq!(SubjectType::parse("organization"), Some(SubjectType::Organization));
    /// assert_eq!(SubjectType::parse("all"), Some(SubjectType::All));
    /// assert_eq!(SubjectType::parse("Document"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "user" => Some(SubjectType::User),
            "project" => Some(SubjectType::Project),
            "organization" => Some(SubjectType::Organization),
            "invite" => Some(SubjectType::Invite),
            "billing" => Some(SubjectType::Billing),
            "all" => Some(SubjectType::All),
            _ => None,
        }
    }

    /// Check if this is the `all` wildcard.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, SubjectType::All)
    }

    /// Check if a rule declared on this type applies to a subject of `other`.
    pub fn covers(&self, other: SubjectType) -> bool {
        self.is_wildcard() || *self == other
    }
}

impl fmt::Display for SubjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubjectType {
    type Err = AbilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SubjectType::parse(s).ok_or_else(|| AbilityError::UnknownSubjectType(s.to_string()))
    }
}

/// A concrete subject instance checked against an action.
///
/// # Examples
///
/// ```
/// use orgguard_ability::{Subject, SubjectType};
///
/// let project = Subject::owned_by(SubjectType::Project, "u1").unwrap();
/// assert_eq!(project.kind(), SubjectType::Project);
/// assert_eq!(project.owner_id(), Some("u1"));
///
/// // The wildcard is a rule target, never an instance type.
/// assert!(Subject::new(SubjectType::All).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subject {
    #[serde(rename = "__type")]
    kind: SubjectType,

    #[serde(flatten)]
    attributes: Map<String, Value>,
}

impl Subject {
    /// Create a subject of the given type with no attributes.
    ///
    /// Fails with `TypeMismatch` for [`SubjectType::All`].
    pub fn new(kind: SubjectType) -> AbilityResult<Self> {
        if kind.is_wildcard() {
            return Err(AbilityError::TypeMismatch(format!(
                "'{}' is not a concrete subject type",
                kind
            )));
        }
        Ok(Self {
            kind,
            attributes: Map::new(),
        })
    }

    /// Create a subject carrying an `ownerId` attribute.
    pub fn owned_by(kind: SubjectType, owner_id: impl Into<String>) -> AbilityResult<Self> {
        Ok(Self::new(kind)?.with_attr(OWNER_ID, owner_id.into()))
    }

    /// Build a subject from an already-resolved type and attribute map.
    /// The caller strips the discriminant field from `attributes` first.
    pub(crate) fn from_parts(kind: SubjectType, attributes: Map<String, Value>) -> Self {
        Self { kind, attributes }
    }

    /// Set an attribute.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// The subject's type discriminant.
    pub fn kind(&self) -> SubjectType {
        self.kind
    }

    /// Look up an attribute. Returns `None` when the attribute is absent.
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// All attributes carried by the subject.
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// The `ownerId` attribute as a string, if present and a string.
    pub fn owner_id(&self) -> Option<&str> {
        self.attribute(OWNER_ID).and_then(Value::as_str)
    }
}

/// What an ability check runs against: a bare type tag or an instance.
///
/// A bare type tag is a class-level check ("may this role ever create a
/// project?"); only unconditional rules can match it.
#[derive(Debug, Clone, Copy)]
pub enum SubjectRef<'a> {
    /// Class-level check without an instance.
    Type(SubjectType),
    /// Check against a concrete instance.
    Instance(&'a Subject),
}

impl<'a> SubjectRef<'a> {
    /// The subject type being checked.
    pub fn subject_type(&self) -> SubjectType {
        match self {
            SubjectRef::Type(kind) => *kind,
            SubjectRef::Instance(subject) => subject.kind(),
        }
    }

    /// The instance, if this is not a bare type tag.
    pub fn instance(&self) -> Option<&'a Subject> {
        match self {
            SubjectRef::Type(_) => None,
            SubjectRef::Instance(subject) => Some(subject),
        }
    }
}

impl From<SubjectType> for SubjectRef<'_> {
    fn from(kind: SubjectType) -> Self {
        SubjectRef::Type(kind)
    }
}

impl<'a> From<&'a Subject> for SubjectRef<'a> {
    fn from(subject: &'a Subject) -> Self {
        SubjectRef::Instance(subject)
    }
}
