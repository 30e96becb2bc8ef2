//! # Subject resolution
//!
//! Records reaching the engine are plain data rebuilt from persistence, so
//! their type is read from an explicit discriminant field. Type is never
//! inferred from the record's shape.

use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;

use crate::error::{AbilityError, AbilityResult};
use crate::subjects::{Subject, SubjectType, DISCRIMINANT_FIELD};

/// Extracts the subject type from a raw record.
///
/// Implementations must fail with [`AbilityError::TypeMismatch`] rather than
/// guess when the discriminant is missing or unrecognized.
pub trait SubjectResolver: fmt::Debug + Send + Sync {
    /// Resolve the subject type of `record`.
    fn resolve(&self, record: &Map<String, Value>) -> AbilityResult<SubjectType>;

    /// The field this resolver reads, stripped from resolved subjects.
    fn discriminant_field(&self) -> &str;

    /// Turn a raw JSON record into a typed [`Subject`].
    fn subject_from_record(&self, record: Value) -> AbilityResult<Subject> {
        let mut attributes = match record {
            Value::Object(map) => map,
            other => {
                return Err(AbilityError::TypeMismatch(format!(
                    "subject record must be an object, got {}",
                    json_kind(&other)
                )))
            }
        };
        let kind = self.resolve(&attributes)?;
        attributes.remove(self.discriminant_field());
        Ok(Subject::from_parts(kind, attributes))
    }
}

/// Resolver reading a string discriminant field (`__type` by default).
///
/// # Example
///
/// ```
/// use orgguard_ability::{DiscriminantResolver, SubjectResolver, SubjectType};
/// use serde_json::json;
///
/// let resolver = DiscriminantResolver::default();
/// let subject = resolver
///     .subject_from_record(json!({"__type": "Project", "ownerId": "u1"}))
///     .unwrap();
/// assert_eq!(subject.kind(), SubjectType::Project);
/// assert_eq!(subject.owner_id(), Some("u1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscriminantResolver {
    field: Cow<'static, str>,
}

impl DiscriminantResolver {
    /// Create a resolver reading `field`.
    pub fn new(field: impl Into<Cow<'static, str>>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// The field this resolver reads.
    pub fn field(&self) -> &str {
        &self.field
    }
}

impl Default for DiscriminantResolver {
    fn default() -> Self {
        Self::new(DISCRIMINANT_FIELD)
    }
}

impl SubjectResolver for DiscriminantResolver {
    fn resolve(&self, record: &Map<String, Value>) -> AbilityResult<SubjectType> {
        let raw = match record.get(self.field()) {
            Some(Value::String(raw)) => raw,
            Some(other) => {
                return Err(AbilityError::TypeMismatch(format!(
                    "discriminant '{}' must be a string, got {}",
                    self.field(),
                    json_kind(other)
                )))
            }
            None => {
                return Err(AbilityError::TypeMismatch(format!(
                    "subject record has no '{}' discriminant",
                    self.field()
                )))
            }
        };

        match SubjectType::parse(raw) {
            Some(SubjectType::All) => Err(AbilityError::TypeMismatch(
                "'all' is not a concrete subject type".to_string(),
            )),
            Some(kind) => Ok(kind),
            None => Err(AbilityError::TypeMismatch(format!(
                "unrecognized subject type '{}'",
                raw
            ))),
        }
    }

    fn discriminant_field(&self) -> &str {
        self.field()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
