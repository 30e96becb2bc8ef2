//! # Conditions
//!
//! Attribute predicates that narrow a rule to matching subject instances.
//! The vocabulary is intentionally tiny: ownership checks need equality,
//! and `Ne`/`In` cover the remaining attribute comparisons.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::subjects::{Subject, OWNER_ID};

/// A predicate over one subject attribute.
///
/// Every variant evaluates to `false` when the attribute is absent on the
/// subject, so a rule carrying it is skipped rather than counted as a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Condition {
    /// `subject[field] == value`
    Eq { field: String, value: Value },
    /// `subject[field] != value`
    Ne { field: String, value: Value },
    /// `subject[field]` is one of `values`
    In { field: String, values: Vec<Value> },
}

impl Condition {
    /// `subject[field] == value`
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Condition::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// `subject[field] != value`
    pub fn not_equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Condition::Ne {
            field: field.into(),
            value: value.into(),
        }
    }

    /// `subject[field]` is one of `values`
    pub fn one_of<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Condition::In {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Ownership check: `ownerId == user_id`.
    ///
    /// # Example
    ///
    /// ```
    /// use orgguard_ability::{Condition, Subject, SubjectType};
    ///
    /// let owned = Condition::owned_by("u1");
    /// assert!(owned.matches(&Subject::owned_by(SubjectType::Project, "u1").unwrap()));
    /// assert!(!owned.matches(&Subject::owned_by(SubjectType::Project, "u2").unwrap()));
    /// ```
    pub fn owned_by(user_id: impl Into<String>) -> Self {
        Condition::equals(OWNER_ID, user_id.into())
    }

    /// The attribute this condition reads.
    pub fn field(&self) -> &str {
        match self {
            Condition::Eq { field, .. } | Condition::Ne { field, .. } | Condition::In { field, .. } => {
                field
            }
        }
    }

    /// Evaluate against a subject instance.
    pub fn matches(&self, subject: &Subject) -> bool {
        let Some(actual) = subject.attribute(self.field()) else {
            return false;
        };

        match self {
            Condition::Eq { value, .. } => actual == value,
            Condition::Ne { value, .. } => actual != value,
            Condition::In { values, .. } => values.contains(actual),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subjects::SubjectType;
    use serde_json::json;

    fn project(owner: Value) -> Subject {
        Subject::new(SubjectType::Project).unwrap().with_attr(OWNER_ID, owner)
    }

    #[test]
    fn test_eq() {
        let cond = Condition::owned_by("u1");
        assert!(cond.matches(&project(json!("u1"))));
        assert!(!cond.matches(&project(json!("u2"))));
        assert!(!cond.matches(&project(Value::Null)));
    }

    #[test]
    fn test_absent_attribute_never_matches() {
        let bare = Subject::new(SubjectType::Project).unwrap();
        assert!(!Condition::owned_by("u1").matches(&bare));
        assert!(!Condition::not_equals(OWNER_ID, "u1").matches(&bare));
        assert!(!Condition::one_of(OWNER_ID, ["u1"]).matches(&bare));
    }

    #[test]
    fn test_ne() {
        let cond = Condition::not_equals("status", "archived");
        let active = Subject::new(SubjectType::Project).unwrap().with_attr("status", "active");
        let archived = Subject::new(SubjectType::Project).unwrap().with_attr("status", "archived");
        assert!(cond.matches(&active));
        assert!(!cond.matches(&archived));
    }

    #[test]
    fn test_in() {
        let cond = Condition::one_of(OWNER_ID, ["u1", "u2"]);
        assert!(cond.matches(&project(json!("u2"))));
        assert!(!cond.matches(&project(json!("u3"))));
    }

    #[test]
    fn test_serde_shape() {
        let value = serde_json::to_value(Condition::owned_by("u1")).unwrap();
        assert_eq!(value, json!({"op": "eq", "field": "ownerId", "value": "u1"}));
    }
}
