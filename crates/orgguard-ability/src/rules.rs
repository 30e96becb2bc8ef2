//! # Rules
//!
//! A rule is one grant or deny entry contributed by a role's permission
//! function. Rules are plain values; their order inside an ability is what
//! gives later rules precedence.

use serde::{Deserialize, Serialize};

use crate::actions::Action;
use crate::conditions::Condition;
use crate::subjects::{SubjectRef, SubjectType};

/// Whether a matching rule allows or forbids the action.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    /// The rule allows the action.
    Grant,
    /// The rule forbids the action.
    Deny,
}

impl Effect {
    /// `true` for `Grant`.
    pub fn allows(&self) -> bool {
        matches!(self, Effect::Grant)
    }
}

/// One `(effect, actions, subject type, condition?)` entry.
///
/// # Example
///
/// ```
/// use orgguard_ability::{Action, Condition, Effect, Rule, Subject, SubjectType};
///
/// let rule = Rule::new(Effect::Grant, [Action::Update], SubjectType::Project)
///     .with_condition(Condition::owned_by("u1"));
///
/// let mine = Subject::owned_by(SubjectType::Project, "u1").unwrap();
/// assert!(rule.matches(Action::Update, (&mine).into()));
/// assert!(!rule.matches(Action::Update, SubjectType::Project.into()));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Grant or deny.
    pub effect: Effect,
    /// Actions this rule applies to. May contain `Manage`.
    pub actions: Vec<Action>,
    /// Subject type this rule applies to. May be `All`.
    pub subject: SubjectType,
    /// Optional attribute predicate narrowing the rule to some instances.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

impl Rule {
    /// Create an unconditional rule.
    pub fn new<I>(effect: Effect, actions: I, subject: SubjectType) -> Self
    where
        I: IntoIterator<Item = Action>,
    {
        let mut collected: Vec<Action> = Vec::new();
        for action in actions {
            if !collected.contains(&action) {
                collected.push(action);
            }
        }

        Self {
            effect,
            actions: collected,
            subject,
            condition: None,
        }
    }

    /// Attach a condition.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Check if this is a deny rule.
    pub fn is_inverted(&self) -> bool {
        self.effect == Effect::Deny
    }

    /// Check if this rule carries a condition.
    pub fn is_conditional(&self) -> bool {
        self.condition.is_some()
    }

    /// Check the type and action axes only, ignoring any condition.
    ///
    /// `All` on the subject axis and `Manage` on the action axis are
    /// wildcards.
    pub fn applies_to(&self, action: Action, subject_type: SubjectType) -> bool {
        self.subject.covers(subject_type) && self.actions.iter().any(|a| a.covers(action))
    }

    /// Full match: type and action axes plus the condition.
    ///
    /// Against a bare type tag only unconditional rules match, since there is
    /// no instance to evaluate the condition on.
    pub fn matches(&self, action: Action, subject: SubjectRef<'_>) -> bool {
        if !self.applies_to(action, subject.subject_type()) {
            return false;
        }

        match (&self.condition, subject.instance()) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(condition), Some(instance)) => condition.matches(instance),
        }
    }
}
