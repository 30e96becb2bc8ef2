//! # Ability
//!
//! The compiled, immutable rule set for one user's role. Queries scan the
//! rules in declaration order and the last matching rule decides; with no
//! match the answer is deny.

use serde_json::Value;
use std::sync::Arc;

use crate::actions::Action;
use crate::error::AbilityResult;
use crate::resolver::SubjectResolver;
use crate::rules::Rule;
use crate::subjects::{Subject, SubjectRef, SubjectType};

/// Queryable, immutable rule set.
///
/// Build one per authorization context from the caller's resolved role; it
/// is cheap to build and never cached across requests.
#[derive(Debug, Clone)]
pub struct Ability {
    rules: Arc<[Rule]>,
    resolver: Arc<dyn SubjectResolver>,
}

impl Ability {
    pub(crate) fn from_rules(rules: Vec<Rule>, resolver: Arc<dyn SubjectResolver>) -> Self {
        Self {
            rules: rules.into(),
            resolver,
        }
    }

    /// Check whether `action` is allowed on `subject`.
    ///
    /// `subject` is either a bare [`SubjectType`] (class-level check) or a
    /// `&Subject` instance.
    pub fn can<'a>(&self, action: Action, subject: impl Into<SubjectRef<'a>>) -> bool {
        let subject = subject.into();
        let allowed = self
            .relevant_rule(action, subject)
            .map(|rule| rule.effect.allows())
            .unwrap_or(false);

        tracing::trace!(
            action = %action,
            subject = %subject.subject_type(),
            allowed,
            "ability check"
        );
        allowed
    }

    /// Exactly `!can(action, subject)`.
    pub fn cannot<'a>(&self, action: Action, subject: impl Into<SubjectRef<'a>>) -> bool {
        !self.can(action, subject)
    }

    /// The rule deciding `(action, subject)`: the last matching one.
    pub fn relevant_rule<'a>(
        &self,
        action: Action,
        subject: impl Into<SubjectRef<'a>>,
    ) -> Option<&Rule> {
        let subject = subject.into();
        self.rules
            .iter()
            .rev()
            .find(|rule| rule.matches(action, subject))
    }

    /// Rules whose type and action axes apply to `(action, subject_type)`,
    /// conditions not evaluated, in declaration order.
    pub fn rules_for(
        &self,
        action: Action,
        subject_type: SubjectType,
    ) -> impl Iterator<Item = &Rule> + '_ {
        self.rules
            .iter()
            .filter(move |rule| rule.applies_to(action, subject_type))
    }

    /// Type a raw record with the bound subject resolver.
    pub fn resolve(&self, record: Value) -> AbilityResult<Subject> {
        self.resolver.subject_from_record(record)
    }

    /// `can` against a raw record.
    ///
    /// Fails with `TypeMismatch` when the record's discriminant is missing or
    /// unknown; the check must then be treated as failed, not as allowed.
    pub fn try_can(&self, action: Action, record: Value) -> AbilityResult<bool> {
        let subject = self.resolve(record)?;
        Ok(self.can(action, &subject))
    }

    /// `cannot` against a raw record.
    pub fn try_cannot(&self, action: Action, record: Value) -> AbilityResult<bool> {
        self.try_can(action, record).map(|allowed| !allowed)
    }

    /// All rules, in declaration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The resolver bound at build time.
    pub fn resolver(&self) -> &dyn SubjectResolver {
        self.resolver.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{AbilityBuilder, BuildOptions};
    use crate::conditions::Condition;
    use crate::error::AbilityError;
    use crate::rules::Effect;
    use serde_json::json;

    fn build(declare: impl FnOnce(&mut AbilityBuilder)) -> Ability {
        let mut builder = AbilityBuilder::new();
        declare(&mut builder);
        builder.build(BuildOptions::default())
    }

    #[test]
    fn test_empty_ability_denies_everything() {
        let ability = build(|_| {});
        for action in Action::ALL {
            for kind in SubjectType::CONCRETE {
                assert!(!ability.can(action, kind));
                assert!(ability.cannot(action, kind));
            }
        }
    }

    #[test]
    fn test_last_matching_rule_wins() {
        let ability = build(|b| {
            b.can([Action::Update], SubjectType::Project)
                .cannot([Action::Update], SubjectType::Project);
        });
        assert!(ability.cannot(Action::Update, SubjectType::Project));

        let reversed = build(|b| {
            b.cannot([Action::Update], SubjectType::Project)
                .can([Action::Update], SubjectType::Project);
        });
        assert!(reversed.can(Action::Update, SubjectType::Project));
    }

    #[test]
    fn test_non_matching_condition_falls_back_to_earlier_rule() {
        let ability = build(|b| {
            b.cannot([Action::Update], SubjectType::Organization).can_if(
                [Action::Update],
                SubjectType::Organization,
                Condition::owned_by("u1"),
            );
        });

        let own = Subject::owned_by(SubjectType::Organization, "u1").unwrap();
        let other = Subject::owned_by(SubjectType::Organization, "u2").unwrap();
        assert!(ability.can(Action::Update, &own));
        assert!(ability.cannot(Action::Update, &other));
        assert_eq!(
            ability.relevant_rule(Action::Update, &other).map(|r| r.effect),
            Some(Effect::Deny)
        );
    }

    #[test]
    fn test_type_tag_ignores_conditional_rules() {
        let ability = build(|b| {
            b.can_if(
                [Action::Delete],
                SubjectType::Project,
                Condition::owned_by("u1"),
            );
        });
        assert!(ability.cannot(Action::Delete, SubjectType::Project));
        assert!(ability.relevant_rule(Action::Delete, SubjectType::Project).is_none());
    }

    #[test]
    fn test_missing_attribute_skips_rule() {
        let ability = build(|b| {
            b.can([Action::Delete], SubjectType::Project).cannot_if(
                [Action::Delete],
                SubjectType::Project,
                Condition::equals("locked", true),
            );
        });

        // The deny rule reads an absent attribute and is skipped, not applied.
        let unlocked = Subject::owned_by(SubjectType::Project, "u1").unwrap();
        assert!(ability.can(Action::Delete, &unlocked));

        let locked = unlocked.clone().with_attr("locked", true);
        assert!(ability.cannot(Action::Delete, &locked));
    }

    #[test]
    fn test_rules_for_keeps_declaration_order() {
        let ability = build(|b| {
            b.can([Action::Manage], SubjectType::All)
                .can([Action::Get], SubjectType::User)
                .cannot([Action::Update], SubjectType::Organization);
        });
        let effects: Vec<Effect> = ability
            .rules_for(Action::Update, SubjectType::Organization)
            .map(|r| r.effect)
            .collect();
        assert_eq!(effects, vec![Effect::Grant, Effect::Deny]);
    }

    #[test]
    fn test_try_can_with_records() {
        let ability = build(|b| {
            b.can_if(
                [Action::Update],
                SubjectType::Project,
                Condition::owned_by("u1"),
            );
        });

        assert_eq!(
            ability.try_can(Action::Update, json!({"__type": "Project", "ownerId": "u1"})),
            Ok(true)
        );
        assert_eq!(
            ability.try_cannot(Action::Update, json!({"__type": "Project", "ownerId": null})),
            Ok(true)
        );

        let err = ability
            .try_can(Action::Update, json!({"ownerId": "u1"}))
            .unwrap_err();
        assert!(matches!(err, AbilityError::TypeMismatch(_)));
    }

    #[test]
    fn test_ability_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Ability>();
    }
}
