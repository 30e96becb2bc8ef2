//! # Ability builder
//!
//! Accumulates rules while a role's permission function runs, then freezes
//! them into an [`Ability`]. `build` consumes the builder, so no rule can be
//! added once the ability exists.

use std::sync::Arc;

use crate::ability::Ability;
use crate::actions::Action;
use crate::conditions::Condition;
use crate::resolver::{DiscriminantResolver, SubjectResolver};
use crate::rules::{Effect, Rule};
use crate::subjects::SubjectType;

/// Options bound into an ability at build time.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Resolver used to type raw subject records.
    pub resolver: Arc<dyn SubjectResolver>,
}

impl BuildOptions {
    /// Use a custom subject resolver.
    pub fn with_resolver(resolver: impl SubjectResolver + 'static) -> Self {
        Self {
            resolver: Arc::new(resolver),
        }
    }
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self::with_resolver(DiscriminantResolver::default())
    }
}

/// Ordered rule accumulator.
///
/// # Example
///
/// ```
/// use orgguard_ability::{AbilityBuilder, Action, BuildOptions, Condition, Subject, SubjectType};
///
/// let mut builder = AbilityBuilder::new();
/// builder
///     .can([Action::Get], SubjectType::Project)
///     .can_if([Action::Update], SubjectType::Project, Condition::owned_by("u1"));
///
/// let ability = builder.build(BuildOptions::default());
/// let theirs = Subject::owned_by(SubjectType::Project, "u2").unwrap();
/// assert!(ability.can(Action::Get, &theirs));
/// assert!(ability.cannot(Action::Update, &theirs));
/// ```
#[derive(Debug, Default)]
pub struct AbilityBuilder {
    rules: Vec<Rule>,
}

impl AbilityBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant `actions` on `subject` unconditionally.
    pub fn can<I>(&mut self, actions: I, subject: SubjectType) -> &mut Self
    where
        I: IntoIterator<Item = Action>,
    {
        self.push(Rule::new(Effect::Grant, actions, subject))
    }

    /// Grant `actions` on instances of `subject` matching `condition`.
    pub fn can_if<I>(&mut self, actions: I, subject: SubjectType, condition: Condition) -> &mut Self
    where
        I: IntoIterator<Item = Action>,
    {
        self.push(Rule::new(Effect::Grant, actions, subject).with_condition(condition))
    }

    /// Deny `actions` on `subject` unconditionally.
    pub fn cannot<I>(&mut self, actions: I, subject: SubjectType) -> &mut Self
    where
        I: IntoIterator<Item = Action>,
    {
        self.push(Rule::new(Effect::Deny, actions, subject))
    }

    /// Deny `actions` on instances of `subject` matching `condition`.
    pub fn cannot_if<I>(
        &mut self,
        actions: I,
        subject: SubjectType,
        condition: Condition,
    ) -> &mut Self
    where
        I: IntoIterator<Item = Action>,
    {
        self.push(Rule::new(Effect::Deny, actions, subject).with_condition(condition))
    }

    /// Append a prebuilt rule.
    pub fn push(&mut self, rule: Rule) -> &mut Self {
        self.rules.push(rule);
        self
    }

    /// Rules declared so far, in declaration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of rules declared so far.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if no rule has been declared.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Freeze the rules into an immutable ability.
    pub fn build(self, options: BuildOptions) -> Ability {
        Ability::from_rules(self.rules, options.resolver)
    }
}
