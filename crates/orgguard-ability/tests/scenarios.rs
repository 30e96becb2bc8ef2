//! End-to-end checks of the standard role registry against raw subject
//! records, the way a request handler sees them.
//!
//! Records arrive as JSON with a `__type` discriminant and are resolved
//! through the ability's resolver before evaluation.

use orgguard_ability::{
    define_ability_for, AbilityError, AbilityUser, Action, Role, Subject, SubjectType,
};
use serde_json::json;

#[test]
fn admin_transfers_only_owned_organizations() {
    let ability = define_ability_for(&AbilityUser::new("u1", Role::Admin)).unwrap();

    let foreign = json!({"__type": "Organization", "ownerId": "u2"});
    assert!(ability
        .try_cannot(Action::TransferOwnership, foreign.clone())
        .unwrap());
    assert!(ability.try_cannot(Action::Update, foreign.clone()).unwrap());

    let owned = json!({"__type": "Organization", "ownerId": "u1"});
    assert!(!ability
        .try_cannot(Action::TransferOwnership, owned.clone())
        .unwrap());
    assert!(ability.try_can(Action::Update, owned).unwrap());

    // Other organization actions stay covered by `manage all`.
    assert!(ability.try_can(Action::Delete, foreign).unwrap());
}

#[test]
fn wildcard_type_cannot_stand_in_for_an_organization() {
    let ability = define_ability_for(&AbilityUser::new("u1", Role::Admin)).unwrap();

    assert!(matches!(
        Subject::owned_by(SubjectType::All, "u2"),
        Err(AbilityError::TypeMismatch(_))
    ));

    let wildcard = json!({"__type": "all", "ownerId": "u2"});
    assert!(matches!(
        ability.try_can(Action::Update, wildcard),
        Err(AbilityError::TypeMismatch(_))
    ));

    let org = Subject::owned_by(SubjectType::Organization, "u2").unwrap();
    assert!(ability.cannot(Action::Update, &org));
}

#[test]
fn member_cannot_delete_foreign_project() {
    let ability = define_ability_for(&AbilityUser::new("u2", Role::Member)).unwrap();

    let foreign = json!({"__type": "Project", "ownerId": "u9"});
    assert!(ability.try_cannot(Action::Delete, foreign).unwrap());

    let own = json!({"__type": "Project", "ownerId": "u2"});
    assert!(ability.try_can(Action::Delete, own).unwrap());
}

#[test]
fn billing_manages_billing_only() {
    let ability = define_ability_for(&AbilityUser::new("u3", Role::Billing)).unwrap();

    assert!(ability.can(Action::Manage, SubjectType::Billing));
    assert!(ability.can(Action::Export, SubjectType::Billing));
    assert!(!ability.can(Action::Create, SubjectType::Project));
    assert!(!ability.can(Action::Get, SubjectType::User));
}

#[test]
fn records_without_a_valid_discriminant_are_rejected() {
    let ability = define_ability_for(&AbilityUser::new("u1", Role::Admin)).unwrap();

    let untyped = json!({"ownerId": "u1"});
    assert!(matches!(
        ability.try_can(Action::Get, untyped),
        Err(AbilityError::TypeMismatch(_))
    ));

    let unknown = json!({"__type": "Spaceship", "ownerId": "u1"});
    assert!(matches!(
        ability.try_can(Action::Get, unknown),
        Err(AbilityError::TypeMismatch(_))
    ));

    let not_an_object = json!("Organization");
    assert!(ability.try_can(Action::Get, not_an_object).is_err());
}

#[test]
fn string_inputs_parse_into_typed_queries() {
    let ability = define_ability_for(&AbilityUser::new("u3", "BILLING".parse().unwrap())).unwrap();

    let action: Action = "manage".parse().unwrap();
    let subject: SubjectType = "Billing".parse().unwrap();
    assert!(ability.can(action, subject));

    assert!(matches!(
        "fly".parse::<Action>(),
        Err(AbilityError::UnknownAction(_))
    ));
    assert!(matches!(
        "OWNER".parse::<Role>(),
        Err(AbilityError::UnknownRole(_))
    ));
}
