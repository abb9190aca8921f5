use super::*;
use crate::error::PermsError;
use crate::predicate::{Predicate, RequestContext};
use crate::registry::PermissionRegistry;
use crate::types::Principal;

use serde_json::json;

type Config = FieldPermissionConfig<Principal, Principal>;
type ConfigSet = FieldPermissionConfigSet<Principal, Principal>;
type P = Predicate<Principal, Principal>;

fn only_anonymous() -> P {
    Predicate::from_fn("only_anonymous", |user: &Principal, _: Option<&Principal>| user.is_anonymous())
}

fn constant(value: bool) -> P {
    Predicate::from_fn("constant", move |_: &Principal, _: Option<&Principal>| value)
}

fn valid_config_set() -> ConfigSet {
    FieldPermissionConfigSet::builder()
        .field(Config::new(["field_a"]).unwrap().with_view(true).with_change(true))
        .field(
            Config::new(["field_b"])
                .unwrap()
                .with_view(only_anonymous())
                .with_change(false),
        )
        .allow_view(["field_c"])
        .allow_change(["field_d"])
        .build()
        .unwrap()
}

fn anonymous() -> RequestContext<Principal> {
    RequestContext::new(Principal::anonymous())
}

fn other_user() -> RequestContext<Principal> {
    RequestContext::new(Principal::new("user:other"))
}

#[test]
fn test_field_config_static() {
    let ctx = anonymous();
    let config = Config::new(["field_a"]).unwrap().with_view(false).with_change(true);

    assert!(!config.can_view(&ctx, None).unwrap());
    assert!(config.can_change(&ctx, None).unwrap());
}

#[test]
fn test_field_config_dynamic() {
    let ctx = anonymous();
    let config = Config::new(["field_a"])
        .unwrap()
        .with_view(constant(true))
        .with_change(constant(false));

    assert!(config.can_view(&ctx, None).unwrap());
    assert!(!config.can_change(&ctx, None).unwrap());
    assert!(config.check(FieldAction::View, &ctx, None).unwrap());
}

#[test]
fn test_field_config_default_denies() {
    let ctx = anonymous();
    let config = Config::new(["field_a"]).unwrap();

    assert!(!config.can_view(&ctx, None).unwrap());
    assert!(!config.can_change(&ctx, None).unwrap());
}

#[test]
fn test_field_config_validation() {
    let empty: [&str; 0] = [];
    assert!(matches!(Config::new(empty), Err(PermsError::InvalidConfig(_))));

    let perm = constant(true);
    assert!(Config::new(["blep"]).is_ok());
    assert!(Config::new(vec!["blep".to_string()]).is_ok());

    let config = Config::new(["blep"])
        .unwrap()
        .with_view(perm.or(&perm))
        .with_change(&perm.and(&perm));
    assert!(!config.rule(FieldAction::View).is_static());
    assert!(config.contains("blep"));
    assert!(!config.contains("blop"));
}

#[test]
fn test_config_set_validation() {
    let empty = ConfigSet::builder().build();
    assert!(matches!(empty, Err(PermsError::InvalidConfig(_))));

    let overlap = ConfigSet::builder()
        .field(Config::new(["field_a"]).unwrap())
        .allow_view(["field_a"])
        .build();
    match overlap {
        Err(PermsError::InvalidConfig(msg)) => assert!(msg.contains("field_a")),
        other => panic!("expected an overlap error, got {:?}", other),
    }

    // Overlap with the change list counts too
    assert!(ConfigSet::builder()
        .field(Config::new(["field_a"]).unwrap())
        .allow_change(["field_a"])
        .build()
        .is_err());

    assert_eq!(ConfigSet::validate_action("view").unwrap(), FieldAction::View);
    assert_eq!(ConfigSet::validate_action("change").unwrap(), FieldAction::Change);
    assert!(matches!(
        ConfigSet::validate_action("blep"),
        Err(PermsError::InvalidAction(_))
    ));
}

#[test]
fn test_permitted_field_names() {
    let config = valid_config_set();
    let anon = anonymous();
    let other = other_user();

    assert_eq!(
        config.get_permitted_field_names(FieldAction::View, &anon, None).unwrap(),
        vec!["field_c", "field_a", "field_b"]
    );
    assert_eq!(
        config.get_permitted_field_names(FieldAction::View, &other, None).unwrap(),
        vec!["field_c", "field_a"]
    );

    assert_eq!(
        config.get_permitted_field_names(FieldAction::Change, &anon, None).unwrap(),
        vec!["field_d", "field_a"]
    );
    assert_eq!(
        config.get_permitted_field_names(FieldAction::Change, &other, None).unwrap(),
        vec!["field_d", "field_a"]
    );
}

#[test]
fn test_is_permitted_field() {
    let config = valid_config_set();
    let anon = anonymous();
    let other = other_user();

    assert!(config.is_permitted_field(FieldAction::View, "field_b", &anon, None).unwrap());
    assert!(config.is_permitted_field(FieldAction::View, "field_c", &anon, None).unwrap());
    assert!(!config.is_permitted_field(FieldAction::View, "field_b", &other, None).unwrap());
    assert!(config.is_permitted_field(FieldAction::View, "field_c", &other, None).unwrap());

    // Static lists are per action
    assert!(!config.is_permitted_field(FieldAction::Change, "field_c", &anon, None).unwrap());

    // Undeclared fields are never permitted
    assert!(!config.is_permitted_field(FieldAction::View, "field_z", &anon, None).unwrap());
    assert!(!config.is_permitted_field(FieldAction::View, "field_z", &other, None).unwrap());
}

#[test]
fn test_duplicates_are_kept() {
    let config = ConfigSet::builder()
        .field(Config::new(["a", "b"]).unwrap().with_view(true))
        .field(Config::new(["b"]).unwrap().with_view(true))
        .build()
        .unwrap();

    let names = config.get_permitted_field_names(FieldAction::View, &anonymous(), None).unwrap();
    assert_eq!(names, vec!["a", "b", "b"]);
    assert_eq!(config.declared_fields(), vec!["a", "b"]);
}

#[test]
fn test_first_config_decides() {
    let config = ConfigSet::builder()
        .field(Config::new(["a"]).unwrap().with_view(false))
        .field(Config::new(["a"]).unwrap().with_view(true))
        .build()
        .unwrap();

    assert!(!config.is_permitted_field(FieldAction::View, "a", &anonymous(), None).unwrap());
}

#[test]
fn test_rule_results_share_request_cache() {
    let perm = only_anonymous();
    let config = ConfigSet::builder()
        .field(Config::new(["a"]).unwrap().with_view(&perm))
        .field(Config::new(["b"]).unwrap().with_view(&perm))
        .build()
        .unwrap();

    let ctx = anonymous();
    config.get_permitted_field_names(FieldAction::View, &ctx, None).unwrap();

    let stats = ctx.cache().stats();
    assert_eq!(stats.entries, 1);
    assert_eq!(stats.hits, 1);
}

fn registry() -> PermissionRegistry<Principal, Principal> {
    let registry = PermissionRegistry::new();
    registry
        .register(&only_anonymous(), Some("tests.only_anonymous"))
        .unwrap();
    registry
}

#[test]
fn test_document_config_set() {
    let registry = registry();
    let document = json!({
        "field_config": [
            {"fields": ["field_a"], "can_view": true, "can_change": true},
            {"fields": ["field_b"], "can_view": "tests.only_anonymous"}
        ],
        "allow_view": ["field_c"],
        "allow_change": ["field_d"]
    });

    let config = ConfigSet::from_value(document, &registry).unwrap();

    assert_eq!(
        config.get_permitted_field_names(FieldAction::View, &anonymous(), None).unwrap(),
        vec!["field_c", "field_a", "field_b"]
    );
    assert_eq!(
        config.get_permitted_field_names(FieldAction::Change, &other_user(), None).unwrap(),
        vec!["field_d", "field_a"]
    );
}

#[test]
fn test_document_validation() {
    let registry = registry();

    let not_a_list = r#"{"field_config": [{"fields": "this is not a list"}]}"#;
    assert!(matches!(
        ConfigSet::from_json_str(not_a_list, &registry),
        Err(PermsError::InvalidConfig(_))
    ));

    let bad_rule = r#"{"field_config": [{"fields": ["blep"], "can_view": 3}]}"#;
    assert!(matches!(
        ConfigSet::from_json_str(bad_rule, &registry),
        Err(PermsError::InvalidConfig(_))
    ));

    let bad_change = r#"{"field_config": [{"fields": ["blep"], "can_change": ["x"]}]}"#;
    assert!(matches!(
        ConfigSet::from_json_str(bad_change, &registry),
        Err(PermsError::InvalidConfig(_))
    ));

    let unknown_label = r#"{"field_config": [{"fields": ["blep"], "can_view": "tests.nope"}]}"#;
    assert!(matches!(
        ConfigSet::from_json_str(unknown_label, &registry),
        Err(PermsError::PermissionNotFound(_))
    ));

    assert!(matches!(
        ConfigSet::from_json_str("{", &registry),
        Err(PermsError::Json(_))
    ));

    assert!(matches!(
        ConfigSet::from_json_str("{}", &registry),
        Err(PermsError::InvalidConfig(_))
    ));
}

#[test]
fn test_document_from_path() {
    let registry = registry();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("field-permissions.json");
    std::fs::write(&path, r#"{"allow_view": ["id"]}"#).unwrap();

    let config = ConfigSet::from_path(&path, &registry).unwrap();
    assert_eq!(config.static_fields(FieldAction::View), ["id".to_string()]);

    let missing = dir.path().join("missing.json");
    assert!(matches!(
        ConfigSet::from_path(&missing, &registry),
        Err(PermsError::Io(_))
    ));
}

#[test]
fn test_action_parsing() {
    assert_eq!("view".parse::<FieldAction>().unwrap(), FieldAction::View);
    assert_eq!(FieldAction::Change.to_string(), "change");
    assert_eq!(serde_json::to_string(&FieldAction::View).unwrap(), "\"view\"");
}
