use regex::Regex;

use super::{PathMatch, Policy, PolicyError};

#[test]
fn default_policy_is_empty() {
    let policy = Policy::new();

    assert_eq!(policy.path_match, None);
    assert!(!policy.require_absolute);
    assert!(!policy.require_ssl);
    assert!(policy.whitelist.is_empty());
    assert!(policy.subdomains.is_empty());
    assert_eq!(policy.validate(), Ok(()));
}

#[test]
fn builder_sets_every_option() {
    let policy = Policy::new()
        .with_path_match(Regex::new(r"\A/admin/").unwrap())
        .require_absolute(true)
        .require_ssl(true)
        .with_whitelist(["abc.com", "def.com"])
        .with_subdomains([".ghi.com"]);

    assert_eq!(
        policy.path_match.as_ref().map(PathMatch::as_str),
        Some(r"\A/admin/")
    );
    assert!(policy.require_absolute);
    assert!(policy.require_ssl);
    assert_eq!(policy.whitelist, vec!["abc.com", "def.com"]);
    assert_eq!(policy.subdomains, vec![".ghi.com"]);
}

#[test]
fn subdomains_must_start_with_a_dot() {
    let policy = Policy::new().with_subdomains([".test.com", "test.com"]);

    assert_eq!(
        policy.validate(),
        Err(PolicyError::InvalidSubdomain("test.com".to_owned()))
    );

    let policy = Policy::new().with_subdomains([""]);
    assert_eq!(
        policy.validate(),
        Err(PolicyError::InvalidSubdomain(String::new()))
    );
}

#[test]
fn deserialize_full_policy() {
    let policy: Policy = serde_json::from_str(
        r#"{
            "path_match": "^/admin/",
            "require_absolute": true,
            "require_ssl": true,
            "whitelist": ["test.com"],
            "subdomains": [".test.com"]
        }"#,
    )
    .unwrap();

    assert_eq!(
        policy,
        Policy::new()
            .with_path_match(Regex::new("^/admin/").unwrap())
            .require_absolute(true)
            .require_ssl(true)
            .with_whitelist(["test.com"])
            .with_subdomains([".test.com"])
    );
}

#[test]
fn deserialize_missing_fields_uses_defaults() {
    let policy: Policy = serde_json::from_str(r#"{ "whitelist": ["test.com"] }"#).unwrap();

    assert_eq!(policy, Policy::new().with_whitelist(["test.com"]));
}

#[test]
fn deserialize_rejects_bad_input() {
    // unbalanced group
    let error = serde_json::from_str::<Policy>(r#"{ "path_match": "(" }"#).unwrap_err();
    assert!(error.to_string().contains("invalid path_match pattern"));

    assert!(serde_json::from_str::<Policy>(r#"{ "white_list": [] }"#).is_err());
}

#[test]
fn serialize_keeps_pattern_source() {
    let policy = Policy::new().with_path_match(Regex::new(r"a.b.c").unwrap());

    let json = serde_json::to_value(&policy).unwrap();

    assert_eq!(json["path_match"], "a.b.c");
    assert_eq!(serde_json::from_value::<Policy>(json).unwrap(), policy);
}
