use std::fs;

use graft_core::{MatcherMode, Rule};
use graft_engine::{generate_rule_id, JsonFileStore, RuleStore, STORAGE_KEY};
use pretty_assertions::assert_eq;

fn sample_rules() -> Vec<Rule> {
    vec![
        Rule {
            id: "r1700000000000-0001".to_string(),
            name: "gated".to_string(),
            matcher_mode: MatcherMode::Wildcard,
            matcher: "https://example.com/*".to_string(),
            script_content: "console.log('hi');".to_string(),
            delay_seconds: Some(2.5),
            injection_condition: Some("!!document.querySelector('main')".to_string()),
        },
        Rule {
            id: "r1700000000000-0002".to_string(),
            name: "(unnamed)".to_string(),
            matcher_mode: MatcherMode::Regex,
            matcher: r"^https://docs\.example\.com/".to_string(),
            script_content: String::new(),
            delay_seconds: None,
            injection_condition: None,
        },
    ]
}

#[test]
fn missing_file_reads_as_the_empty_rule_set() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().join("rules.json"));

    assert_eq!(store.get(), Vec::new());
}

#[test]
fn put_then_get_round_trips_in_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().join("rules.json"));
    let rules = sample_rules();

    store.put(&rules).expect("put ok");
    assert_eq!(store.get(), rules);
}

#[test]
fn stored_format_uses_the_fixed_key_and_camel_case_fields() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rules.json");
    let store = JsonFileStore::new(&path);

    store.put(&sample_rules()).expect("put ok");

    let raw = fs::read_to_string(&path).expect("read raw store");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
    let list = value[STORAGE_KEY].as_array().expect("rule list under key");

    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["matcherMode"], "wildcard");
    assert_eq!(list[0]["scriptContent"], "console.log('hi');");
    assert_eq!(list[0]["delaySeconds"], 2.5);
    assert_eq!(list[0]["injectionCondition"], "!!document.querySelector('main')");
    // Absent optionals are omitted entirely, not stored as null.
    assert!(list[1].get("delaySeconds").is_none());
    assert!(list[1].get("injectionCondition").is_none());
}

#[test]
fn unparseable_storage_degrades_to_the_empty_rule_set() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rules.json");
    fs::write(&path, "not json at all").expect("write garbage");

    let store = JsonFileStore::new(&path);
    assert_eq!(store.get(), Vec::new());
}

#[test]
fn put_replaces_the_previous_list() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().join("rules.json"));
    let rules = sample_rules();

    store.put(&rules).expect("first put");
    store.put(&rules[..1]).expect("second put");

    assert_eq!(store.get(), rules[..1]);
}

#[test]
fn generated_rule_ids_carry_the_creation_prefix() {
    let id = generate_rule_id(3);
    assert!(id.starts_with('r'));
    assert!(id.contains('-'));
    assert_ne!(id, generate_rule_id(4));
}
