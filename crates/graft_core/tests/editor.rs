use graft_core::{
    build_rule, delete_rule, new_rule_id, placeholder_name, upsert_rule, MatcherMode, Rule,
    RuleDraft,
};

fn named_rule(id: &str, name: &str) -> Rule {
    Rule {
        id: id.to_string(),
        name: name.to_string(),
        matcher_mode: MatcherMode::Wildcard,
        matcher: "https://example.com/*".to_string(),
        script_content: String::new(),
        delay_seconds: None,
        injection_condition: None,
    }
}

#[test]
fn first_placeholder_carries_no_number() {
    assert_eq!(placeholder_name(&[]), "(unnamed)");
    assert_eq!(placeholder_name(&[named_rule("r1", "my rule")]), "(unnamed)");
}

#[test]
fn placeholder_picks_smallest_unused_suffix() {
    let rules = vec![named_rule("r1", "(unnamed)")];
    assert_eq!(placeholder_name(&rules), "(unnamed 2)");

    let rules = vec![
        named_rule("r1", "(unnamed)"),
        named_rule("r2", "(unnamed 3)"),
    ];
    assert_eq!(placeholder_name(&rules), "(unnamed 2)");

    let rules = vec![
        named_rule("r1", "(unnamed 2)"),
        named_rule("r2", "(unnamed 3)"),
    ];
    assert_eq!(placeholder_name(&rules), "(unnamed)");
}

#[test]
fn placeholder_ignores_near_miss_names() {
    let rules = vec![
        named_rule("r1", "(unnamed2)"),
        named_rule("r2", "(unnamed )"),
        named_rule("r3", "unnamed"),
    ];
    assert_eq!(placeholder_name(&rules), "(unnamed)");
}

#[test]
fn build_rule_fills_blank_name_with_placeholder() {
    let existing = vec![named_rule("r1", "(unnamed)")];
    let rule = build_rule(
        "r2".to_string(),
        RuleDraft {
            name: "   ".to_string(),
            ..RuleDraft::default()
        },
        &existing,
    );
    assert_eq!(rule.name, "(unnamed 2)");
}

#[test]
fn build_rule_normalizes_delay_and_condition() {
    let rule = build_rule(
        "r1".to_string(),
        RuleDraft {
            name: "rule".to_string(),
            matcher: "  https://example.com/*  ".to_string(),
            delay_seconds: Some(-1.0),
            injection_condition: Some("   ".to_string()),
            ..RuleDraft::default()
        },
        &[],
    );
    assert_eq!(rule.matcher, "https://example.com/*");
    assert_eq!(rule.delay_seconds, None);
    assert_eq!(rule.injection_condition, None);

    // Zero is stored as-is; it only becomes "no delay" at scheduling time.
    let rule = build_rule(
        "r2".to_string(),
        RuleDraft {
            name: "rule".to_string(),
            delay_seconds: Some(0.0),
            injection_condition: Some(" window.ready === true ".to_string()),
            ..RuleDraft::default()
        },
        &[],
    );
    assert_eq!(rule.delay_seconds, Some(0.0));
    assert_eq!(rule.effective_delay(), None);
    assert_eq!(
        rule.injection_condition.as_deref(),
        Some("window.ready === true")
    );
}

#[test]
fn upsert_replaces_in_place_and_appends_new() {
    let mut rules = vec![named_rule("r1", "first"), named_rule("r2", "second")];

    upsert_rule(&mut rules, named_rule("r1", "renamed"));
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].name, "renamed");

    upsert_rule(&mut rules, named_rule("r3", "third"));
    assert_eq!(rules.len(), 3);
    assert_eq!(rules[2].id, "r3");
}

#[test]
fn delete_reports_whether_anything_was_removed() {
    let mut rules = vec![named_rule("r1", "first")];
    assert!(delete_rule(&mut rules, "r1"));
    assert!(rules.is_empty());
    assert!(!delete_rule(&mut rules, "r1"));
}

#[test]
fn rule_ids_are_time_ordered_and_distinct_per_sequence() {
    let id = new_rule_id(1_700_000_000_123, 7);
    assert!(id.starts_with("r1700000000123-"));
    assert_ne!(id, new_rule_id(1_700_000_000_123, 8));
}
