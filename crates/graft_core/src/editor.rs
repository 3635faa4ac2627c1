//! Pure rule-list editing operations backing the external editor surface.

use std::collections::BTreeSet;

use crate::{MatcherMode, Rule};

/// A rule as captured by the editor form or a manifest import, before
/// normalization.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RuleDraft {
    pub name: String,
    pub matcher_mode: MatcherMode,
    pub matcher: String,
    pub script_content: String,
    pub delay_seconds: Option<f64>,
    pub injection_condition: Option<String>,
}

/// Auto-generated display label for a rule saved without a name.
///
/// The numeric suffix is the smallest positive integer not already used by an
/// existing auto-name; the first placeholder carries no number at all.
pub fn placeholder_name(rules: &[Rule]) -> String {
    let used: BTreeSet<u32> = rules
        .iter()
        .filter_map(|rule| unnamed_index(&rule.name))
        .collect();
    let mut index = 1;
    while used.contains(&index) {
        index += 1;
    }
    if index == 1 {
        "(unnamed)".to_string()
    } else {
        format!("(unnamed {index})")
    }
}

/// Parse `(unnamed)` as 1 and `(unnamed N)` as N; anything else is not an
/// auto-name.
fn unnamed_index(name: &str) -> Option<u32> {
    let inner = name.strip_prefix("(unnamed")?.strip_suffix(')')?;
    if inner.is_empty() {
        return Some(1);
    }
    inner.strip_prefix(' ')?.parse().ok()
}

/// Creation-time rule id: time-ordered, with a caller-chosen sequence number
/// to break same-millisecond ties.
pub fn new_rule_id(now_ms: i64, seq: u32) -> String {
    format!("r{now_ms}-{seq:04x}")
}

/// Normalize a draft into a stored rule.
///
/// A blank name takes the auto-generated placeholder, a negative delay means
/// no delay, a blank condition means no condition.
pub fn build_rule(id: String, draft: RuleDraft, existing: &[Rule]) -> Rule {
    let name = draft.name.trim();
    let name = if name.is_empty() {
        placeholder_name(existing)
    } else {
        name.to_string()
    };

    Rule {
        id,
        name,
        matcher_mode: draft.matcher_mode,
        matcher: draft.matcher.trim().to_string(),
        script_content: draft.script_content,
        delay_seconds: draft.delay_seconds.filter(|secs| *secs >= 0.0),
        injection_condition: draft
            .injection_condition
            .map(|snippet| snippet.trim().to_string())
            .filter(|snippet| !snippet.is_empty()),
    }
}

/// Replace the rule with a matching id, or append it if it is new.
pub fn upsert_rule(rules: &mut Vec<Rule>, rule: Rule) {
    match rules.iter_mut().find(|existing| existing.id == rule.id) {
        Some(slot) => *slot = rule,
        None => rules.push(rule),
    }
}

/// Remove the rule with `id`. Returns whether anything was removed.
pub fn delete_rule(rules: &mut Vec<Rule>, id: &str) -> bool {
    let before = rules.len();
    rules.retain(|rule| rule.id != id);
    rules.len() != before
}
