use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::matcher::Matcher;

/// How a rule's matcher pattern is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatcherMode {
    #[default]
    Wildcard,
    Regex,
}

/// Stored configuration describing when and what to inject.
///
/// Field names serialize camelCase to match the persisted rule format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Opaque unique id, assigned at creation, immutable.
    pub id: String,
    /// Display label; blank names are replaced by the editor at save time.
    pub name: String,
    #[serde(default)]
    pub matcher_mode: MatcherMode,
    #[serde(default)]
    pub matcher: String,
    /// Source text to inject; may be empty (no-op).
    #[serde(default)]
    pub script_content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub injection_condition: Option<String>,
}

impl Rule {
    /// Compile this rule's pattern into an address test.
    pub fn compiled_matcher(&self) -> Matcher {
        Matcher::compile(&self.matcher, self.matcher_mode)
    }

    /// Effective delay: absent, non-positive, or unrepresentable means no
    /// delay.
    pub fn effective_delay(&self) -> Option<Duration> {
        self.delay_seconds
            .filter(|secs| secs.is_finite() && *secs > 0.0)
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }

    /// Effective condition snippet: absent or blank means no condition.
    pub fn effective_condition(&self) -> Option<&str> {
        self.injection_condition
            .as_deref()
            .map(str::trim)
            .filter(|snippet| !snippet.is_empty())
    }
}
