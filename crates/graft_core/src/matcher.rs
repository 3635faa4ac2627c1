use regex::Regex;

use crate::MatcherMode;

/// Compiled test deciding whether an address satisfies a rule's pattern.
///
/// A pattern that fails to compile yields a matcher that rejects every
/// address; compilation never errors past this boundary.
#[derive(Debug, Clone)]
pub struct Matcher {
    regex: Option<Regex>,
}

impl Matcher {
    pub fn compile(pattern: &str, mode: MatcherMode) -> Self {
        if pattern.is_empty() {
            return Self { regex: None };
        }
        let regex = match mode {
            MatcherMode::Regex => Regex::new(pattern).ok(),
            MatcherMode::Wildcard => Regex::new(&wildcard_to_regex(pattern)).ok(),
        };
        Self { regex }
    }

    pub fn test(&self, address: &str) -> bool {
        self.regex.as_ref().is_some_and(|regex| regex.is_match(address))
    }
}

/// Translate a wildcard pattern into an anchored regular expression.
/// `?` matches any single character, `*` any sequence (including empty),
/// everything else is literal.
fn wildcard_to_regex(pattern: &str) -> String {
    let mut expr = String::with_capacity(pattern.len() + 8);
    expr.push('^');
    for ch in pattern.chars() {
        match ch {
            '?' => expr.push('.'),
            '*' => expr.push_str(".*"),
            '.' | '+' | '^' | '$' | '{' | '}' | '(' | ')' | '|' | '[' | ']' | '\\' => {
                expr.push('\\');
                expr.push(ch);
            }
            _ => expr.push(ch),
        }
    }
    expr.push('$');
    expr
}
