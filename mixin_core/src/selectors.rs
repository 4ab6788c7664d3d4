use serde::{Deserialize, Serialize};
use std::fmt;

/// A single label-match constraint inside a PromQL vector selector.
///
/// Clauses are typed so every plugin produces structurally identical selector
/// syntax; they are rendered to text only at expression-assembly time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selector {
    pub label: String,
    pub op: MatchOp,
    pub pattern: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOp {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "=~")]
    Re,
    #[serde(rename = "!~")]
    NotRe,
}

impl MatchOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchOp::Eq => "=",
            MatchOp::Ne => "!=",
            MatchOp::Re => "=~",
            MatchOp::NotRe => "!~",
        }
    }
}

impl Selector {
    pub fn eq(label: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(label, MatchOp::Eq, pattern)
    }

    pub fn re(label: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(label, MatchOp::Re, pattern)
    }

    pub fn not_re(label: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(label, MatchOp::NotRe, pattern)
    }

    pub fn new(label: impl Into<String>, op: MatchOp, pattern: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            op,
            pattern: pattern.into(),
        }
    }

    /// Build a clause from a spec selector entry, choosing a regex match when
    /// the pattern contains regex metacharacters and an exact match otherwise.
    pub fn from_pattern(label: impl Into<String>, pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let op = if is_regex_pattern(&pattern) {
            MatchOp::Re
        } else {
            MatchOp::Eq
        };
        Self::new(label, op, pattern)
    }

    /// Human-readable rendering used in panel descriptions. Same label and
    /// pattern as the query rendering, different presentation.
    pub fn describe(&self) -> String {
        format!("{} {} \"{}\"", self.label, self.op.as_str(), self.pattern)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}\"{}\"", self.label, self.op.as_str(), self.pattern)
    }
}

fn is_regex_pattern(pattern: &str) -> bool {
    pattern
        .chars()
        .any(|c| matches!(c, '|' | '*' | '+' | '?' | '.' | '(' | ')' | '[' | ']'))
}

/// Render an ordered clause list as a vector-selector block: `{a="x",b=~"y"}`.
/// An empty list renders as the empty string so bare metric names stay bare.
pub fn selector_block(selectors: &[Selector]) -> String {
    if selectors.is_empty() {
        return String::new();
    }

    let clauses: Vec<String> = selectors.iter().map(|s| s.to_string()).collect();
    format!("{{{}}}", clauses.join(","))
}

/// Merge two clause lists keyed by label name. Entries from `extra` replace
/// same-label entries from `base`; first-seen order is preserved so output
/// stays stable across rebuilds.
pub fn merge_selectors(base: &[Selector], extra: &[Selector]) -> Vec<Selector> {
    let mut merged: Vec<Selector> = base.to_vec();

    for sel in extra {
        match merged.iter_mut().find(|m| m.label == sel.label) {
            Some(existing) => *existing = sel.clone(),
            None => merged.push(sel.clone()),
        }
    }

    merged
}
