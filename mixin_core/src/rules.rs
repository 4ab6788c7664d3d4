use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Canonical record name every plugin's rule chain culminates in: a 0/1
/// compliance signal the plugin-agnostic alert template consumes. Series are
/// distinguished by the `product`/`sli_id` labels the builder stamps on.
pub const SLI_VALUE: &str = "sli_value";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingRule {
    pub record: String,
    pub expr: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

impl RecordingRule {
    pub fn new(record: impl Into<String>, expr: impl Into<String>) -> Self {
        Self {
            record: record.into(),
            expr: expr.into(),
            labels: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertingRule {
    pub alert: String,
    pub expr: String,
    #[serde(rename = "for")]
    pub for_: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

/// Prometheus rule-file document: `groups: [{name, interval?, rules}]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleGroups<R> {
    pub groups: Vec<RuleGroup<R>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleGroup<R> {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    pub rules: Vec<R>,
}

impl<R> RuleGroups<R> {
    pub fn new() -> Self {
        Self { groups: Vec::new() }
    }
}

impl<R> Default for RuleGroups<R> {
    fn default() -> Self {
        Self::new()
    }
}
