use anyhow::Result;
use mixin_core::rules::RuleGroups;
use serde::Serialize;
use std::path::Path;

/// Serializes rule-group documents to Prometheus rule-file YAML.
pub struct RulesExporter;

impl RulesExporter {
    pub fn format<R: Serialize>(groups: &RuleGroups<R>) -> Result<String> {
        Ok(serde_yaml::to_string(groups)?)
    }

    pub async fn export<R: Serialize>(
        groups: &RuleGroups<R>,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let yaml = Self::format(groups)?;
        tokio::fs::write(path, yaml).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mixin_core::rules::{RecordingRule, RuleGroup};

    #[test]
    fn test_format_is_valid_rule_file_yaml() {
        let groups = RuleGroups {
            groups: vec![RuleGroup {
                name: "grafana-sli-recording".to_string(),
                interval: None,
                rules: vec![RecordingRule::new("sli_value", "vector(1)")],
            }],
        };

        let yaml = RulesExporter::format(&groups).unwrap();

        assert!(yaml.contains("groups:"));
        assert!(yaml.contains("name: grafana-sli-recording"));
        assert!(yaml.contains("record: sli_value"));

        // Round-trips through the same document type.
        let parsed: RuleGroups<RecordingRule> = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, groups);
    }
}
