use super::{panel_description, spec_selectors, MetricConfig, MetricLibrary, SliMetadata, TargetMetrics};
use crate::{
    error::Result,
    panel::GraphPanel,
    rules::{RecordingRule, SLI_VALUE},
    selectors::{merge_selectors, Selector},
    spec::{Comparison, ProductConfig, SliSpec},
    template::{bool_compare, or_vector_zero, prom_duration, ratio_expr, sum_rate},
};

const SUBMITTED_METRIC: &str = "queue_jobs_submitted_total";
const COMPLETED_METRIC: &str = "queue_jobs_completed_total";
const QUEUE_LABEL: &str = "queue";
const DEAD_LETTER_PATTERN: &str = "dead-letter.*";
const RATIO_SUFFIX: &str = "jobs:completion_ratio";

/// Queue consumption ratio: jobs completed over jobs submitted, with
/// dead-letter queues excluded by selector negation. Introduces a synthetic
/// completion-ratio metric via an intermediate recording rule; the SLI is met
/// when that ratio compares (default `>=`) against `metricTarget`.
pub struct QueueConsumptionLibrary;

impl MetricLibrary for QueueConsumptionLibrary {
    fn metric_type(&self) -> &'static str {
        "queue-consumption"
    }

    fn metric_config(&self, _spec: &SliSpec) -> Result<MetricConfig> {
        let mut config = MetricConfig::single(COMPLETED_METRIC);
        config.secondary_metric = Some(SUBMITTED_METRIC.to_string());
        config.derived_metric = Some(RATIO_SUFFIX.to_string());
        config
            .custom_labels
            .insert("queue".to_string(), QUEUE_LABEL.to_string());
        Ok(config)
    }

    fn dashboard_selectors(&self, _config: &MetricConfig, spec: &SliSpec) -> Vec<Selector> {
        spec_selectors(spec)
    }

    fn target_metrics(&self, config: &MetricConfig, _spec: &SliSpec) -> Result<TargetMetrics> {
        let mut targets = match &config.secondary_metric {
            Some(submitted) => {
                TargetMetrics::ratio(config.primary_metric.clone(), submitted)
            }
            None => TargetMetrics::single(config.primary_metric.clone()),
        };
        targets.exclusions = vec![Selector::not_re(QUEUE_LABEL, DEAD_LETTER_PATTERN)];
        Ok(targets)
    }

    fn graph_panel(&self, spec: &SliSpec) -> Result<GraphPanel> {
        let config = self.metric_config(spec)?;
        let targets = self.target_metrics(&config, spec)?;
        let selectors = merge_selectors(
            &self.dashboard_selectors(&config, spec),
            &targets.exclusions,
        );
        let summary = self.selector_summary(&config, spec);
        let window = prom_duration(spec.eval_interval);

        let submitted_metric = targets.denominator.as_deref().unwrap_or(&targets.numerator);
        let submitted = sum_rate(submitted_metric, &selectors, &window);
        let completed = sum_rate(&targets.numerator, &selectors, &window);

        let panel = GraphPanel::builder(&spec.title)
            .description(panel_description(spec, &summary))
            .target(
                ratio_expr(&or_vector_zero(&completed), &or_vector_zero(&submitted)),
                "completion ratio",
            )
            .target(submitted.clone(), "submitted rate")
            .target(completed, "completed rate")
            .override_series("completion ratio", Some("#6ED0E0"), None)
            .override_series("rate", None, Some(2))
            .build();

        Ok(panel)
    }

    fn recording_rules(
        &self,
        spec: &SliSpec,
        meta: &SliMetadata,
        product: &ProductConfig,
    ) -> Result<Vec<RecordingRule>> {
        let config = self.metric_config(spec)?;
        let targets = self.target_metrics(&config, spec)?;
        let selectors = merge_selectors(
            &self.rule_selectors(&config, spec, product),
            &targets.exclusions,
        );
        let window = prom_duration(spec.eval_interval);

        let submitted_metric = targets.denominator.as_deref().unwrap_or(&targets.numerator);
        let submitted_record = meta.record_name("jobs_submitted:rate");
        let submitted_rule = RecordingRule::new(
            &submitted_record,
            or_vector_zero(&sum_rate(submitted_metric, &selectors, &window)),
        );

        let completed_record = meta.record_name("jobs_completed:rate");
        let completed_rule = RecordingRule::new(
            &completed_record,
            or_vector_zero(&sum_rate(&targets.numerator, &selectors, &window)),
        );

        let ratio_record = meta.record_name(RATIO_SUFFIX);
        let ratio_rule = RecordingRule::new(
            &ratio_record,
            ratio_expr(&completed_record, &submitted_record),
        );

        let compliance = bool_compare(
            &ratio_record,
            spec.comparison_or(Comparison::Ge),
            spec.metric_target,
        );
        let sli_rule = RecordingRule::new(SLI_VALUE, or_vector_zero(&compliance));

        Ok(vec![submitted_rule, completed_rule, ratio_rule, sli_rule])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::SliType;
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn product() -> ProductConfig {
        ProductConfig {
            product: "monitoring".to_string(),
            display_name: "Monitoring".to_string(),
            alert_channel: "ops".to_string(),
            max_alert_severity: "warning".to_string(),
            grafana_url: "https://grafana.example.com".to_string(),
            alertmanager_url: "https://alertmanager.example.com".to_string(),
            environment: None,
        }
    }

    fn spec() -> SliSpec {
        let mut selectors = BTreeMap::new();
        selectors.insert("job".to_string(), "worker".to_string());

        SliSpec {
            title: "Queue consumption".to_string(),
            sli_description: "Jobs completed over jobs submitted".to_string(),
            metric_type: "queue-consumption".to_string(),
            selectors,
            metric_target: 0.95,
            comparison: None,
            latency_percentile: None,
            eval_interval: Duration::from_secs(120),
            period: Duration::from_secs(7 * 86400),
            slo_target: 99.0,
            sli_type: SliType::Availability,
        }
    }

    #[test]
    fn test_derived_metric_chain_in_dependency_order() {
        let meta = SliMetadata::new("grafana", "SLI04");
        let rules = QueueConsumptionLibrary
            .recording_rules(&spec(), &meta, &product())
            .unwrap();

        assert_eq!(rules.len(), 4);
        assert_eq!(
            rules[0].expr,
            "(sum(rate(queue_jobs_submitted_total{job=\"worker\",queue!~\"dead-letter.*\"}[2m]))) or vector(0)"
        );
        assert_eq!(rules[2].record, "grafana_sli04:jobs:completion_ratio");
        assert_eq!(
            rules[2].expr,
            "grafana_sli04:jobs_completed:rate / clamp_min(grafana_sli04:jobs_submitted:rate, 1)"
        );
        assert_eq!(rules[3].record, SLI_VALUE);
        assert_eq!(
            rules[3].expr,
            "(grafana_sli04:jobs:completion_ratio >= bool 0.95) or vector(0)"
        );

        // Dependency order: every referenced record is defined earlier.
        let mut defined: Vec<&str> = Vec::new();
        for rule in &rules {
            for other in &rules {
                if other.record != rule.record && rule.expr.contains(&other.record) {
                    assert!(
                        defined.contains(&other.record.as_str()),
                        "rule '{}' references '{}' before definition",
                        rule.record,
                        other.record
                    );
                }
            }
            defined.push(rule.record.as_str());
        }
    }

    #[test]
    fn test_dead_letter_excluded_by_selector_negation() {
        let spec = spec();
        let config = QueueConsumptionLibrary.metric_config(&spec).unwrap();
        let targets = QueueConsumptionLibrary
            .target_metrics(&config, &spec)
            .unwrap();

        assert_eq!(
            targets.exclusions,
            vec![Selector::not_re("queue", "dead-letter.*")]
        );

        // The negation travels from the resolution into every rate expression.
        let meta = SliMetadata::new("grafana", "SLI04");
        let rules = QueueConsumptionLibrary
            .recording_rules(&spec, &meta, &product())
            .unwrap();
        assert!(rules[0].expr.contains("queue!~\"dead-letter.*\""));
        assert!(rules[1].expr.contains("queue!~\"dead-letter.*\""));

        let panel = QueueConsumptionLibrary.graph_panel(&spec).unwrap();
        for target in &panel.targets {
            assert!(target.expr.contains("queue!~\"dead-letter.*\""));
        }
    }

    #[test]
    fn test_idle_queue_reads_as_zero_not_missing() {
        let meta = SliMetadata::new("grafana", "SLI04");
        let rules = QueueConsumptionLibrary
            .recording_rules(&spec(), &meta, &product())
            .unwrap();

        // Both rate records default to zero, so the ratio record divides
        // defined operands and sli_value itself falls back to zero.
        assert!(rules[0].expr.ends_with("or vector(0)"));
        assert!(rules[1].expr.ends_with("or vector(0)"));
        assert!(rules[3].expr.ends_with("or vector(0)"));
    }

    #[test]
    fn test_metric_config_introduces_derived_metric() {
        let config = QueueConsumptionLibrary.metric_config(&spec()).unwrap();

        assert_eq!(config.derived_metric.as_deref(), Some(RATIO_SUFFIX));
        assert_eq!(config.custom_labels["queue"], QUEUE_LABEL);
    }
}
