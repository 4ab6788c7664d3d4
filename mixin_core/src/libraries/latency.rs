use super::{panel_description, spec_selectors, MetricConfig, MetricLibrary, SliMetadata, TargetMetrics};
use crate::{
    error::{MixinError, Result},
    panel::GraphPanel,
    rules::{RecordingRule, SLI_VALUE},
    selectors::{selector_block, Selector},
    spec::{Comparison, ProductConfig, SliSpec},
    template::{bool_compare, format_number, or_vector_zero, prom_duration, sum_rate},
};

const BUCKET_METRIC: &str = "http_request_duration_seconds_bucket";
const COUNT_METRIC: &str = "http_request_duration_seconds_count";

/// Request latency percentile over a classic histogram. The SLI is met when
/// the `latencyPercentile` quantile compares (default `<=`) against
/// `metricTarget` seconds. `latencyPercentile` is required.
pub struct RequestLatencyLibrary;

impl RequestLatencyLibrary {
    fn percentile(&self, spec: &SliSpec) -> Result<f64> {
        spec.latency_percentile.ok_or(MixinError::MissingField {
            metric_type: "request-latency",
            field: "latencyPercentile",
        })
    }

    fn quantile_expr(
        &self,
        percentile: f64,
        bucket_metric: &str,
        selectors: &[Selector],
        spec: &SliSpec,
    ) -> String {
        format!(
            "histogram_quantile({}, sum by (le) (rate({}{}[{}])))",
            format_number(percentile),
            bucket_metric,
            selector_block(selectors),
            prom_duration(spec.eval_interval)
        )
    }
}

impl MetricLibrary for RequestLatencyLibrary {
    fn metric_type(&self) -> &'static str {
        "request-latency"
    }

    fn metric_config(&self, spec: &SliSpec) -> Result<MetricConfig> {
        self.percentile(spec)?;

        let mut config = MetricConfig::single(BUCKET_METRIC);
        config.secondary_metric = Some(COUNT_METRIC.to_string());
        Ok(config)
    }

    fn dashboard_selectors(&self, _config: &MetricConfig, spec: &SliSpec) -> Vec<Selector> {
        spec_selectors(spec)
    }

    fn target_metrics(&self, config: &MetricConfig, _spec: &SliSpec) -> Result<TargetMetrics> {
        match &config.secondary_metric {
            Some(count) => Ok(TargetMetrics::ratio(config.primary_metric.clone(), count)),
            None => Ok(TargetMetrics::single(config.primary_metric.clone())),
        }
    }

    fn graph_panel(&self, spec: &SliSpec) -> Result<GraphPanel> {
        let config = self.metric_config(spec)?;
        let targets = self.target_metrics(&config, spec)?;
        let percentile = self.percentile(spec)?;
        let selectors = self.dashboard_selectors(&config, spec);
        let summary = self.selector_summary(&config, spec);
        let window = prom_duration(spec.eval_interval);

        let count_metric = targets.denominator.as_deref().unwrap_or(COUNT_METRIC);
        let legend = format!("p{} latency", format_number(percentile * 100.0));
        let panel = GraphPanel::builder(&spec.title)
            .description(panel_description(spec, &summary))
            .target(
                self.quantile_expr(percentile, &targets.numerator, &selectors, spec),
                &legend,
            )
            .target(sum_rate(count_metric, &selectors, &window), "request rate")
            .override_series("latency", Some("#EAB839"), None)
            .override_series("request rate", None, Some(2))
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
        let percentile = self.percentile(spec)?;
        let selectors = self.rule_selectors(&config, spec, product);

        let quantile_record = meta.record_name("latency:quantile");
        let quantile_rule = RecordingRule::new(
            &quantile_record,
            self.quantile_expr(percentile, &targets.numerator, &selectors, spec),
        );

        let compliance = bool_compare(
            &quantile_record,
            spec.comparison_or(Comparison::Le),
            spec.metric_target,
        );
        let sli_rule = RecordingRule::new(SLI_VALUE, or_vector_zero(&compliance));

        Ok(vec![quantile_rule, sli_rule])
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
        SliSpec {
            title: "Query latency".to_string(),
            sli_description: "p80 query duration".to_string(),
            metric_type: "request-latency".to_string(),
            selectors: BTreeMap::new(),
            metric_target: 15.0,
            comparison: None,
            latency_percentile: Some(0.8),
            eval_interval: Duration::from_secs(60),
            period: Duration::from_secs(30 * 86400),
            slo_target: 99.0,
            sli_type: SliType::Latency,
        }
    }

    #[test]
    fn test_sli_value_references_percentile_window_and_target() {
        let meta = SliMetadata::new("thanos", "SLI03");
        let rules = RequestLatencyLibrary
            .recording_rules(&spec(), &meta, &product())
            .unwrap();

        assert_eq!(rules.len(), 2);
        assert_eq!(
            rules[0].expr,
            "histogram_quantile(0.8, sum by (le) (rate(http_request_duration_seconds_bucket[1m])))"
        );
        assert_eq!(rules[1].record, SLI_VALUE);
        assert_eq!(
            rules[1].expr,
            "(thanos_sli03:latency:quantile <= bool 15) or vector(0)"
        );
    }

    #[test]
    fn test_missing_percentile_is_configuration_error() {
        let mut spec = spec();
        spec.latency_percentile = None;

        let err = RequestLatencyLibrary.metric_config(&spec).unwrap_err();

        assert!(matches!(
            err,
            MixinError::MissingField {
                field: "latencyPercentile",
                ..
            }
        ));
    }

    #[test]
    fn test_target_metrics_pair_bucket_and_count() {
        let spec = spec();
        let config = RequestLatencyLibrary.metric_config(&spec).unwrap();
        let targets = RequestLatencyLibrary.target_metrics(&config, &spec).unwrap();

        assert_eq!(targets.numerator, BUCKET_METRIC);
        assert_eq!(targets.denominator.as_deref(), Some(COUNT_METRIC));

        let rules = RequestLatencyLibrary
            .recording_rules(&spec, &SliMetadata::new("thanos", "SLI03"), &product())
            .unwrap();
        assert!(rules[0].expr.contains(BUCKET_METRIC));
    }

    #[test]
    fn test_panel_legend_names_percentile() {
        let panel = RequestLatencyLibrary.graph_panel(&spec()).unwrap();

        assert_eq!(panel.targets[0].legend_format, "p80 latency");
    }
}
