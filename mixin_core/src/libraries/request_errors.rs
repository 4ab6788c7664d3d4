use super::{panel_description, spec_selectors, MetricConfig, MetricLibrary, SliMetadata, TargetMetrics};
use crate::{
    error::Result,
    panel::GraphPanel,
    rules::{RecordingRule, SLI_VALUE},
    selectors::{merge_selectors, Selector},
    spec::{Comparison, ProductConfig, SliSpec},
    template::{bool_compare, or_vector_zero, prom_duration, ratio_expr, sum_rate},
};

const REQUESTS_METRIC: &str = "http_requests_total";
const ERROR_CODE_LABEL: &str = "code";
const ERROR_CODE_PATTERN: &str = "5..";

/// Request error ratio over `http_requests_total`. The SLI is met when the
/// 5xx fraction compares (default `<=`) against `metricTarget`.
pub struct RequestErrorsLibrary;

impl RequestErrorsLibrary {
    fn error_selectors(&self, base: &[Selector]) -> Vec<Selector> {
        merge_selectors(base, &[Selector::re(ERROR_CODE_LABEL, ERROR_CODE_PATTERN)])
    }
}

impl MetricLibrary for RequestErrorsLibrary {
    fn metric_type(&self) -> &'static str {
        "request-errors"
    }

    fn metric_config(&self, _spec: &SliSpec) -> Result<MetricConfig> {
        let mut config = MetricConfig::single(REQUESTS_METRIC);
        config.secondary_metric = Some(REQUESTS_METRIC.to_string());
        config
            .custom_labels
            .insert("error_code".to_string(), ERROR_CODE_LABEL.to_string());
        Ok(config)
    }

    fn dashboard_selectors(&self, _config: &MetricConfig, spec: &SliSpec) -> Vec<Selector> {
        spec_selectors(spec)
    }

    fn target_metrics(&self, config: &MetricConfig, _spec: &SliSpec) -> Result<TargetMetrics> {
        match &config.secondary_metric {
            Some(total) => Ok(TargetMetrics::ratio(config.primary_metric.clone(), total)),
            None => Ok(TargetMetrics::single(config.primary_metric.clone())),
        }
    }

    fn graph_panel(&self, spec: &SliSpec) -> Result<GraphPanel> {
        let config = self.metric_config(spec)?;
        let targets = self.target_metrics(&config, spec)?;
        let selectors = self.dashboard_selectors(&config, spec);
        let summary = self.selector_summary(&config, spec);
        let window = prom_duration(spec.eval_interval);

        let total_metric = targets.denominator.as_deref().unwrap_or(&targets.numerator);
        let total = sum_rate(total_metric, &selectors, &window);
        let errors = sum_rate(
            &targets.numerator,
            &self.error_selectors(&selectors),
            &window,
        );

        let panel = GraphPanel::builder(&spec.title)
            .description(panel_description(spec, &summary))
            .target(
                ratio_expr(&or_vector_zero(&errors), &or_vector_zero(&total)),
                "error ratio",
            )
            .target(total.clone(), "request rate")
            .override_series("error ratio", Some("#E24D42"), None)
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
        let selectors = self.rule_selectors(&config, spec, product);
        let window = prom_duration(spec.eval_interval);

        let total_metric = targets.denominator.as_deref().unwrap_or(&targets.numerator);
        let total_record = meta.record_name("requests:rate");
        let total_rule = RecordingRule::new(
            &total_record,
            or_vector_zero(&sum_rate(total_metric, &selectors, &window)),
        );

        let errors_record = meta.record_name("errors:rate");
        let errors_rule = RecordingRule::new(
            &errors_record,
            or_vector_zero(&sum_rate(
                &targets.numerator,
                &self.error_selectors(&selectors),
                &window,
            )),
        );

        let compliance = bool_compare(
            &ratio_expr(&errors_record, &total_record),
            spec.comparison_or(Comparison::Le),
            spec.metric_target,
        );
        let sli_rule = RecordingRule::new(SLI_VALUE, or_vector_zero(&compliance));

        Ok(vec![total_rule, errors_rule, sli_rule])
    }
}
