use super::{panel_description, spec_selectors, MetricConfig, MetricLibrary, SliMetadata, TargetMetrics};
use crate::{
    error::Result,
    panel::GraphPanel,
    rules::{RecordingRule, SLI_VALUE},
    selectors::{selector_block, Selector},
    spec::{Comparison, ProductConfig, SliSpec},
    template::{bool_compare, or_vector_zero, prom_duration},
};

/// Scrape-target availability from the `up` meta-series. The SLI is met when
/// the averaged `up` value compares (default `==`) against `metricTarget`.
pub struct UpLibrary;

impl UpLibrary {
    fn averaged_expr(&self, metric: &str, selectors: &[Selector], spec: &SliSpec) -> String {
        format!(
            "avg(avg_over_time({}{}[{}]))",
            metric,
            selector_block(selectors),
            prom_duration(spec.eval_interval)
        )
    }
}

impl MetricLibrary for UpLibrary {
    fn metric_type(&self) -> &'static str {
        "up"
    }

    fn metric_config(&self, _spec: &SliSpec) -> Result<MetricConfig> {
        Ok(MetricConfig::single("up"))
    }

    fn dashboard_selectors(&self, _config: &MetricConfig, spec: &SliSpec) -> Vec<Selector> {
        spec_selectors(spec)
    }

    fn target_metrics(&self, config: &MetricConfig, _spec: &SliSpec) -> Result<TargetMetrics> {
        Ok(TargetMetrics::single(config.primary_metric.clone()))
    }

    fn graph_panel(&self, spec: &SliSpec) -> Result<GraphPanel> {
        let config = self.metric_config(spec)?;
        let targets = self.target_metrics(&config, spec)?;
        let selectors = self.dashboard_selectors(&config, spec);
        let summary = self.selector_summary(&config, spec);
        let window = prom_duration(spec.eval_interval);

        let panel = GraphPanel::builder(&spec.title)
            .description(panel_description(spec, &summary))
            .target(
                self.averaged_expr(&targets.numerator, &selectors, spec),
                "availability",
            )
            .target(
                format!(
                    "avg_over_time({}{}[{}])",
                    targets.numerator,
                    selector_block(&selectors),
                    window
                ),
                "{{instance}}",
            )
            .override_series("availability", Some("#7EB26D"), None)
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

        let avg_record = meta.record_name("up:avg");
        let avg_rule = RecordingRule::new(
            &avg_record,
            self.averaged_expr(&targets.numerator, &selectors, spec),
        );

        let compliance = bool_compare(
            &avg_record,
            spec.comparison_or(Comparison::Eq),
            spec.metric_target,
        );
        let sli_rule = RecordingRule::new(SLI_VALUE, or_vector_zero(&compliance));

        Ok(vec![avg_rule, sli_rule])
    }
}
