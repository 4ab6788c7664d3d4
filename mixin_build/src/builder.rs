use crate::alerting;
use crate::dashboard::Dashboard;
use mixin_config::SliSpecsByProduct;
use mixin_core::{
    error::{MixinError, Result},
    libraries::{LibraryRegistry, SliMetadata},
    rules::{AlertingRule, RecordingRule, RuleGroup, RuleGroups, SLI_VALUE},
    spec::ProductConfig,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// The three aggregated output documents of one compile.
#[derive(Debug, Clone, PartialEq)]
pub struct Mixin {
    pub recording_rules: RuleGroups<RecordingRule>,
    pub alerting_rules: RuleGroups<AlertingRule>,
    pub dashboards: BTreeMap<String, Dashboard>,
}

/// Name of the per-product recording rule group inside the aggregate
/// document. Consumers match groups by this name, never by position.
pub fn recording_group_name(product: &str) -> String {
    format!("{}-sli-recording", product)
}

/// Name of the per-product alert rule group.
pub fn alert_group_name(product: &str) -> String {
    format!("{}-slo-alerts", product)
}

/// Folds per-SLI plugin output into the global artifacts. Pure with respect
/// to its inputs; the only mutation is appending into the accumulator it
/// owns, so two runs over the same input produce identical documents.
pub struct MixinBuilder {
    registry: Arc<LibraryRegistry>,
}

impl MixinBuilder {
    pub fn new(registry: LibraryRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(LibraryRegistry::with_defaults())
    }

    pub fn list_metric_types(&self) -> Vec<String> {
        self.registry.list()
    }

    /// Compile every product's SLI map into recording rules, alerting rules,
    /// and dashboards. Any unresolved `metricType` or plugin error fails the
    /// whole build; no partial artifact set is returned.
    pub fn build(&self, config: &ProductConfig, slis: &SliSpecsByProduct) -> Result<Mixin> {
        let mut recording = RuleGroups::new();
        let mut alerting_rules = RuleGroups::new();
        let mut dashboards = BTreeMap::new();

        for (product, specs) in slis {
            let mut recording_group = RuleGroup {
                name: recording_group_name(product),
                interval: None,
                rules: Vec::new(),
            };
            let mut alert_group = RuleGroup {
                name: alert_group_name(product),
                interval: None,
                rules: Vec::new(),
            };
            let mut panels = Vec::new();

            for (sli_id, spec) in specs {
                let library = self.registry.get(&spec.metric_type).ok_or_else(|| {
                    MixinError::UnknownMetricType(spec.metric_type.clone())
                        .for_sli(product, sli_id)
                })?;

                debug!(
                    "Compiling {}/{} with metric type '{}'",
                    product, sli_id, spec.metric_type
                );

                // Resolve metric names up front; an SLI whose series cannot
                // be resolved fails the build before any rule is emitted.
                let metric_config = library
                    .metric_config(spec)
                    .map_err(|e| e.for_sli(product, sli_id))?;
                library
                    .target_metrics(&metric_config, spec)
                    .map_err(|e| e.for_sli(product, sli_id))?;

                let meta = SliMetadata::new(product, sli_id);
                let rules = library
                    .recording_rules(spec, &meta, config)
                    .map_err(|e| e.for_sli(product, sli_id))?;

                match rules.last() {
                    Some(rule) if rule.record == SLI_VALUE => {}
                    _ => {
                        return Err(MixinError::ContractViolation(format!(
                            "metric library '{}' did not end its rule chain with '{}'",
                            spec.metric_type, SLI_VALUE
                        ))
                        .for_sli(product, sli_id));
                    }
                }

                // Stamp traceability labels; plugin-set labels are preserved.
                for mut rule in rules {
                    rule.labels
                        .entry("product".to_string())
                        .or_insert_with(|| product.clone());
                    rule.labels
                        .entry("sli_id".to_string())
                        .or_insert_with(|| sli_id.clone());
                    rule.labels
                        .entry("sli_type".to_string())
                        .or_insert_with(|| spec.sli_type.to_string());
                    recording_group.rules.push(rule);
                }

                alert_group
                    .rules
                    .push(alerting::slo_alert(config, product, sli_id, spec));

                let panel = library
                    .graph_panel(spec)
                    .map_err(|e| e.for_sli(product, sli_id))?;
                panels.push(panel);
            }

            recording.groups.push(recording_group);
            alerting_rules.groups.push(alert_group);
            dashboards.insert(
                product.clone(),
                Dashboard::for_product(config, product, panels),
            );
        }

        info!(
            "Compiled {} products into {} recording groups and {} dashboards",
            slis.len(),
            recording.groups.len(),
            dashboards.len()
        );

        Ok(Mixin {
            recording_rules: recording,
            alerting_rules,
            dashboards,
        })
    }
}

/// One-shot compile with the bundled plugin set.
pub fn build_mixin(config: &ProductConfig, slis: &SliSpecsByProduct) -> Result<Mixin> {
    MixinBuilder::with_defaults().build(config, slis)
}
