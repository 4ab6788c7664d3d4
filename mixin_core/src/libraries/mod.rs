pub mod latency;
pub mod queue;
pub mod request_errors;
pub mod up;

use crate::{
    error::Result,
    panel::GraphPanel,
    rules::RecordingRule,
    selectors::{merge_selectors, Selector},
    spec::{ProductConfig, SliSpec},
    template,
};
use std::collections::BTreeMap;
use std::sync::Arc;

pub use latency::RequestLatencyLibrary;
pub use queue::QueueConsumptionLibrary;
pub use request_errors::RequestErrorsLibrary;
pub use up::UpLibrary;

/// Normalized metric naming a plugin derives from an SLI spec. Computed fresh
/// per invocation, never cached across SLIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricConfig {
    /// Primary series family (numerator, or the single series).
    pub primary_metric: String,
    /// Denominator series family, where the shape has one.
    pub secondary_metric: Option<String>,
    /// Name fragment of a synthetic metric the plugin introduces via a
    /// recording rule; namespaced per product/SLI at rule-emission time.
    pub derived_metric: Option<String>,
    /// Label names used for custom selectors, keyed by role.
    pub custom_labels: BTreeMap<String, String>,
}

impl MetricConfig {
    pub fn single(primary: impl Into<String>) -> Self {
        Self {
            primary_metric: primary.into(),
            secondary_metric: None,
            derived_metric: None,
            custom_labels: BTreeMap::new(),
        }
    }
}

/// Resolved series names feeding an SLI's numerator/denominator. Exclusion
/// logic (e.g. a dead-letter queue) travels with the resolution as selector
/// negations, merged into every expression built over these series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetMetrics {
    pub numerator: String,
    pub denominator: Option<String>,
    pub exclusions: Vec<Selector>,
}

impl TargetMetrics {
    pub fn single(numerator: impl Into<String>) -> Self {
        Self {
            numerator: numerator.into(),
            denominator: None,
            exclusions: Vec::new(),
        }
    }

    pub fn ratio(numerator: impl Into<String>, denominator: impl Into<String>) -> Self {
        Self {
            numerator: numerator.into(),
            denominator: Some(denominator.into()),
            exclusions: Vec::new(),
        }
    }
}

/// Identity of the SLI being compiled, used to namespace generated record
/// names. SLI ids are unique per product only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliMetadata {
    pub product: String,
    pub sli_id: String,
}

impl SliMetadata {
    pub fn new(product: impl Into<String>, sli_id: impl Into<String>) -> Self {
        Self {
            product: product.into(),
            sli_id: sli_id.into(),
        }
    }

    pub fn record_name(&self, suffix: &str) -> String {
        template::record_name(&self.product, &self.sli_id, suffix)
    }
}

/// Capability contract every metric-library plugin implements. All operations
/// are pure functions of their inputs; the builder is polymorphic over this
/// trait and never branches on metric type itself.
pub trait MetricLibrary: Send + Sync {
    /// Registry key matching the spec's `metricType` discriminator.
    fn metric_type(&self) -> &'static str;

    /// Derive normalized metric/label names from static spec fields. Fails
    /// with a configuration error when a required field for this plugin's
    /// shape is absent.
    fn metric_config(&self, spec: &SliSpec) -> Result<MetricConfig>;

    /// Label-matcher clauses used inside dashboard queries, in deterministic
    /// insertion order.
    fn dashboard_selectors(&self, config: &MetricConfig, spec: &SliSpec) -> Vec<Selector>;

    /// Clauses used inside recording/alert rule expressions. Defaults to the
    /// dashboard clauses plus the product environment matcher.
    fn rule_selectors(
        &self,
        config: &MetricConfig,
        spec: &SliSpec,
        product: &ProductConfig,
    ) -> Vec<Selector> {
        let base = self.dashboard_selectors(config, spec);
        match &product.environment {
            Some(env) => merge_selectors(&base, &[Selector::eq("environment", env.clone())]),
            None => base,
        }
    }

    /// Resolved series names feeding the SLI. Panel and rule expressions are
    /// assembled from this resolution, so a failure here fails the build.
    fn target_metrics(&self, config: &MetricConfig, spec: &SliSpec) -> Result<TargetMetrics>;

    /// Human-readable selector summary for panel descriptions. Rendered from
    /// the dashboard clauses so the two can never diverge in label set.
    fn selector_summary(&self, config: &MetricConfig, spec: &SliSpec) -> Vec<String> {
        self.dashboard_selectors(config, spec)
            .iter()
            .map(Selector::describe)
            .collect()
    }

    /// Assemble the SLI's dashboard panel: named targets, alias-keyed display
    /// overrides.
    fn graph_panel(&self, spec: &SliSpec) -> Result<GraphPanel>;

    /// Every supporting recording rule the SLI needs, in dependency order,
    /// culminating in the canonical `sli_value` rule.
    fn recording_rules(
        &self,
        spec: &SliSpec,
        meta: &SliMetadata,
        product: &ProductConfig,
    ) -> Result<Vec<RecordingRule>>;
}

pub type DynMetricLibrary = Arc<dyn MetricLibrary>;

/// Closed registry mapping `metricType` tags to plugins. Registration is
/// explicit at startup; unknown types are an enumerable, fatal error set.
#[derive(Default)]
pub struct LibraryRegistry {
    libraries: std::collections::HashMap<String, DynMetricLibrary>,
}

impl LibraryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, library: DynMetricLibrary) {
        self.libraries
            .insert(library.metric_type().to_string(), library);
    }

    pub fn get(&self, metric_type: &str) -> Option<&DynMetricLibrary> {
        self.libraries.get(metric_type)
    }

    pub fn list(&self) -> Vec<String> {
        let mut types: Vec<String> = self.libraries.keys().cloned().collect();
        types.sort();
        types
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(Arc::new(UpLibrary));
        registry.register(Arc::new(RequestErrorsLibrary));
        registry.register(Arc::new(RequestLatencyLibrary));
        registry.register(Arc::new(QueueConsumptionLibrary));

        registry
    }
}

/// Map the spec's selector map into typed clauses, one per entry.
pub(crate) fn spec_selectors(spec: &SliSpec) -> Vec<Selector> {
    spec.selectors
        .iter()
        .map(|(label, pattern)| Selector::from_pattern(label.clone(), pattern.clone()))
        .collect()
}

/// Shared panel-description text: SLI description followed by the selector
/// summary, so every panel documents what it queries.
pub(crate) fn panel_description(spec: &SliSpec, summary: &[String]) -> String {
    if summary.is_empty() {
        spec.sli_description.clone()
    } else {
        format!("{} Selectors: {}", spec.sli_description, summary.join("; "))
    }
}
