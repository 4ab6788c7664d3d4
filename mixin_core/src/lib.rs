pub mod error;
pub mod libraries;
pub mod panel;
pub mod rules;
pub mod selectors;
pub mod spec;
pub mod template;

pub use error::{MixinError, Result};
pub use libraries::{
    DynMetricLibrary, LibraryRegistry, MetricConfig, MetricLibrary, SliMetadata, TargetMetrics,
};
pub use panel::{GraphPanel, PanelTarget, SeriesOverride};
pub use rules::{AlertingRule, RecordingRule, RuleGroup, RuleGroups, SLI_VALUE};
pub use selectors::{MatchOp, Selector};
pub use spec::{Comparison, ProductConfig, SliSpec, SliType};
