pub mod alerting;
pub mod builder;
pub mod dashboard;
pub mod exporters;

pub use builder::{
    alert_group_name, build_mixin, recording_group_name, Mixin, MixinBuilder,
};
pub use dashboard::{Dashboard, Row};
pub use exporters::{DashboardExporter, RulesExporter};
