pub mod json;
pub mod yaml;

pub use json::DashboardExporter;
pub use yaml::RulesExporter;
