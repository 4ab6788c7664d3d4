use crate::dashboard::Dashboard;
use anyhow::Result;
use std::path::Path;

/// Serializes dashboard documents to Grafana-importable JSON.
pub struct DashboardExporter;

impl DashboardExporter {
    pub fn format(dashboard: &Dashboard) -> Result<String> {
        Ok(serde_json::to_string_pretty(dashboard)?)
    }

    pub async fn export(dashboard: &Dashboard, path: impl AsRef<Path>) -> Result<()> {
        let json = Self::format(dashboard)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}
