use mixin_core::panel::GraphPanel;
use mixin_core::spec::ProductConfig;
use mixin_core::template::sanitize;
use serde::{Deserialize, Serialize};

/// One Grafana dashboard document: a row of SLI panels per product. Panels
/// arrive fully built from their plugins and are only placed, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub title: String,
    pub uid: String,
    pub timezone: String,
    pub schema_version: u32,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub title: String,
    pub panels: Vec<GraphPanel>,
}

impl Dashboard {
    pub fn for_product(config: &ProductConfig, product: &str, panels: Vec<GraphPanel>) -> Self {
        Self {
            title: format!("{} / {} SLIs", config.display_name, product),
            uid: format!("{}-slis", sanitize(product)),
            timezone: "utc".to_string(),
            schema_version: 16,
            rows: vec![Row {
                title: "Service Level Indicators".to_string(),
                panels,
            }],
        }
    }

    pub fn panel_count(&self) -> usize {
        self.rows.iter().map(|r| r.panels.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ProductConfig {
        ProductConfig {
            product: "monitoring".to_string(),
            display_name: "Monitoring Stack".to_string(),
            alert_channel: "ops".to_string(),
            max_alert_severity: "warning".to_string(),
            grafana_url: "https://grafana.example.com".to_string(),
            alertmanager_url: "https://alertmanager.example.com".to_string(),
            environment: None,
        }
    }

    #[test]
    fn test_dashboard_for_product() {
        let panel = GraphPanel::builder("p").target("vector(1)", "one").build();
        let dashboard = Dashboard::for_product(&config(), "grafana", vec![panel]);

        assert_eq!(dashboard.title, "Monitoring Stack / grafana SLIs");
        assert_eq!(dashboard.uid, "grafana-slis");
        assert_eq!(dashboard.rows.len(), 1);
        assert_eq!(dashboard.panel_count(), 1);
    }

    #[test]
    fn test_dashboard_json_shape() {
        let dashboard = Dashboard::for_product(&config(), "thanos", Vec::new());
        let json = serde_json::to_value(&dashboard).unwrap();

        assert_eq!(json["uid"], "thanos-slis");
        assert_eq!(json["schemaVersion"], 16);
        assert!(json["rows"][0]["panels"].as_array().unwrap().is_empty());
    }
}
