use serde::{Deserialize, Serialize};

/// One dashboard graph panel, shaped like the Grafana panel JSON the
/// dashboard document embeds. Constructed exclusively by the owning plugin;
/// the builder only places it into a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphPanel {
    pub title: String,
    pub description: String,
    pub datasource: String,
    #[serde(rename = "type")]
    pub panel_type: String,
    pub targets: Vec<PanelTarget>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub series_overrides: Vec<SeriesOverride>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelTarget {
    pub expr: String,
    pub legend_format: String,
}

/// Display override matched by legend-substring alias, never by positional
/// index, so adding or removing targets cannot silently reassign colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesOverride {
    /// Grafana alias regex, e.g. `/error/`, matched against legend names.
    pub alias: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<u8>,
}

impl GraphPanel {
    pub fn builder(title: impl Into<String>) -> GraphPanelBuilder {
        GraphPanelBuilder {
            title: title.into(),
            description: String::new(),
            datasource: "prometheus".to_string(),
            targets: Vec::new(),
            series_overrides: Vec::new(),
        }
    }
}

pub struct GraphPanelBuilder {
    title: String,
    description: String,
    datasource: String,
    targets: Vec<PanelTarget>,
    series_overrides: Vec<SeriesOverride>,
}

impl GraphPanelBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn datasource(mut self, datasource: impl Into<String>) -> Self {
        self.datasource = datasource.into();
        self
    }

    pub fn target(mut self, expr: impl Into<String>, legend: impl Into<String>) -> Self {
        self.targets.push(PanelTarget {
            expr: expr.into(),
            legend_format: legend.into(),
        });
        self
    }

    /// Override series display for legends matching `alias` as a substring.
    pub fn override_series(
        mut self,
        alias: impl Into<String>,
        color: Option<&str>,
        yaxis: Option<u8>,
    ) -> Self {
        self.series_overrides.push(SeriesOverride {
            alias: format!("/{}/", alias.into()),
            color: color.map(str::to_string),
            yaxis,
        });
        self
    }

    pub fn build(self) -> GraphPanel {
        GraphPanel {
            title: self.title,
            description: self.description,
            datasource: self.datasource,
            panel_type: "graph".to_string(),
            targets: self.targets,
            series_overrides: self.series_overrides,
        }
    }
}
