use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// One declared service-level indicator.
///
/// Field names follow the camelCase convention of the mixin config files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliSpec {
    pub title: String,
    #[serde(default)]
    pub sli_description: String,
    /// Discriminator selecting the metric-library plugin.
    pub metric_type: String,
    /// Label name -> value pattern; values may contain regex alternation.
    #[serde(default)]
    pub selectors: BTreeMap<String, String>,
    /// Threshold in seconds, ratio, or count depending on plugin semantics.
    pub metric_target: f64,
    /// Override for the plugin's default comparison operator.
    #[serde(default)]
    pub comparison: Option<Comparison>,
    /// Only meaningful for latency-shaped metric types.
    #[serde(default)]
    pub latency_percentile: Option<f64>,
    /// Rule evaluation / sampling cadence.
    #[serde(with = "humantime_serde")]
    pub eval_interval: Duration,
    /// SLO observation window.
    #[serde(with = "humantime_serde")]
    pub period: Duration,
    /// Percentage (0-100) of `period` during which the SLI must hold.
    pub slo_target: f64,
    pub sli_type: SliType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SliType {
    Availability,
    Latency,
}

impl fmt::Display for SliType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SliType::Availability => write!(f, "availability"),
            SliType::Latency => write!(f, "latency"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
}

impl Comparison {
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparison::Eq => "==",
            Comparison::Ne => "!=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
            Comparison::Lt => "<",
            Comparison::Le => "<=",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SliSpec {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.is_empty() {
            return Err("title cannot be empty".to_string());
        }

        if self.metric_type.is_empty() {
            return Err("metricType cannot be empty".to_string());
        }

        if !(0.0..=100.0).contains(&self.slo_target) {
            return Err(format!(
                "sloTarget must be within 0-100, got {}",
                self.slo_target
            ));
        }

        if let Some(pct) = self.latency_percentile {
            if !(pct > 0.0 && pct <= 1.0) {
                return Err(format!(
                    "latencyPercentile must be within (0, 1], got {}",
                    pct
                ));
            }
        }

        if self.eval_interval.is_zero() {
            return Err("evalInterval must be > 0".to_string());
        }

        if self.period.is_zero() {
            return Err("period must be > 0".to_string());
        }

        for label in self.selectors.keys() {
            if !is_valid_label_name(label) {
                return Err(format!("invalid selector label name '{}'", label));
            }
        }

        Ok(())
    }

    /// Comparison to apply against `metricTarget`, falling back to the
    /// plugin's default when the spec does not override it.
    pub fn comparison_or(&self, default: Comparison) -> Comparison {
        self.comparison.unwrap_or(default)
    }
}

fn is_valid_label_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Static descriptive metadata threaded through the builder into rule labels
/// and dashboard titles. Opaque to plugins except where the contract passes
/// it in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductConfig {
    pub product: String,
    pub display_name: String,
    /// Alert routing target, emitted as the `channel` rule label.
    pub alert_channel: String,
    pub max_alert_severity: String,
    pub grafana_url: String,
    pub alertmanager_url: String,
    /// When set, added as an `environment` matcher to rule selectors only.
    #[serde(default)]
    pub environment: Option<String>,
}

mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        humantime::parse_duration(&s).map_err(serde::de::Error::custom)
    }
}
