use mixin_core::spec::{ProductConfig, SliSpec};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Product name -> (SLI id -> spec). BTreeMaps keep iteration deterministic
/// so rebuilds of an unchanged config are byte-identical.
pub type SliSpecsByProduct = BTreeMap<String, BTreeMap<String, SliSpec>>;

/// The parsed mixin configuration file: one product-config record plus the
/// per-product SLI spec maps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MixinFile {
    pub config: ProductConfig,
    pub slis: SliSpecsByProduct,
}

impl MixinFile {
    pub fn validate(&self) -> Result<(), String> {
        if self.config.product.is_empty() {
            return Err("config.product cannot be empty".to_string());
        }

        if self.slis.is_empty() {
            return Err("at least one product with SLIs is required".to_string());
        }

        for (product, slis) in &self.slis {
            if slis.is_empty() {
                return Err(format!("product '{}' has no SLIs", product));
            }

            for (sli_id, spec) in slis {
                spec.validate()
                    .map_err(|e| format!("{}/{}: {}", product, sli_id, e))?;
            }
        }

        Ok(())
    }

    pub fn sli_count(&self) -> usize {
        self.slis.values().map(|m| m.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MixinFile {
        serde_yaml::from_str(
            r#"
config:
  product: "monitoring"
  displayName: "Monitoring Stack"
  alertChannel: "ops-pager"
  maxAlertSeverity: "warning"
  grafanaUrl: "https://grafana.example.com"
  alertmanagerUrl: "https://alertmanager.example.com"
slis:
  prometheus:
    SLI01:
      title: "Prometheus is up"
      metricType: "up"
      metricTarget: 1
      comparison: "=="
      evalInterval: 5m
      period: 30d
      sloTarget: 99.9
      sliType: availability
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_validate_sample() {
        assert!(sample().validate().is_ok());
        assert_eq!(sample().sli_count(), 1);
    }

    #[test]
    fn test_validate_names_offending_sli() {
        let mut file = sample();
        file.slis
            .get_mut("prometheus")
            .unwrap()
            .get_mut("SLI01")
            .unwrap()
            .slo_target = 250.0;

        let err = file.validate().unwrap_err();

        assert!(err.starts_with("prometheus/SLI01:"));
    }

    #[test]
    fn test_validate_rejects_empty_product() {
        let mut file = sample();
        file.slis.insert("thanos".to_string(), BTreeMap::new());

        assert!(file.validate().unwrap_err().contains("thanos"));
    }
}
