use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("mixin-cli-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

const VALID_CONFIG: &str = r#"
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
"#;

#[test]
fn test_list_shows_registered_metric_types() {
    Command::cargo_bin("mixin")
        .unwrap()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("up"))
        .stdout(predicate::str::contains("request-latency"));
}

#[test]
fn test_validate_accepts_valid_config() {
    let dir = scratch_dir("validate-ok");
    let config = dir.join("mixin.yaml");
    fs::write(&config, VALID_CONFIG).unwrap();

    Command::cargo_bin("mixin")
        .unwrap()
        .arg("validate")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Config is valid"));
}

#[test]
fn test_validate_rejects_unknown_metric_type() {
    let dir = scratch_dir("validate-bad");
    let config = dir.join("mixin.yaml");
    fs::write(
        &config,
        VALID_CONFIG.replace("metricType: \"up\"", "metricType: \"does-not-exist\""),
    )
    .unwrap();

    Command::cargo_bin("mixin")
        .unwrap()
        .arg("validate")
        .arg(&config)
        .assert()
        .failure()
        .stdout(predicate::str::contains("does-not-exist"));
}

#[test]
fn test_build_writes_per_product_artifacts() {
    let dir = scratch_dir("build");
    let config = dir.join("mixin.yaml");
    fs::write(&config, VALID_CONFIG).unwrap();
    let output = dir.join("out");

    Command::cargo_bin("mixin")
        .unwrap()
        .arg("build")
        .arg(&config)
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let product_dir = output.join("prometheus");
    assert!(product_dir.join("recording_rules.yaml").exists());
    assert!(product_dir.join("alerts.yaml").exists());
    assert!(product_dir.join("dashboard.json").exists());

    let rules = fs::read_to_string(product_dir.join("recording_rules.yaml")).unwrap();
    assert!(rules.contains("record: sli_value"));
    assert!(rules.contains("product: prometheus"));
}

#[test]
fn test_build_pairs_rule_files_with_their_product() {
    let dir = scratch_dir("build-multi");
    let config = dir.join("mixin.yaml");
    let two_products = VALID_CONFIG.to_string()
        + r#"  grafana:
    SLI01:
      title: "Grafana is up"
      metricType: "up"
      metricTarget: 1
      comparison: "=="
      evalInterval: 5m
      period: 30d
      sloTarget: 99.9
      sliType: availability
"#;
    fs::write(&config, two_products).unwrap();
    let output = dir.join("out");

    Command::cargo_bin("mixin")
        .unwrap()
        .arg("build")
        .arg(&config)
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    for product in ["grafana", "prometheus"] {
        let rules =
            fs::read_to_string(output.join(product).join("recording_rules.yaml")).unwrap();
        let alerts = fs::read_to_string(output.join(product).join("alerts.yaml")).unwrap();

        assert!(rules.contains(&format!("name: {}-sli-recording", product)));
        assert!(rules.contains(&format!("product: {}", product)));
        assert!(alerts.contains(&format!("name: {}-slo-alerts", product)));

        let other = if product == "grafana" { "prometheus" } else { "grafana" };
        assert!(!rules.contains(&format!("product: {}", other)));
    }
}

#[test]
fn test_build_fails_with_no_output_on_unknown_type() {
    let dir = scratch_dir("build-bad");
    let config = dir.join("mixin.yaml");
    fs::write(
        &config,
        VALID_CONFIG.replace("metricType: \"up\"", "metricType: \"does-not-exist\""),
    )
    .unwrap();
    let output = dir.join("out");

    Command::cargo_bin("mixin")
        .unwrap()
        .arg("build")
        .arg(&config)
        .arg("--output")
        .arg(&output)
        .assert()
        .failure();

    assert!(!output.exists());
}
