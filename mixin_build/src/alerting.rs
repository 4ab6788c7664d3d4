//! Plugin-agnostic alerting-rule derivation.
//!
//! Every plugin's rule chain ends in the 0/1 `sli_value` signal, so one
//! sustained-threshold template covers all metric types: the alert fires when
//! the averaged compliance over `evalInterval`, as a percentage, falls below
//! `sloTarget` and stays there for the full SLO `period`.

use mixin_core::rules::{AlertingRule, SLI_VALUE};
use mixin_core::selectors::{selector_block, Selector};
use mixin_core::spec::{ProductConfig, SliSpec};
use mixin_core::template::{format_number, pascal_case, prom_duration, sanitize};
use std::collections::BTreeMap;

pub fn slo_alert(
    config: &ProductConfig,
    product: &str,
    sli_id: &str,
    spec: &SliSpec,
) -> AlertingRule {
    let matchers = selector_block(&[
        Selector::eq("product", product),
        Selector::eq("sli_id", sli_id),
    ]);
    let expr = format!(
        "100 * avg_over_time({}{}[{}]) < {}",
        SLI_VALUE,
        matchers,
        prom_duration(spec.eval_interval),
        format_number(spec.slo_target)
    );

    let mut labels = BTreeMap::new();
    labels.insert("product".to_string(), product.to_string());
    labels.insert("sli_id".to_string(), sli_id.to_string());
    labels.insert("sli_type".to_string(), spec.sli_type.to_string());
    labels.insert("severity".to_string(), config.max_alert_severity.clone());
    labels.insert("channel".to_string(), config.alert_channel.clone());

    let mut annotations = BTreeMap::new();
    annotations.insert("summary".to_string(), format!("{} SLO breach", spec.title));
    annotations.insert(
        "description".to_string(),
        format!(
            "{} has been below its {}% target for {}. {}",
            spec.title,
            format_number(spec.slo_target),
            prom_duration(spec.period),
            spec.sli_description
        ),
    );
    annotations.insert(
        "dashboard".to_string(),
        format!("{}/d/{}-slis", config.grafana_url, sanitize(product)),
    );

    AlertingRule {
        alert: format!("{}{}SloBreach", pascal_case(product), pascal_case(sli_id)),
        expr,
        for_: prom_duration(spec.period),
        labels,
        annotations,
    }
}
