//! Metric-name and expression templating shared by every plugin.

use crate::spec::Comparison;
use std::time::Duration;

/// Namespace a derived-metric record name by product and SLI id:
/// `("grafana", "SLI01", "requests:rate") -> "grafana_sli01:requests:rate"`.
///
/// SLI ids are unique only within a product, so both parts go into the name
/// to keep record references unambiguous across the aggregated rule group.
pub fn record_name(product: &str, sli_id: &str, suffix: &str) -> String {
    format!("{}_{}:{}", sanitize(product), sanitize(sli_id), suffix)
}

/// Lowercase and replace anything outside `[a-z0-9_]` with `_`, yielding a
/// valid Prometheus metric-name fragment.
pub fn sanitize(part: &str) -> String {
    part.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// PascalCase one name fragment for alert names: `"my-product" ->
/// "MyProduct"`, `"SLI01" -> "Sli01"`.
pub fn pascal_case(part: &str) -> String {
    let mut out = String::with_capacity(part.len());
    let mut upper_next = true;

    for c in part.chars() {
        if c.is_ascii_alphanumeric() {
            if upper_next {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            upper_next = false;
        } else {
            upper_next = true;
        }
    }

    out
}

/// Format a duration as a PromQL range literal (`1m`, `1m30s`, `2h`, `30d`).
///
/// humantime's formatter emits spaced, worded units (`1m 30s`, `1day`) that
/// PromQL rejects, so it is only used for parsing config files.
pub fn prom_duration(duration: Duration) -> String {
    let mut secs = duration.as_secs();
    if secs == 0 {
        return "0s".to_string();
    }

    const UNITS: [(u64, &str); 4] = [(86400, "d"), (3600, "h"), (60, "m"), (1, "s")];
    let mut out = String::new();

    for (unit_secs, suffix) in UNITS {
        let count = secs / unit_secs;
        if count > 0 {
            out.push_str(&format!("{}{}", count, suffix));
            secs -= count * unit_secs;
        }
    }

    out
}

/// Per-second rate summed across series: `sum(rate(metric{sels}[window]))`.
pub fn sum_rate(metric: &str, selectors: &[crate::selectors::Selector], window: &str) -> String {
    format!(
        "sum(rate({}{}[{}]))",
        metric,
        crate::selectors::selector_block(selectors),
        window
    )
}

/// Ratio with a guarded denominator. `clamp_min(den, 1)` keeps zero-traffic
/// windows defined (ratio 0) instead of surfacing division-by-zero at the
/// query engine.
pub fn ratio_expr(numerator: &str, denominator: &str) -> String {
    format!("{} / clamp_min({}, 1)", numerator, denominator)
}

/// Wrap an expression with the zero-data fallback so quiet windows evaluate
/// to a neutral zero instead of "no data".
pub fn or_vector_zero(expr: &str) -> String {
    format!("({}) or vector(0)", expr)
}

/// Boolean-modifier comparison: `lhs <= bool 15`. Yields a 0/1 series, the
/// shape every `sli_value` rule reduces to.
pub fn bool_compare(lhs: &str, cmp: Comparison, target: f64) -> String {
    format!("{} {} bool {}", lhs, cmp.as_str(), format_number(target))
}

/// Render thresholds without a trailing `.0` so `1.0` appears as `1` in
/// expressions, matching hand-written rules.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
