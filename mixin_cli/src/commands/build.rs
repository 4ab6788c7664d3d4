use anyhow::Result;
use colored::Colorize;
use mixin_build::{
    alert_group_name, recording_group_name, DashboardExporter, MixinBuilder, RulesExporter,
};
use mixin_config::parse_mixin_from_file;
use mixin_core::rules::RuleGroups;
use std::path::PathBuf;
use tracing::info;

pub async fn execute(
    config_file: PathBuf,
    output: PathBuf,
    rules_only: bool,
    dashboards_only: bool,
) -> Result<()> {
    println!("{}", "=== SLI Mixin Build ===".bold().cyan());
    println!("Loading config: {}", config_file.display());

    let file = parse_mixin_from_file(&config_file).await?;

    println!("\n{}", "Config Details:".bold());
    println!("  Product: {}", file.config.display_name.green());
    println!("  Products: {}", file.slis.len());
    println!("  SLIs: {}", file.sli_count());

    // Compile everything before touching the filesystem, so a failed build
    // leaves any previous output intact.
    let mixin = MixinBuilder::with_defaults().build(&file.config, &file.slis)?;

    if output.exists() {
        info!("Clearing output directory {}", output.display());
        tokio::fs::remove_dir_all(&output).await?;
    }
    tokio::fs::create_dir_all(&output).await?;

    println!("\n{}", "Writing artifacts...".bold().yellow());

    for (product, dashboard) in &mixin.dashboards {
        let dir = output.join(product);
        tokio::fs::create_dir_all(&dir).await?;

        if !dashboards_only {
            // Rule groups are matched by their product-derived names.
            let recording = RuleGroups {
                groups: mixin
                    .recording_rules
                    .groups
                    .iter()
                    .filter(|g| g.name == recording_group_name(product))
                    .cloned()
                    .collect(),
            };
            let alerts = RuleGroups {
                groups: mixin
                    .alerting_rules
                    .groups
                    .iter()
                    .filter(|g| g.name == alert_group_name(product))
                    .cloned()
                    .collect(),
            };
            RulesExporter::export(&recording, dir.join("recording_rules.yaml")).await?;
            RulesExporter::export(&alerts, dir.join("alerts.yaml")).await?;
        }

        if !rules_only {
            DashboardExporter::export(dashboard, dir.join("dashboard.json")).await?;
        }

        println!(
            "  {} {} ({} panels)",
            "✓".green(),
            product,
            dashboard.panel_count()
        );
    }

    println!(
        "\n{} Artifacts written to {}",
        "✓ Build complete!".green().bold(),
        output.display()
    );

    Ok(())
}
