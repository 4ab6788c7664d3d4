use anyhow::Result;
use colored::Colorize;
use mixin_build::MixinBuilder;
use mixin_config::parse_mixin_from_file;
use std::path::PathBuf;

pub async fn execute(config_file: PathBuf) -> Result<()> {
    println!("{}", "=== Validating Mixin Config ===".bold().cyan());
    println!("File: {}", config_file.display());

    let file = match parse_mixin_from_file(&config_file).await {
        Ok(file) => file,
        Err(e) => {
            println!("\n{}", "✗ Config is invalid!".red().bold());
            println!("\nError: {}", e);
            return Err(e);
        }
    };

    let known_types = MixinBuilder::with_defaults().list_metric_types();
    let mut unknown = Vec::new();

    println!("\nConfig Details:");
    println!("  Product: {}", file.config.display_name);
    println!("  Products: {}", file.slis.len());
    println!("  SLIs: {}", file.sli_count());

    for (product, slis) in &file.slis {
        println!("\n  Product: {}", product);
        for (sli_id, spec) in slis {
            println!("    {}: {} ({})", sli_id, spec.title, spec.metric_type);
            if !known_types.contains(&spec.metric_type) {
                unknown.push(format!("{}/{}: {}", product, sli_id, spec.metric_type));
            }
        }
    }

    if !unknown.is_empty() {
        println!("\n{}", "✗ Unknown metric types!".red().bold());
        for entry in &unknown {
            println!("  {}", entry.red());
        }
        return Err(anyhow::anyhow!(
            "{} SLI(s) reference unregistered metric types",
            unknown.len()
        ));
    }

    println!("\n{}", "✓ Config is valid!".green().bold());
    Ok(())
}
