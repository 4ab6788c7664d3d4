use anyhow::Result;
use colored::Colorize;
use mixin_build::MixinBuilder;

pub async fn execute() -> Result<()> {
    println!("{}", "=== Registered Metric Types ===".bold().cyan());

    let builder = MixinBuilder::with_defaults();
    let types = builder.list_metric_types();

    println!("\nTotal metric types: {}\n", types.len());

    for metric_type in types {
        println!("  {} {}", "•".green(), metric_type);
    }

    println!(
        "\n{}",
        "Use 'mixin build' to compile a config against these types".yellow()
    );

    Ok(())
}
