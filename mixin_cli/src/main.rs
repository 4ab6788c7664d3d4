mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber;

#[derive(Parser)]
#[command(name = "mixin")]
#[command(about = "Compiles declarative SLI specs into Prometheus rules and Grafana dashboards", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable quiet mode (errors only)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a mixin config into rule and dashboard artifacts
    Build {
        /// Path to mixin config file (YAML, TOML, or JSON)
        config_file: PathBuf,

        /// Output directory; cleared before writing
        #[arg(short, long, default_value = "out")]
        output: PathBuf,

        /// Only write recording/alerting rule files
        #[arg(long, conflicts_with = "dashboards_only")]
        rules_only: bool,

        /// Only write dashboard files
        #[arg(long)]
        dashboards_only: bool,
    },

    /// Validate a mixin config file
    Validate {
        /// Path to mixin config file
        config_file: PathBuf,
    },

    /// List registered metric types
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Build {
            config_file,
            output,
            rules_only,
            dashboards_only,
        } => {
            commands::build::execute(config_file, output, rules_only, dashboards_only).await?;
        }

        Commands::Validate { config_file } => {
            commands::validate::execute(config_file).await?;
        }

        Commands::List => {
            commands::list::execute().await?;
        }
    }

    Ok(())
}
