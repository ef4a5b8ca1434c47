//! cert-health - endpoint liveness and TLS certificate health checker

use cert_health::cli::{Cli, Commands};
use cert_health::commands;
use cert_health::config::load_settings;
use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if cli.no_color {
        console::set_colors_enabled(false);
    }

    let settings = load_settings(cli.config.as_deref())?;
    let output = cli.output.as_deref();

    match &cli.command {
        Commands::Inspect(args) => commands::run_inspect(args, &settings, cli.format, output).await,
        Commands::Batch(args) => {
            commands::run_batch_command(args, &settings, cli.format, output).await
        }
        Commands::Probe(args) => commands::run_probe(args, &settings, cli.format).await,
        Commands::Serve(args) => commands::run_serve(args, &settings).await,
        Commands::SystemInfo => commands::run_system_info(&settings, cli.format).await,
    }
}
