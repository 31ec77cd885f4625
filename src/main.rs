use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use flightdeck::config::AppConfig;

#[derive(Parser)]
#[command(
    name = "flightdeck",
    about = "Daily brief and approvals queue generator"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Print both reports to stdout instead of writing files
    #[arg(long)]
    test: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;

    tracing::info!(
        owner = %config.github.owner,
        repo = %config.github.repo,
        test_mode = cli.test,
        "Starting Flightdeck report run"
    );

    flightdeck::run::run(&config, cli.test).await?;

    tracing::info!("Done");

    Ok(())
}
