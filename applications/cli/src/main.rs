/// Cadence - music player queue and library from the terminal
use cadence_catalog_client::CatalogClient;
use cadence_cli::{AppConfig, Command, Session};
use cadence_playback::JsonFileStorage;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Search the catalog and manage your queue and liked songs", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "CADENCE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; logs go to stderr so command output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "cadence=info,cadence_cli=info,cadence_playback=info,cadence_catalog_client=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    config.validate()?;

    tracing::debug!(
        catalog = %config.catalog.base_url,
        state_dir = %config.storage.state_dir.display(),
        "Configuration loaded"
    );

    let client = CatalogClient::new(config.catalog_config())?;
    let storage = JsonFileStorage::new(&config.storage.state_dir);
    let mut session = Session::new(client, storage);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    session.execute(cli.command, &mut out).await?;

    Ok(())
}
