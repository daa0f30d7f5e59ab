use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use streamvid_core::{
    bootstrap::{init_session, load_config},
    logging,
    models::AssetHandle,
    service::SessionOutcome,
};

/// Load an HLS asset, wait until it is ready, and play it
#[derive(Debug, Parser)]
#[command(name = "streamvid", version, about)]
struct Cli {
    /// Media URL to play (overrides `player.asset_url`)
    #[arg(env = "STREAMVID_ASSET_URL")]
    url: Option<String>,

    /// Path to a config file
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load configuration
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(url) = cli.url {
        config.player.asset_url = url;
    }

    // 2. Initialize logging
    logging::init_logging(&config.logging)?;
    info!("StreamVid starting...");

    // 3. Build the session for the configured asset
    let asset = AssetHandle::parse(&config.player.asset_url)?;
    let session = init_session(&config);
    info!(asset = %asset, "Starting playback session");

    // 4. Run until playback ends or we are interrupted
    tokio::select! {
        outcome = session.run(asset) => match outcome? {
            SessionOutcome::Played(summary) => {
                info!(progress_reports = summary.progress_reports, "Playback finished");
            }
            SessionOutcome::NotReady(report) => {
                warn!(
                    failures = report.failures.len(),
                    "Asset never became ready; video not started"
                );
            }
        },
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("Interrupted, shutting down");
        }
    }

    Ok(())
}
