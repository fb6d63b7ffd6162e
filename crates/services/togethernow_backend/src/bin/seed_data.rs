// --- File: crates/services/togethernow_backend/src/bin/seed_data.rs ---
//! Inserts demo events into the configured backend.

use clap::Parser;
use togethernow_backend::{
    connect_services,
    seed::{seed_demo_events, seed_mock_events},
};
use togethernow_common::{logging, TogetherError};
use togethernow_config::{load_config, BackendKind};
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "seed_data", about = "Insert demo events into the TogetherNow database")]
struct Args {
    /// Also write the fixed mock events (mock-1, mock-2, mock-3).
    #[arg(long)]
    with_mock: bool,
}

async fn run(args: &Args) -> Result<(), TogetherError> {
    let config = load_config().map_err(|e| TogetherError::ConfigError(e.to_string()))?;
    let _log_guard = logging::init(&config.logging);

    if config.backend == BackendKind::Local {
        warn!("The local backend keeps data in memory; seeded events vanish on exit");
    }
    let services = connect_services(&config).await?;
    let ids = seed_demo_events(services.store.as_ref()).await?;
    info!("Inserted {} demo events", ids.len());
    if args.with_mock {
        seed_mock_events(services.store.as_ref()).await?;
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    if let Err(e) = run(&args).await {
        error!("Seeding failed: {}", e);
        eprintln!("Seeding failed: {}", e);
        std::process::exit(1);
    }
}
