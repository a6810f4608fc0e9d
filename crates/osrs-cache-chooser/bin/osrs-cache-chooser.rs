//! OSRS cache chooser binary entry point.
//!
//! A thin wrapper around the osrs-cache-chooser library that:
//! 1. Parses command-line arguments
//! 2. Initializes logging
//! 3. Builds the archive client
//! 4. Runs one subcommand
//!
//! Listing and acquisition go through the same background tasks a graphical
//! front end would use.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Result, bail};
use osrs_cache_chooser::{
    AcquisitionGate, CacheChooser, ChooserConfig, Command, KeysOutcome, KeysStatus,
    spawn_listing, spawn_selection,
};
use osrs_cache_protocol::{OpenRs2Client, filter_snapshots};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ChooserConfig::from_args();
    let archive = config.archive_config();
    tracing::debug!(
        "archive {} ({}), caches in {}",
        archive.base_url,
        archive.user_agent,
        config.caches_dir.display()
    );

    let client = OpenRs2Client::new(archive)?;
    let chooser = Arc::new(
        CacheChooser::new(Arc::new(client), config.caches_dir.clone()).with_game(config.game),
    );

    match config.command {
        Command::List { filter, limit } => list(chooser, &filter, limit).await,
        Command::Download { snapshot } => {
            let gate = AcquisitionGate::new();
            let handle = spawn_selection(chooser, &gate, snapshot)?;
            match handle.wait().await {
                Ok(report) => {
                    println!("Cache ready: {}", report.destination.display());
                    println!("  files extracted: {}", report.files_extracted);
                    match report.keys {
                        KeysOutcome::Written(count) => println!("  keys: {count} written"),
                        KeysOutcome::NoneAvailable => println!("  keys: none available"),
                        KeysOutcome::Failed(reason) => println!("  keys: failed ({reason})"),
                    }
                    println!(
                        "  params.txt: {}",
                        if report.params_written { "written" } else { "not written" }
                    );
                    Ok(())
                }
                Err(e) => bail!("Failed to download cache: {}", e.user_message()),
            }
        }
        Command::Open { directory } => open(&chooser, &directory).await,
        Command::RecoverKeys { directory } => {
            let outcome = chooser.recover_keys(&directory).await?;
            println!("{}", outcome.describe());
            if outcome.wrote_keys() {
                Ok(())
            } else {
                bail!("keys for {} were not recovered", directory.display())
            }
        }
    }
}

async fn list(chooser: Arc<CacheChooser>, filter: &str, limit: Option<usize>) -> Result<()> {
    let game = chooser.game().to_string();
    let snapshots = match spawn_listing(chooser).wait().await {
        Ok(snapshots) => snapshots,
        Err(e) => bail!("Error loading caches: {}", e.user_message()),
    };

    if snapshots.is_empty() {
        println!("No {game} caches found.");
        return Ok(());
    }

    let shown = filter_snapshots(&snapshots, filter);
    for snapshot in shown.iter().take(limit.unwrap_or(usize::MAX)) {
        println!("{:>6}  {}", snapshot.id, snapshot.display_name());
    }
    Ok(())
}

async fn open(chooser: &CacheChooser, directory: &Path) -> Result<()> {
    let cache = match chooser.open_local_cache(directory).await {
        Ok(cache) => cache,
        Err(e) => bail!("{}", e.user_message()),
    };

    println!("Cache: {}", cache.layout.root().display());
    println!("  revision: {}", cache.revision());
    match &cache.keys_status {
        KeysStatus::Loaded => println!("  keys: {} loaded", cache.keys.len()),
        KeysStatus::Recovered { snapshot_id } => println!(
            "  keys: {} recovered from snapshot {}",
            cache.keys.len(),
            snapshot_id
        ),
        KeysStatus::Unavailable { reason } => println!("  keys: unavailable ({reason})"),
    }
    Ok(())
}
