//! Cache acquisition workflow
//!
//! One attempt moves through
//! `Idle -> Listing -> Selecting -> Downloading -> Extracting -> ResolvingKeys
//! -> SynthesizingParams -> Ready`, and can reach `Failed` from any state.
//! Only listing, downloading and extracting can fail an attempt. Key and params
//! problems are logged and reported in the [`AcquisitionReport`] instead.
//!
//! Writes are not coordinated: an interrupted attempt can leave extracted
//! files without keys or params. Each piece can be recreated on its own.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use osrs_cache_protocol::CacheSnapshot;
use osrs_cache_storage::{
    CacheLayout, StorageError, extract_package, persist_keys, write_synthetic_params,
};

use crate::chooser::CacheChooser;
use crate::error::{ChooserError, Result};

/// States of one acquisition attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AcquisitionState {
    Idle,
    Listing,
    Selecting,
    Downloading,
    Extracting,
    ResolvingKeys,
    SynthesizingParams,
    Ready,
    Failed,
}

impl fmt::Display for AcquisitionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Listing => "listing",
            Self::Selecting => "selecting",
            Self::Downloading => "downloading",
            Self::Extracting => "extracting",
            Self::ResolvingKeys => "resolving keys",
            Self::SynthesizingParams => "synthesizing params",
            Self::Ready => "ready",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Which snapshot to acquire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Newest snapshot with a known timestamp
    Latest,
    /// Snapshot with this catalog id
    Id(u32),
}

impl FromStr for Selection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("latest") {
            return Ok(Self::Latest);
        }
        s.parse()
            .map(Self::Id)
            .map_err(|_| format!("expected a snapshot id or 'latest', got '{s}'"))
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str("latest"),
            Self::Id(id) => write!(f, "id {id}"),
        }
    }
}

/// What happened to the snapshot's keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeysOutcome {
    /// This many keys were written to `xteas.json`
    Written(usize),
    /// The archive has no keys for the snapshot; no file was written
    NoneAvailable,
    /// Fetching or writing failed; the message is kept for display
    Failed(String),
}

/// Result of a completed acquisition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquisitionReport {
    pub snapshot_id: u32,
    pub destination: PathBuf,
    pub files_extracted: usize,
    pub keys: KeysOutcome,
    pub params_written: bool,
}

/// State tracker that logs every transition
struct Attempt {
    snapshot: Option<u32>,
    state: AcquisitionState,
}

impl Attempt {
    fn new() -> Self {
        Self {
            snapshot: None,
            state: AcquisitionState::Idle,
        }
    }

    fn advance(&mut self, next: AcquisitionState) {
        tracing::debug!(
            "acquisition of snapshot {}: {} -> {}",
            self.snapshot.map_or_else(|| "?".to_string(), |id| id.to_string()),
            self.state,
            next
        );
        self.state = next;
    }

    fn fail(&mut self, error: impl Into<ChooserError>) -> ChooserError {
        let stage = self.state;
        self.advance(AcquisitionState::Failed);
        ChooserError::at_stage(stage, error)
    }
}

impl CacheChooser {
    /// List the catalog, pick `selection` and acquire it
    pub async fn acquire_selection(&self, selection: Selection) -> Result<AcquisitionReport> {
        let mut attempt = Attempt::new();

        attempt.advance(AcquisitionState::Listing);
        let snapshots = self
            .list_snapshots()
            .await
            .map_err(|e| attempt.fail(e))?;

        attempt.advance(AcquisitionState::Selecting);
        let Some(snapshot) = select(&snapshots, selection) else {
            return Err(attempt.fail(ChooserError::SnapshotNotFound(selection.to_string())));
        };
        attempt.snapshot = Some(snapshot.id);

        self.run(attempt, snapshot).await
    }

    /// Acquire an already selected snapshot
    pub async fn acquire(&self, snapshot: &CacheSnapshot) -> Result<AcquisitionReport> {
        let mut attempt = Attempt::new();
        attempt.snapshot = Some(snapshot.id);
        attempt.advance(AcquisitionState::Selecting);
        self.run(attempt, snapshot).await
    }

    async fn run(
        &self,
        mut attempt: Attempt,
        snapshot: &CacheSnapshot,
    ) -> Result<AcquisitionReport> {
        let layout = self.layout_for(snapshot);
        tracing::info!(
            "downloading cache {} into {}",
            snapshot.date_string().as_deref().unwrap_or("unknown"),
            layout.root().display()
        );

        attempt.advance(AcquisitionState::Downloading);
        let package = self
            .api()
            .fetch_package(&snapshot.scope, snapshot.id)
            .await
            .map_err(|e| attempt.fail(e))?;

        attempt.advance(AcquisitionState::Extracting);
        let files_extracted = match extract_package(package, &layout).await {
            Ok(count) => count,
            Err(e @ StorageError::Download(_)) => {
                attempt.state = AcquisitionState::Downloading;
                return Err(attempt.fail(e));
            }
            Err(e) => return Err(attempt.fail(e)),
        };

        attempt.advance(AcquisitionState::ResolvingKeys);
        let keys = self.resolve_keys(snapshot, &layout).await;

        attempt.advance(AcquisitionState::SynthesizingParams);
        let params = write_synthetic_params(layout.root(), snapshot.primary_build()).await;
        let params_written = match params {
            Ok(written) => written,
            Err(e) => {
                tracing::warn!("could not create params.txt: {}", e);
                false
            }
        };

        attempt.advance(AcquisitionState::Ready);
        tracing::info!("cache {} ready at {}", snapshot.id, layout.root().display());

        Ok(AcquisitionReport {
            snapshot_id: snapshot.id,
            destination: layout.root().to_path_buf(),
            files_extracted,
            keys,
            params_written,
        })
    }

    async fn resolve_keys(&self, snapshot: &CacheSnapshot, layout: &CacheLayout) -> KeysOutcome {
        let keys = match self.api().fetch_keys(&snapshot.scope, snapshot.id).await {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!("could not download cache keys: {}", e);
                return KeysOutcome::Failed(e.to_string());
            }
        };

        if keys.is_empty() {
            tracing::warn!("archive has no keys for snapshot {}", snapshot.id);
            return KeysOutcome::NoneAvailable;
        }

        match persist_keys(layout, &keys).await {
            Ok(()) => KeysOutcome::Written(keys.len()),
            Err(e) => {
                tracing::warn!("could not write cache keys: {}", e);
                KeysOutcome::Failed(e.to_string())
            }
        }
    }
}

/// Pick a snapshot from a list sorted newest first
fn select(snapshots: &[CacheSnapshot], selection: Selection) -> Option<&CacheSnapshot> {
    match selection {
        Selection::Latest => snapshots
            .iter()
            .find(|snapshot| snapshot.timestamp_utc().is_some()),
        Selection::Id(id) => snapshots.iter().find(|snapshot| snapshot.id == id),
    }
}
