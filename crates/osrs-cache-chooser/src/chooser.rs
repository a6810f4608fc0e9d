//! Entry point tying the archive client to a caches directory

use std::path::{Path, PathBuf};
use std::sync::Arc;

use osrs_cache_protocol::catalog::OLDSCHOOL_GAME;
use osrs_cache_protocol::{ArchiveApi, CacheSnapshot, filter_game, sort_by_timestamp_desc};
use osrs_cache_storage::CacheLayout;

use crate::error::Result;

/// Snapshot listing, acquisition and key recovery for one game
#[derive(Clone)]
pub struct CacheChooser {
    api: Arc<dyn ArchiveApi>,
    caches_dir: PathBuf,
    game: String,
}

impl CacheChooser {
    /// Chooser for Old School snapshots stored under `caches_dir`
    pub fn new(api: Arc<dyn ArchiveApi>, caches_dir: impl Into<PathBuf>) -> Self {
        Self {
            api,
            caches_dir: caches_dir.into(),
            game: OLDSCHOOL_GAME.to_string(),
        }
    }

    /// Use another game tag when filtering the catalog
    #[must_use]
    pub fn with_game(mut self, game: impl Into<String>) -> Self {
        self.game = game.into();
        self
    }

    pub fn api(&self) -> &dyn ArchiveApi {
        self.api.as_ref()
    }

    pub fn caches_dir(&self) -> &Path {
        &self.caches_dir
    }

    pub fn game(&self) -> &str {
        &self.game
    }

    /// Directory `snapshot` is materialized into
    pub fn layout_for(&self, snapshot: &CacheSnapshot) -> CacheLayout {
        CacheLayout::for_snapshot(&self.caches_dir, snapshot)
    }

    /// Catalog entries for this game in catalog order
    pub async fn game_snapshots(&self) -> Result<Vec<CacheSnapshot>> {
        let catalog = self.api.fetch_catalog().await?;
        Ok(filter_game(catalog, &self.game))
    }

    /// Catalog entries for this game, newest first
    ///
    /// Entries without a usable timestamp are kept at the end.
    pub async fn list_snapshots(&self) -> Result<Vec<CacheSnapshot>> {
        let mut snapshots = self.game_snapshots().await?;
        sort_by_timestamp_desc(&mut snapshots);
        tracing::info!("{} {} snapshots available", snapshots.len(), self.game);
        Ok(snapshots)
    }
}

impl std::fmt::Debug for CacheChooser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheChooser")
            .field("caches_dir", &self.caches_dir)
            .field("game", &self.game)
            .finish_non_exhaustive()
    }
}
