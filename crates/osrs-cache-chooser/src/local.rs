//! Opening a local cache directory

use std::path::Path;

use osrs_cache_formats::XteaKeySet;
use osrs_cache_storage::{CacheLayout, ParamsStore, load_keys};

use crate::chooser::CacheChooser;
use crate::error::Result;
use crate::recovery::KeyRecovery;

/// Where the keys of an opened cache came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeysStatus {
    /// `xteas.json` was already present
    Loaded,
    /// The file was missing and has been recovered from the archive
    Recovered { snapshot_id: u32 },
    /// No keys could be found; encrypted archives cannot be read
    Unavailable { reason: String },
}

/// A cache directory ready to hand to the archive reader
#[derive(Debug, Clone)]
pub struct LocalCache {
    pub layout: CacheLayout,
    pub keys: XteaKeySet,
    pub keys_status: KeysStatus,
    pub params: ParamsStore,
}

impl LocalCache {
    /// Revision recorded in `params.txt`, 0 when unknown
    pub fn revision(&self) -> u32 {
        self.params.revision()
    }
}

impl CacheChooser {
    /// Validate and load a local cache directory
    ///
    /// Fails when a required archive file is missing, when `xteas.json` exists
    /// but cannot be decoded, or when `params.txt` has a malformed id. A missing
    /// keys file triggers fallback recovery, whose outcome is reported in
    /// [`LocalCache::keys_status`] and never fails the call.
    pub async fn open_local_cache(&self, directory: &Path) -> Result<LocalCache> {
        let layout = CacheLayout::new(directory);
        layout.check_required_files()?;

        let (keys, keys_status) = match load_keys(&layout)? {
            Some(keys) => (keys, KeysStatus::Loaded),
            None => {
                tracing::warn!(
                    "cache decryption keys not found in {}, searching the archive",
                    directory.display()
                );
                self.recover_missing_keys(&layout).await?
            }
        };

        let params = ParamsStore::from_directory(directory)?;
        tracing::info!(
            "opened cache {} (revision {}, {} keys)",
            directory.display(),
            params.revision(),
            keys.len()
        );

        Ok(LocalCache {
            layout,
            keys,
            keys_status,
            params,
        })
    }

    async fn recover_missing_keys(
        &self,
        layout: &CacheLayout,
    ) -> Result<(XteaKeySet, KeysStatus)> {
        let recovery = match self.recover_keys(layout.root()).await {
            Ok(recovery) => recovery,
            Err(e) => {
                tracing::warn!("key recovery failed: {}", e);
                return Ok(unavailable(e.to_string()));
            }
        };

        match recovery {
            KeyRecovery::Written { snapshot_id, .. } => {
                let keys = load_keys(layout)?.unwrap_or_default();
                Ok((keys, KeysStatus::Recovered { snapshot_id }))
            }
            other => Ok(unavailable(other.describe())),
        }
    }
}

fn unavailable(reason: String) -> (XteaKeySet, KeysStatus) {
    (XteaKeySet::default(), KeysStatus::Unavailable { reason })
}
