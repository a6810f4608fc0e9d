//! Fallback key recovery for directories without `xteas.json`
//!
//! Only the `<date>-rev<number>` naming convention is understood. The first
//! catalog entry (in catalog order, not sorted) for the game whose timestamp
//! falls on that UTC date is taken as the source snapshot. Several snapshots
//! can share a date; the first one wins.

use std::path::Path;

use chrono::NaiveDate;
use osrs_cache_storage::{CacheLayout, parse_directory_date, persist_keys};

use crate::chooser::CacheChooser;
use crate::error::Result;

/// Outcome of a key recovery attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyRecovery {
    /// Keys from this snapshot were written
    Written { snapshot_id: u32, count: usize },
    /// A snapshot matched but the archive holds no keys for it
    NoKeys { snapshot_id: u32 },
    /// No catalog entry has this date
    NotFound { date: NaiveDate },
    /// The directory name carries no date; the archive was not contacted
    NoDirectoryDate,
}

impl KeyRecovery {
    /// Whether `xteas.json` now exists because of this attempt
    pub fn wrote_keys(&self) -> bool {
        matches!(self, Self::Written { .. })
    }

    /// Short explanation for display
    pub fn describe(&self) -> String {
        match self {
            Self::Written { snapshot_id, count } => {
                format!("recovered {count} keys from snapshot {snapshot_id}")
            }
            Self::NoKeys { snapshot_id } => {
                format!("snapshot {snapshot_id} matched but has no keys")
            }
            Self::NotFound { date } => format!("no archived cache found for {date}"),
            Self::NoDirectoryDate => {
                "directory name has no <date>-rev<number> suffix".to_string()
            }
        }
    }
}

impl CacheChooser {
    /// Locate and write keys for a local cache directory
    ///
    /// Network and filesystem failures are errors; a missing match is not.
    pub async fn recover_keys(&self, directory: &Path) -> Result<KeyRecovery> {
        let Some(date) = parse_directory_date(directory) else {
            tracing::warn!(
                "cannot recover keys for {}: no date in directory name",
                directory.display()
            );
            return Ok(KeyRecovery::NoDirectoryDate);
        };

        tracing::debug!(
            "attempting to locate cache decryption keys for cache: {}",
            directory.display()
        );

        let snapshots = self.game_snapshots().await?;
        let Some(snapshot) = snapshots.iter().find(|snapshot| snapshot.date() == Some(date))
        else {
            tracing::warn!("no archived {} cache dated {}", self.game(), date);
            return Ok(KeyRecovery::NotFound { date });
        };

        tracing::debug!(
            "found archived cache matching date {} with id {}, fetching keys",
            date,
            snapshot.id
        );
        let keys = self.api().fetch_keys(&snapshot.scope, snapshot.id).await?;
        if keys.is_empty() {
            return Ok(KeyRecovery::NoKeys {
                snapshot_id: snapshot.id,
            });
        }

        persist_keys(&CacheLayout::new(directory), &keys).await?;
        tracing::info!(
            "recovered {} keys for {} from snapshot {}",
            keys.len(),
            directory.display(),
            snapshot.id
        );

        Ok(KeyRecovery::Written {
            snapshot_id: snapshot.id,
            count: keys.len(),
        })
    }
}
