//! Cache catalog model (`caches.json`)
//!
//! Entries are transport DTOs: they are deserialized once and never modified.
//! Timestamps are kept as the raw string the archive sent and parsed on demand,
//! so a malformed timestamp only makes that entry's date unknown.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Game tag for Old School RuneScape snapshots
pub const OLDSCHOOL_GAME: &str = "oldschool";

/// One client build a snapshot was captured from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Build {
    pub major: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minor: Option<u32>,
}

impl Build {
    /// `major` or `major.minor`
    pub fn version_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Build {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.minor {
            Some(minor) => write!(f, "{}.{}", self.major, minor),
            None => write!(f, "{}", self.major),
        }
    }
}

/// A snapshot entry from the archive catalog
///
/// Fields the archive adds later are ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSnapshot {
    pub id: u32,
    pub scope: String,
    pub game: String,
    pub environment: String,
    pub language: String,
    #[serde(default)]
    pub builds: Vec<Build>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub valid_indexes: Option<u32>,
    #[serde(default)]
    pub indexes: Option<u32>,
    #[serde(default)]
    pub valid_groups: Option<u32>,
    #[serde(default)]
    pub groups: Option<u32>,
    #[serde(default)]
    pub valid_keys: Option<u32>,
    #[serde(default)]
    pub keys: Option<u32>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub blocks: Option<u32>,
    #[serde(default)]
    pub disk_store_valid: Option<bool>,
}

impl CacheSnapshot {
    /// Parsed timestamp, `None` when absent or not RFC 3339
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        let raw = self.timestamp.as_deref()?;
        match DateTime::parse_from_rfc3339(raw) {
            Ok(parsed) => Some(parsed.with_timezone(&Utc)),
            Err(e) => {
                tracing::debug!(
                    "snapshot {} has unparsable timestamp {:?}: {}",
                    self.id,
                    raw,
                    e
                );
                None
            }
        }
    }

    /// Calendar date of the timestamp in UTC
    pub fn date(&self) -> Option<NaiveDate> {
        self.timestamp_utc().map(|timestamp| timestamp.date_naive())
    }

    /// `YYYY-MM-DD` rendering of [`Self::date`]
    pub fn date_string(&self) -> Option<String> {
        self.date().map(|date| date.format("%Y-%m-%d").to_string())
    }

    /// First listed build
    pub fn primary_build(&self) -> Option<&Build> {
        self.builds.first()
    }

    /// One-line label used for listing and filtering
    pub fn display_name(&self) -> String {
        let date = self
            .date_string()
            .unwrap_or_else(|| "Unknown date".to_string());
        let build = self
            .primary_build()
            .map_or_else(|| "?".to_string(), Build::version_string);

        format!(
            "{} - Build {} ({})",
            date,
            build,
            capitalize(&self.environment)
        )
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Keep only snapshots for `game`, preserving catalog order
pub fn filter_game(snapshots: Vec<CacheSnapshot>, game: &str) -> Vec<CacheSnapshot> {
    snapshots
        .into_iter()
        .filter(|snapshot| snapshot.game == game)
        .collect()
}

/// Sort newest first; unknown timestamps go last in their original order
pub fn sort_by_timestamp_desc(snapshots: &mut [CacheSnapshot]) {
    snapshots.sort_by_cached_key(|snapshot| {
        std::cmp::Reverse(TimestampKey(snapshot.timestamp_utc()))
    });
}

/// Ordering key where any known timestamp ranks above an unknown one
#[derive(PartialEq, Eq)]
struct TimestampKey(Option<DateTime<Utc>>);

impl Ord for TimestampKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.0, other.0) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        }
    }
}

impl PartialOrd for TimestampKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Case-insensitive substring filter over [`CacheSnapshot::display_name`]
///
/// An empty or blank query keeps every snapshot.
pub fn filter_snapshots<'a>(
    snapshots: &'a [CacheSnapshot],
    query: &str,
) -> Vec<&'a CacheSnapshot> {
    let query = query.trim().to_lowercase();
    snapshots
        .iter()
        .filter(|snapshot| {
            query.is_empty() || snapshot.display_name().to_lowercase().contains(&query)
        })
        .collect()
}
