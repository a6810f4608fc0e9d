//! Snapshot directory naming and well-known paths
//!
//! Directories are named `<date>-rev<version>` (for example
//! `2024-06-01-rev220`). Fallback key recovery depends on this convention to
//! find the snapshot a directory was downloaded from, so it is the only naming
//! scheme supported.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::NaiveDate;
use osrs_cache_protocol::CacheSnapshot;
use regex::Regex;

use crate::{Result, StorageError};

/// Subdirectory holding the raw archive files
pub const CACHE_DIR: &str = "cache";

/// Key document file name
pub const KEYS_FILE: &str = "xteas.json";

/// Params file name
pub const PARAMS_FILE: &str = "params.txt";

/// Files under `cache/` without which the archive cannot be opened
pub const REQUIRED_FILES: [&str; 2] = ["main_file_cache.dat2", "main_file_cache.idx255"];

const DIRECTORY_DATE_PATTERN: &str = r"(\d{4}-\d{2}-\d{2})-rev\d+";

/// Compiled [`DIRECTORY_DATE_PATTERN`], shared by every lookup
static DIRECTORY_DATE: OnceLock<Option<Regex>> = OnceLock::new();

fn directory_date_pattern() -> Option<&'static Regex> {
    DIRECTORY_DATE
        .get_or_init(|| match Regex::new(DIRECTORY_DATE_PATTERN) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                tracing::error!("invalid directory date pattern: {}", e);
                None
            }
        })
        .as_ref()
}

/// Paths inside one snapshot directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLayout {
    root: PathBuf,
}

impl CacheLayout {
    /// Layout rooted at an existing or future snapshot directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Layout for `snapshot` under the caches directory
    pub fn for_snapshot(caches_dir: &Path, snapshot: &CacheSnapshot) -> Self {
        Self::new(caches_dir.join(folder_name(snapshot)))
    }

    /// Snapshot directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/cache`
    pub fn cache_dir(&self) -> PathBuf {
        self.root.join(CACHE_DIR)
    }

    /// `<root>/xteas.json`
    pub fn keys_path(&self) -> PathBuf {
        self.root.join(KEYS_FILE)
    }

    /// `<root>/params.txt`
    pub fn params_path(&self) -> PathBuf {
        self.root.join(PARAMS_FILE)
    }

    /// Fail with the first required archive file that does not exist
    pub fn check_required_files(&self) -> Result<()> {
        let cache_dir = self.cache_dir();
        for name in REQUIRED_FILES {
            let path = cache_dir.join(name);
            if !path.is_file() {
                return Err(StorageError::MissingRequiredFile(path));
            }
        }
        Ok(())
    }

    /// Date embedded in the directory name
    pub fn date(&self) -> Option<NaiveDate> {
        parse_directory_date(&self.root)
    }
}

/// Directory name a snapshot is materialized under
pub fn folder_name(snapshot: &CacheSnapshot) -> String {
    let date = snapshot
        .date_string()
        .unwrap_or_else(|| "unknown".to_string());
    let version = snapshot
        .primary_build()
        .map_or_else(|| "unknown".to_string(), |build| build.version_string());

    format!("{date}-rev{version}")
}

/// Extract the `YYYY-MM-DD` date from a `<date>-rev<number>` directory name
///
/// Only the final path component is inspected. Returns `None` when the name
/// does not follow the convention or the date is not a real calendar day.
pub fn parse_directory_date(path: &Path) -> Option<NaiveDate> {
    let name = path.file_name()?.to_str()?;
    let date = directory_date_pattern()?
        .captures(name)?.get(1)?.as_str();

    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::warn!("failed to parse date {} from {}: {}", date, name, e);
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use osrs_cache_protocol::Build;
    use std::fs;

    fn snapshot(timestamp: Option<&str>, builds: Vec<Build>) -> CacheSnapshot {
        serde_json::from_value(serde_json::json!({
            "id": 1,
            "scope": "runescape",
            "game": "oldschool",
            "environment": "live",
            "language": "en",
            "builds": builds,
            "timestamp": timestamp,
        }))
        .expect("snapshot")
    }

    #[test]
    fn test_folder_name() {
        let dated = snapshot(
            Some("2024-06-01T10:00:00Z"),
            vec![Build { major: 220, minor: None }],
        );
        assert_eq!(folder_name(&dated), "2024-06-01-rev220");

        let minor = snapshot(
            Some("2024-06-01T10:00:00Z"),
            vec![Build { major: 1, minor: Some(2) }],
        );
        assert_eq!(folder_name(&minor), "2024-06-01-rev1.2");

        let bare = snapshot(None, Vec::new());
        assert_eq!(folder_name(&bare), "unknown-revunknown");
    }

    #[test]
    fn test_layout_paths() {
        let caches = Path::new("/data/caches");
        let layout = CacheLayout::for_snapshot(
            caches,
            &snapshot(Some("2024-06-01T10:00:00Z"), vec![Build { major: 220, minor: None }]),
        );

        assert_eq!(layout.root(), Path::new("/data/caches/2024-06-01-rev220"));
        assert_eq!(layout.cache_dir(), caches.join("2024-06-01-rev220/cache"));
        assert_eq!(layout.keys_path(), caches.join("2024-06-01-rev220/xteas.json"));
        assert_eq!(layout.params_path(), caches.join("2024-06-01-rev220/params.txt"));
    }

    #[test]
    fn test_parse_directory_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 6, 1);
        assert_eq!(parse_directory_date(Path::new("/x/2024-06-01-rev220")), expected);
        assert_eq!(parse_directory_date(Path::new("osrs-2024-06-01-rev220-copy")), expected);
        assert_eq!(parse_directory_date(Path::new("2024-06-01-rev220/")), expected);
    }

    #[test]
    fn test_parse_directory_date_rejects() {
        assert_eq!(parse_directory_date(Path::new("/x/my-cache")), None);
        assert_eq!(parse_directory_date(Path::new("/x/2024-06-01")), None);
        assert_eq!(parse_directory_date(Path::new("/x/2024-06-01-revabc")), None);
        assert_eq!(parse_directory_date(Path::new("/x/2024-13-45-rev1")), None);
        assert_eq!(parse_directory_date(Path::new("/2024-06-01-rev220/other")), None);
    }

    #[test]
    fn test_directory_date_pattern_compiled_once() {
        let first = directory_date_pattern().expect("pattern");
        let second = directory_date_pattern().expect("pattern");

        assert!(std::ptr::eq(first, second));
        assert!(first.is_match("2024-06-01-rev220"));
    }

    #[test]
    fn test_required_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let layout = CacheLayout::new(dir.path());

        let err = layout.check_required_files().unwrap_err();
        assert!(
            matches!(err, StorageError::MissingRequiredFile(ref path) if path.ends_with("main_file_cache.dat2"))
        );

        fs::create_dir_all(layout.cache_dir()).expect("mkdir");
        fs::write(layout.cache_dir().join("main_file_cache.dat2"), b"").expect("write");
        let err = layout.check_required_files().unwrap_err();
        assert!(
            matches!(err, StorageError::MissingRequiredFile(ref path) if path.ends_with("main_file_cache.idx255"))
        );

        fs::write(layout.cache_dir().join("main_file_cache.idx255"), b"").expect("write");
        assert!(layout.check_required_files().is_ok());
    }
}
