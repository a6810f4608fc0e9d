//! Command-line configuration.
//!
//! Every option can also come from the environment:
//!
//! - `OSRS_CACHE_DIR`: where snapshot directories are created
//! - `OSRS_CACHE_ARCHIVE_URL`: archive base URL
//! - `OSRS_CACHE_USER_AGENT`, `OSRS_CACHE_CONNECT_TIMEOUT`,
//!   `OSRS_CACHE_REQUEST_TIMEOUT`: HTTP settings, read by
//!   [`ArchiveConfig::from_env`]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use osrs_cache_protocol::ArchiveConfig;
use osrs_cache_protocol::catalog::OLDSCHOOL_GAME;

use crate::acquisition::Selection;

/// Chooser configuration loaded from CLI args and environment variables.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "osrs-cache-chooser",
    about = "Download and open Old School RuneScape caches from the OpenRS2 archive",
    version
)]
pub struct ChooserConfig {
    /// Directory holding downloaded caches
    #[arg(long, env = "OSRS_CACHE_DIR", default_value = "./caches")]
    pub caches_dir: PathBuf,

    /// Archive base URL
    #[arg(long, env = "OSRS_CACHE_ARCHIVE_URL")]
    pub archive_url: Option<String>,

    /// Game tag to filter the catalog by
    #[arg(long, default_value = OLDSCHOOL_GAME)]
    pub game: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List archived caches, newest first
    List {
        /// Only show caches whose label contains this text
        #[arg(long, default_value = "")]
        filter: String,

        /// Show at most this many caches
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Download a cache by catalog id, or `latest`
    Download {
        /// Catalog id or `latest`
        snapshot: Selection,
    },

    /// Check a local cache directory and load its keys and params
    Open {
        /// Cache directory, e.g. `caches/2024-06-01-rev220`
        directory: PathBuf,
    },

    /// Fetch missing keys for a local cache directory
    RecoverKeys {
        /// Cache directory named `<date>-rev<number>`
        directory: PathBuf,
    },
}

impl ChooserConfig {
    /// Parse configuration from command-line arguments.
    #[must_use]
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Archive client settings, with `--archive-url` taking precedence
    pub fn archive_config(&self) -> ArchiveConfig {
        let mut config = ArchiveConfig::from_env();
        if let Some(url) = &self.archive_url {
            config.base_url.clone_from(url);
        }
        config
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_list_defaults() {
        let config = ChooserConfig::try_parse_from(["osrs-cache-chooser", "list"]).expect("parse");

        assert_eq!(config.game, "oldschool");
        match config.command {
            Command::List { filter, limit } => {
                assert!(filter.is_empty());
                assert_eq!(limit, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_download_selection() {
        let config = ChooserConfig::try_parse_from([
            "osrs-cache-chooser",
            "--caches-dir",
            "/data/caches",
            "--archive-url",
            "http://localhost:9000",
            "download",
            "latest",
        ])
        .expect("parse");

        assert_eq!(config.caches_dir, PathBuf::from("/data/caches"));
        assert_eq!(config.archive_config().base_url, "http://localhost:9000");
        assert!(matches!(
            config.command,
            Command::Download {
                snapshot: Selection::Latest
            }
        ));

        let config = ChooserConfig::try_parse_from(["osrs-cache-chooser", "download", "1723"])
            .expect("parse");
        assert!(matches!(
            config.command,
            Command::Download {
                snapshot: Selection::Id(1723)
            }
        ));
    }

    #[test]
    fn test_bad_selection_rejected() {
        assert!(ChooserConfig::try_parse_from(["osrs-cache-chooser", "download", "soon"]).is_err());
    }

    #[test]
    fn test_recover_keys_command() {
        let config =
            ChooserConfig::try_parse_from(["osrs-cache-chooser", "recover-keys", "caches/2024-06-01-rev220"])
                .expect("parse");
        assert!(matches!(config.command, Command::RecoverKeys { .. }));
    }
}
