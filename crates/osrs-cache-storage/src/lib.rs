//! Local storage for downloaded Old School RuneScape caches
//!
//! A materialized snapshot lives in one directory per snapshot:
//!
//! ```text
//! <caches>/2024-06-01-rev220/
//!     cache/main_file_cache.dat2
//!     cache/main_file_cache.idx0 .. idx255
//!     xteas.json        (optional, pretty-printed key document)
//!     params.txt        (optional, `param=<id>=<value>` lines)
//! ```
//!
//! This crate owns that layout: unpacking a downloaded package into `cache/`,
//! writing and reading the two sidecar files, and decoding textures through the
//! external indexed-archive reader. The sidecars are independent; a directory
//! with extracted files but no keys is valid and can be completed later.

#![warn(missing_docs)]
#![allow(clippy::must_use_candidate)]

use std::path::PathBuf;

use thiserror::Error;

// Directory naming and well-known paths
pub mod layout;

// Package download and unpacking
pub mod extract;

// xteas.json persistence
pub mod keys;

// params.txt loading and synthesis
pub mod params;

// Indexed-archive reader seam
pub mod reader;

// Texture definitions loaded through a reader
pub mod textures;

pub use extract::extract_package;
pub use keys::{load_keys, persist_keys};
pub use layout::{CacheLayout, folder_name, parse_directory_date};
pub use params::{ParamsStore, write_synthetic_params};
pub use reader::{ArchiveHandle, ArchiveReader, MemoryReader};
pub use textures::TextureLoader;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A file every cache directory must contain is absent.
    #[error("Missing required file: {}", .0.display())]
    MissingRequiredFile(PathBuf),

    /// The keys file exists but is not a valid key document.
    #[error("Could not decode xteas file {}: {source}", path.display())]
    InvalidKeys {
        /// Keys file that failed to parse
        path: PathBuf,
        /// JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Serializing a document failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The params file has a malformed parameter id.
    #[error("Params error: {0}")]
    Params(#[from] osrs_cache_formats::ParamsError),

    /// The downloaded package is not a readable zip container.
    #[error("Package error: {0}")]
    Package(#[from] zip::result::ZipError),

    /// The package download failed mid-stream.
    #[error("Download error: {0}")]
    Download(#[from] osrs_cache_protocol::ProtocolError),

    /// Content not found.
    #[error("Content not found: {0}")]
    NotFound(String),

    /// A blocking worker panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Task(String),
}
