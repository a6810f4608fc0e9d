//! Client for the OpenRS2 cache archive
//!
//! The archive publishes a catalog of every cache snapshot it holds, the XTEA
//! keys recovered for each snapshot, and a zipped copy of the on-disk cache
//! files. This crate wraps those three endpoints:
//!
//! - `GET /caches.json`: the full [`catalog::CacheSnapshot`] list
//! - `GET /caches/<scope>/<id>/keys.json`: the key document for one snapshot
//! - `GET /caches/<scope>/<id>/disk.zip`: the packaged cache as a byte stream
//!
//! Every call is a single request. Non-2xx responses become
//! [`ProtocolError::HttpStatus`] and transport failures propagate unchanged;
//! nothing is retried.
#![allow(clippy::uninlined_format_args)] // Consistent tracing call style
#![allow(clippy::doc_markdown)] // Archive-specific terms don't need backticks

pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod transport;

pub use catalog::{Build, CacheSnapshot, filter_game, filter_snapshots, sort_by_timestamp_desc};
pub use client::{ArchiveApi, OpenRs2Client, PackageStream};
pub use config::ArchiveConfig;
pub use error::{ProtocolError, Result};
