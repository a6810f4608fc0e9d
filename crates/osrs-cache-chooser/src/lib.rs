//! Cache acquisition and selection for Old School RuneScape tooling
//!
//! [`CacheChooser`] ties the archive client to local storage:
//!
//! - list the archive's snapshots for one game, newest first
//! - download a snapshot into `<caches>/<date>-rev<version>/`, then fetch its
//!   XTEA keys and write a synthetic `params.txt`
//! - recover missing keys for an existing directory by matching the date in
//!   its name against the catalog
//! - open a local cache directory, checking the required archive files and
//!   loading keys and params
//!
//! Keys and params are optional enrichments. Failing to fetch or write them
//! never fails an acquisition; only listing, downloading and extracting do.
//! The [`task`] module runs listing and acquisition in the background and
//! reports each result exactly once.

#![allow(clippy::uninlined_format_args)] // Consistent tracing call style

pub mod acquisition;
pub mod chooser;
pub mod config;
pub mod error;
pub mod local;
pub mod recovery;
pub mod task;

#[cfg(test)]
mod testing;

pub use acquisition::{AcquisitionReport, AcquisitionState, KeysOutcome, Selection};
pub use chooser::CacheChooser;
pub use config::{ChooserConfig, Command};
pub use error::{ChooserError, Result};
pub use local::{KeysStatus, LocalCache};
pub use recovery::KeyRecovery;
pub use task::{
    AcquisitionGate, AcquisitionHandle, AcquisitionPermit, ListingHandle, TaskHandle,
    spawn_acquisition, spawn_listing, spawn_selection,
};
