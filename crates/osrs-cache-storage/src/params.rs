//! params.txt store

use std::io::ErrorKind;
use std::path::Path;

use chrono::Local;
use osrs_cache_formats::{ParamType, ParamsTable};
use osrs_cache_protocol::Build;

use crate::Result;
use crate::layout::PARAMS_FILE;

/// Parameters loaded from a snapshot directory
///
/// An absent file is not an error: the store stays empty and every lookup
/// reports "unset", which reads as revision 0.
#[derive(Debug, Clone, Default)]
pub struct ParamsStore {
    table: ParamsTable,
}

impl ParamsStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the store contents with `<directory>/params.txt`
    ///
    /// A malformed parameter id is the only failure; the store is left empty
    /// in that case.
    pub fn load(&mut self, directory: &Path) -> Result<()> {
        let path = directory.join(PARAMS_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!("no params file at {}, revision unknown", path.display());
                self.table = ParamsTable::new();
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        self.table.replace_from_str(&content)?;
        tracing::debug!("loaded {} params from {}", self.table.len(), path.display());
        Ok(())
    }

    /// Convenience constructor that loads immediately
    pub fn from_directory(directory: &Path) -> Result<Self> {
        let mut store = Self::new();
        store.load(directory)?;
        Ok(store)
    }

    /// Value of a well-known parameter
    pub fn get(&self, param: ParamType) -> Option<&str> {
        self.table.get(param)
    }

    /// Value under a numeric id
    pub fn get_raw(&self, id: u32) -> Option<&str> {
        self.table.get_raw(id)
    }

    /// Revision number, 0 when unset
    pub fn revision(&self) -> u32 {
        self.table.revision()
    }

    /// Underlying table
    pub fn table(&self) -> &ParamsTable {
        &self.table
    }
}

/// Write a params file recording `build` as the revision
///
/// Returns `false` without touching the filesystem when there is no build to
/// record.
pub async fn write_synthetic_params(directory: &Path, build: Option<&Build>) -> Result<bool> {
    let Some(build) = build else {
        tracing::debug!("snapshot has no builds, not writing params");
        return Ok(false);
    };

    let mut table = ParamsTable::new();
    table.insert(ParamType::Revision.id(), build.major.to_string());

    let content = format!(
        "Created at {}\nSynthetic params.txt, not derived from launcher\n{}",
        Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
        table.to_lines()
    );

    tokio::fs::create_dir_all(directory).await?;
    tokio::fs::write(directory.join(PARAMS_FILE), content).await?;
    Ok(true)
}
