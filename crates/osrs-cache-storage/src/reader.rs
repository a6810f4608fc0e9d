//! Seam to the indexed-archive storage engine
//!
//! Reading `.dat2`/`.idx` files is handled outside this workspace. Loaders only
//! need two lookups from it, expressed by [`ArchiveReader`].

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

/// An archive resolved inside an index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveHandle {
    /// Index id
    pub index: u8,
    /// Archive id within the index
    pub archive: u32,
    /// File ids the archive lists, in ascending order
    pub file_ids: Vec<u32>,
}

/// Read access to an indexed archive
pub trait ArchiveReader {
    /// Resolve an archive, `None` if the index or archive does not exist
    fn archive(&self, index: u8, archive: u32) -> Option<ArchiveHandle>;

    /// Bytes of one file, `None` if missing or unreadable
    fn data(&self, index: u8, archive: u32, file: u32) -> Option<Vec<u8>>;

    /// Drop any cached state for `index`
    fn release(&self, _index: u8) {}
}

/// In-memory reader over explicit file contents
///
/// Useful for tools that already hold decoded archive files, and for tests.
#[derive(Debug, Default)]
pub struct MemoryReader {
    archives: HashMap<(u8, u32), BTreeMap<u32, Vec<u8>>>,
    released: Mutex<Vec<u8>>,
}

impl MemoryReader {
    /// Create an empty reader
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, creating its archive if needed
    pub fn insert(&mut self, index: u8, archive: u32, file: u32, data: impl Into<Vec<u8>>) {
        self.archives
            .entry((index, archive))
            .or_default()
            .insert(file, data.into());
    }

    /// Add an archive with no files
    pub fn insert_archive(&mut self, index: u8, archive: u32) {
        self.archives.entry((index, archive)).or_default();
    }

    /// Indices passed to [`ArchiveReader::release`], in call order
    pub fn released(&self) -> Vec<u8> {
        self.released
            .lock()
            .map(|released| released.clone())
            .unwrap_or_default()
    }
}

impl ArchiveReader for MemoryReader {
    fn archive(&self, index: u8, archive: u32) -> Option<ArchiveHandle> {
        self.archives.get(&(index, archive)).map(|files| ArchiveHandle {
            index,
            archive,
            file_ids: files.keys().copied().collect(),
        })
    }

    fn data(&self, index: u8, archive: u32, file: u32) -> Option<Vec<u8>> {
        self.archives.get(&(index, archive))?.get(&file).cloned()
    }

    fn release(&self, index: u8) {
        if let Ok(mut released) = self.released.lock() {
            released.push(index);
        }
    }
}
