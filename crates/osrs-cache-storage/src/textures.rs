//! Texture definitions read through an [`ArchiveReader`]

use osrs_cache_formats::{DefinitionTable, TextureDefinition, TextureSet};

use crate::reader::ArchiveReader;
use crate::{Result, StorageError};

/// Index holding texture definitions
pub const TEXTURE_INDEX: u8 = 9;

/// Archive within [`TEXTURE_INDEX`] holding every definition
pub const TEXTURE_ARCHIVE: u32 = 0;

/// Decoded textures of one cache
#[derive(Debug, Clone)]
pub struct TextureLoader {
    table: DefinitionTable<TextureDefinition>,
    decoded: usize,
    skipped: usize,
}

impl TextureLoader {
    /// Decode every file listed in the texture archive
    ///
    /// Files that are missing or fail to decode are left out of the table;
    /// only a missing archive is an error. The texture index is released
    /// afterwards.
    pub fn load(reader: &dyn ArchiveReader) -> Result<Self> {
        let handle = reader
            .archive(TEXTURE_INDEX, TEXTURE_ARCHIVE)
            .ok_or_else(|| {
                StorageError::NotFound(format!(
                    "texture archive (index {TEXTURE_INDEX}, archive {TEXTURE_ARCHIVE})"
                ))
            })?;

        let blobs = handle
            .file_ids
            .iter()
            .map(|&file| (file, reader.data(TEXTURE_INDEX, TEXTURE_ARCHIVE, file)));
        let set = TextureSet::decode(blobs);
        reader.release(TEXTURE_INDEX);

        tracing::info!(
            "loaded {} textures ({} skipped)",
            set.len(),
            set.skipped()
        );

        let decoded = set.len();
        let skipped = set.skipped();
        Ok(Self {
            table: set.into_table(),
            decoded,
            skipped,
        })
    }

    /// Definition for texture `id`
    pub fn get(&self, id: u32) -> Option<&TextureDefinition> {
        self.table.get(id)
    }

    /// Dense table of every decoded definition
    pub fn all(&self) -> &DefinitionTable<TextureDefinition> {
        &self.table
    }

    /// Packed color of texture `id`, 0 when absent
    pub fn average_rgb(&self, id: u32) -> u16 {
        self.get(id).map_or(0, |definition| definition.packed_color)
    }

    /// Number of decoded definitions
    pub fn len(&self) -> usize {
        self.decoded
    }

    /// Whether nothing decoded
    pub fn is_empty(&self) -> bool {
        self.decoded == 0
    }

    /// Number of listed files that were missing or failed to decode
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::reader::MemoryReader;

    fn record(color: u16, file_ids: &[u16]) -> Vec<u8> {
        let definition = TextureDefinition {
            id: 0,
            packed_color: color,
            has_transparency: false,
            file_ids: file_ids.to_vec(),
            blend_factors_a: (file_ids.len() > 1).then(|| vec![1; file_ids.len() - 1]),
            blend_factors_b: (file_ids.len() > 1).then(|| vec![2; file_ids.len() - 1]),
            animation_speeds: vec![0; file_ids.len()],
            wrap_mode_x: 0,
            wrap_mode_y: 0,
        };
        definition.build().expect("build")
    }

    #[test]
    fn test_load_sparse_archive() {
        let mut reader = MemoryReader::new();
        reader.insert(TEXTURE_INDEX, TEXTURE_ARCHIVE, 0, record(100, &[3]));
        reader.insert(TEXTURE_INDEX, TEXTURE_ARCHIVE, 1, Vec::new());
        reader.insert(TEXTURE_INDEX, TEXTURE_ARCHIVE, 2, record(200, &[4, 5]));
        reader.insert(TEXTURE_INDEX, TEXTURE_ARCHIVE, 4, vec![0x00, 0x01]);
        reader.insert(TEXTURE_INDEX, TEXTURE_ARCHIVE, 5, record(500, &[]));
        reader.insert(TEXTURE_INDEX, 1, 9, record(900, &[]));

        let loader = TextureLoader::load(&reader).expect("load");

        assert_eq!(loader.len(), 3);
        assert_eq!(loader.len(), loader.all().present_count());
        assert_eq!(loader.skipped(), 2);
        assert_eq!(loader.all().len(), 6);
        assert_eq!(loader.get(2).map(|d| d.file_ids.clone()), Some(vec![4, 5]));
        assert_eq!(loader.get(2).map(|d| d.id), Some(2));
        assert!(loader.get(1).is_none());
        assert!(loader.get(9).is_none(), "other archives are not read");
        assert_eq!(loader.average_rgb(5), 500);
        assert_eq!(loader.average_rgb(4), 0);
        assert_eq!(reader.released(), vec![TEXTURE_INDEX]);
    }

    #[test]
    fn test_empty_archive() {
        let mut reader = MemoryReader::new();
        reader.insert_archive(TEXTURE_INDEX, TEXTURE_ARCHIVE);

        let loader = TextureLoader::load(&reader).expect("load");

        assert!(loader.is_empty());
        assert!(loader.all().is_empty());
    }

    #[test]
    fn test_missing_archive() {
        let reader = MemoryReader::new();
        let err = TextureLoader::load(&reader).unwrap_err();

        assert!(matches!(err, StorageError::NotFound(_)));
        assert!(reader.released().is_empty());
    }
}
