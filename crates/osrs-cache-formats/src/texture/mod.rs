//! Texture definition format (index 9, archive 0)
//!
//! Each file in the texture archive holds one [`TextureDefinition`] record keyed
//! by its file id. Records are decoded independently: a truncated or malformed
//! record only removes that id from the result.
//!
//! # Example
//!
//! ```rust
//! use osrs_cache_formats::texture::decode_all;
//!
//! let blobs = vec![
//!     (0u32, Some(vec![0x00, 0x05, 0x00, 0x00, 0x00, 0x00])),
//!     (1, None),
//!     (2, Some(vec![0x00])),
//! ];
//! let table = decode_all(blobs);
//!
//! assert_eq!(table.len(), 1);
//! assert!(table.get(0).is_some());
//! ```

mod definition;
mod error;

pub use definition::{MAX_FILE_COUNT, TextureDefinition};
pub use error::{Result, TextureError};

use std::collections::HashMap;

use crate::table::{DefinitionTable, Identified};

impl Identified for TextureDefinition {
    fn id(&self) -> u32 {
        self.id
    }
}

/// Decoded texture definitions keyed by id
#[derive(Debug, Clone, Default)]
pub struct TextureSet {
    definitions: HashMap<u32, TextureDefinition>,
    skipped: usize,
}

impl TextureSet {
    /// Decode every `(file id, bytes)` pair
    ///
    /// Missing blobs and records that fail to decode are logged and skipped.
    pub fn decode<I, B>(blobs: I) -> Self
    where
        I: IntoIterator<Item = (u32, Option<B>)>,
        B: AsRef<[u8]>,
    {
        let mut set = Self::default();

        for (id, blob) in blobs {
            let Some(blob) = blob else {
                tracing::debug!("texture {} has no data, skipping", id);
                set.skipped += 1;
                continue;
            };

            match TextureDefinition::parse(id, blob.as_ref()) {
                Ok(definition) => {
                    set.definitions.insert(id, definition);
                }
                Err(e) => {
                    tracing::warn!("failed to decode texture {}: {}, skipping", id, e);
                    set.skipped += 1;
                }
            }
        }

        set
    }

    /// Definition decoded under `id`
    pub fn get(&self, id: u32) -> Option<&TextureDefinition> {
        self.definitions.get(&id)
    }

    /// Packed color of texture `id`, or 0 when absent
    pub fn average_rgb(&self, id: u32) -> u16 {
        self.get(id).map_or(0, |definition| definition.packed_color)
    }

    /// Number of successfully decoded definitions
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether nothing decoded
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Number of ids that were missing or failed to decode
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Dense table view of the decoded definitions
    pub fn table(&self) -> DefinitionTable<TextureDefinition> {
        DefinitionTable::from_map(&self.definitions)
    }

    /// Consume into a dense table
    pub fn into_table(self) -> DefinitionTable<TextureDefinition> {
        DefinitionTable::from_definitions(self.definitions.into_values())
    }
}

/// Decode a batch of texture records into a dense table
pub fn decode_all<I, B>(blobs: I) -> DefinitionTable<TextureDefinition>
where
    I: IntoIterator<Item = (u32, Option<B>)>,
    B: AsRef<[u8]>,
{
    TextureSet::decode(blobs).into_table()
}
