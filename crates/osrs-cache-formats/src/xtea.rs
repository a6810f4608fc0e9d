//! XTEA key documents (`xteas.json`)
//!
//! Keys are served by the archive as a JSON array and written to disk
//! unchanged. Decryption itself happens in the archive reader; this module only
//! models the document and indexes it for lookup.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One archive group key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XteaKey {
    /// Cache index the group belongs to (5 for maps)
    pub archive: u8,
    /// Group id inside the index
    pub group: u32,
    /// Hash of the group name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_hash: Option<i32>,
    /// Group name, e.g. `l50_50`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Map square (region id) the group belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapsquare: Option<u32>,
    /// The four 32-bit key words
    pub key: [i32; 4],
    /// Fields this model does not know about, kept for round-tripping
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl XteaKey {
    /// Whether every key word is zero (an unencrypted group)
    pub fn is_zero(&self) -> bool {
        self.key.iter().all(|word| *word == 0)
    }
}

/// Lookup structure over a key document
#[derive(Debug, Clone, Default)]
pub struct XteaKeySet {
    keys: Vec<XteaKey>,
    by_mapsquare: HashMap<u32, usize>,
    by_group: HashMap<(u8, u32), usize>,
}

impl XteaKeySet {
    /// Index a list of keys; later duplicates win
    pub fn new(keys: Vec<XteaKey>) -> Self {
        let mut by_mapsquare = HashMap::new();
        let mut by_group = HashMap::new();

        for (index, key) in keys.iter().enumerate() {
            if let Some(mapsquare) = key.mapsquare {
                by_mapsquare.insert(mapsquare, index);
            }
            by_group.insert((key.archive, key.group), index);
        }

        Self {
            keys,
            by_mapsquare,
            by_group,
        }
    }

    /// Parse a JSON key document
    pub fn from_json(data: &[u8]) -> Result<Self, serde_json::Error> {
        let keys: Vec<XteaKey> = serde_json::from_slice(data)?;
        Ok(Self::new(keys))
    }

    /// Key words for a map square
    pub fn get_by_mapsquare(&self, mapsquare: u32) -> Option<[i32; 4]> {
        self.by_mapsquare
            .get(&mapsquare)
            .map(|&index| self.keys[index].key)
    }

    /// Key words for a group in an index
    pub fn get_by_group(&self, archive: u8, group: u32) -> Option<[i32; 4]> {
        self.by_group
            .get(&(archive, group))
            .map(|&index| self.keys[index].key)
    }

    /// All keys in document order
    pub fn keys(&self) -> &[XteaKey] {
        &self.keys
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the document had no keys
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
