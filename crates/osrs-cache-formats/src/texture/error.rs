//! Texture definition error types

use thiserror::Error;

/// Errors that can occur when decoding or building a texture definition
///
/// Every variant is local to a single record. Batch decoding turns them into
/// absent table slots and never propagates them.
#[derive(Debug, Error)]
pub enum TextureError {
    /// No bytes were supplied for the record
    #[error("empty texture record")]
    Empty,

    /// Fewer bytes remain than the next field requires
    #[error("truncated {field}: need {needed} bytes, {remaining} remaining")]
    Truncated {
        /// Field being read when the data ran out
        field: &'static str,
        /// Bytes the field requires
        needed: usize,
        /// Bytes left in the record
        remaining: usize,
    },

    /// File id count outside the representable range
    #[error("invalid file count: {0} (max 255)")]
    InvalidFileCount(usize),

    /// Blend factor sequence does not match the file id count
    #[error("blend factor length mismatch: expected {expected}, got {actual}")]
    BlendLengthMismatch {
        /// Required length (`file_ids.len() - 1`)
        expected: usize,
        /// Length found on the definition
        actual: usize,
    },

    /// Animation speed count does not match the file id count
    #[error("animation speed count mismatch: expected {expected}, got {actual}")]
    AnimationLengthMismatch {
        /// Required length (`file_ids.len()`)
        expected: usize,
        /// Length found on the definition
        actual: usize,
    },

    /// Low-level numeric read failure
    #[error("binary parsing error: {0}")]
    BinRead(String),
}

impl From<binrw::Error> for TextureError {
    fn from(e: binrw::Error) -> Self {
        Self::BinRead(e.to_string())
    }
}

/// Result type alias for texture operations
pub type Result<T> = std::result::Result<T, TextureError>;
