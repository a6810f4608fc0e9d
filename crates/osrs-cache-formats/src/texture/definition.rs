//! Texture definition record parsing and building

use binrw::BinReaderExt;
use binrw::io::Cursor;

use crate::texture::error::{Result, TextureError};

/// Largest number of file ids a record can carry (the count is one byte)
pub const MAX_FILE_COUNT: usize = 255;

/// A single decoded texture definition
///
/// The record layout is, big-endian throughout:
///
/// ```text
/// u16  packed color (HSL average)
/// u8   transparency flag (nonzero = transparent)
/// u8   file id count N
/// u16  file id * N
/// u8   blend factor A * (N - 1)   only when N > 1
/// u8   blend factor B * (N - 1)   only when N > 1
/// i32  animation speed * N
/// u8   wrap mode X
/// u8   wrap mode Y
/// ```
///
/// The id is not part of the record; it is the file id the record was stored
/// under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureDefinition {
    /// File id this record was stored under
    pub id: u32,
    /// Packed HSL color used as the texture's coarse color
    pub packed_color: u16,
    /// Whether the texture has transparent texels
    pub has_transparency: bool,
    /// Sprite file ids composing the texture
    pub file_ids: Vec<u16>,
    /// First blend factor sequence, present only with more than one file id
    pub blend_factors_a: Option<Vec<u8>>,
    /// Second blend factor sequence, present only with more than one file id
    pub blend_factors_b: Option<Vec<u8>>,
    /// Per-file animation speeds
    pub animation_speeds: Vec<i32>,
    /// Horizontal wrap mode
    pub wrap_mode_x: u8,
    /// Vertical wrap mode
    pub wrap_mode_y: u8,
}

/// Cursor over a record that refuses to read past the end
struct RecordReader<'a> {
    cursor: Cursor<&'a [u8]>,
    len: usize,
}

impl<'a> RecordReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(data),
            len: data.len(),
        }
    }

    fn remaining(&self) -> usize {
        self.len
            .saturating_sub(usize::try_from(self.cursor.position()).unwrap_or(usize::MAX))
    }

    fn require(&self, field: &'static str, needed: usize) -> Result<()> {
        let remaining = self.remaining();
        if remaining < needed {
            return Err(TextureError::Truncated {
                field,
                needed,
                remaining,
            });
        }
        Ok(())
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.cursor.read_be::<u8>()?)
    }

    fn read_u16(&mut self) -> Result<u16> {
        Ok(self.cursor.read_be::<u16>()?)
    }

    fn read_i32(&mut self) -> Result<i32> {
        Ok(self.cursor.read_be::<i32>()?)
    }

    fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        (0..count).map(|_| self.read_u8()).collect()
    }
}

impl TextureDefinition {
    /// Decode one record stored under `id`
    ///
    /// Trailing bytes after the wrap modes are ignored.
    pub fn parse(id: u32, data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Err(TextureError::Empty);
        }

        let mut reader = RecordReader::new(data);

        reader.require("header", 3)?;
        let packed_color = reader.read_u16()?;
        let has_transparency = reader.read_u8()? != 0;

        reader.require("file count", 1)?;
        let count = usize::from(reader.read_u8()?);
        if count > MAX_FILE_COUNT {
            return Err(TextureError::InvalidFileCount(count));
        }

        reader.require("file ids", count * 2)?;
        let file_ids = (0..count)
            .map(|_| reader.read_u16())
            .collect::<Result<Vec<_>>>()?;

        let (blend_factors_a, blend_factors_b) = if count > 1 {
            reader.require("blend factors a", count - 1)?;
            let a = reader.read_bytes(count - 1)?;
            reader.require("blend factors b", count - 1)?;
            let b = reader.read_bytes(count - 1)?;
            (Some(a), Some(b))
        } else {
            (None, None)
        };

        reader.require("animation speeds", count * 4)?;
        let animation_speeds = (0..count)
            .map(|_| reader.read_i32())
            .collect::<Result<Vec<_>>>()?;

        reader.require("wrap modes", 2)?;
        let wrap_mode_x = reader.read_u8()?;
        let wrap_mode_y = reader.read_u8()?;

        Ok(Self {
            id,
            packed_color,
            has_transparency,
            file_ids,
            blend_factors_a,
            blend_factors_b,
            animation_speeds,
            wrap_mode_x,
            wrap_mode_y,
        })
    }

    /// Encode this definition back into its record layout
    pub fn build(&self) -> Result<Vec<u8>> {
        let count = self.file_ids.len();
        if count > MAX_FILE_COUNT {
            return Err(TextureError::InvalidFileCount(count));
        }
        if self.animation_speeds.len() != count {
            return Err(TextureError::AnimationLengthMismatch {
                expected: count,
                actual: self.animation_speeds.len(),
            });
        }

        let blend_len = count.saturating_sub(1);
        let blends = [&self.blend_factors_a, &self.blend_factors_b];
        for blend in blends {
            let actual = blend.as_ref().map_or(0, Vec::len);
            let present_ok = blend.is_some() == (count > 1);
            if !present_ok || actual != blend_len {
                return Err(TextureError::BlendLengthMismatch {
                    expected: blend_len,
                    actual,
                });
            }
        }

        let mut data = Vec::with_capacity(Self::encoded_len(count));
        data.extend_from_slice(&self.packed_color.to_be_bytes());
        data.push(u8::from(self.has_transparency));
        data.push(count as u8);
        for file_id in &self.file_ids {
            data.extend_from_slice(&file_id.to_be_bytes());
        }
        for blend in blends.into_iter().flatten() {
            data.extend_from_slice(blend);
        }
        for speed in &self.animation_speeds {
            data.extend_from_slice(&speed.to_be_bytes());
        }
        data.push(self.wrap_mode_x);
        data.push(self.wrap_mode_y);

        Ok(data)
    }

    /// Size in bytes of a record with `count` file ids
    pub fn encoded_len(count: usize) -> usize {
        4 + count * 2 + count.saturating_sub(1) * 2 + count * 4 + 2
    }

    /// Number of sprite files composing this texture
    pub fn file_count(&self) -> usize {
        self.file_ids.len()
    }
}
