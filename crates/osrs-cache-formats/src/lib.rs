//! Definition decoders and sidecar file formats for Old School RuneScape caches
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format parsing
#![allow(clippy::uninlined_format_args)] // Consistent tracing call style
#![allow(clippy::doc_markdown)] // Cache-specific terms don't need backticks
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
//! This crate turns the raw bytes and text files that make up a local cache
//! copy into typed values. It performs no I/O of its own: callers hand it byte
//! slices read from the indexed archive and strings read from sidecar files.
//!
//! # Supported Formats
//!
//! - **Texture definitions**: index 9 records, decoded into a sparse
//!   [`table::DefinitionTable`]
//! - **Params**: the `params.txt` launcher parameter file
//! - **XTEA keys**: the `xteas.json` key document served by the OpenRS2 archive
//!
//! # Design Principles
//!
//! - **Record-Local Failure**: a malformed record never aborts a batch
//! - **Bounds Checked**: every field read is preceded by a length check
//! - **Symmetric Operations**: formats that are written back can be built as
//!   well as parsed

#![warn(missing_docs)]

pub mod params;
pub mod table;
pub mod texture;
pub mod xtea;

pub use params::{ParamType, ParamsError, ParamsTable};
pub use table::{DefinitionTable, Identified, MAX_DEFINITION_ID};
pub use texture::{TextureDefinition, TextureError, TextureSet};
pub use xtea::{XteaKey, XteaKeySet};
