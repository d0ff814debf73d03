//! Core XZZ `.pcb` reader module.

pub mod blocks;
pub mod crypto;
pub mod cursor;
pub mod error;
pub mod header;
pub mod models;
pub mod obfuscation;
pub mod part;

use std::fs;
use std::path::Path;

use log::info;
use serde::Serialize;

pub use error::{PcbError, Result};
use models::{FileHeader, TopLevelBlock};

/// A fully parsed `.pcb` file.
///
/// Serializes as `{"main_data_block": [...]}` with each block a single-key
/// tagged object, which is the shape the rendering side consumes.
#[derive(Debug, Clone, Serialize)]
pub struct PcbFile {
    /// Ordered sequence of emitted top-level blocks (file order).
    pub main_data_block: Vec<TopLevelBlock>,
    /// Fixed header fields; not part of the serialized output contract.
    #[serde(skip)]
    pub header: FileHeader,
    /// Number of bytes that were XOR de-obfuscated, `None` for plain files.
    /// Not part of the serialized output contract.
    #[serde(skip)]
    pub deobfuscated_len: Option<usize>,
}

impl PcbFile {
    /// Parse a `.pcb` file from its raw bytes.
    ///
    /// Pipeline: XOR de-obfuscation (if the key byte at 0x10 is non-zero),
    /// fixed-offset header read, then the top-level block scan. DATA
    /// blocks are decrypted and sub-parsed along the way, with failures
    /// contained per block.
    ///
    /// # Errors
    /// Only a buffer too short for the 0x44-byte header is an error; all
    /// later corruption degrades to a partial block list.
    pub fn parse(data: &[u8]) -> Result<Self> {
        info!("Parsing .pcb buffer: {} bytes", data.len());
        let mut buf = data.to_vec();
        let deobfuscated_len = obfuscation::deobfuscate_in_place(&mut buf);

        let header = header::parse(&buf)?;
        let main_data_block = blocks::parse_main_blocks(&buf, &header);

        Ok(Self {
            main_data_block,
            header,
            deobfuscated_len,
        })
    }

    /// Read and parse a `.pcb` file from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening .pcb file: {}", path.display());
        let data = fs::read(path)?;
        Self::parse(&data)
    }
}
