//! # xzzpcb-reader
//!
//! A reader for XZZ `.pcb` boardview files: an undocumented, partially
//! encrypted binary format holding PCB traces, vias, arcs, text, and
//! component footprints.
//!
//! The pipeline has four stages:
//!
//! 1. XOR de-obfuscation of the raw file, keyed by a byte in the header
//!    and bounded by a marker-sequence search.
//! 2. A top-level scan over typed, variable-length blocks.
//! 3. DES/ECB decryption of DATA block payloads under a fixed key.
//! 4. A nested parse of the decrypted payloads into component footprints,
//!    pins, and pin nets.
//!
//! Decode failures past the file header are contained at block boundaries:
//! a corrupt or partially unknown file yields a partial, best-effort block
//! list rather than an error.
//!
//! ## Usage Example
//!
//! ```no_run
//! use xzzpcb_reader::{PcbFile, TopLevelBlock};
//!
//! fn main() -> xzzpcb_reader::Result<()> {
//!     let pcb = PcbFile::open("example.pcb")?;
//!
//!     for block in &pcb.main_data_block {
//!         if let TopLevelBlock::Data(data) = block {
//!             if let Some(part) = &data.parsed_data {
//!                 println!("Part: {}", part.header.part_group_name);
//!             }
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod pcb;

// Re-export the main types for convenience
pub use pcb::models::{
    ArcBlock, DataBlock, FileHeader, PartHeader, PartPayload, PayloadStatus, Pin, PinArray,
    SegmentBlock, SubBlock, TextBlock, TopLevelBlock, ViaBlock,
};
pub use pcb::{PcbError, PcbFile, Result};
