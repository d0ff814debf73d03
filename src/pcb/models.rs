//! Data structures representing XZZ `.pcb` format components.
//!
//! Everything here is created fresh per parse and immutable afterwards.
//! `TopLevelBlock` and `SubBlock` serialize as single-key tagged objects
//! (`{"VIA": {...}}`), which is the exact shape the rendering side consumes.

use serde::Serialize;

/// Fixed-offset file header fields.
///
/// Read once from offsets 0x20/0x24/0x28/0x40; `main_data_blocks_size` is
/// the byte budget for the block stream that starts at 0x44.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FileHeader {
    pub header_addresses_size: u32,
    pub image_block_start: u32,
    pub net_block_start: u32,
    pub main_data_blocks_size: u32,
}

/// One top-level block of the main data stream, in file order.
///
/// Skip-type tags (0x03/0x04/0x08/0x09) and unknown tags produce no block.
#[derive(Debug, Clone, Serialize)]
pub enum TopLevelBlock {
    #[serde(rename = "ARC")]
    Arc(ArcBlock),
    #[serde(rename = "VIA")]
    Via(ViaBlock),
    #[serde(rename = "SEGMENT")]
    Segment(SegmentBlock),
    #[serde(rename = "TEXT")]
    Text(TextBlock),
    #[serde(rename = "DATA")]
    Data(DataBlock),
}

/// Tag 0x01. `block_size` is part of the 9-field fixed layout, it does not
/// bound the read.
#[derive(Debug, Clone, Serialize)]
pub struct ArcBlock {
    pub block_size: u32,
    pub layer: u32,
    pub x1: i32,
    pub y1: i32,
    pub r: i32,
    pub angle_start: i32,
    pub angle_end: i32,
    pub scale: i32,
    pub unknown: u32,
}

/// Tag 0x02. Coordinates and radii are raw integer units; scaling is the
/// renderer's concern, as is resolving `net_index` against the net table.
#[derive(Debug, Clone, Serialize)]
pub struct ViaBlock {
    pub block_size: u32,
    pub x: i32,
    pub y: i32,
    pub outer_radius: i32,
    pub inner_radius: i32,
    pub layer_a_index: u32,
    pub layer_b_index: u32,
    pub net_index: u32,
    pub via_text: String,
}

/// Tag 0x05.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentBlock {
    pub block_size: u32,
    pub layer: u32,
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    pub scale: i32,
    pub trace_net_index: u32,
}

/// Tag 0x06. `text_length` is redundant with `text` but is part of the
/// output contract.
#[derive(Debug, Clone, Serialize)]
pub struct TextBlock {
    pub block_size: u32,
    pub unknown1: u32,
    pub pos_x: u32,
    pub pos_y: u32,
    pub text_size: u32,
    pub divider: u32,
    pub empty: u32,
    pub one: u16,
    pub text_length: u32,
    pub text: String,
}

/// Tag 0x07. Body is DES-encrypted; `block_size` is the ciphertext length.
///
/// `parsed_data` is `None` when decryption or sub-parsing failed; both are
/// non-fatal, and `status` records which degradation (if any) occurred.
#[derive(Debug, Clone, Serialize)]
pub struct DataBlock {
    pub block_size: u32,
    pub ciphertext: Vec<u8>,
    pub decrypted: Vec<u8>,
    pub parsed_data: Option<PartPayload>,
    #[serde(skip)]
    pub status: PayloadStatus,
}

/// Outcome of the decrypt-then-reparse chain for one DATA block.
///
/// Degradation is represented as data so callers can inspect it instead of
/// scraping logs; it is not part of the serialized output shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadStatus {
    /// Decryption and sub-parsing both succeeded.
    Parsed,
    /// Decryption failed; `decrypted` holds the raw ciphertext bytes and
    /// sub-parsing was skipped.
    CipherFallback(String),
    /// Decryption succeeded but the plaintext was malformed before any
    /// sub-block could be read.
    SubParseFailed(String),
}

/// Decrypted contents of one DATA block: a part header plus its sub-blocks.
#[derive(Debug, Clone, Serialize)]
pub struct PartPayload {
    pub header: PartHeader,
    pub sub_blocks: Vec<SubBlock>,
    /// False when the sub-block loop stopped early on an out-of-bounds read
    /// and `sub_blocks` is a partial result. Not serialized.
    #[serde(skip)]
    pub complete: bool,
}

/// Fixed-layout header of a decrypted part payload.
///
/// `part_size` counts every byte after its own 4-byte field and bounds the
/// sub-block scan.
#[derive(Debug, Clone, Serialize)]
pub struct PartHeader {
    pub part_size: u32,
    pub part_x: u32,
    pub part_y: u32,
    pub part_rotation: u32,
    pub visibility: u8,
    pub part_group_name: String,
}

/// One sub-block of a decrypted part payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubBlock {
    /// Tag 0x01: arc-like geometry.
    Arc(PartArc),
    /// Tag 0x05: line segment.
    LineSegment(PartLineSegment),
    /// Tag 0x06: text label.
    Label(PartLabel),
    /// Tag 0x09: array of pin records.
    PinArray(PinArray),
}

#[derive(Debug, Clone, Serialize)]
pub struct PartArc {
    pub block_size: u32,
    pub layer: u32,
    pub x1: u32,
    pub y1: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PartLineSegment {
    pub block_size: u32,
    pub layer: u32,
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
    pub scale: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PartLabel {
    pub block_size: u32,
    pub layer: u32,
    pub x: u32,
    pub y: u32,
    pub font_size: u32,
    pub font_scale: u32,
    pub visibility: u8,
    pub label_size: u32,
    pub label: String,
}

/// Tag 0x09. `block_size` is the size of one pin record, not of the array;
/// the record count is bounded by the original encrypted block size.
#[derive(Debug, Clone, Serialize)]
pub struct PinArray {
    pub block_size: u32,
    pub pins: Vec<Pin>,
}

/// One electrical terminal of a part.
#[derive(Debug, Clone, Serialize)]
pub struct Pin {
    pub un1: u32,
    pub x: u32,
    pub y: u32,
    pub un2: u32,
    pub pin_rotation: u32,
    pub pin_name: String,
    pub width: u32,
    pub height: u32,
    pub pin_shape: u8,
    pub net_index: u32,
}
