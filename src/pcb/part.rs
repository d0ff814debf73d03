//! Decrypted part-payload parsing.
//!
//! The plaintext of a DATA block holds one component footprint: a fixed
//! part header followed by a heterogeneous list of sub-blocks (geometry,
//! labels, pin arrays). `part_size` from the header bounds the sub-block
//! scan; the pin-array inner loop is bounded by the *original encrypted*
//! block size instead, because cipher padding and the part-size clamp make
//! the plaintext length unreliable for repeated fixed-size records. That
//! bound is empirical and must be preserved exactly.

use log::{debug, trace, warn};

use super::cursor::ByteCursor;
use super::error::{PcbError, Result};
use super::models::{
    PartArc, PartHeader, PartLabel, PartLineSegment, PartPayload, Pin, PinArray, SubBlock,
};

/// Fixed-layout bytes skipped between `pin_shape` and `net_index`.
pub const PIN_FIXED_SKIP: usize = 23;
/// Padding bytes between successive pin records.
pub const PIN_RECORD_PADDING: usize = 13;

/// Parse one decrypted DATA payload.
///
/// `data_block_size` is the length of the original ciphertext, passed in
/// as external context for the pin-array bound. A malformed header is an
/// error; a truncated sub-block list is not, it yields a payload with
/// `complete == false` holding whatever was accumulated.
pub fn parse_part_payload(plaintext: &[u8], data_block_size: u32) -> Result<PartPayload> {
    let mut cur = ByteCursor::new(plaintext);
    let header = parse_part_header(&mut cur)
        .map_err(|e| PcbError::PartPayload(format!("header: {}", e)))?;
    debug!(
        "Part header: size={} pos=({}, {}) rot={} group={:?}",
        header.part_size, header.part_x, header.part_y, header.part_rotation,
        header.part_group_name
    );

    // part_size counts everything after its own 4-byte field; bytes beyond
    // 4 + part_size are not sub-block data and are excluded from the scan.
    let limit = plaintext
        .len()
        .min(4usize.saturating_add(header.part_size as usize));
    let working = &plaintext[..limit];
    let mut cur = {
        let pos = cur.position();
        let mut c = ByteCursor::new(working);
        c.set_position(pos);
        c
    };

    let mut sub_blocks = Vec::new();
    let mut complete = true;
    let mut pending_pin_record_size = 0usize;

    while cur.position() + pending_pin_record_size < working.len() {
        let tag_offset = cur.position();
        let tag = match cur.read_u8() {
            Ok(t) => t,
            Err(_) => {
                complete = false;
                break;
            }
        };

        let parsed = match tag {
            0x01 => parse_sub_arc(&mut cur).map(SubBlock::Arc),
            0x05 => parse_sub_line(&mut cur).map(SubBlock::LineSegment),
            0x06 => parse_sub_label(&mut cur).map(SubBlock::Label),
            0x09 => {
                let (array, truncated) = match parse_pin_array(&mut cur, data_block_size) {
                    Ok(pair) => pair,
                    Err(e) => {
                        warn!("Pin array truncated at {:#x}: {}", tag_offset, e);
                        complete = false;
                        break;
                    }
                };
                pending_pin_record_size = array.block_size as usize;
                sub_blocks.push(SubBlock::PinArray(array));
                if truncated {
                    complete = false;
                    break;
                }
                continue;
            }
            other => {
                // Unrecognized sub-type: end of the sub-block stream, not
                // an error.
                trace!(
                    "Sub-block type {:#04x} at {:#x} ends the scan",
                    other, tag_offset
                );
                break;
            }
        };

        match parsed {
            Ok(sub) => sub_blocks.push(sub),
            Err(e) => {
                warn!("Sub-block scan stopped at {:#x} (type {:#04x}): {}", tag_offset, tag, e);
                complete = false;
                break;
            }
        }
    }

    debug!(
        "Part payload: {} sub-blocks, complete={}",
        sub_blocks.len(),
        complete
    );
    Ok(PartPayload {
        header,
        sub_blocks,
        complete,
    })
}

/// Fixed part-header layout. Two 4-byte reserved regions (offsets 0x04 and
/// 0x14) are skipped even though unused.
fn parse_part_header(cur: &mut ByteCursor) -> Result<PartHeader> {
    let part_size = cur.read_u32()?;
    cur.skip(4)?;
    let part_x = cur.read_u32()?;
    let part_y = cur.read_u32()?;
    let part_rotation = cur.read_u32()?;
    cur.skip(4)?;
    let visibility = cur.read_u8()?;
    let part_group_name = cur.read_length_prefixed_string()?;
    Ok(PartHeader {
        part_size,
        part_x,
        part_y,
        part_rotation,
        visibility,
        part_group_name,
    })
}

/// Sub-type 0x01: layer and one coordinate pair; the rest of the block is
/// padding.
fn parse_sub_arc(cur: &mut ByteCursor) -> Result<PartArc> {
    let block_size = cur.read_u32()?;
    let layer = cur.read_u32()?;
    let x1 = cur.read_u32()?;
    let y1 = cur.read_u32()?;
    cur.skip((block_size as usize).saturating_sub(12))?;
    Ok(PartArc {
        block_size,
        layer,
        x1,
        y1,
    })
}

/// Sub-type 0x05.
fn parse_sub_line(cur: &mut ByteCursor) -> Result<PartLineSegment> {
    let block_size = cur.read_u32()?;
    let layer = cur.read_u32()?;
    let x1 = cur.read_u32()?;
    let y1 = cur.read_u32()?;
    let x2 = cur.read_u32()?;
    let y2 = cur.read_u32()?;
    let scale = cur.read_u32()?;
    cur.skip(4)?;
    Ok(PartLineSegment {
        block_size,
        layer,
        x1,
        y1,
        x2,
        y2,
        scale,
    })
}

/// Sub-type 0x06.
fn parse_sub_label(cur: &mut ByteCursor) -> Result<PartLabel> {
    let block_size = cur.read_u32()?;
    let layer = cur.read_u32()?;
    let x = cur.read_u32()?;
    let y = cur.read_u32()?;
    let font_size = cur.read_u32()?;
    let font_scale = cur.read_u32()?;
    cur.skip(4)?;
    let visibility = cur.read_u8()?;
    cur.skip(1)?;
    let label_size = cur.read_u32()?;
    let label = cur.read_string(label_size as usize)?;
    Ok(PartLabel {
        block_size,
        layer,
        x,
        y,
        font_size,
        font_scale,
        visibility,
        label_size,
        label,
    })
}

/// Sub-type 0x09: successive fixed-size pin records.
///
/// `block_size` here is the size of *one* record. Records repeat while
/// `cursor + block_size <= data_block_size`; the returned flag is true
/// when a record was cut short by the end of the buffer. A failed skip of
/// the trailing inter-record padding just ends the array, nothing is lost.
fn parse_pin_array(
    cur: &mut ByteCursor,
    data_block_size: u32,
) -> Result<(PinArray, bool)> {
    let block_size = cur.read_u32()?;
    let mut pins = Vec::new();
    let mut truncated = false;

    while cur.position() + block_size as usize <= data_block_size as usize {
        match parse_pin(cur) {
            Ok(pin) => pins.push(pin),
            Err(e) => {
                warn!("Pin record cut short after {} pins: {}", pins.len(), e);
                truncated = true;
                break;
            }
        }
        if cur.skip(PIN_RECORD_PADDING).is_err() {
            break;
        }
    }

    trace!("Pin array: record size {}, {} pins", block_size, pins.len());
    Ok((PinArray { block_size, pins }, truncated))
}

fn parse_pin(cur: &mut ByteCursor) -> Result<Pin> {
    let un1 = cur.read_u32()?;
    let x = cur.read_u32()?;
    let y = cur.read_u32()?;
    let un2 = cur.read_u32()?;
    let pin_rotation = cur.read_u32()?;
    let pin_name = cur.read_length_prefixed_string()?;
    let width = cur.read_u32()?;
    let height = cur.read_u32()?;
    let pin_shape = cur.read_u8()?;
    cur.skip(PIN_FIXED_SKIP)?;
    let net_index = cur.read_u32()?;
    Ok(Pin {
        un1,
        x,
        y,
        un2,
        pin_rotation,
        pin_name,
        width,
        height,
        pin_shape,
        net_index,
    })
}
