//! Top-level block scanning.
//!
//! The main data stream is a sequence of typed, variable-length records
//! starting at 0x44 and running for `main_data_blocks_size` bytes. Each
//! iteration first treats a zero u32 as inter-block padding, then reads a
//! one-byte tag and dispatches. Skip-type tags (0x03/0x04/0x08/0x09) and
//! unknown tags emit nothing; failures are contained so a corrupt tail
//! yields a partial block list instead of an error.

use log::{debug, info, trace, warn};

use super::cursor::ByteCursor;
use super::error::Result;
use super::header::HEADER_END;
use super::models::{
    ArcBlock, DataBlock, FileHeader, PayloadStatus, SegmentBlock, TextBlock, TopLevelBlock,
    ViaBlock,
};
use super::{crypto, part};

/// Scan the main block stream and return the emitted blocks in file order.
///
/// The scan stops at `0x44 + main_data_blocks_size` (clamped to the buffer
/// length), or earlier when a block read runs out of bounds; whatever was
/// decoded up to that point is kept.
pub fn parse_main_blocks(buf: &[u8], header: &FileHeader) -> Vec<TopLevelBlock> {
    let end_offset = (HEADER_END + header.main_data_blocks_size as usize).min(buf.len());
    info!(
        "Scanning main data blocks: {:#x}..{:#x}",
        HEADER_END, end_offset
    );

    let mut cur = ByteCursor::new(buf);
    cur.set_position(HEADER_END);
    let mut blocks = Vec::new();

    while cur.position() < end_offset {
        // A zero u32 at the cursor is padding, not a block. Fewer than four
        // bytes left means nothing further can be decoded.
        match cur.peek_u32() {
            Ok(0) => {
                let _ = cur.skip(4);
                continue;
            }
            Ok(_) => {}
            Err(_) => break,
        }

        let tag_offset = cur.position();
        let tag = match cur.read_u8() {
            Ok(t) => t,
            Err(_) => break,
        };

        let parsed = match tag {
            0x01 => parse_arc(&mut cur).map(|b| Some(TopLevelBlock::Arc(b))),
            0x02 => parse_via(&mut cur).map(|b| Some(TopLevelBlock::Via(b))),
            0x03 | 0x09 => skip_sized(&mut cur, tag).map(|_| None),
            0x04 | 0x08 => {
                trace!("Skipping 1-byte block type {:#04x} at {:#x}", tag, tag_offset);
                cur.skip(1).map(|_| None)
            }
            0x05 => parse_segment(&mut cur).map(|b| Some(TopLevelBlock::Segment(b))),
            0x06 => parse_text(&mut cur).map(|b| Some(TopLevelBlock::Text(b))),
            0x07 => parse_data(&mut cur).map(|b| Some(TopLevelBlock::Data(b))),
            other => {
                // The tag's true length is unknown, so scanning continues
                // from the current cursor. Best-effort: this can
                // desynchronize the stream.
                debug!(
                    "Unknown block type {:#04x} at {:#x}, continuing at next byte",
                    other, tag_offset
                );
                Ok(None)
            }
        };

        match parsed {
            Ok(Some(block)) => blocks.push(block),
            Ok(None) => {}
            Err(e) => {
                warn!(
                    "Stopping block scan at {:#x} (type {:#04x}): {}",
                    tag_offset, tag, e
                );
                break;
            }
        }
    }

    info!("Main data block scan produced {} blocks", blocks.len());
    blocks
}

/// Tag 0x01. `block_size` is the first of nine fixed fields; it does not
/// bound the read.
fn parse_arc(cur: &mut ByteCursor) -> Result<ArcBlock> {
    Ok(ArcBlock {
        block_size: cur.read_u32()?,
        layer: cur.read_u32()?,
        x1: cur.read_i32()?,
        y1: cur.read_i32()?,
        r: cur.read_i32()?,
        angle_start: cur.read_i32()?,
        angle_end: cur.read_i32()?,
        scale: cur.read_i32()?,
        unknown: cur.read_u32()?,
    })
}

/// Tag 0x02.
fn parse_via(cur: &mut ByteCursor) -> Result<ViaBlock> {
    Ok(ViaBlock {
        block_size: cur.read_u32()?,
        x: cur.read_i32()?,
        y: cur.read_i32()?,
        outer_radius: cur.read_i32()?,
        inner_radius: cur.read_i32()?,
        layer_a_index: cur.read_u32()?,
        layer_b_index: cur.read_u32()?,
        net_index: cur.read_u32()?,
        via_text: cur.read_length_prefixed_string()?,
    })
}

/// Tag 0x05.
fn parse_segment(cur: &mut ByteCursor) -> Result<SegmentBlock> {
    Ok(SegmentBlock {
        block_size: cur.read_u32()?,
        layer: cur.read_u32()?,
        x1: cur.read_i32()?,
        y1: cur.read_i32()?,
        x2: cur.read_i32()?,
        y2: cur.read_i32()?,
        scale: cur.read_i32()?,
        trace_net_index: cur.read_u32()?,
    })
}

/// Tag 0x06.
fn parse_text(cur: &mut ByteCursor) -> Result<TextBlock> {
    let block_size = cur.read_u32()?;
    let unknown1 = cur.read_u32()?;
    let pos_x = cur.read_u32()?;
    let pos_y = cur.read_u32()?;
    let text_size = cur.read_u32()?;
    let divider = cur.read_u32()?;
    let empty = cur.read_u32()?;
    let one = cur.read_u16()?;
    let text_length = cur.read_u32()?;
    let text = cur.read_string(text_length as usize)?;
    Ok(TextBlock {
        block_size,
        unknown1,
        pos_x,
        pos_y,
        text_size,
        divider,
        empty,
        one,
        text_length,
        text,
    })
}

/// Tag 0x07. Cipher and sub-parse failures are contained here: the block
/// is still emitted, with the degradation recorded in its status.
fn parse_data(cur: &mut ByteCursor) -> Result<DataBlock> {
    let block_size = cur.read_u32()?;
    let ciphertext = cur.read_bytes(block_size as usize)?.to_vec();

    let block = match crypto::decrypt_part_block(&ciphertext) {
        Ok(decrypted) => match part::parse_part_payload(&decrypted, block_size) {
            Ok(payload) => DataBlock {
                block_size,
                ciphertext,
                decrypted,
                parsed_data: Some(payload),
                status: PayloadStatus::Parsed,
            },
            Err(e) => {
                warn!("Part payload parse failed, keeping plaintext only: {}", e);
                DataBlock {
                    block_size,
                    ciphertext,
                    decrypted,
                    parsed_data: None,
                    status: PayloadStatus::SubParseFailed(e.to_string()),
                }
            }
        },
        Err(e) => {
            warn!("Part-block decryption failed, falling back to raw bytes: {}", e);
            DataBlock {
                block_size,
                decrypted: ciphertext.clone(),
                ciphertext,
                parsed_data: None,
                status: PayloadStatus::CipherFallback(e.to_string()),
            }
        }
    };
    Ok(block)
}

/// Tags 0x03 and 0x09: a size field followed by that many opaque bytes.
fn skip_sized(cur: &mut ByteCursor, tag: u8) -> Result<()> {
    let block_size = cur.read_u32()?;
    trace!("Skipping {} bytes of block type {:#04x}", block_size, tag);
    cur.skip(block_size as usize)
}
