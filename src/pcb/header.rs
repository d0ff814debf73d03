//! File header parsing.
//!
//! The header occupies the first 0x44 bytes. Four u32 fields at fixed
//! offsets are all this reader needs; `main_data_blocks_size` sets the
//! byte budget for the block stream that follows.

use log::debug;

use super::cursor::ByteCursor;
use super::error::{PcbError, Result};
use super::models::FileHeader;

/// Offset of `header_addresses_size`.
pub const HEADER_ADDRESSES_SIZE_OFFSET: usize = 0x20;
/// Offset of `image_block_start`.
pub const IMAGE_BLOCK_START_OFFSET: usize = 0x24;
/// Offset of `net_block_start`.
pub const NET_BLOCK_START_OFFSET: usize = 0x28;
/// Offset of `main_data_blocks_size`.
pub const MAIN_DATA_BLOCKS_SIZE_OFFSET: usize = 0x40;
/// End of the fixed header; the main block stream starts here.
pub const HEADER_END: usize = 0x44;

/// Parse the fixed-offset header fields.
///
/// A buffer shorter than [`HEADER_END`] bytes is the one unrecoverable
/// input error; everything past the header degrades to partial results.
pub fn parse(buf: &[u8]) -> Result<FileHeader> {
    if buf.len() < HEADER_END {
        return Err(PcbError::HeaderTooShort {
            len: buf.len(),
            needed: HEADER_END,
        });
    }

    let mut cur = ByteCursor::new(buf);
    cur.set_position(HEADER_ADDRESSES_SIZE_OFFSET);
    let header_addresses_size = cur.read_u32()?;
    let image_block_start = cur.read_u32()?;
    let net_block_start = cur.read_u32()?;
    cur.set_position(MAIN_DATA_BLOCKS_SIZE_OFFSET);
    let main_data_blocks_size = cur.read_u32()?;

    let header = FileHeader {
        header_addresses_size,
        image_block_start,
        net_block_start,
        main_data_blocks_size,
    };
    debug!(
        "Header parsed: addresses={} image_start={:#x} net_start={:#x} main_data={} bytes",
        header.header_addresses_size,
        header.image_block_start,
        header.net_block_start,
        header.main_data_blocks_size
    );
    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::{ByteOrder, LittleEndian};

    #[test]
    fn reads_fields_at_fixed_offsets() {
        let mut buf = vec![0u8; HEADER_END];
        LittleEndian::write_u32(&mut buf[HEADER_ADDRESSES_SIZE_OFFSET..], 0x100);
        LittleEndian::write_u32(&mut buf[IMAGE_BLOCK_START_OFFSET..], 0x2000);
        LittleEndian::write_u32(&mut buf[NET_BLOCK_START_OFFSET..], 0x3000);
        LittleEndian::write_u32(&mut buf[MAIN_DATA_BLOCKS_SIZE_OFFSET..], 1234);

        let header = parse(&buf).unwrap();
        assert_eq!(header.header_addresses_size, 0x100);
        assert_eq!(header.image_block_start, 0x2000);
        assert_eq!(header.net_block_start, 0x3000);
        assert_eq!(header.main_data_blocks_size, 1234);
    }

    #[test]
    fn short_buffer_is_unrecoverable() {
        let err = parse(&[0u8; HEADER_END - 1]).unwrap_err();
        assert!(matches!(
            err,
            PcbError::HeaderTooShort { len, needed } if len == HEADER_END - 1 && needed == HEADER_END
        ));
    }
}
