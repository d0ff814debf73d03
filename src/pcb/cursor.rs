//! Bounds-checked little-endian cursor over a byte buffer.

use byteorder::{ByteOrder, LittleEndian};

use super::error::{PcbError, Result};

/// Sequential reader over `&[u8]` with an explicit offset.
///
/// Every `read_*` advances the offset by the access width; `peek_*` does
/// not. Reading past the end fails with [`PcbError::OutOfBounds`], which
/// the scan loops treat as "stop scanning" rather than a fatal error.
///
/// The cursor is a plain value with no shared state, so independent
/// buffers can be parsed in parallel freely.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current offset into the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Move the cursor to an absolute offset. Offsets past the end are
    /// allowed; the next read will fail instead.
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Bytes remaining after the cursor.
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    fn check(&self, n: usize) -> Result<()> {
        if self.remaining() < n {
            return Err(PcbError::OutOfBounds {
                offset: self.pos,
                requested: n,
                len: self.buf.len(),
            });
        }
        Ok(())
    }

    /// Advance over `n` bytes without decoding them.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.check(n)?;
        self.pos += n;
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.check(1)?;
        let v = self.buf[self.pos];
        self.pos += 1;
        Ok(v)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.check(2)?;
        let v = LittleEndian::read_u16(&self.buf[self.pos..]);
        self.pos += 2;
        Ok(v)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.check(4)?;
        let v = LittleEndian::read_u32(&self.buf[self.pos..]);
        self.pos += 4;
        Ok(v)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.check(4)?;
        let v = LittleEndian::read_i32(&self.buf[self.pos..]);
        self.pos += 4;
        Ok(v)
    }

    /// Read the next u32 without advancing.
    pub fn peek_u32(&self) -> Result<u32> {
        self.check(4)?;
        Ok(LittleEndian::read_u32(&self.buf[self.pos..]))
    }

    /// Borrow the next `n` bytes and advance over them.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.check(n)?;
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Consume exactly `n` bytes and decode them as UTF-8, best-effort.
    /// Malformed sequences are replaced, never an error.
    pub fn read_string(&mut self, n: usize) -> Result<String> {
        let bytes = self.read_bytes(n)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Read a u32 byte length followed by exactly that many UTF-8 bytes.
    ///
    /// Every variable-length string field in the format is stored this way.
    pub fn read_length_prefixed_string(&mut self) -> Result<String> {
        let len = self.read_u32()? as usize;
        self.read_string(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_are_little_endian_and_advance() {
        let data = [0x01u8, 0x02, 0x03, 0x04, 0xFF, 0xFF, 0xFF, 0xFF];
        let mut cur = ByteCursor::new(&data);
        assert_eq!(cur.read_u32().unwrap(), 0x04030201);
        assert_eq!(cur.position(), 4);
        assert_eq!(cur.read_i32().unwrap(), -1);
        assert_eq!(cur.remaining(), 0);
    }

    #[test]
    fn peek_does_not_advance() {
        let data = [0x2Au8, 0, 0, 0];
        let mut cur = ByteCursor::new(&data);
        assert_eq!(cur.peek_u32().unwrap(), 42);
        assert_eq!(cur.position(), 0);
        assert_eq!(cur.read_u32().unwrap(), 42);
    }

    #[test]
    fn out_of_bounds_read_reports_offsets() {
        let data = [0u8; 3];
        let mut cur = ByteCursor::new(&data);
        cur.skip(2).unwrap();
        match cur.read_u32() {
            Err(PcbError::OutOfBounds {
                offset,
                requested,
                len,
            }) => {
                assert_eq!((offset, requested, len), (2, 4, 3));
            }
            other => panic!("expected OutOfBounds, got {:?}", other),
        }
    }

    #[test]
    fn length_prefixed_string_is_lossy() {
        let mut data = vec![3u8, 0, 0, 0];
        data.extend([0x41, 0xFF, 0x42]);
        let mut cur = ByteCursor::new(&data);
        let s = cur.read_length_prefixed_string().unwrap();
        assert_eq!(s, "A\u{FFFD}B");
        assert_eq!(cur.remaining(), 0);
    }
}
