//! Custom error types for the xzzpcb-reader crate.

use thiserror::Error;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum PcbError {
    /// An error originating from I/O operations (file loading only).
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// The buffer is too short to contain the fixed-layout file header.
    ///
    /// This is the only unrecoverable input error: every later failure is
    /// contained at a block boundary and yields a partial result instead.
    #[error("File too short for header: {len} bytes, need at least {needed}")]
    HeaderTooShort { len: usize, needed: usize },

    /// A cursor read would run past the end of the buffer.
    ///
    /// Scan loops treat this as "stop scanning", not as a fatal condition.
    #[error("Read of {requested} bytes at offset {offset:#x} exceeds buffer length {len}")]
    OutOfBounds {
        offset: usize,
        requested: usize,
        len: usize,
    },

    /// Part-block ciphertext is not a positive multiple of the DES block size.
    #[error("Ciphertext length {len} is not a positive multiple of {block_size} bytes")]
    CipherInput { len: usize, block_size: usize },

    /// DES decryption produced data that failed PKCS#7 unpadding.
    #[error("Decryption failed: {0}")]
    Decryption(String),

    /// The decrypted part payload was malformed before any sub-block could
    /// be read (a truncated or partial sub-block list is not an error).
    #[error("Part payload parse failed: {0}")]
    PartPayload(String),
}

/// A convenience `Result` type alias using the crate's `PcbError` type.
pub type Result<T> = std::result::Result<T, PcbError>;
