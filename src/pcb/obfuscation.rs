//! Whole-file XOR de-obfuscation.
//!
//! Obfuscated files carry a single-byte XOR key at offset 0x10; plain
//! files have a zero there. The obfuscated region runs from the start of
//! the file up to an 11-byte plaintext marker sequence observed in sample
//! files (or the whole file when the marker is absent). No documented
//! field delimits the region, so the marker search must be preserved
//! exactly.

use log::{debug, trace};

/// Offset of the single-byte XOR key in the raw file.
pub const KEY_OFFSET: usize = 0x10;

/// Marker sequence that demarcates obfuscated content from plain trailing
/// content (`v6v6555v6v6`).
pub const PLAINTEXT_MARKER: [u8; 11] = [
    0x76, 0x36, 0x76, 0x36, 0x35, 0x35, 0x35, 0x76, 0x36, 0x76, 0x36,
];

/// De-obfuscate `buf` in place if it is obfuscated.
///
/// Returns the number of bytes that were XORed, or `None` when the key
/// byte is zero (or the buffer is too short to hold one) and the step is
/// a no-op. Applying the same XOR twice over the same length restores the
/// original bytes, which is how fixtures are authored.
pub fn deobfuscate_in_place(buf: &mut [u8]) -> Option<usize> {
    let key = match buf.get(KEY_OFFSET) {
        Some(&k) if k != 0 => k,
        _ => {
            trace!("Key byte at {:#x} is zero or absent, file is not obfuscated", KEY_OFFSET);
            return None;
        }
    };

    let length = obfuscated_length(buf);
    debug!("De-obfuscating {} bytes with XOR key {:#04x}", length, key);

    for byte in &mut buf[..length] {
        *byte ^= key;
    }
    Some(length)
}

/// Length of the obfuscated region: the offset of the first marker match,
/// or the entire buffer when no marker is found.
pub fn obfuscated_length(buf: &[u8]) -> usize {
    buf.windows(PLAINTEXT_MARKER.len())
        .position(|w| w == PLAINTEXT_MARKER)
        .unwrap_or(buf.len())
}
