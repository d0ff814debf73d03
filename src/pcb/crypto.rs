//! DES decryption of part-block payloads.
//!
//! DATA (0x07) block bodies are DES-encrypted in ECB mode with PKCS#7
//! padding under a fixed key. The key is constant across all observed
//! files; it is part of the wire contract, not configuration.

use des::Des;
use ecb::cipher::block_padding::Pkcs7;
use ecb::cipher::{BlockDecryptMut, BlockEncryptMut, KeyInit};
use log::trace;

use super::error::{PcbError, Result};

/// Fixed DES key for part-block payloads (hex `DCFC12AC00000000`).
pub const PART_BLOCK_KEY: [u8; 8] = [0xDC, 0xFC, 0x12, 0xAC, 0x00, 0x00, 0x00, 0x00];

/// DES block size in bytes.
pub const DES_BLOCK_SIZE: usize = 8;

type PartBlockDecryptor = ecb::Decryptor<Des>;
type PartBlockEncryptor = ecb::Encryptor<Des>;

/// Decrypt a part-block payload and strip its PKCS#7 padding.
///
/// The input length must be a positive multiple of the DES block size;
/// anything else is a hard [`PcbError::CipherInput`]. The caller at the
/// DATA-block boundary catches both error variants and falls back to the
/// raw ciphertext.
pub fn decrypt_part_block(ciphertext: &[u8]) -> Result<Vec<u8>> {
    if ciphertext.is_empty() || ciphertext.len() % DES_BLOCK_SIZE != 0 {
        return Err(PcbError::CipherInput {
            len: ciphertext.len(),
            block_size: DES_BLOCK_SIZE,
        });
    }

    trace!("Decrypting {} bytes of part-block ciphertext", ciphertext.len());
    PartBlockDecryptor::new(&PART_BLOCK_KEY.into())
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| PcbError::Decryption("PKCS#7 unpadding failed".to_string()))
}

/// Encrypt a plaintext the way the format does (ECB + PKCS#7, fixed key).
///
/// The reader never needs this; it exists so tests and tooling can author
/// DATA-block fixtures that round-trip through [`decrypt_part_block`].
pub fn encrypt_part_block(plaintext: &[u8]) -> Vec<u8> {
    PartBlockEncryptor::new(&PART_BLOCK_KEY.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encrypt_decrypt_round_trip() {
        for len in [1usize, 7, 8, 9, 24, 100] {
            let plaintext: Vec<u8> = (0..len).map(|i| i as u8).collect();
            let ciphertext = encrypt_part_block(&plaintext);
            assert_eq!(ciphertext.len() % DES_BLOCK_SIZE, 0);
            // PKCS#7 always pads, so the ciphertext covers at least one
            // extra byte.
            assert!(ciphertext.len() > plaintext.len());
            let decrypted = decrypt_part_block(&ciphertext).unwrap();
            assert_eq!(decrypted, plaintext);
        }
    }

    #[test]
    fn misaligned_input_is_rejected() {
        for len in [1usize, 7, 9, 15] {
            let data = vec![0u8; len];
            let err = decrypt_part_block(&data).unwrap_err();
            assert!(matches!(err, PcbError::CipherInput { len: l, .. } if l == len));
        }
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(
            decrypt_part_block(&[]),
            Err(PcbError::CipherInput { len: 0, .. })
        ));
    }

    #[test]
    fn invalid_padding_fails_unpadding() {
        // Encrypting eight zero bytes yields two blocks; the first alone
        // decrypts back to all zeros, and a 0x00 pad byte is never valid
        // PKCS#7.
        let ciphertext = encrypt_part_block(&[0u8; 8]);
        assert_eq!(ciphertext.len(), 16);
        let err = decrypt_part_block(&ciphertext[..8]).unwrap_err();
        assert!(matches!(err, PcbError::Decryption(_)));
    }
}
