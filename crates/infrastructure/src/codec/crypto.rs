//! AES-256-CBC field encryption.
//!
//! Layout: `base64(iv || ciphertext)`, PKCS#7 padding, a fresh random IV per
//! value. The key is derived from a passphrase built into the binary, so
//! this hides secrets from casual reading of a `.wrp` file and nothing more.

use aes::Aes256;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use sha2::{Digest, Sha256};

use super::CodecError;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

const PASSPHRASE: &str = "wirepad.project-file.field-key.v1";
const BLOCK: usize = 16;

fn key() -> [u8; 32] {
    Sha256::digest(PASSPHRASE.as_bytes()).into()
}

/// Encrypts `plain`. The empty string stays empty.
#[must_use]
pub fn encrypt(plain: &str) -> String {
    if plain.is_empty() {
        return String::new();
    }

    let iv: [u8; BLOCK] = rand::random();
    let ciphertext = Aes256CbcEnc::new(&key().into(), &iv.into())
        .encrypt_padded_vec_mut::<Pkcs7>(plain.as_bytes());

    let mut out = Vec::with_capacity(BLOCK + ciphertext.len());
    out.extend_from_slice(&iv);
    out.extend_from_slice(&ciphertext);
    STANDARD.encode(out)
}

/// Reverses [`encrypt`].
///
/// # Errors
///
/// Returns [`CodecError`] for bad base64, truncated input, bad padding or
/// non-UTF-8 plaintext.
pub fn decrypt(stored: &str) -> Result<String, CodecError> {
    if stored.is_empty() {
        return Ok(String::new());
    }

    let bytes = STANDARD.decode(stored.trim())?;
    if bytes.len() < 2 * BLOCK || bytes.len() % BLOCK != 0 {
        return Err(CodecError::Truncated(bytes.len()));
    }

    let (iv, ciphertext) = bytes.split_at(BLOCK);
    let plain = Aes256CbcDec::new_from_slices(&key(), iv)
        .map_err(|_| CodecError::Truncated(bytes.len()))?
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CodecError::Padding)?;

    Ok(String::from_utf8(plain)?)
}
