//! gzip + base64 text packing.

use std::io::{Read, Write};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;

use super::CodecError;

/// Compresses `text`. The empty string stays empty.
///
/// # Errors
///
/// Returns [`CodecError::Io`] if the encoder fails.
pub fn compress(text: &str) -> Result<String, CodecError> {
    if text.is_empty() {
        return Ok(String::new());
    }

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes())?;
    let packed = encoder.finish()?;
    Ok(STANDARD.encode(packed))
}

/// Reverses [`compress`].
///
/// # Errors
///
/// Returns [`CodecError`] for bad base64, a corrupt stream or non-UTF-8
/// content.
pub fn decompress(stored: &str) -> Result<String, CodecError> {
    if stored.is_empty() {
        return Ok(String::new());
    }

    let packed = STANDARD.decode(stored.trim())?;
    let mut decoder = GzDecoder::new(packed.as_slice());
    let mut bytes = Vec::new();
    decoder.read_to_end(&mut bytes)?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_round_trip() {
        let body = r#"{"users": [1, 2, 3], "note": "ünïcödé"}"#;
        assert_eq!(decompress(&compress(body).unwrap()).unwrap(), body);
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(compress("").unwrap(), "");
        assert_eq!(decompress("").unwrap(), "");
    }

    #[test]
    fn test_repetitive_text_shrinks() {
        let text = "lorem ipsum ".repeat(500);
        assert!(compress(&text).unwrap().len() < text.len() / 4);
    }

    #[test]
    fn test_rejects_plain_base64() {
        let not_gzip = STANDARD.encode("hello");
        assert!(matches!(decompress(&not_gzip), Err(CodecError::Io(_))));
    }
}
