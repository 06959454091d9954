//! Field codecs for the `.wrp` file format.
//!
//! Secrets are stored encrypted and long free text is stored compressed,
//! both as base64 strings. [`encrypted`] and [`compressed`] plug the codecs
//! into serde with `#[serde(with = "...")]`.

mod compression;
mod crypto;

pub use compression::{compress, decompress};
pub use crypto::{decrypt, encrypt};

use thiserror::Error;

/// Errors from decoding a stored field.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The stored text is not valid base64.
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The ciphertext is shorter than an IV plus one block, or not block aligned.
    #[error("ciphertext is truncated ({0} bytes)")]
    Truncated(usize),

    /// Decryption produced invalid padding, usually a wrong key or corrupt data.
    #[error("bad padding")]
    Padding,

    /// The decoded bytes are not UTF-8.
    #[error("decoded text is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// The compressed stream is corrupt.
    #[error("corrupt compressed data: {0}")]
    Io(#[from] std::io::Error),
}

/// serde adapter storing a `String` field encrypted.
pub mod encrypted {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Encrypts on the way out.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(value: &str, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::encrypt(value))
    }

    /// Decrypts on the way in.
    ///
    /// # Errors
    ///
    /// Fails when the stored value cannot be decrypted.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        let stored = String::deserialize(deserializer)?;
        super::decrypt(&stored).map_err(D::Error::custom)
    }
}

/// serde adapter storing a `String` field gzip-compressed.
pub mod compressed {
    use serde::de::Error as _;
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Compresses on the way out.
    ///
    /// # Errors
    ///
    /// Fails if compression fails.
    pub fn serialize<S: Serializer>(value: &str, serializer: S) -> Result<S::Ok, S::Error> {
        let packed = super::compress(value).map_err(S::Error::custom)?;
        serializer.serialize_str(&packed)
    }

    /// Decompresses on the way in.
    ///
    /// # Errors
    ///
    /// Fails when the stored value is not valid compressed text.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        let stored = String::deserialize(deserializer)?;
        super::decompress(&stored).map_err(D::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        #[serde(with = "super::encrypted")]
        secret: String,
        #[serde(with = "super::compressed")]
        notes: String,
    }

    #[test]
    fn test_fields_are_not_stored_in_clear() {
        let record = Record {
            secret: "hunter2".to_string(),
            notes: "remember the milk".to_string(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("hunter2"));
        assert!(!json.contains("milk"));

        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_empty_fields_stay_empty() {
        let record = Record {
            secret: String::new(),
            notes: String::new(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"secret":"","notes":""}"#);
        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_garbage_is_a_deserialize_error() {
        let result = serde_json::from_str::<Record>(r#"{"secret":"%%%","notes":""}"#);
        assert!(result.is_err());
    }
}
