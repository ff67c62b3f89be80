//! `0x`-prefixed hex encoding for fixed 32-byte values.
//!
//! Usable as `#[serde(with = "crate::hex32")]` on `[u8; 32]` fields.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serializer};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HexError {
    #[error("invalid hex encoding: {0}")]
    Encoding(#[from] hex::FromHexError),
    #[error("expected 32 bytes, got {0}")]
    Length(usize),
}

pub fn encode(bytes: &[u8; 32]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Parses 64 hex digits, with or without a `0x` prefix.
pub fn decode(value: &str) -> Result<[u8; 32], HexError> {
    let stripped = value.strip_prefix("0x").unwrap_or(value);
    let raw = hex::decode(stripped)?;
    <[u8; 32]>::try_from(raw.as_slice()).map_err(|_| HexError::Length(raw.len()))
}

pub fn serialize<S>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&encode(bytes))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<[u8; 32], D::Error>
where
    D: Deserializer<'de>,
{
    let encoded = String::deserialize(deserializer)?;
    decode(&encoded).map_err(D::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_accepts_optional_prefix() {
        let bytes = [0xabu8; 32];
        let encoded = encode(&bytes);
        assert!(encoded.starts_with("0xabab"));
        assert_eq!(decode(&encoded).unwrap(), bytes);
        assert_eq!(decode(&encoded[2..]).unwrap(), bytes);
    }

    #[test]
    fn decode_rejects_wrong_length() {
        assert_eq!(decode("0x0102"), Err(HexError::Length(2)));
        assert!(matches!(decode("zz"), Err(HexError::Encoding(_))));
    }
}
