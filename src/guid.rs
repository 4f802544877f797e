//! IFC GlobalId compression.
//!
//! An IFC `GloballyUniqueId` is a 128-bit GUID written as 22 base-64 digits
//! over the alphabet `0-9 A-Z a-z _ $`. The GUID is regrouped into six
//! chunks: the top 8 bits of `Data1` (2 digits), then five 24-bit chunks
//! (4 digits each), most significant digit first.
//!
//! ```
//! use ifc_writer::guid::{compress, expand};
//! use uuid::Uuid;
//!
//! let guid = Uuid::parse_str("3f2504e0-4f89-11d3-9a0c-0305e82c3301").unwrap();
//! let global_id = compress(guid).unwrap();
//! assert_eq!(global_id.as_str().len(), 22);
//! assert_eq!(expand(global_id.as_str()).unwrap(), guid);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EncodeError, GuidError};

/// Digits, upper case, lower case, then `_` and `$`.
const ALPHABET: &[u8; 64] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz_$";

/// Length of a compressed GlobalId.
pub const COMPRESSED_LEN: usize = 22;

/// Digit width of each chunk, in emission order.
const CHUNK_DIGITS: [usize; 6] = [2, 4, 4, 4, 4, 4];

/// A 22-character compressed GlobalId.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CompressedGuid(String);

impl CompressedGuid {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Recovers the GUID this string was compressed from.
    #[must_use]
    pub fn to_uuid(&self) -> Uuid {
        // Validated on construction, so the expansion cannot fail.
        decode_chunks(self.0.as_bytes()).map_or(Uuid::nil(), Uuid::from_bytes)
    }
}

impl fmt::Display for CompressedGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CompressedGuid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CompressedGuid {
    type Err = GuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_chunks(s.as_bytes())?;
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for CompressedGuid {
    type Error = GuidError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        decode_chunks(s.as_bytes())?;
        Ok(Self(s))
    }
}

impl From<CompressedGuid> for String {
    fn from(guid: CompressedGuid) -> Self {
        guid.0
    }
}

/// Generates a random (v4) GUID.
#[must_use]
pub fn new_guid() -> Uuid {
    Uuid::new_v4()
}

/// Generates a fresh compressed GlobalId.
pub fn new_global_id() -> Result<CompressedGuid, EncodeError> {
    compress(new_guid())
}

/// Compresses a GUID into its 22-character GlobalId form.
///
/// # Errors
///
/// Returns [`EncodeError::GuidOverflow`] if a chunk does not fit its digit
/// width. The chunking guarantees this never happens for a 128-bit input.
pub fn compress(guid: Uuid) -> Result<CompressedGuid, EncodeError> {
    let num = split_chunks(guid.as_bytes());

    let mut out = String::with_capacity(COMPRESSED_LEN);
    for (chunk, (&value, &digits)) in num.iter().zip(CHUNK_DIGITS.iter()).enumerate() {
        push_base64(&mut out, chunk, value, digits)?;
    }
    Ok(CompressedGuid(out))
}

/// Expands a 22-character GlobalId back into its GUID.
pub fn expand(global_id: &str) -> Result<Uuid, GuidError> {
    decode_chunks(global_id.as_bytes()).map(Uuid::from_bytes)
}

/// Reads a GUID written either as a UUID (any form `uuid` accepts) or as a
/// compressed GlobalId.
pub fn parse_any(s: &str) -> Result<Uuid, GuidError> {
    if s.len() == COMPRESSED_LEN {
        expand(s)
    } else {
        Ok(Uuid::parse_str(s)?)
    }
}

/// Regroups the 16 GUID bytes (`Data1`..`Data4` in big-endian layout) into
/// the six chunks of the compressed form.
fn split_chunks(b: &[u8; 16]) -> [u32; 6] {
    let data1 = u32::from_be_bytes([b[0], b[1], b[2], b[3]]);
    let be24 = |hi: u8, mid: u8, lo: u8| (u32::from(hi) << 16) | (u32::from(mid) << 8) | u32::from(lo);

    [
        data1 >> 24,
        data1 & 0x00FF_FFFF,
        be24(b[4], b[5], b[6]),
        be24(b[7], b[8], b[9]),
        be24(b[10], b[11], b[12]),
        be24(b[13], b[14], b[15]),
    ]
}

fn push_base64(out: &mut String, chunk: usize, value: u32, digits: usize) -> Result<(), EncodeError> {
    let mut buf = [0u8; 4];
    let mut act = value;
    for slot in buf[..digits].iter_mut().rev() {
        *slot = ALPHABET[(act % 64) as usize];
        act /= 64;
    }
    if act != 0 {
        return Err(EncodeError::GuidOverflow {
            chunk,
            value,
            digits,
        });
    }
    out.extend(buf[..digits].iter().map(|&c| char::from(c)));
    Ok(())
}

fn digit_value(ch: u8, position: usize) -> Result<u32, GuidError> {
    let value = match ch {
        b'0'..=b'9' => ch - b'0',
        b'A'..=b'Z' => ch - b'A' + 10,
        b'a'..=b'z' => ch - b'a' + 36,
        b'_' => 62,
        b'$' => 63,
        _ => {
            return Err(GuidError::InvalidCharacter {
                ch: char::from(ch),
                position,
            })
        }
    };
    Ok(u32::from(value))
}

fn decode_chunks(s: &[u8]) -> Result<[u8; 16], GuidError> {
    if s.len() != COMPRESSED_LEN {
        return Err(GuidError::InvalidLength { len: s.len() });
    }

    let mut num = [0u32; 6];
    let mut position = 0;
    for (slot, &digits) in num.iter_mut().zip(CHUNK_DIGITS.iter()) {
        for &ch in &s[position..position + digits] {
            *slot = *slot * 64 + digit_value(ch, position)?;
            position += 1;
        }
    }

    if num[0] > 0xFF {
        return Err(GuidError::OutOfRange {
            value: String::from_utf8_lossy(s).into_owned(),
        });
    }

    let data1 = ((num[0] << 24) | num[1]).to_be_bytes();
    let mut bytes = [0u8; 16];
    bytes[..4].copy_from_slice(&data1);
    for (i, chunk) in num[2..].iter().enumerate() {
        let [_, hi, mid, lo] = chunk.to_be_bytes();
        bytes[4 + i * 3..7 + i * 3].copy_from_slice(&[hi, mid, lo]);
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_nil_and_max() {
        assert_eq!(compress(Uuid::nil()).unwrap().as_str(), "0000000000000000000000");
        assert_eq!(compress(Uuid::from_bytes([0xFF; 16])).unwrap().as_str(), "3$$$$$$$$$$$$$$$$$$$$$");
        assert_eq!(expand("3$$$$$$$$$$$$$$$$$$$$$").unwrap(), Uuid::from_bytes([0xFF; 16]));
    }

    #[test]
    fn test_known_value() {
        let guid = Uuid::parse_str("75f9cd1c-b2a5-4b43-8d9a-4ca5d0c0d8b8").unwrap();
        let global_id = compress(guid).unwrap();
        assert_eq!(global_id.as_str(), "1r_SqSigLBGusQJANGmDYu");
        assert_eq!(global_id.to_uuid(), guid);
    }

    #[test]
    fn test_chunk_layout() {
        let guid = Uuid::from_bytes([
            0x01, 0x00, 0x00, 0x01, 0, 0, 0x01, 0, 0, 0x02, 0, 0, 0x03, 0, 0, 0x04,
        ]);
        assert_eq!(
            split_chunks(guid.as_bytes()),
            [0x01, 0x01, 0x01, 0x02, 0x03, 0x04]
        );
        assert_eq!(compress(guid).unwrap().as_str(), "0100010001000200030004");
    }

    #[test]
    fn test_overflow_is_rejected() {
        let mut out = String::new();
        let err = push_base64(&mut out, 0, 64 * 64, 2).unwrap_err();
        assert_eq!(
            err,
            EncodeError::GuidOverflow {
                chunk: 0,
                value: 4096,
                digits: 2
            }
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_expand_rejects_bad_input() {
        assert_eq!(expand("abc"), Err(GuidError::InvalidLength { len: 3 }));
        assert_eq!(
            expand("00000000000000000000-0"),
            Err(GuidError::InvalidCharacter {
                ch: '-',
                position: 20
            })
        );
        assert!(matches!(
            expand("4000000000000000000000"),
            Err(GuidError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_compressed_guid_serde() {
        let global_id: CompressedGuid = "1r_SqSigLBGusQJANGmDYu".parse().unwrap();
        let json = serde_json::to_string(&global_id).unwrap();
        assert_eq!(json, "\"1r_SqSigLBGusQJANGmDYu\"");
        let back: CompressedGuid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, global_id);
        assert!(serde_json::from_str::<CompressedGuid>("\"too-short\"").is_err());
    }

    #[test]
    fn test_parse_any() {
        let guid = Uuid::parse_str("75f9cd1c-b2a5-4b43-8d9a-4ca5d0c0d8b8").unwrap();
        assert_eq!(parse_any("75f9cd1c-b2a5-4b43-8d9a-4ca5d0c0d8b8").unwrap(), guid);
        assert_eq!(parse_any("1r_SqSigLBGusQJANGmDYu").unwrap(), guid);
        assert!(parse_any("not a guid").is_err());
    }

    #[test]
    fn test_new_global_ids_are_distinct() {
        let a = new_global_id().unwrap();
        let b = new_global_id().unwrap();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), COMPRESSED_LEN);
    }

    proptest! {
        #[test]
        fn prop_round_trip(bytes in any::<[u8; 16]>()) {
            let guid = Uuid::from_bytes(bytes);
            let global_id = compress(guid).unwrap();
            prop_assert_eq!(global_id.as_str().len(), COMPRESSED_LEN);
            prop_assert_eq!(expand(global_id.as_str()).unwrap(), guid);
        }

        #[test]
        fn prop_deterministic(bytes in any::<[u8; 16]>()) {
            let guid = Uuid::from_bytes(bytes);
            prop_assert_eq!(compress(guid).unwrap(), compress(guid).unwrap());
        }
    }
}
