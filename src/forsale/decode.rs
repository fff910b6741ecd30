use serde::Serialize;
use thiserror::Error;

/// Raw record bytes could not be decoded as US-ASCII.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum DecodeError {
    #[error("byte 0x{byte:02x} at offset {position} is outside US-ASCII")]
    NonAscii { position: usize, byte: u8 },
}

/// Decode a raw TXT character-string as US-ASCII.
///
/// The whole record fails on the first byte >= 0x80; partial decoding is
/// not attempted.
pub fn decode_record(raw: &[u8]) -> Result<String, DecodeError> {
    if let Some(position) = raw.iter().position(|b| !b.is_ascii()) {
        return Err(DecodeError::NonAscii {
            position,
            byte: raw[position],
        });
    }
    Ok(raw.iter().map(|&b| b as char).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_decodes() {
        assert_eq!(
            decode_record(b"v=FORSALE1;fcod=X").unwrap(),
            "v=FORSALE1;fcod=X"
        );
    }

    #[test]
    fn control_characters_decode() {
        assert_eq!(decode_record(b"a\tb\x00").unwrap(), "a\tb\0");
    }

    #[test]
    fn empty_decodes_to_empty() {
        assert_eq!(decode_record(b"").unwrap(), "");
    }

    #[test]
    fn high_byte_fails_whole_record() {
        let err = decode_record(b"v=FORSALE1;ftxt=caf\xc3\xa9").unwrap_err();
        assert_eq!(
            err,
            DecodeError::NonAscii {
                position: 19,
                byte: 0xc3
            }
        );
        assert!(err.to_string().contains("0xc3"));
    }
}
