//! The text transcoding boundary between the wire and the server.
//!
//! Human-readable strings cross the wire in Shift-JIS (the legacy
//! single/double-byte encoding the client speaks); internally the server is
//! UTF-8. Both directions are strict: an unmappable character is an error
//! for the operation that needed it, never a silent replacement. A value
//! that was accepted at write time but later fails to transcode indicates a
//! data-integrity problem and is surfaced, not masked.

use encoding_rs::SHIFT_JIS;

use crate::ProtocolError;

/// Encodes UTF-8 text into the legacy wire encoding.
///
/// # Errors
/// Returns [`ProtocolError::TextEncode`] if any character has no Shift-JIS
/// representation.
pub fn to_wire(text: &str) -> Result<Vec<u8>, ProtocolError> {
    let (bytes, _, had_errors) = SHIFT_JIS.encode(text);
    if had_errors {
        return Err(ProtocolError::TextEncode(text.to_owned()));
    }
    Ok(bytes.into_owned())
}

/// Decodes legacy-encoded wire bytes into UTF-8 text.
///
/// # Errors
/// Returns [`ProtocolError::TextDecode`] if the bytes are not valid
/// Shift-JIS.
pub fn from_wire(bytes: &[u8]) -> Result<String, ProtocolError> {
    let (text, _, had_errors) = SHIFT_JIS.decode(bytes);
    if had_errors {
        return Err(ProtocolError::TextDecode);
    }
    Ok(text.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_round_trip() {
        let wire = to_wire("Alpha").unwrap();
        assert_eq!(wire, b"Alpha");
        assert_eq!(from_wire(&wire).unwrap(), "Alpha");
    }

    #[test]
    fn test_japanese_round_trip() {
        let wire = to_wire("狩人").unwrap();
        assert_ne!(wire, "狩人".as_bytes());
        assert_eq!(from_wire(&wire).unwrap(), "狩人");
    }

    #[test]
    fn test_unrepresentable_text_fails_encode() {
        // Emoji has no Shift-JIS mapping; must error, not substitute.
        assert!(matches!(
            to_wire("🐉"),
            Err(ProtocolError::TextEncode(_))
        ));
    }

    #[test]
    fn test_invalid_bytes_fail_decode() {
        // A lead byte with no trail byte is malformed Shift-JIS.
        assert!(matches!(
            from_wire(&[0x81]),
            Err(ProtocolError::TextDecode)
        ));
    }
}
