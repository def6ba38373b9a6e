//! Error types for the protocol layer.

use crate::Opcode;

/// Errors that can occur while decoding or encoding wire packets.
///
/// The variants split along the taxonomy the rest of the server relies on:
/// [`Truncated`](ProtocolError::Truncated) and
/// [`UnknownOpcode`](ProtocolError::UnknownOpcode) are data errors that
/// abort the current message only, while
/// [`UnsupportedDirection`](ProtocolError::UnsupportedDirection) is a
/// programming-contract violation — the caller asked a receive-only packet
/// to build itself (or vice versa) and must not get garbage bytes back.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The payload ran out of bytes mid-field.
    ///
    /// Non-recoverable for the enclosing message: a fixed-layout packet
    /// with missing bytes cannot be partially decoded.
    #[error("payload truncated: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    /// A wire string field had no NUL terminator before the payload ended.
    #[error("unterminated string in payload")]
    UnterminatedString,

    /// The opcode is not part of the protocol enumeration.
    #[error("unknown opcode {0:#06x}")]
    UnknownOpcode(u16),

    /// An enumerated field carried a value outside its defined set. The
    /// opcode decoded fine; one of its fields did not.
    #[error("invalid value {value:#04x} for field `{field}` of {opcode}")]
    InvalidFieldValue {
        opcode: Opcode,
        field: &'static str,
        value: u8,
    },

    /// A length or count does not fit the wire field that carries it.
    ///
    /// Emitting the wrapped value instead would desync the stream: the
    /// peer would read a short frame and treat the overflowed remainder
    /// as the start of the next one.
    #[error("{what} length {len} exceeds the wire field maximum {max}")]
    FieldTooLong {
        what: &'static str,
        len: usize,
        max: usize,
    },

    /// A packet was asked to parse or build in a direction it does not
    /// support. Many packets are receive-only or send-only, matching the
    /// live protocol's traffic. Hitting this means a client/server
    /// contract mismatch, not bad data.
    #[error("packet {opcode} does not support {attempted}")]
    UnsupportedDirection {
        opcode: Opcode,
        attempted: &'static str,
    },

    /// Text could not be encoded into the legacy wire encoding.
    ///
    /// Fatal for the operation that required the value: the text is
    /// unrepresentable and must not be silently truncated or replaced.
    #[error("text not representable in wire encoding: {0:?}")]
    TextEncode(String),

    /// Wire bytes could not be decoded as legacy-encoded text.
    #[error("invalid legacy-encoded text on the wire")]
    TextDecode,
}
