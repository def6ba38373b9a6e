//! Binary sub-payloads carried inside [`MsgSysCastedBinary`].
//!
//! Casted binaries are a packet-in-a-packet mechanism: the outer message
//! relays an opaque blob between sessions, and a one-byte message type on
//! the outer packet tells the client how to interpret the blob. These are
//! the blob layouts the server itself originates.
//!
//! [`MsgSysCastedBinary`]: crate::packets::MsgSysCastedBinary

use crate::frame::FrameWriter;
use crate::{text, ProtocolError};

/// Message-type discriminators for the outer casted binary.
pub mod binary_message_type {
    /// An in-game chat line.
    pub const CHAT: u8 = 0x01;
    /// "You have new mail" alert.
    pub const MAIL_NOTIFY: u8 = 0x04;
}

/// In-session alert that a mail arrived, carrying the sender's display
/// name so the client can surface it without polling the mailbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailNotify {
    pub sender_name: String,
}

impl MailNotify {
    /// Builds the blob. The name crosses the wire in the legacy encoding;
    /// an unrepresentable stored name is a data-integrity failure and is
    /// surfaced as an error here.
    pub fn build(&self, w: &mut FrameWriter) -> Result<(), ProtocolError> {
        let name = text::to_wire(&self.sender_name)?;
        w.write_cstring(&name);
        Ok(())
    }
}

/// A chat line broadcast to clients (used by the chat-bridge path).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub kind: u8,
    pub text: String,
}

impl ChatMessage {
    pub fn build(&self, w: &mut FrameWriter) -> Result<(), ProtocolError> {
        let line = text::to_wire(&self.text)?;
        w.write_u8(self.kind);
        w.write_cstring(&line);
        Ok(())
    }
}
