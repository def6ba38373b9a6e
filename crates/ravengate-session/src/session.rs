//! Per-connection session state.
//!
//! A session is the server's record of one authenticated connection. It
//! owns exactly one character identity for its whole lifetime, the ack
//! correlation helpers for that connection, a bounded mailbox index cache,
//! and the outbound queue the connection's writer task drains. It is never
//! persisted: created on successful authentication, destroyed on
//! disconnect.
//!
//! Ownership rule: a session is mutated only by its own connection worker.
//! Other sessions reach it exclusively through the cloneable
//! [`SessionLink`] push handle — never by touching its fields.

use tokio::sync::mpsc;

use ravengate_protocol::packets::MsgSysAck;
use ravengate_protocol::{encode_framed, Message};

use crate::SessionError;

/// Fixed capacity of the mailbox index cache. The allocation cursor is a
/// `u8`, so it wraps exactly at this boundary.
pub const MAIL_CACHE_CAPACITY: usize = 256;

/// A cheap, cloneable handle for pushing unsolicited messages to a
/// session's connection. This is the only cross-session channel: pushes
/// interleave with the recipient's own request/response traffic on the
/// writer task, with no ordering relationship to it.
#[derive(Debug, Clone)]
pub struct SessionLink {
    char_id: u32,
    char_name: String,
    outbound: mpsc::UnboundedSender<Vec<u8>>,
}

impl SessionLink {
    pub fn char_id(&self) -> u32 {
        self.char_id
    }

    pub fn char_name(&self) -> &str {
        &self.char_name
    }

    /// Encodes, frames, and enqueues a message for the connection writer.
    ///
    /// # Errors
    /// [`SessionError::Protocol`] if the message cannot be built (wrong
    /// direction, transcode failure in a nested payload);
    /// [`SessionError::Disconnected`] if the connection is gone.
    pub fn queue_message(&self, message: &Message) -> Result<(), SessionError> {
        let frame = encode_framed(message)?;
        self.outbound
            .send(frame)
            .map_err(|_| SessionError::Disconnected(self.char_id))
    }
}

/// One connection's session: identity, ack correlation, mailbox index
/// cache, outbound queue.
#[derive(Debug)]
pub struct Session {
    char_id: u32,
    char_name: String,
    outbound: mpsc::UnboundedSender<Vec<u8>>,

    /// Maps the small client-visible index to a mailbox row id. Rebuilt
    /// on each listing; entries are overwritten as the cursor advances.
    mail_list: Vec<Option<i64>>,

    /// Allocation cursor into `mail_list`, wrapping at the cache capacity.
    mail_cursor: u8,
}

impl Session {
    /// Creates a session for an authenticated character, returning the
    /// receiving end of its outbound queue for the connection writer task.
    pub fn new(
        char_id: u32,
        char_name: String,
    ) -> (Self, mpsc::UnboundedReceiver<Vec<u8>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = Self {
            char_id,
            char_name,
            outbound: tx,
            mail_list: vec![None; MAIL_CACHE_CAPACITY],
            mail_cursor: 0,
        };
        (session, rx)
    }

    pub fn char_id(&self) -> u32 {
        self.char_id
    }

    pub fn char_name(&self) -> &str {
        &self.char_name
    }

    /// A push handle other sessions may hold.
    pub fn link(&self) -> SessionLink {
        SessionLink {
            char_id: self.char_id,
            char_name: self.char_name.clone(),
            outbound: self.outbound.clone(),
        }
    }

    /// Enqueues a message on this session's own connection.
    pub fn queue_message(&self, message: &Message) -> Result<(), SessionError> {
        let frame = encode_framed(message)?;
        self.outbound
            .send(frame)
            .map_err(|_| SessionError::Disconnected(self.char_id))
    }

    // -- Ack correlation ---------------------------------------------------
    //
    // Every helper echoes the caller-supplied handle verbatim. The server
    // never invents a handle; it only relays the one from the originating
    // request.

    pub fn ack_simple_succeed(
        &self,
        ack_handle: u32,
        data: Vec<u8>,
    ) -> Result<(), SessionError> {
        self.queue_message(&Message::SysAck(MsgSysAck::simple_succeed(
            ack_handle, data,
        )))
    }

    pub fn ack_simple_fail(
        &self,
        ack_handle: u32,
        data: Vec<u8>,
    ) -> Result<(), SessionError> {
        self.queue_message(&Message::SysAck(MsgSysAck::simple_fail(
            ack_handle, data,
        )))
    }

    pub fn ack_buf_succeed(
        &self,
        ack_handle: u32,
        data: Vec<u8>,
    ) -> Result<(), SessionError> {
        self.queue_message(&Message::SysAck(MsgSysAck::buf_succeed(
            ack_handle, data,
        )))
    }

    /// The standard bodyless failure acknowledgment.
    pub fn ack_buf_fail(&self, ack_handle: u32) -> Result<(), SessionError> {
        self.queue_message(&Message::SysAck(MsgSysAck::buf_fail(ack_handle)))
    }

    // -- Mailbox index cache -----------------------------------------------

    /// Records a listed mail id and returns the client-visible index for
    /// it. The cursor advances monotonically and wraps at the cache
    /// capacity; a wrapped-over slot is simply overwritten.
    pub fn note_mail(&mut self, mail_id: i64) -> u8 {
        let index = self.mail_cursor;
        self.mail_list[index as usize] = Some(mail_id);
        self.mail_cursor = self.mail_cursor.wrapping_add(1);
        index
    }

    /// Resolves a client-visible index back to a mailbox row id.
    ///
    /// # Errors
    /// [`SessionError::StaleMailIndex`] if the slot was never filled —
    /// the client referenced an index from before a cursor wrap, which is
    /// its protocol error, not a server fault.
    pub fn mail_at(&self, index: u8) -> Result<i64, SessionError> {
        self.mail_list[index as usize]
            .ok_or(SessionError::StaleMailIndex(index))
    }
}
