//! Typed packet definitions: one struct per opcode.
//!
//! The protocol is asymmetric per packet type. Most request packets only
//! ever arrive (client → server) and most replies only ever leave
//! (server → client); a handful travel both ways. Each type declares its
//! supported direction as a capability constant so the asymmetry is visible
//! at the definition, and exercising the unsupported direction returns
//! [`ProtocolError::UnsupportedDirection`] instead of emitting corrupt
//! bytes.
//!
//! Field layouts are fixed by the external wire format. Several fields are
//! still unidentified in captures and carry `unk` names; they are parsed
//! and preserved so the layouts stay byte-exact.

use crate::frame::{FrameReader, FrameWriter};
use crate::{Opcode, ProtocolError};

// ---------------------------------------------------------------------------
// Direction capability
// ---------------------------------------------------------------------------

/// Which way a packet type travels on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Receive-only: the server parses it, never builds it.
    ClientToServer,
    /// Send-only: the server builds it, never parses it.
    ServerToClient,
    /// Travels both ways; parse and build are both supported.
    Both,
}

impl Direction {
    pub fn supports_parse(self) -> bool {
        matches!(self, Self::ClientToServer | Self::Both)
    }

    pub fn supports_build(self) -> bool {
        matches!(self, Self::ServerToClient | Self::Both)
    }
}

/// A wire packet: fixed opcode, declared direction, fixed field layout.
pub trait Packet: Sized {
    const OPCODE: Opcode;
    const DIRECTION: Direction;

    /// Parses the packet body from a received payload.
    fn parse(r: &mut FrameReader<'_>) -> Result<Self, ProtocolError>;

    /// Builds the packet body into an outgoing payload.
    fn build(&self, w: &mut FrameWriter) -> Result<(), ProtocolError>;
}

fn unsupported<T>(
    opcode: Opcode,
    attempted: &'static str,
) -> Result<T, ProtocolError> {
    Err(ProtocolError::UnsupportedDirection { opcode, attempted })
}

// ---------------------------------------------------------------------------
// System packets
// ---------------------------------------------------------------------------

/// The first frame on every connection: announces the character this
/// connection speaks for. The name travels as raw legacy-encoded bytes;
/// transcoding happens at the handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsgSysLogin {
    pub ack_handle: u32,
    pub char_id: u32,
    pub name: Vec<u8>,
}

impl Packet for MsgSysLogin {
    const OPCODE: Opcode = Opcode::SysLogin;
    const DIRECTION: Direction = Direction::ClientToServer;

    fn parse(r: &mut FrameReader<'_>) -> Result<Self, ProtocolError> {
        let ack_handle = r.read_u32()?;
        let char_id = r.read_u32()?;
        let name_len = r.read_u16()?;
        let name = r.read_bytes(name_len as usize)?;
        Ok(Self {
            ack_handle,
            char_id,
            name,
        })
    }

    fn build(&self, _w: &mut FrameWriter) -> Result<(), ProtocolError> {
        unsupported(Self::OPCODE, "build")
    }
}

/// How an acknowledgment's payload is shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AckKind {
    /// A small fixed status payload.
    Simple = 0x00,
    /// An arbitrary-length buffer payload.
    Buffer = 0x01,
}

/// Result discriminator carried in every ack.
pub const ACK_SUCCESS: u8 = 0x00;
/// Result discriminator for the standard fail-acknowledgment path.
pub const ACK_FAIL: u8 = 0x01;

/// The acknowledgment every replied-to request receives.
///
/// The `ack_handle` is chosen by the client per outstanding request and
/// echoed verbatim — the server never invents one. Bodyless failures carry
/// a fixed 4-byte zero buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsgSysAck {
    pub ack_handle: u32,
    pub kind: AckKind,
    pub error_code: u8,
    pub data: Vec<u8>,
}

impl MsgSysAck {
    pub fn simple_succeed(ack_handle: u32, data: Vec<u8>) -> Self {
        Self {
            ack_handle,
            kind: AckKind::Simple,
            error_code: ACK_SUCCESS,
            data,
        }
    }

    pub fn simple_fail(ack_handle: u32, data: Vec<u8>) -> Self {
        Self {
            ack_handle,
            kind: AckKind::Simple,
            error_code: ACK_FAIL,
            data,
        }
    }

    pub fn buf_succeed(ack_handle: u32, data: Vec<u8>) -> Self {
        Self {
            ack_handle,
            kind: AckKind::Buffer,
            error_code: ACK_SUCCESS,
            data,
        }
    }

    /// The standard bodyless failure: a buffer ack with 4 zero bytes.
    pub fn buf_fail(ack_handle: u32) -> Self {
        Self {
            ack_handle,
            kind: AckKind::Buffer,
            error_code: ACK_FAIL,
            data: vec![0; 4],
        }
    }
}

impl Packet for MsgSysAck {
    const OPCODE: Opcode = Opcode::SysAck;
    const DIRECTION: Direction = Direction::ServerToClient;

    fn parse(_r: &mut FrameReader<'_>) -> Result<Self, ProtocolError> {
        unsupported(Self::OPCODE, "parse")
    }

    fn build(&self, w: &mut FrameWriter) -> Result<(), ProtocolError> {
        w.write_u32(self.ack_handle);
        w.write_u8(self.kind as u8);
        w.write_u8(self.error_code);
        w.write_len_u16("ack data", self.data.len())?;
        w.write_bytes(&self.data);
        Ok(())
    }
}

/// An opaque binary blob relayed between sessions.
///
/// Carries unsolicited pushes (mail notifications) and chat broadcasts.
/// Travels both ways: clients cast binaries at each other, and the server
/// originates its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsgSysCastedBinary {
    pub char_id: u32,
    pub broadcast_type: u8,
    pub message_type: u8,
    pub payload: Vec<u8>,
}

impl Packet for MsgSysCastedBinary {
    const OPCODE: Opcode = Opcode::SysCastedBinary;
    const DIRECTION: Direction = Direction::Both;

    fn parse(r: &mut FrameReader<'_>) -> Result<Self, ProtocolError> {
        let char_id = r.read_u32()?;
        let broadcast_type = r.read_u8()?;
        let message_type = r.read_u8()?;
        let size = r.read_u16()?;
        let payload = r.read_bytes(size as usize)?;
        Ok(Self {
            char_id,
            broadcast_type,
            message_type,
            payload,
        })
    }

    fn build(&self, w: &mut FrameWriter) -> Result<(), ProtocolError> {
        w.write_u32(self.char_id);
        w.write_u8(self.broadcast_type);
        w.write_u8(self.message_type);
        w.write_len_u16("casted binary payload", self.payload.len())?;
        w.write_bytes(&self.payload);
        Ok(())
    }
}

/// Request to create a rendezvous semaphore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsgSysCreateSemaphore {
    pub ack_handle: u32,
    pub semaphore_id: u32,
    pub capacity: u16,
    pub payload: Vec<u8>,
}

impl Packet for MsgSysCreateSemaphore {
    const OPCODE: Opcode = Opcode::SysCreateSemaphore;
    const DIRECTION: Direction = Direction::ClientToServer;

    fn parse(r: &mut FrameReader<'_>) -> Result<Self, ProtocolError> {
        let ack_handle = r.read_u32()?;
        let semaphore_id = r.read_u32()?;
        let capacity = r.read_u16()?;
        let size = r.read_u16()?;
        let payload = r.read_bytes(size as usize)?;
        Ok(Self {
            ack_handle,
            semaphore_id,
            capacity,
            payload,
        })
    }

    fn build(&self, _w: &mut FrameWriter) -> Result<(), ProtocolError> {
        unsupported(Self::OPCODE, "build")
    }
}

/// Request to join a semaphore and read back its shared payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsgSysCheckSemaphore {
    pub ack_handle: u32,
    pub semaphore_id: u32,
}

impl Packet for MsgSysCheckSemaphore {
    const OPCODE: Opcode = Opcode::SysCheckSemaphore;
    const DIRECTION: Direction = Direction::ClientToServer;

    fn parse(r: &mut FrameReader<'_>) -> Result<Self, ProtocolError> {
        Ok(Self {
            ack_handle: r.read_u32()?,
            semaphore_id: r.read_u32()?,
        })
    }

    fn build(&self, _w: &mut FrameWriter) -> Result<(), ProtocolError> {
        unsupported(Self::OPCODE, "build")
    }
}

/// Notification that the session is leaving a semaphore. Carries no ack
/// handle; the client does not wait on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsgSysReleaseSemaphore {
    pub semaphore_id: u32,
}

impl Packet for MsgSysReleaseSemaphore {
    const OPCODE: Opcode = Opcode::SysReleaseSemaphore;
    const DIRECTION: Direction = Direction::ClientToServer;

    fn parse(r: &mut FrameReader<'_>) -> Result<Self, ProtocolError> {
        Ok(Self {
            semaphore_id: r.read_u32()?,
        })
    }

    fn build(&self, _w: &mut FrameWriter) -> Result<(), ProtocolError> {
        unsupported(Self::OPCODE, "build")
    }
}

/// Request to delete a semaphore outright. Carries no ack handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsgSysDeleteSemaphore {
    pub semaphore_id: u32,
}

impl Packet for MsgSysDeleteSemaphore {
    const OPCODE: Opcode = Opcode::SysDeleteSemaphore;
    const DIRECTION: Direction = Direction::ClientToServer;

    fn parse(r: &mut FrameReader<'_>) -> Result<Self, ProtocolError> {
        Ok(Self {
            semaphore_id: r.read_u32()?,
        })
    }

    fn build(&self, _w: &mut FrameWriter) -> Result<(), ProtocolError> {
        unsupported(Self::OPCODE, "build")
    }
}

// ---------------------------------------------------------------------------
// Guild packets
// ---------------------------------------------------------------------------

/// Request to found a guild. The name is raw legacy-encoded bytes; the
/// handler transcodes it at the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsgCreateGuild {
    pub ack_handle: u32,
    pub unk0: u8,
    pub unk1: u8,
    pub name: Vec<u8>,
}

impl Packet for MsgCreateGuild {
    const OPCODE: Opcode = Opcode::CreateGuild;
    const DIRECTION: Direction = Direction::ClientToServer;

    fn parse(r: &mut FrameReader<'_>) -> Result<Self, ProtocolError> {
        let ack_handle = r.read_u32()?;
        let unk0 = r.read_u8()?;
        let unk1 = r.read_u8()?;
        let len = r.read_u16()?;
        let name = r.read_bytes(len as usize)?;
        Ok(Self {
            ack_handle,
            unk0,
            unk1,
            name,
        })
    }

    fn build(&self, _w: &mut FrameWriter) -> Result<(), ProtocolError> {
        unsupported(Self::OPCODE, "build")
    }
}

/// A guild-scoped action requested by a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GuildAction {
    Disband = 0x01,
    Donate = 0x02,
}

impl TryFrom<u8> for GuildAction {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(Self::Disband),
            0x02 => Ok(Self::Donate),
            _ => Err(ProtocolError::InvalidFieldValue {
                opcode: Opcode::OperateGuild,
                field: "action",
                value,
            }),
        }
    }
}

/// Request to act on a guild as a whole (disband, donate resource points).
/// `arg` is the donation amount for [`GuildAction::Donate`], zero otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsgOperateGuild {
    pub ack_handle: u32,
    pub guild_id: u32,
    pub action: GuildAction,
    pub arg: u16,
}

impl Packet for MsgOperateGuild {
    const OPCODE: Opcode = Opcode::OperateGuild;
    const DIRECTION: Direction = Direction::ClientToServer;

    fn parse(r: &mut FrameReader<'_>) -> Result<Self, ProtocolError> {
        Ok(Self {
            ack_handle: r.read_u32()?,
            guild_id: r.read_u32()?,
            action: GuildAction::try_from(r.read_u8()?)?,
            arg: r.read_u16()?,
        })
    }

    fn build(&self, _w: &mut FrameWriter) -> Result<(), ProtocolError> {
        unsupported(Self::OPCODE, "build")
    }
}

/// A membership-workflow action on one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GuildMemberAction {
    Accept = 0x01,
    Reject = 0x02,
    CancelInvite = 0x03,
    Kick = 0x04,
    Invite = 0x05,
}

impl TryFrom<u8> for GuildMemberAction {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(Self::Accept),
            0x02 => Ok(Self::Reject),
            0x03 => Ok(Self::CancelInvite),
            0x04 => Ok(Self::Kick),
            0x05 => Ok(Self::Invite),
            _ => Err(ProtocolError::InvalidFieldValue {
                opcode: Opcode::OperateGuildMember,
                field: "action",
                value,
            }),
        }
    }
}

/// Request to act on one character's relationship to a guild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsgOperateGuildMember {
    pub ack_handle: u32,
    pub guild_id: u32,
    pub char_id: u32,
    pub action: GuildMemberAction,
}

impl Packet for MsgOperateGuildMember {
    const OPCODE: Opcode = Opcode::OperateGuildMember;
    const DIRECTION: Direction = Direction::ClientToServer;

    fn parse(r: &mut FrameReader<'_>) -> Result<Self, ProtocolError> {
        Ok(Self {
            ack_handle: r.read_u32()?,
            guild_id: r.read_u32()?,
            char_id: r.read_u32()?,
            action: GuildMemberAction::try_from(r.read_u8()?)?,
        })
    }

    fn build(&self, _w: &mut FrameWriter) -> Result<(), ProtocolError> {
        unsupported(Self::OPCODE, "build")
    }
}

/// Request to rewrite the roster display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsgArrangeGuildMember {
    pub ack_handle: u32,
    pub guild_id: u32,
    pub char_ids: Vec<u32>,
}

impl Packet for MsgArrangeGuildMember {
    const OPCODE: Opcode = Opcode::ArrangeGuildMember;
    const DIRECTION: Direction = Direction::ClientToServer;

    fn parse(r: &mut FrameReader<'_>) -> Result<Self, ProtocolError> {
        let ack_handle = r.read_u32()?;
        let guild_id = r.read_u32()?;
        let count = r.read_u16()?;
        let mut char_ids = Vec::with_capacity(count as usize);
        for _ in 0..count {
            char_ids.push(r.read_u32()?);
        }
        Ok(Self {
            ack_handle,
            guild_id,
            char_ids,
        })
    }

    fn build(&self, _w: &mut FrameWriter) -> Result<(), ProtocolError> {
        unsupported(Self::OPCODE, "build")
    }
}

/// Request for one guild's info projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsgInfoGuild {
    pub ack_handle: u32,
    pub guild_id: u32,
}

impl Packet for MsgInfoGuild {
    const OPCODE: Opcode = Opcode::InfoGuild;
    const DIRECTION: Direction = Direction::ClientToServer;

    fn parse(r: &mut FrameReader<'_>) -> Result<Self, ProtocolError> {
        Ok(Self {
            ack_handle: r.read_u32()?,
            guild_id: r.read_u32()?,
        })
    }

    fn build(&self, _w: &mut FrameWriter) -> Result<(), ProtocolError> {
        unsupported(Self::OPCODE, "build")
    }
}

/// Guild search request. The term is raw legacy-encoded bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsgEnumerateGuild {
    pub ack_handle: u32,
    pub search_type: u8,
    pub term: Vec<u8>,
}

impl Packet for MsgEnumerateGuild {
    const OPCODE: Opcode = Opcode::EnumerateGuild;
    const DIRECTION: Direction = Direction::ClientToServer;

    fn parse(r: &mut FrameReader<'_>) -> Result<Self, ProtocolError> {
        let ack_handle = r.read_u32()?;
        let search_type = r.read_u8()?;
        let len = r.read_u16()?;
        let term = r.read_bytes(len as usize)?;
        Ok(Self {
            ack_handle,
            search_type,
            term,
        })
    }

    fn build(&self, _w: &mut FrameWriter) -> Result<(), ProtocolError> {
        unsupported(Self::OPCODE, "build")
    }
}

// ---------------------------------------------------------------------------
// Mail packets
// ---------------------------------------------------------------------------

/// An item riding along with a mail. Presence-tagged on the wire by the
/// `item_attached` flag byte; there is no "zero attachment" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemAttachment {
    pub amount: i16,
    pub item_id: u16,
}

/// Request to send a mail. Subject and body are raw legacy-encoded bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsgSendMail {
    pub ack_handle: u32,
    pub recipient_id: u32,
    pub is_guild_invite: bool,
    pub attachment: Option<ItemAttachment>,
    pub subject: Vec<u8>,
    pub body: Vec<u8>,
}

impl Packet for MsgSendMail {
    const OPCODE: Opcode = Opcode::SendMail;
    const DIRECTION: Direction = Direction::ClientToServer;

    fn parse(r: &mut FrameReader<'_>) -> Result<Self, ProtocolError> {
        let ack_handle = r.read_u32()?;
        let recipient_id = r.read_u32()?;
        let is_guild_invite = r.read_bool()?;
        // Attachment fields are present only when the flag bit is set.
        let attachment = if r.read_bool()? {
            Some(ItemAttachment {
                amount: r.read_i16()?,
                item_id: r.read_u16()?,
            })
        } else {
            None
        };
        let subject_len = r.read_u16()?;
        let body_len = r.read_u16()?;
        let subject = r.read_bytes(subject_len as usize)?;
        let body = r.read_bytes(body_len as usize)?;
        Ok(Self {
            ack_handle,
            recipient_id,
            is_guild_invite,
            attachment,
            subject,
            body,
        })
    }

    fn build(&self, _w: &mut FrameWriter) -> Result<(), ProtocolError> {
        unsupported(Self::OPCODE, "build")
    }
}

/// Request for the mailbox listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsgListMail {
    pub ack_handle: u32,
}

impl Packet for MsgListMail {
    const OPCODE: Opcode = Opcode::ListMail;
    const DIRECTION: Direction = Direction::ClientToServer;

    fn parse(r: &mut FrameReader<'_>) -> Result<Self, ProtocolError> {
        Ok(Self {
            ack_handle: r.read_u32()?,
        })
    }

    fn build(&self, _w: &mut FrameWriter) -> Result<(), ProtocolError> {
        unsupported(Self::OPCODE, "build")
    }
}

/// Request to read one mail body, addressed by the session-scoped index
/// handed out in the last listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsgReadMail {
    pub ack_handle: u32,
    pub acc_index: u8,
}

impl Packet for MsgReadMail {
    const OPCODE: Opcode = Opcode::ReadMail;
    const DIRECTION: Direction = Direction::ClientToServer;

    fn parse(r: &mut FrameReader<'_>) -> Result<Self, ProtocolError> {
        Ok(Self {
            ack_handle: r.read_u32()?,
            acc_index: r.read_u8()?,
        })
    }

    fn build(&self, _w: &mut FrameWriter) -> Result<(), ProtocolError> {
        unsupported(Self::OPCODE, "build")
    }
}

/// Mailbox mutation operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MailOperation {
    Delete = 0x01,
}

impl TryFrom<u8> for MailOperation {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(Self::Delete),
            _ => Err(ProtocolError::InvalidFieldValue {
                opcode: Opcode::OperateMail,
                field: "operation",
                value,
            }),
        }
    }
}

/// Request to operate on one listed mail (currently: soft-delete).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsgOperateMail {
    pub ack_handle: u32,
    pub acc_index: u8,
    pub operation: MailOperation,
}

impl Packet for MsgOperateMail {
    const OPCODE: Opcode = Opcode::OperateMail;
    const DIRECTION: Direction = Direction::ClientToServer;

    fn parse(r: &mut FrameReader<'_>) -> Result<Self, ProtocolError> {
        Ok(Self {
            ack_handle: r.read_u32()?,
            acc_index: r.read_u8()?,
            operation: MailOperation::try_from(r.read_u8()?)?,
        })
    }

    fn build(&self, _w: &mut FrameWriter) -> Result<(), ProtocolError> {
        unsupported(Self::OPCODE, "build")
    }
}

// ---------------------------------------------------------------------------
// Item distribution packets
// ---------------------------------------------------------------------------

/// Claim of a distributed item. Several fields are still unidentified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsgApplyDistItem {
    pub ack_handle: u32,
    pub unk0: u8,
    pub request_type: u32,
    pub unk2: u32,
    pub unk3: u32,
}

impl Packet for MsgApplyDistItem {
    const OPCODE: Opcode = Opcode::ApplyDistItem;
    const DIRECTION: Direction = Direction::ClientToServer;

    fn parse(r: &mut FrameReader<'_>) -> Result<Self, ProtocolError> {
        Ok(Self {
            ack_handle: r.read_u32()?,
            unk0: r.read_u8()?,
            request_type: r.read_u32()?,
            unk2: r.read_u32()?,
            unk3: r.read_u32()?,
        })
    }

    fn build(&self, _w: &mut FrameWriter) -> Result<(), ProtocolError> {
        unsupported(Self::OPCODE, "build")
    }
}

/// Listing request for distributed items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsgEnumerateDistItem {
    pub ack_handle: u32,
    pub unk0: u8,
    pub unk1: u16,
    pub unk2: u16,
}

impl Packet for MsgEnumerateDistItem {
    const OPCODE: Opcode = Opcode::EnumerateDistItem;
    const DIRECTION: Direction = Direction::ClientToServer;

    fn parse(r: &mut FrameReader<'_>) -> Result<Self, ProtocolError> {
        Ok(Self {
            ack_handle: r.read_u32()?,
            unk0: r.read_u8()?,
            unk1: r.read_u16()?,
            unk2: r.read_u16()?,
        })
    }

    fn build(&self, _w: &mut FrameWriter) -> Result<(), ProtocolError> {
        unsupported(Self::OPCODE, "build")
    }
}

// ---------------------------------------------------------------------------
// Mercenary packets
// ---------------------------------------------------------------------------

/// Request to create a hunting partner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsgCreateMercenary {
    pub ack_handle: u32,
}

impl Packet for MsgCreateMercenary {
    const OPCODE: Opcode = Opcode::CreateMercenary;
    const DIRECTION: Direction = Direction::ClientToServer;

    fn parse(r: &mut FrameReader<'_>) -> Result<Self, ProtocolError> {
        Ok(Self {
            ack_handle: r.read_u32()?,
        })
    }

    fn build(&self, _w: &mut FrameWriter) -> Result<(), ProtocolError> {
        unsupported(Self::OPCODE, "build")
    }
}

/// Request for partner hunt statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsgMercenaryHuntdata {
    pub ack_handle: u32,
    pub unk0: u8,
}

impl Packet for MsgMercenaryHuntdata {
    const OPCODE: Opcode = Opcode::MercenaryHuntdata;
    const DIRECTION: Direction = Direction::ClientToServer;

    fn parse(r: &mut FrameReader<'_>) -> Result<Self, ProtocolError> {
        Ok(Self {
            ack_handle: r.read_u32()?,
            unk0: r.read_u8()?,
        })
    }

    fn build(&self, _w: &mut FrameWriter) -> Result<(), ProtocolError> {
        unsupported(Self::OPCODE, "build")
    }
}

// =========================================================================
// Tests
// =========================================================================
