//! The opcode enumeration.
//!
//! Opcodes are fixed by the external wire format; the numeric values here
//! are part of the protocol contract and must never be renumbered.

use std::fmt;

use crate::ProtocolError;

/// A packet opcode: the leading `u16` of every framed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Opcode {
    // -- System --
    SysLogin = 0x0001,
    SysAck = 0x0010,
    SysCastedBinary = 0x0023,
    SysCreateSemaphore = 0x0031,
    SysCheckSemaphore = 0x0032,
    SysReleaseSemaphore = 0x0033,
    SysDeleteSemaphore = 0x0034,

    // -- Guild --
    CreateGuild = 0x1101,
    OperateGuild = 0x1102,
    OperateGuildMember = 0x1103,
    ArrangeGuildMember = 0x1104,
    InfoGuild = 0x1105,
    EnumerateGuild = 0x1106,

    // -- Mail --
    SendMail = 0x1201,
    ListMail = 0x1202,
    ReadMail = 0x1203,
    OperateMail = 0x1204,

    // -- Item distribution --
    ApplyDistItem = 0x1301,
    EnumerateDistItem = 0x1302,

    // -- Mercenary --
    CreateMercenary = 0x1401,
    MercenaryHuntdata = 0x1402,
}

impl Opcode {
    /// The wire value of this opcode.
    pub fn value(self) -> u16 {
        self as u16
    }
}

impl TryFrom<u16> for Opcode {
    type Error = ProtocolError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Ok(match value {
            0x0001 => Self::SysLogin,
            0x0010 => Self::SysAck,
            0x0023 => Self::SysCastedBinary,
            0x0031 => Self::SysCreateSemaphore,
            0x0032 => Self::SysCheckSemaphore,
            0x0033 => Self::SysReleaseSemaphore,
            0x0034 => Self::SysDeleteSemaphore,
            0x1101 => Self::CreateGuild,
            0x1102 => Self::OperateGuild,
            0x1103 => Self::OperateGuildMember,
            0x1104 => Self::ArrangeGuildMember,
            0x1105 => Self::InfoGuild,
            0x1106 => Self::EnumerateGuild,
            0x1201 => Self::SendMail,
            0x1202 => Self::ListMail,
            0x1203 => Self::ReadMail,
            0x1204 => Self::OperateMail,
            0x1301 => Self::ApplyDistItem,
            0x1302 => Self::EnumerateDistItem,
            0x1401 => Self::CreateMercenary,
            0x1402 => Self::MercenaryHuntdata,
            other => return Err(ProtocolError::UnknownOpcode(other)),
        })
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:#06x})", self, self.value())
    }
}
