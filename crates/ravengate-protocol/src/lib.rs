//! Wire protocol for Ravengate.
//!
//! This crate defines the language clients and the server speak:
//!
//! - **Frame** ([`FrameReader`], [`FrameWriter`]) — big-endian cursor
//!   reads and growth-buffer writes over raw payload bytes.
//! - **Packets** ([`packets`]) — one typed struct per opcode, each tagged
//!   with the direction it supports.
//! - **Registry** ([`decode`], [`encode`], [`Message`]) — direction-aware
//!   opcode dispatch.
//! - **Text** ([`text`]) — the strict legacy-encoding boundary.
//! - **Binpacket** ([`binpacket`]) — sub-payloads relayed inside casted
//!   binaries.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (framed bytes) and the
//! session/handler layers. It knows nothing about connections, sessions,
//! or the store — only byte layouts.
//!
//! ```text
//! Transport (opcode + payload) → Protocol (Message) → Handlers (session context)
//! ```

mod error;
mod frame;
mod opcode;
mod registry;

pub mod binpacket;
pub mod packets;
pub mod text;

pub use error::ProtocolError;
pub use frame::{FrameReader, FrameWriter};
pub use opcode::Opcode;
pub use registry::{decode, encode, encode_framed, Message};
