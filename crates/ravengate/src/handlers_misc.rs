//! Handlers for casted binaries and the small always-acknowledge opcodes
//! (item distribution, mercenary).
//!
//! The distribution and mercenary endpoints exist so clients that poll
//! them get well-formed answers; there is no distribution campaign or
//! mercenary roster behind them yet.

use std::sync::Arc;

use rand::Rng;

use ravengate_protocol::packets::{
    MsgApplyDistItem, MsgCreateMercenary, MsgEnumerateDistItem,
    MsgMercenaryHuntdata, MsgSysCastedBinary,
};
use ravengate_protocol::{FrameWriter, Message};
use ravengate_session::Session;

use crate::server::ServerState;
use crate::RavengateError;

/// Relays a client-cast binary to every connected session. The payload is
/// opaque at this layer; only the envelope is the server's business.
pub(crate) async fn casted_binary(
    session: &mut Session,
    state: &Arc<ServerState>,
    p: MsgSysCastedBinary,
) -> Result<(), RavengateError> {
    let message = Message::SysCastedBinary(MsgSysCastedBinary {
        char_id: session.char_id(),
        ..p
    });
    let delivered = state.registry.broadcast(&message).await;
    tracing::debug!(
        char_id = session.char_id(),
        delivered,
        "casted binary relayed"
    );
    Ok(())
}

/// Nothing to claim: answers with the echoed request type and a zero item
/// count.
pub(crate) async fn apply_dist_item(
    session: &mut Session,
    p: MsgApplyDistItem,
) -> Result<(), RavengateError> {
    let mut w = FrameWriter::new();
    w.write_u32(p.request_type);
    w.write_u32(0);
    session.ack_buf_succeed(p.ack_handle, w.into_vec())?;
    Ok(())
}

/// Empty distribution listing.
pub(crate) async fn enumerate_dist_item(
    session: &mut Session,
    p: MsgEnumerateDistItem,
) -> Result<(), RavengateError> {
    let mut w = FrameWriter::new();
    w.write_u16(0);
    session.ack_buf_succeed(p.ack_handle, w.into_vec())?;
    Ok(())
}

/// Hands out a fresh partner id for the new mercenary.
pub(crate) async fn create_mercenary(
    session: &mut Session,
    p: MsgCreateMercenary,
) -> Result<(), RavengateError> {
    let partner_id: u32 = rand::rng().random_range(1..=0x00FF_FFFF);
    let mut w = FrameWriter::new();
    w.write_u32(0);
    w.write_u32(partner_id);
    session.ack_buf_succeed(p.ack_handle, w.into_vec())?;
    Ok(())
}

/// No hunt data recorded yet; the two query shapes expect different
/// placeholder sizes.
pub(crate) async fn mercenary_huntdata(
    session: &mut Session,
    p: MsgMercenaryHuntdata,
) -> Result<(), RavengateError> {
    let data = if p.unk0 == 1 { vec![0] } else { Vec::new() };
    session.ack_buf_succeed(p.ack_handle, data)?;
    Ok(())
}
