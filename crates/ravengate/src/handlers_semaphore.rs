//! Handlers for the rendezvous-semaphore opcodes.

use std::sync::Arc;

use ravengate_protocol::packets::{
    MsgSysCheckSemaphore, MsgSysCreateSemaphore, MsgSysDeleteSemaphore,
    MsgSysReleaseSemaphore,
};
use ravengate_protocol::{FrameWriter, ProtocolError};
use ravengate_semaphore::{
    CreateMode, SemaphoreError, SemaphoreId, SemaphoreView,
};
use ravengate_session::Session;

use crate::server::ServerState;
use crate::RavengateError;

fn view_payload(view: &SemaphoreView) -> Result<Vec<u8>, ProtocolError> {
    let mut w = FrameWriter::new();
    w.write_u32(view.id.0);
    w.write_u16(view.capacity);
    // Membership never exceeds the u16 capacity, so the count fits.
    w.write_u16(view.member_count as u16);
    w.write_len_u16("semaphore payload", view.payload.len())?;
    w.write_bytes(&view.payload);
    Ok(w.into_vec())
}

/// Create-or-rendezvous: concurrent creates for the same identity converge
/// on one semaphore, and every caller observes the winner's state.
pub(crate) async fn create(
    session: &mut Session,
    state: &Arc<ServerState>,
    p: MsgSysCreateSemaphore,
) -> Result<(), RavengateError> {
    let view = state
        .semaphores
        .create(
            SemaphoreId(p.semaphore_id),
            p.capacity,
            p.payload,
            CreateMode::Reuse,
        )
        .await?;
    session.ack_buf_succeed(p.ack_handle, view_payload(&view)?)?;
    Ok(())
}

pub(crate) async fn check(
    session: &mut Session,
    state: &Arc<ServerState>,
    p: MsgSysCheckSemaphore,
) -> Result<(), RavengateError> {
    let id = SemaphoreId(p.semaphore_id);
    match state.semaphores.check(id, session.char_id()).await {
        Ok(view) => {
            session.ack_buf_succeed(p.ack_handle, view_payload(&view)?)?;
        }
        Err(e @ (SemaphoreError::AtCapacity { .. }
        | SemaphoreError::NotFound(_))) => {
            tracing::debug!(
                char_id = session.char_id(),
                %id,
                error = %e,
                "semaphore check refused"
            );
            session.ack_buf_fail(p.ack_handle)?;
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

/// Fire-and-forget: the client does not wait on a release.
pub(crate) async fn release(
    session: &mut Session,
    state: &Arc<ServerState>,
    p: MsgSysReleaseSemaphore,
) -> Result<(), RavengateError> {
    let id = SemaphoreId(p.semaphore_id);
    if let Err(e) = state.semaphores.release(id, session.char_id()).await {
        tracing::debug!(
            char_id = session.char_id(),
            %id,
            error = %e,
            "release of unknown semaphore"
        );
    }
    Ok(())
}

pub(crate) async fn delete(
    session: &mut Session,
    state: &Arc<ServerState>,
    p: MsgSysDeleteSemaphore,
) -> Result<(), RavengateError> {
    let id = SemaphoreId(p.semaphore_id);
    if !state.semaphores.delete(id).await {
        tracing::debug!(
            char_id = session.char_id(),
            %id,
            "delete of unknown semaphore"
        );
    }
    Ok(())
}
