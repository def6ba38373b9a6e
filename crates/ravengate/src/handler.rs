//! Per-connection handler: login, framed read loop, dispatch, teardown.
//!
//! Each accepted connection gets its own task. The flow is:
//!   1. First frame must be a login → session created, registered
//!   2. Writer task drains the session's outbound queue onto the socket
//!   3. Read loop: one frame at a time, decoded and dispatched in arrival
//!      order, so acks leave in the order the requests came in
//!   4. Teardown: deregister the session, release semaphore memberships
//!
//! Error taxonomy: an undecodable frame aborts only that message; domain
//! and store failures answer with a failure ack; a dead socket or a
//! protocol contract violation ends the connection.

use std::io::ErrorKind;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::TcpStream;

use ravengate_protocol::{decode, text, Message};
use ravengate_session::Session;

use crate::server::ServerState;
use crate::{handlers_guild, handlers_mail, handlers_misc, handlers_semaphore};
use crate::RavengateError;

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    stream: TcpStream,
    state: Arc<ServerState>,
) -> Result<(), RavengateError> {
    let (mut reader, mut writer) = stream.into_split();

    // -- Step 1: login --------------------------------------------------
    let (opcode, payload) = read_frame(&mut reader).await?;
    let Message::SysLogin(login) = decode(opcode, &payload)? else {
        return Err(RavengateError::LoginExpected);
    };
    let char_name = text::from_wire(&login.name)?;

    let (mut session, mut outbound) =
        Session::new(login.char_id, char_name);
    let char_id = session.char_id();
    state.registry.insert(session.link()).await;
    tracing::info!(char_id, name = session.char_name(), "session logged in");

    // -- Step 2: writer task --------------------------------------------
    let writer_task = tokio::spawn(async move {
        while let Some(frame) = outbound.recv().await {
            if writer.write_all(&frame).await.is_err() {
                break;
            }
        }
    });

    session.ack_simple_succeed(login.ack_handle, vec![0; 4])?;

    // -- Step 3: read loop ----------------------------------------------
    let result = read_loop(&mut reader, &mut session, &state).await;

    // -- Step 4: teardown -----------------------------------------------
    state.registry.remove(char_id).await;
    state.semaphores.release_all(char_id).await;
    drop(session); // closes the outbound queue; the writer task drains out
    let _ = writer_task.await;
    tracing::info!(char_id, "session closed");

    result
}

async fn read_loop(
    reader: &mut OwnedReadHalf,
    session: &mut Session,
    state: &Arc<ServerState>,
) -> Result<(), RavengateError> {
    loop {
        let (opcode, payload) = match read_frame(reader).await {
            Ok(frame) => frame,
            Err(RavengateError::Io(e))
                if e.kind() == ErrorKind::UnexpectedEof =>
            {
                tracing::debug!(
                    char_id = session.char_id(),
                    "connection closed"
                );
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        // A frame that fails to decode aborts only itself.
        let message = match decode(opcode, &payload) {
            Ok(message) => message,
            Err(e) => {
                tracing::debug!(
                    char_id = session.char_id(),
                    opcode = format_args!("{opcode:#06x}"),
                    error = %e,
                    "undecodable frame skipped"
                );
                continue;
            }
        };

        dispatch(session, state, message).await?;
    }
}

/// Routes one decoded message to its handler. Requests are processed to
/// completion before the next frame is read, which is what keeps acks in
/// arrival order.
async fn dispatch(
    session: &mut Session,
    state: &Arc<ServerState>,
    message: Message,
) -> Result<(), RavengateError> {
    match message {
        Message::SysCreateSemaphore(p) => {
            handlers_semaphore::create(session, state, p).await
        }
        Message::SysCheckSemaphore(p) => {
            handlers_semaphore::check(session, state, p).await
        }
        Message::SysReleaseSemaphore(p) => {
            handlers_semaphore::release(session, state, p).await
        }
        Message::SysDeleteSemaphore(p) => {
            handlers_semaphore::delete(session, state, p).await
        }
        Message::CreateGuild(p) => {
            handlers_guild::create(session, state, p).await
        }
        Message::OperateGuild(p) => {
            handlers_guild::operate(session, state, p).await
        }
        Message::OperateGuildMember(p) => {
            handlers_guild::operate_member(session, state, p).await
        }
        Message::ArrangeGuildMember(p) => {
            handlers_guild::arrange_members(session, state, p).await
        }
        Message::InfoGuild(p) => {
            handlers_guild::info(session, state, p).await
        }
        Message::EnumerateGuild(p) => {
            handlers_guild::enumerate(session, state, p).await
        }
        Message::SendMail(p) => {
            handlers_mail::send(session, state, p).await
        }
        Message::ListMail(p) => {
            handlers_mail::list(session, state, p).await
        }
        Message::ReadMail(p) => {
            handlers_mail::read(session, state, p).await
        }
        Message::OperateMail(p) => {
            handlers_mail::operate(session, state, p).await
        }
        Message::SysCastedBinary(p) => {
            handlers_misc::casted_binary(session, state, p).await
        }
        Message::ApplyDistItem(p) => {
            handlers_misc::apply_dist_item(session, p).await
        }
        Message::EnumerateDistItem(p) => {
            handlers_misc::enumerate_dist_item(session, p).await
        }
        Message::CreateMercenary(p) => {
            handlers_misc::create_mercenary(session, p).await
        }
        Message::MercenaryHuntdata(p) => {
            handlers_misc::mercenary_huntdata(session, p).await
        }
        Message::SysLogin(p) => {
            // Already logged in; a second login is a client bug.
            tracing::debug!(
                char_id = session.char_id(),
                "duplicate login ignored"
            );
            session.ack_buf_fail(p.ack_handle)?;
            Ok(())
        }
        // Send-only opcodes never reach dispatch; decode refuses them.
        other => {
            tracing::debug!(
                opcode = %other.opcode(),
                "unhandled inbound message"
            );
            Ok(())
        }
    }
}

/// Reads one stream frame: `u16` opcode, `u16` payload length, payload.
async fn read_frame(
    reader: &mut OwnedReadHalf,
) -> Result<(u16, Vec<u8>), RavengateError> {
    let mut header = [0u8; 4];
    reader.read_exact(&mut header).await?;
    let opcode = u16::from_be_bytes([header[0], header[1]]);
    let len = u16::from_be_bytes([header[2], header[3]]) as usize;
    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await?;
    Ok((opcode, payload))
}
