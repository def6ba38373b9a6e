//! Handlers for the mailbox opcodes.
//!
//! Listing hands out small session-scoped indices; read and operate take
//! those indices back. A stale index (from before a cursor wrap) is the
//! client's protocol error and answers with a failure ack.

use std::sync::Arc;

use ravengate_mail::MailDraft;
use ravengate_protocol::packets::{
    MailOperation, MsgListMail, MsgOperateMail, MsgReadMail, MsgSendMail,
};
use ravengate_protocol::{text, FrameWriter, ProtocolError};
use ravengate_session::{Session, SessionError};

use crate::server::ServerState;
use crate::RavengateError;

pub(crate) async fn send(
    session: &mut Session,
    state: &Arc<ServerState>,
    p: MsgSendMail,
) -> Result<(), RavengateError> {
    let (subject, body) =
        match (text::from_wire(&p.subject), text::from_wire(&p.body)) {
            (Ok(subject), Ok(body)) => (subject, body),
            (Err(e), _) | (_, Err(e)) => {
                tracing::debug!(
                    char_id = session.char_id(),
                    error = %e,
                    "mail text not decodable"
                );
                session.ack_buf_fail(p.ack_handle)?;
                return Ok(());
            }
        };

    let draft = MailDraft {
        sender_id: session.char_id(),
        recipient_id: p.recipient_id,
        subject,
        body,
        is_guild_invite: p.is_guild_invite,
        attachment: p.attachment,
    };
    match state.mail.send(&draft).await {
        Ok(mail_id) => {
            session.ack_simple_succeed(p.ack_handle, vec![0; 4])?;
            // The mail is durable; a failed alert must not unwind it.
            match state.mail.by_id(mail_id).await {
                Ok(mail) => {
                    if let Err(e) =
                        state.mail.notify(&state.registry, &mail).await
                    {
                        tracing::error!(
                            mail_id,
                            error = %e,
                            "mail alert failed"
                        );
                    }
                }
                Err(e) => {
                    tracing::error!(
                        mail_id,
                        error = %e,
                        "stored mail unreadable"
                    );
                }
            }
        }
        Err(e) => {
            tracing::error!(
                char_id = session.char_id(),
                error = %e,
                "mail send failed"
            );
            session.ack_buf_fail(p.ack_handle)?;
        }
    }
    Ok(())
}

pub(crate) async fn list(
    session: &mut Session,
    state: &Arc<ServerState>,
    p: MsgListMail,
) -> Result<(), RavengateError> {
    let mails = match state.mail.list_for(session.char_id()).await {
        Ok(mails) => mails,
        Err(e) => {
            tracing::error!(
                char_id = session.char_id(),
                error = %e,
                "mail listing failed"
            );
            session.ack_buf_fail(p.ack_handle)?;
            return Ok(());
        }
    };

    match build_listing(session, &mails) {
        Ok(payload) => session.ack_buf_succeed(p.ack_handle, payload)?,
        Err(e) => {
            // A stored subject or name the codec rejects is a
            // data-integrity fault; this listing cannot be served.
            tracing::error!(
                char_id = session.char_id(),
                error = %e,
                "mail listing not encodable"
            );
            session.ack_buf_fail(p.ack_handle)?;
        }
    }
    Ok(())
}

fn build_listing(
    session: &mut Session,
    mails: &[ravengate_mail::Mail],
) -> Result<Vec<u8>, ProtocolError> {
    let mut w = FrameWriter::new();
    w.write_len_u16("mail listing", mails.len())?;
    for mail in mails {
        let index = session.note_mail(mail.id);
        w.write_u8(index);
        w.write_u32(mail.sender_id);
        w.write_bool(mail.read);
        w.write_bool(mail.is_guild_invite);
        match mail.attachment {
            Some(attachment) => {
                w.write_bool(true);
                w.write_i16(attachment.amount);
                w.write_u16(attachment.item_id);
            }
            None => w.write_bool(false),
        }
        w.write_u32(mail.created_at as u32);
        let subject = text::to_wire(&mail.subject)?;
        w.write_len_u16("mail subject", subject.len())?;
        w.write_bytes(&subject);
        w.write_cstring(&text::to_wire(&mail.sender_name)?);
    }
    Ok(w.into_vec())
}

pub(crate) async fn read(
    session: &mut Session,
    state: &Arc<ServerState>,
    p: MsgReadMail,
) -> Result<(), RavengateError> {
    let mail_id = match session.mail_at(p.acc_index) {
        Ok(mail_id) => mail_id,
        Err(SessionError::StaleMailIndex(index)) => {
            tracing::debug!(
                char_id = session.char_id(),
                index,
                "read of stale mail index"
            );
            session.ack_buf_fail(p.ack_handle)?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    match try_read(state, mail_id).await {
        Ok(payload) => session.ack_buf_succeed(p.ack_handle, payload)?,
        Err(e) => {
            tracing::error!(mail_id, error = %e, "mail read failed");
            session.ack_buf_fail(p.ack_handle)?;
        }
    }
    Ok(())
}

async fn try_read(
    state: &Arc<ServerState>,
    mail_id: i64,
) -> Result<Vec<u8>, RavengateError> {
    let mail = state.mail.by_id(mail_id).await?;
    state.mail.mark_read(mail_id).await?;
    let mut w = FrameWriter::new();
    let body = text::to_wire(&mail.body)?;
    w.write_len_u16("mail body", body.len())?;
    w.write_bytes(&body);
    Ok(w.into_vec())
}

pub(crate) async fn operate(
    session: &mut Session,
    state: &Arc<ServerState>,
    p: MsgOperateMail,
) -> Result<(), RavengateError> {
    let mail_id = match session.mail_at(p.acc_index) {
        Ok(mail_id) => mail_id,
        Err(SessionError::StaleMailIndex(index)) => {
            tracing::debug!(
                char_id = session.char_id(),
                index,
                "operate on stale mail index"
            );
            session.ack_buf_fail(p.ack_handle)?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let result = match p.operation {
        MailOperation::Delete => state.mail.mark_deleted(mail_id).await,
    };
    match result {
        Ok(()) => session.ack_simple_succeed(p.ack_handle, vec![0; 4])?,
        Err(e) => {
            tracing::error!(mail_id, error = %e, "mail operate failed");
            session.ack_buf_fail(p.ack_handle)?;
        }
    }
    Ok(())
}
