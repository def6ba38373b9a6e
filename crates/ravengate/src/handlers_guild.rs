//! Handlers for the guild opcodes.
//!
//! Domain refusals (no such guild, no pending application, non-member in a
//! roster rearrangement) answer with the standard failure ack and keep the
//! connection alive; store faults do the same but are logged at error
//! level. Only a dead outbound queue ends the connection.

use std::sync::Arc;

use ravengate_guild::{Guild, GuildApplicationKind, GuildError};
use ravengate_mail::MailDraft;
use ravengate_protocol::packets::{
    GuildAction, GuildMemberAction, MsgArrangeGuildMember, MsgCreateGuild,
    MsgEnumerateGuild, MsgInfoGuild, MsgOperateGuild, MsgOperateGuildMember,
};
use ravengate_protocol::{text, FrameWriter, ProtocolError};
use ravengate_session::Session;

use crate::server::ServerState;
use crate::RavengateError;

fn log_failure(char_id: u32, op: &'static str, e: &GuildError) {
    if e.is_domain() {
        tracing::debug!(char_id, op, error = %e, "guild operation refused");
    } else {
        tracing::error!(char_id, op, error = %e, "guild operation failed");
    }
}

/// Serializes the guild info projection for an ack payload.
fn write_guild_info(
    w: &mut FrameWriter,
    guild: &Guild,
) -> Result<(), ProtocolError> {
    w.write_u32(guild.id);
    w.write_u32(guild.leader_id);
    w.write_u32(guild.rp);
    w.write_u32(guild.created_at as u32);
    w.write_u16(guild.member_count);
    w.write_u8(guild.main_motto);
    w.write_u8(guild.sub_motto);
    w.write_u8(guild.festival_colour.wire_code());
    w.write_u16(guild.guild_hall);
    w.write_cstring(&text::to_wire(&guild.name)?);
    w.write_cstring(&text::to_wire(&guild.comment)?);
    w.write_cstring(&text::to_wire(&guild.leader_name)?);
    let parts = guild.icon.as_ref().map(|i| i.parts.as_slice()).unwrap_or(&[]);
    w.write_len_u8("guild icon parts", parts.len())?;
    for part in parts {
        w.write_u16(part.index);
        w.write_u16(part.id);
        w.write_u8(part.page);
        w.write_u8(part.size);
        w.write_u8(part.rotation);
        w.write_u16(part.pos_x);
        w.write_u16(part.pos_y);
    }
    Ok(())
}

pub(crate) async fn create(
    session: &mut Session,
    state: &Arc<ServerState>,
    p: MsgCreateGuild,
) -> Result<(), RavengateError> {
    // A name the codec rejects is the client's fault, not a server fault.
    let name = match text::from_wire(&p.name) {
        Ok(name) => name,
        Err(e) => {
            tracing::debug!(
                char_id = session.char_id(),
                error = %e,
                "guild name not decodable"
            );
            session.ack_buf_fail(p.ack_handle)?;
            return Ok(());
        }
    };

    match state.guilds.create(session.char_id(), &name).await {
        Ok(guild_id) => {
            let mut w = FrameWriter::new();
            w.write_u32(guild_id);
            session.ack_simple_succeed(p.ack_handle, w.into_vec())?;
        }
        Err(e) => {
            log_failure(session.char_id(), "create", &e);
            session.ack_buf_fail(p.ack_handle)?;
        }
    }
    Ok(())
}

pub(crate) async fn operate(
    session: &mut Session,
    state: &Arc<ServerState>,
    p: MsgOperateGuild,
) -> Result<(), RavengateError> {
    let result = match p.action {
        GuildAction::Disband => state.guilds.disband(p.guild_id).await,
        GuildAction::Donate => {
            state.guilds.donate_rp(p.guild_id, p.arg).await
        }
    };
    match result {
        Ok(()) => session.ack_simple_succeed(p.ack_handle, vec![0; 4])?,
        Err(e) => {
            log_failure(session.char_id(), "operate", &e);
            session.ack_buf_fail(p.ack_handle)?;
        }
    }
    Ok(())
}

pub(crate) async fn operate_member(
    session: &mut Session,
    state: &Arc<ServerState>,
    p: MsgOperateGuildMember,
) -> Result<(), RavengateError> {
    let outcome = match p.action {
        GuildMemberAction::Accept => {
            state.guilds.accept_application(p.guild_id, p.char_id).await
        }
        GuildMemberAction::Reject => {
            refusal_to_result(
                state.guilds.reject_application(p.guild_id, p.char_id).await,
                p.guild_id,
                p.char_id,
            )
        }
        GuildMemberAction::CancelInvite => {
            refusal_to_result(
                state.guilds.cancel_invitation(p.guild_id, p.char_id).await,
                p.guild_id,
                p.char_id,
            )
        }
        GuildMemberAction::Kick => {
            state.guilds.remove_character(p.guild_id, p.char_id).await
        }
        GuildMemberAction::Invite => {
            return invite(session, state, p).await;
        }
    };
    match outcome {
        Ok(()) => session.ack_simple_succeed(p.ack_handle, vec![0; 4])?,
        Err(e) => {
            log_failure(session.char_id(), "operate_member", &e);
            session.ack_buf_fail(p.ack_handle)?;
        }
    }
    Ok(())
}

/// Collapses the bool-returning deletes into the shared ack path.
fn refusal_to_result(
    result: Result<bool, GuildError>,
    guild_id: u32,
    char_id: u32,
) -> Result<(), GuildError> {
    match result {
        Ok(true) => Ok(()),
        Ok(false) => Err(GuildError::NoApplication { guild_id, char_id }),
        Err(e) => Err(e),
    }
}

/// Invitation: one transaction covering the application row and the invite
/// mail, so neither can exist without the other. The in-session alert goes
/// out only after the commit.
async fn invite(
    session: &mut Session,
    state: &Arc<ServerState>,
    p: MsgOperateGuildMember,
) -> Result<(), RavengateError> {
    match try_invite(session, state, &p).await {
        Ok(mail_id) => {
            session.ack_simple_succeed(p.ack_handle, vec![0; 4])?;
            if let Ok(mail) = state.mail.by_id(mail_id).await {
                if let Err(e) = state.mail.notify(&state.registry, &mail).await
                {
                    tracing::error!(
                        mail_id,
                        error = %e,
                        "invite alert failed"
                    );
                }
            }
        }
        Err(e) => {
            tracing::warn!(
                char_id = session.char_id(),
                guild_id = p.guild_id,
                invitee = p.char_id,
                error = %e,
                "guild invite failed"
            );
            session.ack_buf_fail(p.ack_handle)?;
        }
    }
    Ok(())
}

async fn try_invite(
    session: &Session,
    state: &Arc<ServerState>,
    p: &MsgOperateGuildMember,
) -> Result<i64, RavengateError> {
    let guild = state
        .guilds
        .by_id(p.guild_id)
        .await?
        .ok_or(GuildError::NotFound(p.guild_id))?;

    let mut tx = state.guilds.pool().begin().await?;
    state
        .guilds
        .create_application(
            &mut tx,
            p.guild_id,
            p.char_id,
            session.char_id(),
            GuildApplicationKind::Invited,
        )
        .await?;
    let mail_id = state
        .mail
        .send_with(
            &mut tx,
            &MailDraft {
                sender_id: session.char_id(),
                recipient_id: p.char_id,
                subject: format!("Invitation: {}", guild.name),
                body: format!(
                    "You have been invited to join {}.",
                    guild.name
                ),
                is_guild_invite: true,
                attachment: None,
            },
        )
        .await?;
    tx.commit().await?;
    Ok(mail_id)
}

pub(crate) async fn arrange_members(
    session: &mut Session,
    state: &Arc<ServerState>,
    p: MsgArrangeGuildMember,
) -> Result<(), RavengateError> {
    match state.guilds.arrange_members(p.guild_id, &p.char_ids).await {
        Ok(()) => session.ack_simple_succeed(p.ack_handle, vec![0; 4])?,
        Err(e) => {
            log_failure(session.char_id(), "arrange_members", &e);
            session.ack_buf_fail(p.ack_handle)?;
        }
    }
    Ok(())
}

pub(crate) async fn info(
    session: &mut Session,
    state: &Arc<ServerState>,
    p: MsgInfoGuild,
) -> Result<(), RavengateError> {
    match state.guilds.by_id(p.guild_id).await {
        Ok(Some(guild)) => {
            let mut w = FrameWriter::new();
            write_guild_info(&mut w, &guild)?;
            session.ack_buf_succeed(p.ack_handle, w.into_vec())?;
        }
        Ok(None) => session.ack_buf_fail(p.ack_handle)?,
        Err(e) => {
            log_failure(session.char_id(), "info", &e);
            session.ack_buf_fail(p.ack_handle)?;
        }
    }
    Ok(())
}

pub(crate) async fn enumerate(
    session: &mut Session,
    state: &Arc<ServerState>,
    p: MsgEnumerateGuild,
) -> Result<(), RavengateError> {
    let term = match text::from_wire(&p.term) {
        Ok(term) => term,
        Err(e) => {
            tracing::debug!(
                char_id = session.char_id(),
                error = %e,
                "search term not decodable"
            );
            session.ack_buf_fail(p.ack_handle)?;
            return Ok(());
        }
    };

    match state.guilds.find_by_name(&term).await {
        Ok(guilds) => {
            let mut w = FrameWriter::new();
            w.write_len_u16("guild listing", guilds.len())?;
            for guild in &guilds {
                w.write_u32(guild.id);
                w.write_u16(guild.member_count);
                w.write_u32(guild.rp);
                w.write_cstring(&text::to_wire(&guild.name)?);
                w.write_cstring(&text::to_wire(&guild.leader_name)?);
            }
            session.ack_buf_succeed(p.ack_handle, w.into_vec())?;
        }
        Err(e) => {
            log_failure(session.char_id(), "enumerate", &e);
            session.ack_buf_fail(p.ack_handle)?;
        }
    }
    Ok(())
}
