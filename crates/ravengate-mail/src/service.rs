//! The mailbox service: persistent mail plus the in-session delivery alert.

use sqlx::{SqliteConnection, SqlitePool};

use ravengate_protocol::binpacket::{self, binary_message_type};
use ravengate_protocol::packets::{ItemAttachment, MsgSysCastedBinary};
use ravengate_protocol::{FrameWriter, Message};
use ravengate_session::SessionRegistry;

use crate::{Mail, MailDraft, MailError};

/// Fixed page size for mailbox listings. The client-side index cache is
/// small, so a listing never returns more than this many rows.
pub const LIST_PAGE_SIZE: u32 = 32;

const MAIL_SELECT: &str = "\
    SELECT m.id, m.sender_id, m.recipient_id, m.subject, m.body, \
           m.is_read AS read, m.is_deleted AS deleted, m.is_guild_invite, \
           m.created_at, m.attached_item_id, m.attached_item_amount, \
           c.name AS sender_name \
    FROM mail m \
    JOIN characters c ON c.id = m.sender_id";

#[derive(sqlx::FromRow)]
struct MailRow {
    id: i64,
    sender_id: u32,
    recipient_id: u32,
    subject: String,
    body: String,
    read: bool,
    deleted: bool,
    is_guild_invite: bool,
    created_at: i64,
    attached_item_id: Option<u16>,
    attached_item_amount: Option<i16>,
    sender_name: String,
}

impl From<MailRow> for Mail {
    fn from(row: MailRow) -> Self {
        // Both attachment columns are written together; a row with an item
        // id but no amount carries the implicit single item.
        let attachment = row.attached_item_id.map(|item_id| ItemAttachment {
            item_id,
            amount: row.attached_item_amount.unwrap_or(1),
        });
        Mail {
            id: row.id,
            sender_id: row.sender_id,
            recipient_id: row.recipient_id,
            subject: row.subject,
            body: row.body,
            read: row.read,
            deleted: row.deleted,
            is_guild_invite: row.is_guild_invite,
            created_at: row.created_at,
            attachment,
            sender_name: row.sender_name,
        }
    }
}

#[derive(Clone)]
pub struct MailService {
    pool: SqlitePool,
}

impl MailService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Persists a draft and returns the new mail's row id.
    pub async fn send(&self, draft: &MailDraft) -> Result<i64, MailError> {
        let mut conn = self.pool.acquire().await?;
        self.send_with(&mut conn, draft).await
    }

    /// Like [`send`](Self::send) but on a caller-supplied connection, so a
    /// guild invitation can write its mail inside the same transaction as
    /// its application row.
    pub async fn send_with(
        &self,
        conn: &mut SqliteConnection,
        draft: &MailDraft,
    ) -> Result<i64, MailError> {
        let (item_id, amount) = match draft.attachment {
            Some(attachment) => {
                (Some(attachment.item_id), Some(attachment.amount))
            }
            None => (None, None),
        };
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO mail (sender_id, recipient_id, subject, body, \
             is_guild_invite, attached_item_id, attached_item_amount) \
             VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(draft.sender_id)
        .bind(draft.recipient_id)
        .bind(&draft.subject)
        .bind(&draft.body)
        .bind(draft.is_guild_invite)
        .bind(item_id)
        .bind(amount)
        .fetch_one(conn)
        .await?;
        tracing::debug!(
            mail_id = id,
            sender_id = draft.sender_id,
            recipient_id = draft.recipient_id,
            "mail stored"
        );
        Ok(id)
    }

    /// The newest undeleted page of a character's mailbox, most recent
    /// first, capped at [`LIST_PAGE_SIZE`]. Ties on the timestamp fall
    /// back to the row id so the order is total.
    pub async fn list_for(
        &self,
        recipient_id: u32,
    ) -> Result<Vec<Mail>, MailError> {
        let query = format!(
            "{MAIL_SELECT} \
             WHERE m.recipient_id = ? AND m.is_deleted = 0 \
             ORDER BY m.created_at DESC, m.id DESC LIMIT {LIST_PAGE_SIZE}"
        );
        let rows: Vec<MailRow> = sqlx::query_as(&query)
            .bind(recipient_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Mail::from).collect())
    }

    pub async fn by_id(&self, mail_id: i64) -> Result<Mail, MailError> {
        let query = format!("{MAIL_SELECT} WHERE m.id = ?");
        let row: Option<MailRow> = sqlx::query_as(&query)
            .bind(mail_id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Mail::from).ok_or(MailError::NotFound(mail_id))
    }

    /// Marks a mail read. The flag only ever moves towards read; there is
    /// no way back, so repeated reads are naturally idempotent.
    pub async fn mark_read(&self, mail_id: i64) -> Result<(), MailError> {
        let done = sqlx::query("UPDATE mail SET is_read = 1 WHERE id = ?")
            .bind(mail_id)
            .execute(&self.pool)
            .await?;
        if done.rows_affected() == 0 {
            return Err(MailError::NotFound(mail_id));
        }
        Ok(())
    }

    /// Soft-deletes a mail. The row stays for audit; listings skip it.
    pub async fn mark_deleted(&self, mail_id: i64) -> Result<(), MailError> {
        let done = sqlx::query("UPDATE mail SET is_deleted = 1 WHERE id = ?")
            .bind(mail_id)
            .execute(&self.pool)
            .await?;
        if done.rows_affected() == 0 {
            return Err(MailError::NotFound(mail_id));
        }
        Ok(())
    }

    /// Pushes a "new mail" alert at the recipient if they are online.
    /// Returns whether the alert was queued; an offline recipient simply
    /// finds the mail at next listing.
    pub async fn notify(
        &self,
        registry: &SessionRegistry,
        mail: &Mail,
    ) -> Result<bool, MailError> {
        let Some(link) = registry.get(mail.recipient_id).await else {
            return Ok(false);
        };

        let mut w = FrameWriter::new();
        binpacket::MailNotify {
            sender_name: mail.sender_name.clone(),
        }
        .build(&mut w)?;

        let message = Message::SysCastedBinary(MsgSysCastedBinary {
            char_id: mail.sender_id,
            broadcast_type: 0x00,
            message_type: binary_message_type::MAIL_NOTIFY,
            payload: w.into_vec(),
        });
        match link.queue_message(&message) {
            Ok(()) => Ok(true),
            // The recipient raced a disconnect; same as being offline.
            Err(ravengate_session::SessionError::Disconnected(char_id)) => {
                tracing::debug!(char_id, "mail alert dropped, recipient gone");
                Ok(false)
            }
            Err(ravengate_session::SessionError::Protocol(e)) => Err(e.into()),
            Err(other) => {
                tracing::warn!(error = %other, "mail alert failed");
                Ok(false)
            }
        }
    }
}
