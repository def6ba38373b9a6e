//! Mailbox rows and drafts.

use ravengate_protocol::packets::ItemAttachment;

/// A stored mail, sender display name joined in for listings.
///
/// `attachment` is presence-tagged: a mail either carries an item or it
/// does not. There is no sentinel item id.
#[derive(Debug, Clone)]
pub struct Mail {
    pub id: i64,
    pub sender_id: u32,
    pub recipient_id: u32,
    pub subject: String,
    pub body: String,
    pub read: bool,
    pub deleted: bool,
    pub is_guild_invite: bool,
    pub created_at: i64,
    pub attachment: Option<ItemAttachment>,
    pub sender_name: String,
}

/// What a sender supplies; ids and timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct MailDraft {
    pub sender_id: u32,
    pub recipient_id: u32,
    pub subject: String,
    pub body: String,
    pub is_guild_invite: bool,
    pub attachment: Option<ItemAttachment>,
}
