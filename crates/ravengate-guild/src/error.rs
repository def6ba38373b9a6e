use thiserror::Error;

/// Errors from the guild service.
///
/// Domain failures (`NotFound`, `NoApplication`, `NotAMember`) are ordinary
/// outcomes a handler answers with a failure ack; `Store` and `Icon` are
/// infrastructure faults.
#[derive(Debug, Error)]
pub enum GuildError {
    #[error("guild {0} not found")]
    NotFound(u32),

    #[error("no pending application for character {char_id} in guild {guild_id}")]
    NoApplication { guild_id: u32, char_id: u32 },

    #[error("character {char_id} is not a member of guild {guild_id}")]
    NotAMember { guild_id: u32, char_id: u32 },

    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("guild icon column is not valid JSON: {0}")]
    Icon(#[from] serde_json::Error),
}

impl GuildError {
    /// Whether this is an expected domain outcome rather than an
    /// infrastructure fault. Handlers turn domain outcomes into failure
    /// acks and keep the session alive.
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::NoApplication { .. } | Self::NotAMember { .. }
        )
    }
}
