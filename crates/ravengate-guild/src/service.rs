//! The guild service: transactional lifecycle operations over the store.
//!
//! Every multi-statement operation runs inside a single transaction so a
//! mid-operation fault leaves no partial state; single-statement
//! operations rely on the statement's own atomicity. Operations that other
//! services compose with (invitations pairing an application with a mail)
//! take a `&mut SqliteConnection` so the caller decides the transaction
//! boundary.

use sqlx::{SqliteConnection, SqlitePool};

use crate::{
    FestivalColour, Guild, GuildApplication, GuildApplicationKind, GuildError,
    GuildIcon,
};

/// Upper bound on name-search results. The wire listing counts entries in
/// one `u16` and clients refine the term rather than page, so an unbounded
/// result set has nowhere to go.
pub const SEARCH_PAGE_SIZE: u32 = 64;

/// Shared SELECT for loading guilds with leader identity and live member
/// count. The join against the member table on the leader's id means a
/// guild whose leader is not a member simply does not load.
const GUILD_INFO_QUERY: &str = "\
    SELECT g.id, g.name, g.main_motto, g.sub_motto, g.created_at, g.rp, \
           g.comment, g.festival_colour, g.guild_hall, g.icon, \
           g.leader_id, lc.name AS leader_name, \
           (SELECT COUNT(1) FROM guild_characters gc \
             WHERE gc.guild_id = g.id) AS member_count \
    FROM guilds g \
    JOIN characters lc ON lc.id = g.leader_id \
    JOIN guild_characters lgc \
      ON lgc.guild_id = g.id AND lgc.character_id = g.leader_id";

#[derive(sqlx::FromRow)]
struct GuildRow {
    id: u32,
    name: String,
    main_motto: u8,
    sub_motto: u8,
    created_at: i64,
    rp: u32,
    comment: String,
    festival_colour: FestivalColour,
    guild_hall: u16,
    icon: Option<String>,
    leader_id: u32,
    leader_name: String,
    member_count: u16,
}

impl GuildRow {
    fn into_guild(self) -> Result<Guild, GuildError> {
        let icon: Option<GuildIcon> =
            self.icon.as_deref().map(serde_json::from_str).transpose()?;
        Ok(Guild {
            id: self.id,
            name: self.name,
            main_motto: self.main_motto,
            sub_motto: self.sub_motto,
            created_at: self.created_at,
            member_count: self.member_count,
            rp: self.rp,
            comment: self.comment,
            festival_colour: self.festival_colour,
            guild_hall: self.guild_hall,
            icon,
            leader_id: self.leader_id,
            leader_name: self.leader_name,
        })
    }
}

/// Long-lived service object owning the connection pool, handed to
/// handlers by reference.
#[derive(Clone)]
pub struct GuildService {
    pool: SqlitePool,
}

impl GuildService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// The underlying pool, for callers composing cross-service
    /// transactions.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Creates a guild with the founder as leader and sole member, in one
    /// transaction. Either both rows exist afterwards or neither does.
    ///
    /// Returns the new guild's id.
    pub async fn create(
        &self,
        founder_id: u32,
        name: &str,
    ) -> Result<u32, GuildError> {
        let mut tx = self.pool.begin().await?;
        let guild_id: u32 = sqlx::query_scalar(
            "INSERT INTO guilds (name, leader_id) VALUES (?, ?) RETURNING id",
        )
        .bind(name)
        .bind(founder_id)
        .fetch_one(&mut *tx)
        .await?;

        // Slot 1 is reserved for the leader.
        sqlx::query(
            "INSERT INTO guild_characters (guild_id, character_id, order_index) \
             VALUES (?, ?, 1)",
        )
        .bind(guild_id)
        .bind(founder_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::info!(guild_id, founder_id, name, "guild created");
        Ok(guild_id)
    }

    /// Disbands a guild: memberships, pending applications and the guild
    /// row all go in one transaction.
    pub async fn disband(&self, guild_id: u32) -> Result<(), GuildError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM guild_applications WHERE guild_id = ?")
            .bind(guild_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM guild_characters WHERE guild_id = ?")
            .bind(guild_id)
            .execute(&mut *tx)
            .await?;
        let done = sqlx::query("DELETE FROM guilds WHERE id = ?")
            .bind(guild_id)
            .execute(&mut *tx)
            .await?;
        if done.rows_affected() == 0 {
            return Err(GuildError::NotFound(guild_id));
        }
        tx.commit().await?;
        tracing::info!(guild_id, "guild disbanded");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Applications and membership
    // ------------------------------------------------------------------

    /// Records a pending application or invitation. Takes a connection so
    /// an invitation can share a transaction with its notification mail.
    pub async fn create_application(
        &self,
        conn: &mut SqliteConnection,
        guild_id: u32,
        char_id: u32,
        actor_id: u32,
        kind: GuildApplicationKind,
    ) -> Result<(), GuildError> {
        sqlx::query(
            "INSERT INTO guild_applications (guild_id, character_id, actor_id, kind) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(guild_id)
        .bind(char_id)
        .bind(actor_id)
        .bind(kind)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Converts a pending application into membership: delete the
    /// application and insert the member row in one transaction. The new
    /// member is appended after the current highest rank.
    ///
    /// # Errors
    /// [`GuildError::NoApplication`] if no application is pending — which
    /// makes a repeated accept of the same application a clean no-op
    /// failure instead of a duplicate membership.
    pub async fn accept_application(
        &self,
        guild_id: u32,
        char_id: u32,
    ) -> Result<(), GuildError> {
        let mut tx = self.pool.begin().await?;
        let removed = sqlx::query(
            "DELETE FROM guild_applications \
             WHERE guild_id = ? AND character_id = ?",
        )
        .bind(guild_id)
        .bind(char_id)
        .execute(&mut *tx)
        .await?;
        if removed.rows_affected() == 0 {
            return Err(GuildError::NoApplication { guild_id, char_id });
        }

        sqlx::query(
            "INSERT INTO guild_characters (guild_id, character_id, order_index) \
             VALUES (?, ?, (SELECT COALESCE(MAX(order_index), 1) + 1 \
                            FROM guild_characters WHERE guild_id = ?))",
        )
        .bind(guild_id)
        .bind(char_id)
        .bind(guild_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::info!(guild_id, char_id, "guild application accepted");
        Ok(())
    }

    /// Removes a character's own application. Returns whether one existed.
    pub async fn reject_application(
        &self,
        guild_id: u32,
        char_id: u32,
    ) -> Result<bool, GuildError> {
        let done = sqlx::query(
            "DELETE FROM guild_applications \
             WHERE guild_id = ? AND character_id = ? AND kind = 'applied'",
        )
        .bind(guild_id)
        .bind(char_id)
        .execute(&self.pool)
        .await?;
        Ok(done.rows_affected() > 0)
    }

    /// Withdraws an outstanding invitation. Returns whether one existed.
    pub async fn cancel_invitation(
        &self,
        guild_id: u32,
        char_id: u32,
    ) -> Result<bool, GuildError> {
        let done = sqlx::query(
            "DELETE FROM guild_applications \
             WHERE guild_id = ? AND character_id = ? AND kind = 'invited'",
        )
        .bind(guild_id)
        .bind(char_id)
        .execute(&self.pool)
        .await?;
        Ok(done.rows_affected() > 0)
    }

    /// Removes a member (kick or voluntary leave).
    pub async fn remove_character(
        &self,
        guild_id: u32,
        char_id: u32,
    ) -> Result<(), GuildError> {
        let done = sqlx::query(
            "DELETE FROM guild_characters \
             WHERE guild_id = ? AND character_id = ?",
        )
        .bind(guild_id)
        .bind(char_id)
        .execute(&self.pool)
        .await?;
        if done.rows_affected() == 0 {
            return Err(GuildError::NotAMember { guild_id, char_id });
        }
        tracing::info!(guild_id, char_id, "guild member removed");
        Ok(())
    }

    /// Rewrites the member display order in one transaction. The leader
    /// keeps slot 1; arranged ranks are contiguous from 2 in the order
    /// given. Any id that is not a member aborts the whole rearrangement.
    pub async fn arrange_members(
        &self,
        guild_id: u32,
        char_ids: &[u32],
    ) -> Result<(), GuildError> {
        let mut tx = self.pool.begin().await?;
        for (offset, &char_id) in char_ids.iter().enumerate() {
            let done = sqlx::query(
                "UPDATE guild_characters SET order_index = ? \
                 WHERE guild_id = ? AND character_id = ?",
            )
            .bind(offset as u32 + 2)
            .bind(guild_id)
            .bind(char_id)
            .execute(&mut *tx)
            .await?;
            if done.rows_affected() != 1 {
                return Err(GuildError::NotAMember { guild_id, char_id });
            }
        }
        tx.commit().await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Mutation of guild attributes
    // ------------------------------------------------------------------

    /// Adds donated festival points to the guild's running total. The
    /// update is additive in the statement itself, so concurrent donations
    /// never lose each other.
    pub async fn donate_rp(
        &self,
        guild_id: u32,
        amount: u16,
    ) -> Result<(), GuildError> {
        let done = sqlx::query("UPDATE guilds SET rp = rp + ? WHERE id = ?")
            .bind(amount)
            .bind(guild_id)
            .execute(&self.pool)
            .await?;
        if done.rows_affected() == 0 {
            return Err(GuildError::NotFound(guild_id));
        }
        tracing::debug!(guild_id, amount, "festival points donated");
        Ok(())
    }

    /// Persists the mutable guild attributes (mottos, comment, festival
    /// allegiance, icon).
    pub async fn save(&self, guild: &Guild) -> Result<(), GuildError> {
        let icon = guild
            .icon
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let done = sqlx::query(
            "UPDATE guilds SET main_motto = ?, sub_motto = ?, comment = ?, \
             festival_colour = ?, guild_hall = ?, icon = ? WHERE id = ?",
        )
        .bind(guild.main_motto)
        .bind(guild.sub_motto)
        .bind(&guild.comment)
        .bind(guild.festival_colour)
        .bind(guild.guild_hall)
        .bind(icon)
        .bind(guild.id)
        .execute(&self.pool)
        .await?;
        if done.rows_affected() == 0 {
            return Err(GuildError::NotFound(guild.id));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub async fn by_id(
        &self,
        guild_id: u32,
    ) -> Result<Option<Guild>, GuildError> {
        let query = format!("{GUILD_INFO_QUERY} WHERE g.id = ?");
        let row: Option<GuildRow> = sqlx::query_as(&query)
            .bind(guild_id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(GuildRow::into_guild).transpose()
    }

    /// The guild a character belongs to, or the one they have asked to
    /// join if the application is still pending.
    pub async fn by_character(
        &self,
        char_id: u32,
    ) -> Result<Option<Guild>, GuildError> {
        let query = format!(
            "{GUILD_INFO_QUERY} WHERE g.id = (\
               SELECT gc.guild_id FROM guild_characters gc \
                WHERE gc.character_id = ? \
               UNION \
               SELECT ga.guild_id FROM guild_applications ga \
                WHERE ga.character_id = ? AND ga.kind = 'applied' \
               LIMIT 1)"
        );
        let row: Option<GuildRow> = sqlx::query_as(&query)
            .bind(char_id)
            .bind(char_id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(GuildRow::into_guild).transpose()
    }

    /// Case-insensitive substring search over guild names, capped at
    /// [`SEARCH_PAGE_SIZE`] results.
    pub async fn find_by_name(
        &self,
        term: &str,
    ) -> Result<Vec<Guild>, GuildError> {
        let query = format!(
            "{GUILD_INFO_QUERY} \
             WHERE LOWER(g.name) LIKE LOWER(?) ORDER BY g.id \
             LIMIT {SEARCH_PAGE_SIZE}"
        );
        let rows: Vec<GuildRow> = sqlx::query_as(&query)
            .bind(format!("%{term}%"))
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(GuildRow::into_guild).collect()
    }

    /// Whether any application or invitation is pending for the pair.
    pub async fn has_application(
        &self,
        guild_id: u32,
        char_id: u32,
    ) -> Result<bool, GuildError> {
        Ok(self.application_for(guild_id, char_id).await?.is_some())
    }

    pub async fn application_for(
        &self,
        guild_id: u32,
        char_id: u32,
    ) -> Result<Option<GuildApplication>, GuildError> {
        let application = sqlx::query_as(
            "SELECT id, guild_id, character_id, actor_id, kind, created_at \
             FROM guild_applications \
             WHERE guild_id = ? AND character_id = ?",
        )
        .bind(guild_id)
        .bind(char_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(application)
    }
}
