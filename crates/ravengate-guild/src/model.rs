//! Guild domain types.
//!
//! These mirror the persistent store's shape. The icon is stored as a JSON
//! text column and decoded into [`GuildIcon`] when a guild is loaded.

use serde::{Deserialize, Serialize};

/// Guild allegiance in the seasonal festival. The wire encoding is not the
/// storage encoding: the store keeps a readable tag, the wire uses the
/// client's magic bytes (see [`FestivalColour::wire_code`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
pub enum FestivalColour {
    None,
    Red,
    Blue,
}

impl FestivalColour {
    pub fn wire_code(self) -> u8 {
        match self {
            Self::None => 0xFF,
            Self::Red => 0x01,
            Self::Blue => 0x00,
        }
    }
}

/// One placed element of a guild's composed icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildIconPart {
    pub index: u16,
    pub id: u16,
    pub page: u8,
    pub size: u8,
    pub rotation: u8,
    pub pos_x: u16,
    pub pos_y: u16,
}

/// The guild's icon as the client composes it, persisted as JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildIcon {
    pub parts: Vec<GuildIconPart>,
}

/// A guild as loaded from the store, leader identity joined in.
///
/// The leader join is mandatory: a guild whose leader row is missing from
/// the member table never loads, which keeps the "leader is a member"
/// invariant visible at the query layer.
#[derive(Debug, Clone)]
pub struct Guild {
    pub id: u32,
    pub name: String,
    pub main_motto: u8,
    pub sub_motto: u8,
    pub created_at: i64,
    pub member_count: u16,
    pub rp: u32,
    pub comment: String,
    pub festival_colour: FestivalColour,
    pub guild_hall: u16,
    pub icon: Option<GuildIcon>,
    pub leader_id: u32,
    pub leader_name: String,
}

/// How a pending application came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
pub enum GuildApplicationKind {
    /// The character asked to join.
    Applied,
    /// A member invited the character.
    Invited,
}

/// A pending join application or invitation.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GuildApplication {
    pub id: i64,
    pub guild_id: u32,
    pub character_id: u32,
    /// Who created the entry: the applicant for `Applied`, the inviting
    /// member for `Invited`.
    pub actor_id: u32,
    pub kind: GuildApplicationKind,
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_festival_wire_codes() {
        assert_eq!(FestivalColour::None.wire_code(), 0xFF);
        assert_eq!(FestivalColour::Red.wire_code(), 0x01);
        assert_eq!(FestivalColour::Blue.wire_code(), 0x00);
    }

    #[test]
    fn test_icon_json_round_trip() {
        let icon = GuildIcon {
            parts: vec![GuildIconPart {
                index: 0,
                id: 14,
                page: 1,
                size: 2,
                rotation: 3,
                pos_x: 100,
                pos_y: 64,
            }],
        };
        let json = serde_json::to_string(&icon).unwrap();
        let back: GuildIcon = serde_json::from_str(&json).unwrap();
        assert_eq!(back, icon);
    }
}
