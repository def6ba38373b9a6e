//! Guild lifecycle and membership for Ravengate.
//!
//! Guilds live in the persistent store; every compound mutation
//! (creation, disband, application acceptance, member rearrangement) is a
//! single transaction so the store never shows a half-applied guild.
//!
//! # Key types
//!
//! - [`GuildService`] — the pool-owning service object
//! - [`Guild`] / [`GuildApplication`] — rows as loaded from the store
//! - [`GuildIcon`] — the JSON-persisted composed icon

mod error;
mod model;
mod service;

pub use error::GuildError;
pub use model::{
    FestivalColour, Guild, GuildApplication, GuildApplicationKind, GuildIcon,
    GuildIconPart,
};
pub use service::{GuildService, SEARCH_PAGE_SIZE};
