//! Integration tests for the guild service against an in-memory store.
//!
//! The schema here mirrors production; every test gets a fresh database.

use ravengate_guild::{
    FestivalColour, GuildApplicationKind, GuildError, GuildIcon,
    GuildIconPart, GuildService, SEARCH_PAGE_SIZE,
};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

const SCHEMA: &str = "\
    CREATE TABLE characters (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL
    );
    CREATE TABLE guilds (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        created_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now')),
        leader_id INTEGER NOT NULL,
        main_motto INTEGER NOT NULL DEFAULT 0,
        sub_motto INTEGER NOT NULL DEFAULT 0,
        comment TEXT NOT NULL DEFAULT '',
        rp INTEGER NOT NULL DEFAULT 0,
        festival_colour TEXT NOT NULL DEFAULT 'none',
        guild_hall INTEGER NOT NULL DEFAULT 0,
        icon TEXT
    );
    CREATE TABLE guild_characters (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        guild_id INTEGER NOT NULL,
        character_id INTEGER NOT NULL UNIQUE,
        order_index INTEGER NOT NULL,
        joined_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
    );
    CREATE TABLE guild_applications (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        guild_id INTEGER NOT NULL,
        character_id INTEGER NOT NULL,
        actor_id INTEGER NOT NULL,
        kind TEXT NOT NULL,
        created_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now')),
        UNIQUE (guild_id, character_id)
    );";

async fn fresh_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::raw_sql(SCHEMA).execute(&pool).await.unwrap();
    pool
}

async fn add_character(pool: &SqlitePool, id: u32, name: &str) {
    sqlx::query("INSERT INTO characters (id, name) VALUES (?, ?)")
        .bind(id)
        .bind(name)
        .execute(pool)
        .await
        .unwrap();
}

async fn apply(service: &GuildService, guild_id: u32, char_id: u32) {
    let mut conn = service.pool().acquire().await.unwrap();
    service
        .create_application(
            &mut conn,
            guild_id,
            char_id,
            char_id,
            GuildApplicationKind::Applied,
        )
        .await
        .unwrap();
}

async fn order_index(pool: &SqlitePool, guild_id: u32, char_id: u32) -> u32 {
    sqlx::query_scalar(
        "SELECT order_index FROM guild_characters \
         WHERE guild_id = ? AND character_id = ?",
    )
    .bind(guild_id)
    .bind(char_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[tokio::test]
async fn test_create_makes_founder_sole_member_and_leader() {
    let pool = fresh_pool().await;
    add_character(&pool, 10, "Aster").await;
    let service = GuildService::new(pool);

    let guild_id = service.create(10, "Nightwatch").await.unwrap();
    let guild = service.by_id(guild_id).await.unwrap().unwrap();

    assert_eq!(guild.name, "Nightwatch");
    assert_eq!(guild.leader_id, 10);
    assert_eq!(guild.leader_name, "Aster");
    assert_eq!(guild.member_count, 1);
    assert_eq!(guild.festival_colour, FestivalColour::None);
    assert_eq!(order_index(service.pool(), guild_id, 10).await, 1);
}

#[tokio::test]
async fn test_failed_create_leaves_no_guild_row() {
    let pool = fresh_pool().await;
    add_character(&pool, 10, "Aster").await;
    let service = GuildService::new(pool);

    service.create(10, "First").await.unwrap();
    // The founder is already a member of another guild, so the membership
    // insert violates the unique constraint and the whole create unwinds.
    let result = service.create(10, "Second").await;
    assert!(matches!(result, Err(GuildError::Store(_))));

    let guilds: u32 = sqlx::query_scalar("SELECT COUNT(1) FROM guilds")
        .fetch_one(service.pool())
        .await
        .unwrap();
    assert_eq!(guilds, 1);
}

#[tokio::test]
async fn test_accept_moves_application_into_membership() {
    let pool = fresh_pool().await;
    add_character(&pool, 10, "Aster").await;
    add_character(&pool, 11, "Brie").await;
    let service = GuildService::new(pool);

    let guild_id = service.create(10, "Nightwatch").await.unwrap();
    apply(&service, guild_id, 11).await;

    service.accept_application(guild_id, 11).await.unwrap();

    let guild = service.by_id(guild_id).await.unwrap().unwrap();
    assert_eq!(guild.member_count, 2);
    assert_eq!(order_index(service.pool(), guild_id, 11).await, 2);
    assert!(service
        .application_for(guild_id, 11)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_second_accept_of_same_application_fails() {
    let pool = fresh_pool().await;
    add_character(&pool, 10, "Aster").await;
    add_character(&pool, 11, "Brie").await;
    let service = GuildService::new(pool);

    let guild_id = service.create(10, "Nightwatch").await.unwrap();
    apply(&service, guild_id, 11).await;
    service.accept_application(guild_id, 11).await.unwrap();

    let result = service.accept_application(guild_id, 11).await;
    assert!(matches!(
        result,
        Err(GuildError::NoApplication { char_id: 11, .. })
    ));
    // No duplicate membership appeared.
    let guild = service.by_id(guild_id).await.unwrap().unwrap();
    assert_eq!(guild.member_count, 2);
}

#[tokio::test]
async fn test_reject_only_removes_applications_not_invitations() {
    let pool = fresh_pool().await;
    add_character(&pool, 10, "Aster").await;
    add_character(&pool, 12, "Cole").await;
    let service = GuildService::new(pool);

    let guild_id = service.create(10, "Nightwatch").await.unwrap();
    {
        let mut conn = service.pool().acquire().await.unwrap();
        service
            .create_application(
                &mut conn,
                guild_id,
                12,
                10,
                GuildApplicationKind::Invited,
            )
            .await
            .unwrap();
    }

    // Reject targets self-made applications; the invitation stays.
    assert!(!service.reject_application(guild_id, 12).await.unwrap());
    assert!(service.has_application(guild_id, 12).await.unwrap());

    // Cancelling the invitation removes it.
    assert!(service.cancel_invitation(guild_id, 12).await.unwrap());
    assert!(service
        .application_for(guild_id, 12)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_arrange_rewrites_ranks_from_slot_two() {
    let pool = fresh_pool().await;
    for (id, name) in [(10, "Aster"), (11, "Brie"), (12, "Cole")] {
        add_character(&pool, id, name).await;
    }
    let service = GuildService::new(pool);

    let guild_id = service.create(10, "Nightwatch").await.unwrap();
    for char_id in [11, 12] {
        apply(&service, guild_id, char_id).await;
        service.accept_application(guild_id, char_id).await.unwrap();
    }

    service.arrange_members(guild_id, &[12, 11]).await.unwrap();

    assert_eq!(order_index(service.pool(), guild_id, 10).await, 1);
    assert_eq!(order_index(service.pool(), guild_id, 12).await, 2);
    assert_eq!(order_index(service.pool(), guild_id, 11).await, 3);
}

#[tokio::test]
async fn test_arrange_with_non_member_rolls_back() {
    let pool = fresh_pool().await;
    add_character(&pool, 10, "Aster").await;
    add_character(&pool, 11, "Brie").await;
    let service = GuildService::new(pool);

    let guild_id = service.create(10, "Nightwatch").await.unwrap();
    apply(&service, guild_id, 11).await;
    service.accept_application(guild_id, 11).await.unwrap();
    let before = order_index(service.pool(), guild_id, 11).await;

    // 999 is not a member; the whole rearrangement must unwind, including
    // the update for 11 that preceded the failure.
    let result = service.arrange_members(guild_id, &[11, 999]).await;
    assert!(matches!(
        result,
        Err(GuildError::NotAMember { char_id: 999, .. })
    ));
    assert_eq!(order_index(service.pool(), guild_id, 11).await, before);
}

#[tokio::test]
async fn test_donations_accumulate() {
    let pool = fresh_pool().await;
    add_character(&pool, 10, "Aster").await;
    let service = GuildService::new(pool);

    let guild_id = service.create(10, "Nightwatch").await.unwrap();
    service.donate_rp(guild_id, 30).await.unwrap();
    service.donate_rp(guild_id, 12).await.unwrap();

    let guild = service.by_id(guild_id).await.unwrap().unwrap();
    assert_eq!(guild.rp, 42);

    assert!(matches!(
        service.donate_rp(9999, 1).await,
        Err(GuildError::NotFound(9999))
    ));
}

#[tokio::test]
async fn test_disband_removes_guild_members_and_applications() {
    let pool = fresh_pool().await;
    add_character(&pool, 10, "Aster").await;
    add_character(&pool, 11, "Brie").await;
    let service = GuildService::new(pool);

    let guild_id = service.create(10, "Nightwatch").await.unwrap();
    apply(&service, guild_id, 11).await;

    service.disband(guild_id).await.unwrap();

    assert!(service.by_id(guild_id).await.unwrap().is_none());
    let members: u32 =
        sqlx::query_scalar("SELECT COUNT(1) FROM guild_characters")
            .fetch_one(service.pool())
            .await
            .unwrap();
    assert_eq!(members, 0);
    assert!(matches!(
        service.disband(guild_id).await,
        Err(GuildError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_find_by_name_is_case_insensitive_substring() {
    let pool = fresh_pool().await;
    add_character(&pool, 10, "Aster").await;
    add_character(&pool, 11, "Brie").await;
    let service = GuildService::new(pool);

    let a = service.create(10, "Nightwatch").await.unwrap();
    service.create(11, "Daybreak").await.unwrap();

    let found = service.find_by_name("NIGHT").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, a);

    assert!(service.find_by_name("nowhere").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_find_by_name_caps_result_count() {
    let pool = fresh_pool().await;
    let service = GuildService::new(pool);

    // More matching guilds than one search response carries.
    for i in 0..SEARCH_PAGE_SIZE + 2 {
        let founder = 100 + i;
        add_character(service.pool(), founder, &format!("Founder{i}")).await;
        service
            .create(founder, &format!("Legion {i}"))
            .await
            .unwrap();
    }

    let found = service.find_by_name("Legion").await.unwrap();
    assert_eq!(found.len(), SEARCH_PAGE_SIZE as usize);
}

#[tokio::test]
async fn test_save_round_trips_icon_and_colour() {
    let pool = fresh_pool().await;
    add_character(&pool, 10, "Aster").await;
    let service = GuildService::new(pool);

    let guild_id = service.create(10, "Nightwatch").await.unwrap();
    let mut guild = service.by_id(guild_id).await.unwrap().unwrap();
    guild.comment = "Dusk till dawn".into();
    guild.festival_colour = FestivalColour::Blue;
    guild.icon = Some(GuildIcon {
        parts: vec![GuildIconPart {
            index: 0,
            id: 7,
            page: 0,
            size: 1,
            rotation: 0,
            pos_x: 50,
            pos_y: 50,
        }],
    });

    service.save(&guild).await.unwrap();

    let loaded = service.by_id(guild_id).await.unwrap().unwrap();
    assert_eq!(loaded.comment, "Dusk till dawn");
    assert_eq!(loaded.festival_colour, FestivalColour::Blue);
    assert_eq!(loaded.icon, guild.icon);
}

#[tokio::test]
async fn test_by_character_sees_membership_and_pending_application() {
    let pool = fresh_pool().await;
    add_character(&pool, 10, "Aster").await;
    add_character(&pool, 11, "Brie").await;
    let service = GuildService::new(pool);

    let guild_id = service.create(10, "Nightwatch").await.unwrap();
    apply(&service, guild_id, 11).await;

    // Member and pending applicant both resolve to the guild.
    let via_member = service.by_character(10).await.unwrap().unwrap();
    let via_applicant = service.by_character(11).await.unwrap().unwrap();
    assert_eq!(via_member.id, guild_id);
    assert_eq!(via_applicant.id, guild_id);

    assert!(service.by_character(999).await.unwrap().is_none());
}

#[tokio::test]
async fn test_kick_removes_membership() {
    let pool = fresh_pool().await;
    add_character(&pool, 10, "Aster").await;
    add_character(&pool, 11, "Brie").await;
    let service = GuildService::new(pool);

    let guild_id = service.create(10, "Nightwatch").await.unwrap();
    apply(&service, guild_id, 11).await;
    service.accept_application(guild_id, 11).await.unwrap();

    service.remove_character(guild_id, 11).await.unwrap();
    let guild = service.by_id(guild_id).await.unwrap().unwrap();
    assert_eq!(guild.member_count, 1);

    assert!(matches!(
        service.remove_character(guild_id, 11).await,
        Err(GuildError::NotAMember { .. })
    ));
}
