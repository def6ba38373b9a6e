//! Integration tests for the mailbox service against an in-memory store.

use ravengate_mail::{MailDraft, MailError, MailService, LIST_PAGE_SIZE};
use ravengate_protocol::binpacket::binary_message_type;
use ravengate_protocol::packets::ItemAttachment;
use ravengate_protocol::{FrameReader, Opcode};
use ravengate_session::{Session, SessionRegistry};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

const SCHEMA: &str = "\
    CREATE TABLE characters (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL
    );
    CREATE TABLE mail (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        sender_id INTEGER NOT NULL,
        recipient_id INTEGER NOT NULL,
        subject TEXT NOT NULL,
        body TEXT NOT NULL,
        is_read INTEGER NOT NULL DEFAULT 0,
        is_deleted INTEGER NOT NULL DEFAULT 0,
        is_guild_invite INTEGER NOT NULL DEFAULT 0,
        attached_item_id INTEGER,
        attached_item_amount INTEGER,
        created_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
    );";

async fn fresh_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::raw_sql(SCHEMA).execute(&pool).await.unwrap();
    for (id, name) in [(1, "Rin"), (2, "Kai")] {
        sqlx::query("INSERT INTO characters (id, name) VALUES (?, ?)")
            .bind(id)
            .bind(name)
            .execute(&pool)
            .await
            .unwrap();
    }
    pool
}

fn draft(subject: &str) -> MailDraft {
    MailDraft {
        sender_id: 1,
        recipient_id: 2,
        subject: subject.into(),
        body: "hello".into(),
        is_guild_invite: false,
        attachment: None,
    }
}

#[tokio::test]
async fn test_send_then_list_round_trips_attachment() {
    let service = MailService::new(fresh_pool().await);

    let mut with_item = draft("gift");
    with_item.attachment = Some(ItemAttachment {
        amount: 3,
        item_id: 0x0C40,
    });
    service.send(&with_item).await.unwrap();
    service.send(&draft("plain")).await.unwrap();

    let listed = service.list_for(2).await.unwrap();
    assert_eq!(listed.len(), 2);
    // Newest first.
    assert_eq!(listed[0].subject, "plain");
    assert!(listed[0].attachment.is_none());
    assert_eq!(
        listed[1].attachment,
        Some(ItemAttachment {
            amount: 3,
            item_id: 0x0C40
        })
    );
    assert_eq!(listed[1].sender_name, "Rin");
    assert!(!listed[1].read);
}

#[tokio::test]
async fn test_listing_caps_at_page_size_newest_first() {
    let service = MailService::new(fresh_pool().await);
    for i in 0..LIST_PAGE_SIZE + 8 {
        service.send(&draft(&format!("m{i}"))).await.unwrap();
    }

    let listed = service.list_for(2).await.unwrap();
    assert_eq!(listed.len(), LIST_PAGE_SIZE as usize);
    // All rows share one timestamp; the id tiebreak keeps newest first.
    assert_eq!(listed[0].subject, format!("m{}", LIST_PAGE_SIZE + 7));
    assert_eq!(listed.last().unwrap().subject, "m8");
}

#[tokio::test]
async fn test_deleted_mail_is_hidden_but_kept() {
    let service = MailService::new(fresh_pool().await);
    let id = service.send(&draft("bye")).await.unwrap();

    service.mark_deleted(id).await.unwrap();

    assert!(service.list_for(2).await.unwrap().is_empty());
    // Soft delete: the row is still loadable directly.
    let mail = service.by_id(id).await.unwrap();
    assert!(mail.deleted);
}

#[tokio::test]
async fn test_mark_read_is_idempotent() {
    let service = MailService::new(fresh_pool().await);
    let id = service.send(&draft("news")).await.unwrap();

    service.mark_read(id).await.unwrap();
    service.mark_read(id).await.unwrap();
    assert!(service.by_id(id).await.unwrap().read);

    assert!(matches!(
        service.mark_read(9999).await,
        Err(MailError::NotFound(9999))
    ));
}

#[tokio::test]
async fn test_send_with_respects_caller_transaction() {
    let service = MailService::new(fresh_pool().await);

    let mut tx = service.pool().begin().await.unwrap();
    service.send_with(&mut tx, &draft("phantom")).await.unwrap();
    tx.rollback().await.unwrap();

    assert!(service.list_for(2).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_notify_pushes_alert_to_online_recipient() {
    let service = MailService::new(fresh_pool().await);
    let registry = SessionRegistry::new();

    let (session, mut rx) = Session::new(2, "Kai".into());
    registry.insert(session.link()).await;

    let id = service.send(&draft("ping")).await.unwrap();
    let mail = service.by_id(id).await.unwrap();
    assert!(service.notify(&registry, &mail).await.unwrap());

    let frame = rx.try_recv().unwrap();
    let mut r = FrameReader::new(&frame);
    assert_eq!(r.read_u16().unwrap(), Opcode::SysCastedBinary.value());
    let _len = r.read_u16().unwrap();
    assert_eq!(r.read_u32().unwrap(), 1); // originating sender
    let _broadcast_type = r.read_u8().unwrap();
    assert_eq!(r.read_u8().unwrap(), binary_message_type::MAIL_NOTIFY);
    let size = r.read_u16().unwrap() as usize;
    let blob = r.read_bytes(size).unwrap();
    assert_eq!(blob, b"Rin\0");
}

#[tokio::test]
async fn test_notify_offline_recipient_is_a_quiet_no_op() {
    let service = MailService::new(fresh_pool().await);
    let registry = SessionRegistry::new();

    let id = service.send(&draft("ping")).await.unwrap();
    let mail = service.by_id(id).await.unwrap();
    assert!(!service.notify(&registry, &mail).await.unwrap());
}
