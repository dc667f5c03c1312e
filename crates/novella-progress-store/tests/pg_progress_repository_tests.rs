//! Integration tests for `PgProgressRepository`.
//!
//! These need a live database (`DATABASE_URL`); run with `--ignored`.

use chrono::{TimeZone, Utc};
use novella_core::ids::PlayerId;
use novella_core::repository::{ProgressRecord, ProgressRepository};
use novella_progress_store::pg_progress_repository::PgProgressRepository;
use sqlx::PgPool;
use uuid::Uuid;

fn record(completed: u32, unlocked: u32) -> ProgressRecord {
    ProgressRecord {
        chapters_completed: completed,
        chapters_unlocked: unlocked,
        updated_at: Some(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()),
    }
}

// --- load ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_load_returns_none_for_unknown_player(pool: PgPool) {
    let repo = PgProgressRepository::new(pool);

    let loaded = repo.load(PlayerId(Uuid::new_v4())).await.unwrap();

    assert!(loaded.is_none());
}

// --- save + load round-trip ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_save_then_load_returns_record(pool: PgPool) {
    let repo = PgProgressRepository::new(pool);
    let player_id = PlayerId(Uuid::new_v4());

    repo.save(player_id, &record(1, 2)).await.unwrap();

    let loaded = repo.load(player_id).await.unwrap().unwrap();
    assert_eq!(loaded, record(1, 2));
}

// --- monotonic watermark ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_save_never_lowers_unlocked(pool: PgPool) {
    let repo = PgProgressRepository::new(pool);
    let player_id = PlayerId(Uuid::new_v4());

    repo.save(player_id, &record(5, 6)).await.unwrap();
    repo.save(player_id, &record(2, 3)).await.unwrap();

    let loaded = repo.load(player_id).await.unwrap().unwrap();
    assert_eq!(loaded.chapters_unlocked, 6);
    assert_eq!(loaded.chapters_completed, 2);
}

// --- schema ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_ensure_schema_is_idempotent(pool: PgPool) {
    let repo = PgProgressRepository::new(pool);

    repo.ensure_schema().await.unwrap();
    repo.ensure_schema().await.unwrap();

    assert!(repo.load(PlayerId(Uuid::new_v4())).await.unwrap().is_none());
}
