use anyhow::Result;
use tracing::info;

use super::manager::Database;
use crate::auth::password::hash_password;
use crate::config::config;

/// Idempotent schema, applied statement by statement at startup.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id          BIGSERIAL PRIMARY KEY,
        username    TEXT NOT NULL UNIQUE,
        password    TEXT NOT NULL,
        full_name   TEXT,
        email       TEXT,
        is_active   BOOLEAN NOT NULL DEFAULT TRUE,
        is_admin    BOOLEAN NOT NULL DEFAULT FALSE
    )",
    "CREATE TABLE IF NOT EXISTS groups (
        id          BIGSERIAL PRIMARY KEY,
        name        TEXT NOT NULL UNIQUE,
        description TEXT,
        owner_id    BIGINT NOT NULL REFERENCES users(id)
    )",
    "CREATE TABLE IF NOT EXISTS group_members (
        id          BIGSERIAL PRIMARY KEY,
        group_id    BIGINT NOT NULL REFERENCES groups(id) ON DELETE CASCADE,
        user_id     BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        UNIQUE (group_id, user_id)
    )",
    "CREATE TABLE IF NOT EXISTS messages (
        id          BIGSERIAL PRIMARY KEY,
        group_id    BIGINT NOT NULL REFERENCES groups(id) ON DELETE CASCADE,
        user_id     BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        message     TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_messages_group ON messages (group_id)",
    "CREATE TABLE IF NOT EXISTS message_likes (
        id          BIGSERIAL PRIMARY KEY,
        message_id  BIGINT NOT NULL REFERENCES messages(id) ON DELETE CASCADE,
        user_id     BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        UNIQUE (message_id, user_id)
    )",
    "CREATE INDEX IF NOT EXISTS idx_likes_message ON message_likes (message_id)",
];

/// Create tables and indexes if they do not exist yet.
pub async fn run() -> Result<()> {
    let pool = Database::pool().await?;
    for statement in SCHEMA {
        sqlx::query(statement).execute(&pool).await?;
    }
    info!("Database migrations complete");
    Ok(())
}

/// Seed the bootstrap admin account. Safe to run on every startup; the
/// unique constraint on username makes the insert a no-op once it exists.
pub async fn bootstrap_admin() -> Result<()> {
    let pool = Database::pool().await?;
    let security = &config().security;

    let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE username = $1")
        .bind(&security.bootstrap_admin_username)
        .fetch_optional(&pool)
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    let digest = hash_password(&security.bootstrap_admin_password)?;

    sqlx::query(
        "INSERT INTO users (username, password, full_name, email, is_admin, is_active)
         VALUES ($1, $2, $1, $3, TRUE, TRUE)
         ON CONFLICT (username) DO NOTHING",
    )
    .bind(&security.bootstrap_admin_username)
    .bind(&digest)
    .bind(format!("{}@gmail.com", security.bootstrap_admin_username))
    .execute(&pool)
    .await?;

    info!(
        "Bootstrap admin account ready: {}",
        security.bootstrap_admin_username
    );
    Ok(())
}
