//! Schema for the PostgreSQL store.
//!
//! Genre and director are kept as JSONB documents, favorites as a text array, so the
//! records keep the document shape the API serves. `movies.seq` records insertion order,
//! which is the order lookups scan in.

use sqlx::PgPool;

use crate::database::manager::DatabaseError;

const CREATE_MOVIES: &str = r#"
CREATE TABLE IF NOT EXISTS movies (
    id UUID PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    genre JSONB NOT NULL,
    director JSONB NOT NULL,
    actors TEXT[] NOT NULL DEFAULT '{}',
    year INTEGER,
    image_path TEXT NOT NULL DEFAULT '',
    featured BOOLEAN NOT NULL DEFAULT FALSE,
    seq BIGSERIAL
)
"#;

const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id UUID PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    email TEXT NOT NULL,
    birthday DATE,
    favorite_movies TEXT[] NOT NULL DEFAULT '{}'
)
"#;

/// Brings version 1 tables up to date
const UPGRADES: &[&str] = &["ALTER TABLE movies ADD COLUMN IF NOT EXISTS seq BIGSERIAL"];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_movies_seq ON movies(seq)",
    "CREATE INDEX IF NOT EXISTS idx_movies_title ON movies(title)",
    "CREATE INDEX IF NOT EXISTS idx_movies_genre_name ON movies((genre->>'Name'))",
    "CREATE INDEX IF NOT EXISTS idx_movies_director_name ON movies((director->>'Name'))",
];

/// Get the migration version
pub fn migration_version() -> i32 {
    2
}

/// Idempotent; safe to run at every startup
pub async fn run(pool: &PgPool) -> Result<(), DatabaseError> {
    sqlx::query(CREATE_MOVIES).execute(pool).await?;
    sqlx::query(CREATE_USERS).execute(pool).await?;
    for statement in UPGRADES.iter().chain(INDEXES) {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::info!(version = migration_version(), "Database schema ready");
    Ok(())
}
