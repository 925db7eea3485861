//! Version-tracked schema migrations for the record store.

use libsql::{params, Connection};
use tracing::info;

use super::RepositoryError;

struct Migration {
    version: i64,
    name: &'static str,
    sql: &'static str,
}

/// All migrations in order. Add new versions to the end.
static MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "initial_collections",
        sql: r#"
            CREATE TABLE IF NOT EXISTS feedback (
                id TEXT PRIMARY KEY,
                ratings TEXT NOT NULL,
                coordinator_name TEXT NOT NULL,
                coordinator_rating TEXT NOT NULL,
                team_name TEXT NOT NULL,
                email TEXT NOT NULL,
                submitted_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                uid TEXT NOT NULL UNIQUE,
                department TEXT NOT NULL,
                occupation TEXT NOT NULL,
                email TEXT NOT NULL,
                schedule_meeting INTEGER NOT NULL DEFAULT 0,
                selected INTEGER NOT NULL DEFAULT 0,
                meeting_date TEXT,
                meeting_time TEXT,
                registered_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS deselected_users (
                user_id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                uid TEXT NOT NULL,
                department TEXT NOT NULL,
                occupation TEXT NOT NULL,
                email TEXT NOT NULL,
                schedule_meeting INTEGER NOT NULL,
                selected INTEGER NOT NULL,
                meeting_date TEXT,
                meeting_time TEXT,
                reason TEXT NOT NULL,
                deselected_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS cards (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                image TEXT NOT NULL,
                alt TEXT NOT NULL,
                likes INTEGER NOT NULL DEFAULT 0 CHECK (likes >= 0)
            );
        "#,
    },
    Migration {
        version: 2,
        name: "ordering_indexes",
        sql: r#"
            CREATE INDEX IF NOT EXISTS idx_users_registered_at ON users(registered_at);
            CREATE INDEX IF NOT EXISTS idx_deselected_users_at ON deselected_users(deselected_at);
        "#,
    },
];

pub(super) async fn run_migrations(conn: &Connection) -> Result<(), RepositoryError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        (),
    )
    .await?;

    let current = current_version(conn).await?;

    for migration in MIGRATIONS {
        if migration.version <= current {
            continue;
        }
        info!(
            version = migration.version,
            name = migration.name,
            "applying store migration"
        );
        conn.execute_batch(migration.sql).await.map_err(|err| {
            RepositoryError::Unavailable(format!(
                "migration V{} ({}) failed: {err}",
                migration.version, migration.name
            ))
        })?;
        conn.execute(
            "INSERT INTO _migrations (version, name) VALUES (?1, ?2)",
            params![migration.version, migration.name],
        )
        .await?;
    }

    Ok(())
}

async fn current_version(conn: &Connection) -> Result<i64, RepositoryError> {
    let mut rows = conn
        .query("SELECT COALESCE(MAX(version), 0) FROM _migrations", ())
        .await?;
    match rows.next().await? {
        Some(row) => Ok(row.get::<i64>(0)?),
        None => Ok(0),
    }
}
