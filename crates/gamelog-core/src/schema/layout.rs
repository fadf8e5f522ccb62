//! Store layout and the schema-version gate.
//!
//! The three collections (games, platforms, images) are versioned together.
//! When the stored version differs from the target, the active
//! [`UpgradePolicy`] rebuilds them. The preferences table is outside the
//! versioned layout and is never dropped.

use rusqlite::{Connection, OptionalExtension, Transaction};

use crate::model::Platform;
use crate::schema::records::Record;

/// Current layout version. Bumping it wipes games, platforms and images.
pub const SCHEMA_VERSION: u32 = 4;

pub(crate) const VERSION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

pub(crate) const PREFERENCES_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS preferences (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

const LAYOUT_SQL: &str = r#"
-- `id` is not the rowid: rowid keeps the order records were written in.
CREATE TABLE games (
    id INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    original_name TEXT,
    platform TEXT,
    completion_date TEXT,
    rating INTEGER,
    metacritic_score TEXT,
    comment TEXT,
    image_id TEXT,
    cover TEXT,
    added_at TEXT NOT NULL
);

CREATE INDEX idx_games_added_at ON games(added_at);

CREATE TABLE platforms (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    color TEXT NOT NULL,
    sort_order INTEGER
);

CREATE INDEX idx_platforms_sort_order ON platforms(sort_order);

CREATE TABLE images (
    id TEXT PRIMARY KEY,
    data BLOB NOT NULL
);
"#;

const DROP_SQL: &str = r#"
DROP TABLE IF EXISTS games;
DROP TABLE IF EXISTS platforms;
DROP TABLE IF EXISTS images;
"#;

/// Brings the versioned collections from one layout version to another.
///
/// Runs inside the opening transaction; returning an error rolls the whole
/// open back.
pub trait UpgradePolicy: std::fmt::Debug {
    /// `from` is `None` for a store that has never been versioned.
    fn upgrade(&self, tx: &Transaction<'_>, from: Option<u32>, to: u32) -> rusqlite::Result<()>;
}

/// Drop every collection and recreate it empty, reseeding default platforms.
///
/// No records survive the version boundary.
#[derive(Debug, Default, Clone, Copy)]
pub struct DropAndRecreate;

impl UpgradePolicy for DropAndRecreate {
    fn upgrade(&self, tx: &Transaction<'_>, from: Option<u32>, to: u32) -> rusqlite::Result<()> {
        match from {
            Some(from) => log::warn!(
                "Store layout version {} differs from {}; recreating collections",
                from,
                to
            ),
            None => log::info!("Creating store layout version {}", to),
        }
        tx.execute_batch(DROP_SQL)?;
        tx.execute_batch(LAYOUT_SQL)?;
        for platform in Platform::defaults() {
            platform.insert(tx)?;
        }
        Ok(())
    }
}

pub(crate) fn read_version(conn: &Connection) -> rusqlite::Result<Option<u32>> {
    conn.query_row(
        "SELECT version FROM schema_version ORDER BY rowid DESC LIMIT 1",
        [],
        |row| row.get(0),
    )
    .optional()
}

pub(crate) fn write_version(conn: &Connection, version: u32) -> rusqlite::Result<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}
