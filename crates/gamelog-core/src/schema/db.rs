use rusqlite::{Connection, Transaction};
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::{Game, ImageId, Platform, SortPreference};

use super::layout::{self, DropAndRecreate, UpgradePolicy, PREFERENCES_SQL, SCHEMA_VERSION, VERSION_SQL};
use super::records::{Collection, Record};
use super::{images, preferences};

/// Handle to the local store: games, platforms, image blobs and preferences.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
    location: String,
}

/// Everything an import writes, applied in one transaction.
#[derive(Debug, Default)]
pub struct ImportBatch {
    pub images: Vec<(ImageId, Vec<u8>)>,
    /// `None` leaves the games collection as it is.
    pub games: Option<Vec<Game>>,
    /// `None` leaves the platforms collection as it is.
    pub platforms: Option<Vec<Platform>>,
    pub sort: Option<SortPreference>,
}

impl Database {
    /// Open (or create) a store at the given path at the current layout.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::ensure_schema(path, SCHEMA_VERSION, &DropAndRecreate)
    }

    /// Open an in-memory store (for tests).
    pub fn open_in_memory() -> Result<Self> {
        let location = ":memory:".to_string();
        let conn = Connection::open_in_memory().map_err(|source| Error::OpenFailed {
            path: location.clone(),
            source,
        })?;
        Self::prepare(conn, location, SCHEMA_VERSION, &DropAndRecreate)
    }

    /// Open the store at `path` and make sure its layout is `target_version`,
    /// running `policy` if the stored version differs.
    pub fn ensure_schema(
        path: impl AsRef<Path>,
        target_version: u32,
        policy: &dyn UpgradePolicy,
    ) -> Result<Self> {
        let path = path.as_ref();
        let location = path.display().to_string();
        let conn = Connection::open(path).map_err(|source| Error::OpenFailed {
            path: location.clone(),
            source,
        })?;
        Self::prepare(conn, location, target_version, policy)
    }

    fn prepare(
        mut conn: Connection,
        location: String,
        target_version: u32,
        policy: &dyn UpgradePolicy,
    ) -> Result<Self> {
        if let Err(source) = apply_layout(&mut conn, target_version, policy) {
            return Err(Error::OpenFailed {
                path: location,
                source,
            });
        }
        log::debug!("Opened store {} at layout version {}", location, target_version);
        Ok(Self { conn, location })
    }

    /// Get a reference to the underlying connection (for advanced queries).
    #[must_use]
    pub const fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Where the store lives, for display.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn schema_version(&self) -> Result<Option<u32>> {
        Ok(layout::read_version(&self.conn)?)
    }

    /// Every record of a collection, in the order it was last written.
    pub fn get_all<R: Record>(&self) -> Result<Vec<R>> {
        let mut stmt = self.conn.prepare(R::SELECT_ALL)?;
        let records = stmt
            .query_map([], |row| R::from_row(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    /// Replace a collection's contents with `records`.
    ///
    /// The clear and the inserts share one transaction; if any insert fails
    /// the previous contents are kept.
    pub fn put_all<R: Record>(&mut self, records: &[R]) -> Result<()> {
        let tx = self.conn.transaction()?;
        replace(&tx, records)?;
        tx.commit()?;
        log::debug!(
            "Replaced {} with {} records",
            R::COLLECTION.table(),
            records.len()
        );
        Ok(())
    }

    /// Apply an import: blobs first, then the collections and preferences.
    pub fn import(&mut self, batch: &ImportBatch) -> Result<()> {
        let tx = self.conn.transaction()?;
        for (id, data) in &batch.images {
            images::put(&tx, id, data)?;
        }
        if let Some(games) = &batch.games {
            replace(&tx, games)?;
        }
        if let Some(platforms) = &batch.platforms {
            replace(&tx, platforms)?;
        }
        if let Some(sort) = batch.sort {
            preferences::set_sort(&tx, sort)?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Wipe games and every image blob, and reset platforms to the defaults.
    pub fn clear_all(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        clear(&tx, Collection::Images)?;
        replace::<Game>(&tx, &[])?;
        replace(&tx, &Platform::defaults())?;
        tx.commit()?;
        log::info!("Cleared all library data in {}", self.location);
        Ok(())
    }
}

fn apply_layout(
    conn: &mut Connection,
    target_version: u32,
    policy: &dyn UpgradePolicy,
) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(VERSION_SQL)?;
    tx.execute_batch(PREFERENCES_SQL)?;

    let current = layout::read_version(&tx)?;
    if current != Some(target_version) {
        policy.upgrade(&tx, current, target_version)?;
        layout::write_version(&tx, target_version)?;
    }
    tx.commit()
}

fn clear(tx: &Transaction<'_>, collection: Collection) -> rusqlite::Result<()> {
    tx.execute(&format!("DELETE FROM {}", collection.table()), [])?;
    Ok(())
}

fn replace<R: Record>(tx: &Transaction<'_>, records: &[R]) -> rusqlite::Result<()> {
    clear(tx, R::COLLECTION)?;
    for record in records {
        record.insert(tx)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{sort_platforms, GameDraft, GameId, Score};
    use chrono::{NaiveDate, Utc};

    fn game(id: i64, name: &str) -> Game {
        Game::new(GameId::new(id), GameDraft::new(name), Utc::now())
    }

    #[test]
    fn test_open_in_memory_seeds_platforms() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.schema_version().unwrap(), Some(SCHEMA_VERSION));

        let mut platforms: Vec<Platform> = db.get_all().unwrap();
        sort_platforms(&mut platforms);
        assert_eq!(platforms, Platform::defaults());

        let games: Vec<Game> = db.get_all().unwrap();
        assert!(games.is_empty());
    }

    #[test]
    fn test_game_round_trip() {
        let mut db = Database::open_in_memory().unwrap();
        let mut record = Game::new(
            GameId::new(1_700_000_000_000),
            GameDraft::new("Elden Ring")
                .with_original_name("エルデンリング")
                .with_platform("PS5")
                .with_completion_date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
                .with_score(Score::Rating(9))
                .with_comment("Tarnished"),
            Utc::now(),
        );
        record.image_id = Some(ImageId::for_game(record.id));

        db.put_all(&[record.clone()]).unwrap();

        let games: Vec<Game> = db.get_all().unwrap();
        assert_eq!(games, vec![record]);
    }

    #[test]
    fn test_legacy_score_round_trip() {
        let mut db = Database::open_in_memory().unwrap();
        let mut record = game(1, "Portal 2");
        record.score = Some(Score::Metacritic("95".to_string()));
        record.cover = Some("data:image/jpeg;base64,/9j/".to_string());

        db.put_all(&[record.clone()]).unwrap();

        let games: Vec<Game> = db.get_all().unwrap();
        assert_eq!(games[0].score, record.score);
        assert_eq!(games[0].cover, record.cover);
    }

    #[test]
    fn test_put_all_replaces_whole_collection() {
        let mut db = Database::open_in_memory().unwrap();
        db.put_all(&[game(1, "A"), game(2, "B"), game(3, "C")]).unwrap();
        db.put_all(&[game(3, "C"), game(1, "A")]).unwrap();

        let games: Vec<Game> = db.get_all().unwrap();
        let ids: Vec<i64> = games.iter().map(|g| g.id.get()).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_failed_put_all_keeps_previous_contents() {
        let mut db = Database::open_in_memory().unwrap();
        db.put_all(&[game(1, "A"), game(2, "B")]).unwrap();

        // Duplicate primary key aborts the transaction mid-insert.
        let result = db.put_all(&[game(5, "X"), game(5, "Y")]);
        assert!(matches!(result, Err(Error::TransactionFailed(_))));

        let games: Vec<Game> = db.get_all().unwrap();
        let ids: Vec<i64> = games.iter().map(|g| g.id.get()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_failed_import_writes_nothing() {
        let mut db = Database::open_in_memory().unwrap();
        db.put_all(&[game(1, "A")]).unwrap();

        let batch = ImportBatch {
            images: vec![(ImageId::from("game_9_cover"), vec![1, 2, 3])],
            games: Some(vec![game(9, "Z"), game(9, "Z")]),
            platforms: None,
            sort: None,
        };
        assert!(db.import(&batch).is_err());

        assert_eq!(db.image_count().unwrap(), 0);
        let games: Vec<Game> = db.get_all().unwrap();
        assert_eq!(games.len(), 1);
    }

    #[test]
    fn test_clear_all() {
        let mut db = Database::open_in_memory().unwrap();
        db.put_all(&[game(1, "A")]).unwrap();
        db.put_all(&[Platform::new("pc", "PC", "#fff").with_order(0)]).unwrap();
        db.put_image(&ImageId::from("game_1_cover"), b"img").unwrap();

        db.clear_all().unwrap();

        assert!(db.get_all::<Game>().unwrap().is_empty());
        assert_eq!(db.image_count().unwrap(), 0);
        assert_eq!(db.get_all::<Platform>().unwrap().len(), Platform::defaults().len());
    }
}
