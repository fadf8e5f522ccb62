//! Typed access to the record collections.

use rusqlite::{params, Connection, Row};

use crate::model::{Game, GameId, ImageId, Platform, PlatformId, Score, UNORDERED};

/// The three collections of the versioned layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Games,
    Platforms,
    Images,
}

impl Collection {
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Games => "games",
            Self::Platforms => "platforms",
            Self::Images => "images",
        }
    }
}

/// A record type stored as one row of a collection.
pub trait Record: Sized {
    const COLLECTION: Collection;

    /// Selects every row, in insertion order, with the columns `from_row`
    /// expects.
    const SELECT_ALL: &'static str;

    fn insert(&self, conn: &Connection) -> rusqlite::Result<()>;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

impl Record for Game {
    const COLLECTION: Collection = Collection::Games;
    const SELECT_ALL: &'static str = "SELECT id, name, original_name, platform, completion_date,
                rating, metacritic_score, comment, image_id, cover, added_at
         FROM games
         ORDER BY rowid";

    fn insert(&self, conn: &Connection) -> rusqlite::Result<()> {
        conn.execute(
            "INSERT INTO games (
                id, name, original_name, platform, completion_date,
                rating, metacritic_score, comment, image_id, cover, added_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                self.id.get(),
                self.name,
                self.original_name,
                self.platform,
                self.completion_date,
                self.rating(),
                self.metacritic_score(),
                self.comment,
                self.image_id.as_ref().map(ImageId::as_str),
                self.cover,
                self.added_at,
            ],
        )?;
        Ok(())
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let rating: Option<u8> = row.get(5)?;
        let metacritic: Option<String> = row.get(6)?;
        let image_id: Option<String> = row.get(8)?;

        Ok(Self {
            id: GameId::new(row.get(0)?),
            name: row.get(1)?,
            original_name: row.get(2)?,
            platform: row.get(3)?,
            completion_date: row.get(4)?,
            score: rating
                .map(Score::Rating)
                .or_else(|| metacritic.map(Score::Metacritic)),
            comment: row.get(7)?,
            image_id: image_id.map(ImageId::from),
            cover: row.get(9)?,
            added_at: row.get(10)?,
        })
    }
}

impl Record for Platform {
    const COLLECTION: Collection = Collection::Platforms;
    const SELECT_ALL: &'static str = "SELECT id, name, color, sort_order FROM platforms ORDER BY rowid";

    fn insert(&self, conn: &Connection) -> rusqlite::Result<()> {
        conn.execute(
            "INSERT INTO platforms (id, name, color, sort_order) VALUES (?1, ?2, ?3, ?4)",
            params![self.id.as_str(), self.name, self.color, self.order],
        )?;
        Ok(())
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let id: String = row.get(0)?;
        let order: Option<u32> = row.get(3)?;
        Ok(Self {
            id: PlatformId::from(id),
            name: row.get(1)?,
            color: row.get(2)?,
            order: order.unwrap_or(UNORDERED),
        })
    }
}
