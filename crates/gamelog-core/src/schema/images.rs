//! Blob store for cover images.
//!
//! Blobs are upserted by id and read back on demand. There is no per-id
//! delete: replaced or orphaned covers stay until a full clear.

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::Result;
use crate::model::ImageId;
use crate::schema::db::Database;

pub(crate) fn put(conn: &Connection, id: &ImageId, data: &[u8]) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO images (id, data) VALUES (?1, ?2)
         ON CONFLICT(id) DO UPDATE SET data = excluded.data",
        params![id.as_str(), data],
    )?;
    Ok(())
}

impl Database {
    /// Store `data` under `id`, overwriting any existing blob.
    pub fn put_image(&self, id: &ImageId, data: &[u8]) -> Result<()> {
        log::debug!("Storing image {} ({} bytes)", id, data.len());
        put(self.conn(), id, data)?;
        Ok(())
    }

    /// Fetch a blob. Unknown ids are `Ok(None)`.
    pub fn get_image(&self, id: &ImageId) -> Result<Option<Vec<u8>>> {
        let data: Option<Vec<u8>> = self
            .conn()
            .query_row(
                "SELECT data FROM images WHERE id = ?1",
                [id.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(data)
    }

    /// Number of stored blobs, orphans included.
    pub fn image_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM images", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}
