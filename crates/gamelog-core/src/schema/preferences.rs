//! Scalar key/value preferences kept outside the versioned collections.

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::Result;
use crate::model::SortPreference;
use crate::schema::db::Database;

const SORT_BY: &str = "sortBy";
const SORT_ORDER: &str = "sortOrder";

pub(crate) fn set(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO preferences (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub(crate) fn set_sort(conn: &Connection, preference: SortPreference) -> rusqlite::Result<()> {
    set(conn, SORT_BY, preference.sort_by.as_str())?;
    set(conn, SORT_ORDER, preference.sort_order.as_str())
}

impl Database {
    pub fn get_preference(&self, key: &str) -> Result<Option<String>> {
        let value: Option<String> = self
            .conn()
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn set_preference(&self, key: &str, value: &str) -> Result<()> {
        set(self.conn(), key, value)?;
        Ok(())
    }

    /// The stored sort preference. Missing or unrecognised values fall back
    /// to the defaults individually.
    pub fn sort_preference(&self) -> Result<SortPreference> {
        let defaults = SortPreference::default();
        let sort_by = self
            .get_preference(SORT_BY)?
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.sort_by);
        let sort_order = self
            .get_preference(SORT_ORDER)?
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.sort_order);
        Ok(SortPreference::new(sort_by, sort_order))
    }

    pub fn set_sort_preference(&self, preference: SortPreference) -> Result<()> {
        set_sort(self.conn(), preference)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SortKey, SortOrder};

    #[test]
    fn test_sort_preference_defaults() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.sort_preference().unwrap(), SortPreference::default());
    }

    #[test]
    fn test_sort_preference_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let pref = SortPreference::new(SortKey::Name, SortOrder::Asc);

        db.set_sort_preference(pref).unwrap();

        assert_eq!(db.sort_preference().unwrap(), pref);
        assert_eq!(db.get_preference("sortBy").unwrap().as_deref(), Some("name"));
    }

    #[test]
    fn test_unrecognised_value_falls_back() {
        let db = Database::open_in_memory().unwrap();
        db.set_preference("sortBy", "metascore").unwrap();
        db.set_preference("sortOrder", "asc").unwrap();

        let pref = db.sort_preference().unwrap();
        assert_eq!(pref.sort_by, SortKey::CompletionDate);
        assert_eq!(pref.sort_order, SortOrder::Asc);
    }
}
