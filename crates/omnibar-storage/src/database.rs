//! SQLite handle shared by the history index, bookmarks and settings

use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::sync::Arc;

use crate::migrations::run_migrations;
use crate::Result;

/// Rows of the `settings` table the location bar reads back at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    /// Search URL template with a `%s` placeholder
    SearchEngine,
    /// Label shown on the search row
    SearchLabel,
}

impl Setting {
    pub fn key(self) -> &'static str {
        match self {
            Setting::SearchEngine => "search_engine",
            Setting::SearchLabel => "search_label",
        }
    }
}

/// One connection behind a mutex; clones share it, so the history and
/// bookmark managers see each other's writes.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open the database file, creating it and its directory if needed
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }

        let conn = Connection::open(path)?;
        // visit writes must not block keystroke lookups
        let _: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;

        let db = Self::migrated(conn)?;
        tracing::info!(path = %path.display(), "Opened omnibar database");
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::migrated(Connection::open_in_memory()?)
    }

    fn migrated(conn: Connection) -> Result<Self> {
        run_migrations(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn with_connection<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        f(&self.conn.lock())
    }

    /// Run `f` in a transaction; history writes touch the table and its
    /// full-text index together.
    pub fn transaction<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let result = f(&tx)?;
        tx.commit()?;
        Ok(result)
    }

    pub fn setting(&self, setting: Setting) -> Result<Option<String>> {
        self.with_connection(|conn| {
            Ok(conn
                .query_row(
                    "SELECT value FROM settings WHERE key = ?1",
                    [setting.key()],
                    |row| row.get(0),
                )
                .optional()?)
        })
    }

    pub fn store_setting(&self, setting: Setting, value: &str) -> Result<()> {
        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                rusqlite::params![setting.key(), value, Utc::now().to_rfc3339()],
            )?;
            tracing::debug!(key = setting.key(), "Stored setting");
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_database_is_empty() {
        let db = Database::open_in_memory().unwrap();
        let (history, bookmarks): (i64, i64) = db
            .with_connection(|conn| {
                Ok(conn.query_row(
                    "SELECT (SELECT COUNT(*) FROM history), (SELECT COUNT(*) FROM bookmarks)",
                    [],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )?)
            })
            .unwrap();
        assert_eq!((history, bookmarks), (0, 0));
        assert!(db.setting(Setting::SearchEngine).unwrap().is_none());
    }

    #[test]
    fn test_settings_overwrite() {
        let db = Database::open_in_memory().unwrap();

        db.store_setting(Setting::SearchEngine, "https://example.org/?q=%s")
            .unwrap();
        db.store_setting(Setting::SearchEngine, "https://search.example/?q=%s")
            .unwrap();
        db.store_setting(Setting::SearchLabel, "Example Search")
            .unwrap();

        assert_eq!(
            db.setting(Setting::SearchEngine).unwrap().as_deref(),
            Some("https://search.example/?q=%s")
        );
        assert_eq!(
            db.setting(Setting::SearchLabel).unwrap().as_deref(),
            Some("Example Search")
        );
    }

    #[test]
    fn test_clones_share_connection() {
        let db = Database::open_in_memory().unwrap();
        let other = db.clone();
        db.store_setting(Setting::SearchLabel, "Local").unwrap();
        assert_eq!(
            other.setting(Setting::SearchLabel).unwrap().as_deref(),
            Some("Local")
        );
    }

    #[test]
    fn test_failed_transaction_rolls_back() {
        let db = Database::open_in_memory().unwrap();
        let result: Result<()> = db.transaction(|conn| {
            conn.execute(
                "INSERT INTO bookmarks (url, title, created_at) VALUES ('a', 'A', 'now')",
                [],
            )?;
            conn.execute("INSERT INTO missing_table VALUES (1)", [])?;
            Ok(())
        });
        assert!(result.is_err());

        let count: i64 = db
            .with_connection(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM bookmarks", [], |row| row.get(0))?)
            })
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_open_creates_parent_directory() {
        let dir = std::env::temp_dir().join(format!("omnibar-db-{}", std::process::id()));
        let path = dir.join("nested").join("omnibar.db");

        let db = Database::open(&path).unwrap();
        db.store_setting(Setting::SearchLabel, "On disk").unwrap();
        drop(db);

        let reopened = Database::open(&path).unwrap();
        assert_eq!(
            reopened.setting(Setting::SearchLabel).unwrap().as_deref(),
            Some("On disk")
        );
        drop(reopened);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
