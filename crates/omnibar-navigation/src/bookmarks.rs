//! Bookmark storage

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::NavigationError;
use crate::Result;
use omnibar_storage::Database;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bookmark {
    pub url: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

pub struct BookmarkManager {
    db: Database,
}

impl BookmarkManager {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Add a bookmark, or retitle it if the URL is already bookmarked
    pub fn add(&self, url: &str, title: &str) -> Result<()> {
        let url = url.trim();
        if url.is_empty() {
            return Err(NavigationError::InvalidUrl(
                "Bookmark URL cannot be empty".to_string(),
            ));
        }

        self.db.with_connection(|conn| {
            conn.execute(
                "INSERT INTO bookmarks (url, title, created_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(url) DO UPDATE SET title = excluded.title",
                rusqlite::params![url, title, Utc::now().to_rfc3339()],
            )?;
            Ok(())
        })?;

        tracing::info!(url = %url, "Bookmarked");
        Ok(())
    }

    pub fn remove(&self, url: &str) -> Result<()> {
        let url = url.trim();
        Ok(self.db.with_connection(|conn| {
            conn.execute("DELETE FROM bookmarks WHERE url = ?1", [url])?;
            Ok(())
        })?)
    }

    pub fn is_bookmarked(&self, url: &str) -> Result<bool> {
        let url = url.trim();
        Ok(self.db.with_connection(|conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM bookmarks WHERE url = ?1)",
                [url],
                |row| row.get(0),
            )?;
            Ok(exists)
        })?)
    }

    /// All bookmarks, newest first
    pub fn list(&self) -> Result<Vec<Bookmark>> {
        Ok(self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT url, title, created_at FROM bookmarks ORDER BY created_at DESC, url",
            )?;

            let bookmarks: Vec<Bookmark> = stmt
                .query_map([], |row| {
                    let created_str: String = row.get(2)?;
                    let created_at = DateTime::parse_from_rfc3339(&created_str)
                        .map(|dt| dt.with_timezone(&Utc))
                        .unwrap_or_else(|_| Utc::now());

                    Ok(Bookmark {
                        url: row.get(0)?,
                        title: row.get(1)?,
                        created_at,
                    })
                })?
                .filter_map(|r| r.ok())
                .collect();

            Ok(bookmarks)
        })?)
    }
}

impl Clone for BookmarkManager {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bookmark_lifecycle() {
        let manager = BookmarkManager::new(Database::open_in_memory().unwrap());

        assert!(!manager.is_bookmarked("https://example.com").unwrap());

        manager.add("https://example.com", "Example").unwrap();
        manager.add("https://example.com", "Example Domain").unwrap();
        assert!(manager.is_bookmarked("https://example.com").unwrap());

        let all = manager.list().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "Example Domain");

        manager.remove("https://example.com").unwrap();
        assert!(!manager.is_bookmarked("https://example.com").unwrap());
    }

    #[test]
    fn test_padded_url_is_the_same_bookmark() {
        let manager = BookmarkManager::new(Database::open_in_memory().unwrap());

        manager.add("  https://example.com/ ", "Example").unwrap();
        assert!(manager.is_bookmarked("https://example.com/").unwrap());
        assert!(manager.is_bookmarked(" https://example.com/\t").unwrap());
        assert_eq!(manager.list().unwrap()[0].url, "https://example.com/");

        manager.remove("https://example.com/  ").unwrap();
        assert!(!manager.is_bookmarked("https://example.com/").unwrap());
    }

    #[test]
    fn test_empty_url_rejected() {
        let manager = BookmarkManager::new(Database::open_in_memory().unwrap());
        let result = manager.add("   ", "Nothing");
        assert!(matches!(result, Err(NavigationError::InvalidUrl(_))));
    }
}
