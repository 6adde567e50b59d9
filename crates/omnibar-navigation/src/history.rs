//! History management
//!
//! Visits are stored once per URL in `history` and mirrored into the
//! `history_fts` full-text index, which the location bar queries with
//! prefix terms. Each hit carries the raw FTS `offsets()` string so the
//! caller can highlight where the terms matched.

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension;
use serde::{Deserialize, Serialize};

use crate::terms::{match_expression, search_terms};
use crate::Result;
use omnibar_storage::Database;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub visited_at: DateTime<Utc>,
    pub visit_count: i32,
}

/// A full-text search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryHit {
    pub url: String,
    pub title: String,
    /// Space-separated `column term offset length` groups, byte offsets
    pub offsets: Option<String>,
}

pub struct HistoryManager {
    db: Database,
}

impl HistoryManager {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Record a visit to a URL
    pub fn record_visit(&self, url: &str, title: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();

        self.db.transaction(|conn| {
            let existing: Option<i64> = conn
                .query_row("SELECT id FROM history WHERE url = ?1", [url], |row| {
                    row.get(0)
                })
                .optional()?;

            if let Some(id) = existing {
                conn.execute(
                    "UPDATE history
                     SET title = CASE WHEN ?1 != '' THEN ?1 ELSE title END,
                         visited_at = ?2,
                         visit_count = visit_count + 1
                     WHERE id = ?3",
                    rusqlite::params![title, now, id],
                )?;
                conn.execute(
                    "UPDATE history_fts SET title = (SELECT title FROM history WHERE id = ?1)
                     WHERE docid = ?1",
                    [id],
                )?;
            } else {
                conn.execute(
                    "INSERT INTO history (url, title, visited_at, visit_count) VALUES (?1, ?2, ?3, 1)",
                    rusqlite::params![url, title, now],
                )?;
                let id = conn.last_insert_rowid();
                conn.execute(
                    "INSERT INTO history_fts (docid, url, title) VALUES (?1, ?2, ?3)",
                    rusqlite::params![id, url, title],
                )?;
            }

            Ok(())
        })?;

        tracing::debug!(url = %url, "Recorded visit");
        Ok(())
    }

    /// Update the stored title for a URL without incrementing visit count.
    pub fn update_title(&self, url: &str, title: &str) -> Result<()> {
        if title.trim().is_empty() {
            return Ok(());
        }

        Ok(self.db.transaction(|conn| {
            conn.execute(
                "UPDATE history SET title = ?1 WHERE url = ?2",
                rusqlite::params![title, url],
            )?;
            conn.execute(
                "UPDATE history_fts SET title = ?1
                 WHERE docid = (SELECT id FROM history WHERE url = ?2)",
                rusqlite::params![title, url],
            )?;
            Ok(())
        })?)
    }

    /// Full-text search over url and title, most visited first.
    ///
    /// Every term of `query` must match as a prefix of some token.
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<HistoryHit>> {
        let terms = search_terms(query);
        let Some(expression) = match_expression(&terms) else {
            return Ok(Vec::new());
        };

        Ok(self.db.with_connection(|conn| {
            // offsets() is only valid while the FTS table drives the scan,
            // so the MATCH runs in its own materialized step.
            let mut stmt = conn.prepare(
                "WITH hits AS MATERIALIZED (
                     SELECT docid, url, title, offsets(history_fts) AS offsets
                     FROM history_fts
                     WHERE history_fts MATCH ?1
                 )
                 SELECT hits.url, hits.title, hits.offsets
                 FROM hits JOIN history ON history.id = hits.docid
                 ORDER BY history.visit_count DESC, history.visited_at DESC
                 LIMIT ?2",
            )?;

            let hits: Vec<HistoryHit> = stmt
                .query_map(rusqlite::params![expression, limit as i64], |row| {
                    Ok(HistoryHit {
                        url: row.get(0)?,
                        title: row.get(1)?,
                        offsets: row.get(2)?,
                    })
                })?
                .filter_map(|r| r.ok())
                .collect();

            Ok(hits)
        })?)
    }

    /// Get recent history entries
    pub fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        Ok(self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, url, title, visited_at, visit_count FROM history
                 ORDER BY visited_at DESC
                 LIMIT ?1",
            )?;

            let entries: Vec<HistoryEntry> = stmt
                .query_map([limit as i64], |row| {
                    let visited_str: String = row.get(3)?;
                    let visited_at = DateTime::parse_from_rfc3339(&visited_str)
                        .map(|dt| dt.with_timezone(&Utc))
                        .unwrap_or_else(|_| Utc::now());

                    Ok(HistoryEntry {
                        id: row.get(0)?,
                        url: row.get(1)?,
                        title: row.get(2)?,
                        visited_at,
                        visit_count: row.get(4)?,
                    })
                })?
                .filter_map(|r| r.ok())
                .collect();

            Ok(entries)
        })?)
    }

    /// Delete a history entry
    pub fn delete(&self, id: i64) -> Result<()> {
        Ok(self.db.transaction(|conn| {
            conn.execute("DELETE FROM history WHERE id = ?1", [id])?;
            conn.execute("DELETE FROM history_fts WHERE docid = ?1", [id])?;
            Ok(())
        })?)
    }

    /// Clear all history
    pub fn clear_all(&self) -> Result<()> {
        Ok(self.db.transaction(|conn| {
            conn.execute("DELETE FROM history", [])?;
            conn.execute("DELETE FROM history_fts", [])?;
            Ok(())
        })?)
    }
}

impl Clone for HistoryManager {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}
