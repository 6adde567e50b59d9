//! Services the location bar talks to
//!
//! History and bookmark lookups are the only suspension points of a
//! recompute. Navigation and the context menu are fire-and-forget.

use async_trait::async_trait;
use std::sync::Arc;

use omnibar_navigation::{BookmarkManager, HistoryManager};

use crate::candidate::HistoryMatch;
use crate::error::OmnibarError;
use crate::Result;

#[async_trait]
pub trait HistorySearch: Send + Sync {
    /// Relevance-ordered matches for the raw input, with FTS offsets
    async fn search(&self, text: &str) -> Result<Vec<HistoryMatch>>;
}

#[async_trait]
pub trait BookmarkStore: Send + Sync {
    async fn is_bookmarked(&self, url: &str) -> Result<bool>;
}

pub trait Navigator: Send + Sync {
    fn load_url(&self, url: &str);
    fn close(&self);
}

pub trait ContextMenu: Send + Sync {
    fn show(&self, context_id: &str);
}

/// Everything a session needs from the outside
#[derive(Clone)]
pub struct Collaborators {
    pub history: Arc<dyn HistorySearch>,
    pub bookmarks: Arc<dyn BookmarkStore>,
    pub navigator: Arc<dyn Navigator>,
    pub context_menu: Arc<dyn ContextMenu>,
}

/// [`HistorySearch`] over the SQLite history index
#[derive(Clone)]
pub struct SqliteHistory {
    manager: HistoryManager,
    limit: usize,
}

impl SqliteHistory {
    pub fn new(manager: HistoryManager, limit: usize) -> Self {
        Self { manager, limit }
    }
}

#[async_trait]
impl HistorySearch for SqliteHistory {
    async fn search(&self, text: &str) -> Result<Vec<HistoryMatch>> {
        let manager = self.manager.clone();
        let text = text.to_string();
        let limit = self.limit;

        let hits = tokio::task::spawn_blocking(move || manager.search(&text, limit))
            .await
            .map_err(|e| OmnibarError::HistorySearch(e.to_string()))?
            .map_err(|e| OmnibarError::HistorySearch(e.to_string()))?;

        Ok(hits.into_iter().map(HistoryMatch::from).collect())
    }
}

/// [`BookmarkStore`] over the SQLite bookmarks table
#[derive(Clone)]
pub struct SqliteBookmarks {
    manager: BookmarkManager,
}

impl SqliteBookmarks {
    pub fn new(manager: BookmarkManager) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl BookmarkStore for SqliteBookmarks {
    async fn is_bookmarked(&self, url: &str) -> Result<bool> {
        let manager = self.manager.clone();
        let url = url.to_string();

        tokio::task::spawn_blocking(move || manager.is_bookmarked(&url))
            .await
            .map_err(|e| OmnibarError::BookmarkLookup(e.to_string()))?
            .map_err(|e| OmnibarError::BookmarkLookup(e.to_string()))
    }
}
