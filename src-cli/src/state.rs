//! Application state management
use std::sync::Arc;

use omnibar_core::{
    AutocompleteSession, BookmarkManager, Config, Database, HistoryManager, Result,
};

use crate::events::EventWriter;

/// Everything the command loop works against
pub struct AppState {
    session: AutocompleteSession,
    history: HistoryManager,
    bookmarks: BookmarkManager,
    events: Arc<EventWriter>,
}

impl AppState {
    pub fn new(config: &Config, db: Database, events: Arc<EventWriter>) -> Result<Self> {
        let session =
            AutocompleteSession::with_database(config, db.clone(), events.clone(), events.clone())?;

        Ok(Self {
            session,
            history: HistoryManager::new(db.clone()),
            bookmarks: BookmarkManager::new(db),
            events,
        })
    }

    pub fn session(&self) -> &AutocompleteSession {
        &self.session
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn bookmarks(&self) -> &BookmarkManager {
        &self.bookmarks
    }

    pub fn events(&self) -> &EventWriter {
        &self.events
    }
}
