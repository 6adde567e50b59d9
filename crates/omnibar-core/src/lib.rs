//! Omnibar Core
//!
//! Location bar autocomplete: turns each keystroke into a ranked,
//! highlighted, bookmark-annotated list of navigation candidates and
//! drives selection over it.

mod candidate;
mod collaborators;
mod config;
mod decorate;
mod error;
mod rank;
mod selection;
mod session;

pub use candidate::{Candidate, CandidateKind, HistoryMatch};
pub use collaborators::{
    BookmarkStore, Collaborators, ContextMenu, HistorySearch, Navigator, SqliteBookmarks,
    SqliteHistory,
};
pub use config::Config;
pub use decorate::{decorate, join_segments, segment_matches, FieldSegments};
pub use error::OmnibarError;
pub use rank::{CandidateRanker, DEFAULT_MAX_RESULTS};
pub use selection::{Direction, SelectionController};
pub use session::{AutocompleteSession, InputState, SetValueOutcome, Snapshot};

// Re-export the layers underneath
pub use omnibar_navigation::{
    search_terms, Bookmark, BookmarkManager, Classification, HistoryEntry, HistoryManager,
    InputClassifier, NavigationError,
};
pub use omnibar_storage::{Database, Setting, StorageError};

pub type Result<T> = std::result::Result<T, OmnibarError>;

/// Initialize logging
///
/// Logs go to stderr so stdout stays free for the line protocol.
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
