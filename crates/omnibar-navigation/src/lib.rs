//! Omnibar Navigation
//!
//! The location bar's view of the outside world:
//! - Input classification: URL vs. search terms, navigate and search targets
//! - Search term tokenization shared with the full-text history index
//! - History: visit recording and prefix full-text search with match offsets
//! - Bookmarks

mod bookmarks;
mod error;
mod history;
mod input;
mod terms;

pub use bookmarks::{Bookmark, BookmarkManager};
pub use error::NavigationError;
pub use history::{HistoryEntry, HistoryHit, HistoryManager};
pub use input::{Classification, InputClassifier, DEFAULT_SEARCH_LABEL, DEFAULT_SEARCH_TEMPLATE};
pub use terms::{match_expression, search_terms};

pub type Result<T> = std::result::Result<T, NavigationError>;
