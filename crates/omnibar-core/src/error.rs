//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OmnibarError {
    #[error("History search failed: {0}")]
    HistorySearch(String),

    #[error("Bookmark lookup failed: {0}")]
    BookmarkLookup(String),

    #[error("No candidates to select")]
    NoCandidates,

    #[error("Candidate index {index} out of range (have {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Navigation error: {0}")]
    Navigation(#[from] omnibar_navigation::NavigationError),

    #[error("Storage error: {0}")]
    Storage(#[from] omnibar_storage::StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
