//! Autocomplete candidates
//!
//! Three kinds of rows appear under the location bar:
//! - Navigate: "Go to <input>"
//! - Search: the input sent to the search provider
//! - History: a previously visited page matching the input

use serde::{Deserialize, Serialize};

use omnibar_navigation::HistoryHit;

/// A history row, optionally decorated with highlighted markup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMatch {
    pub url: String,
    pub title: String,
    /// Raw `column term offset length` groups from the full-text index
    pub raw_offsets: Option<String>,
    /// Escaped url with `<strong>` around matched terms
    pub url_highlighted: Option<String>,
    /// Escaped title with `<strong>` around matched terms
    pub title_highlighted: Option<String>,
}

impl HistoryMatch {
    pub fn new(url: impl Into<String>, title: impl Into<String>, raw_offsets: Option<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            raw_offsets,
            url_highlighted: None,
            title_highlighted: None,
        }
    }
}

impl From<HistoryHit> for HistoryMatch {
    fn from(hit: HistoryHit) -> Self {
        Self::new(hit.url, hit.title, hit.offsets)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CandidateKind {
    Navigate {
        url: String,
        title: String,
        guessed_scheme: bool,
    },
    Search {
        query: String,
        title: String,
        url: String,
    },
    History(HistoryMatch),
}

/// One selectable row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(flatten)]
    pub kind: CandidateKind,
    pub bookmarked: bool,
}

impl Candidate {
    pub fn navigate(url: String, title: String, guessed_scheme: bool) -> Self {
        Self::from(CandidateKind::Navigate {
            url,
            title,
            guessed_scheme,
        })
    }

    pub fn search(query: String, title: String, url: String) -> Self {
        Self::from(CandidateKind::Search { query, title, url })
    }

    pub fn history(result: HistoryMatch) -> Self {
        Self::from(CandidateKind::History(result))
    }

    /// Navigation target
    pub fn url(&self) -> &str {
        match &self.kind {
            CandidateKind::Navigate { url, .. } | CandidateKind::Search { url, .. } => url,
            CandidateKind::History(result) => &result.url,
        }
    }

    /// Display text
    pub fn title(&self) -> &str {
        match &self.kind {
            CandidateKind::Navigate { title, .. } | CandidateKind::Search { title, .. } => title,
            CandidateKind::History(result) => &result.title,
        }
    }

    pub fn is_search(&self) -> bool {
        matches!(self.kind, CandidateKind::Search { .. })
    }

    /// Text shown in the input while this row is highlighted
    pub fn preview(&self) -> &str {
        match &self.kind {
            CandidateKind::Search { query, .. } => query,
            _ => self.url(),
        }
    }
}

impl From<CandidateKind> for Candidate {
    fn from(kind: CandidateKind) -> Self {
        Self {
            kind,
            bookmarked: false,
        }
    }
}
