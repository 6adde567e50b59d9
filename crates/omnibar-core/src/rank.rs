//! Candidate ordering and bookmark overlay
//!
//! The two synthetic rows come first, in the order the classifier suggests,
//! followed by history in the order the history backend returned it. The
//! list is capped after ordering, so history is what gets cut.

use futures_util::future::join_all;

use omnibar_navigation::Classification;

use crate::candidate::{Candidate, HistoryMatch};
use crate::collaborators::BookmarkStore;

pub const DEFAULT_MAX_RESULTS: usize = 11;

#[derive(Debug, Clone)]
pub struct CandidateRanker {
    max_results: usize,
}

impl CandidateRanker {
    pub fn new(max_results: usize) -> Self {
        Self { max_results }
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Merge synthetic rows with history and apply the cap. Pure.
    pub fn order(
        &self,
        text: &str,
        classification: &Classification,
        history: Vec<HistoryMatch>,
    ) -> Vec<Candidate> {
        let navigate = Candidate::navigate(
            classification.navigate_url.clone(),
            format!("Go to {}", text),
            classification.guessed_scheme,
        );
        let search = Candidate::search(
            text.to_string(),
            classification.search_label.clone(),
            classification.search_url.clone(),
        );

        let synthetic = if classification.is_probably_url {
            [navigate, search]
        } else {
            [search, navigate]
        };

        synthetic
            .into_iter()
            .chain(history.into_iter().map(Candidate::history))
            .take(self.max_results)
            .collect()
    }

    /// Look up bookmark state for every row concurrently.
    ///
    /// A failed lookup marks only its own row as not bookmarked.
    pub async fn overlay_bookmarks(
        &self,
        candidates: Vec<Candidate>,
        bookmarks: &dyn BookmarkStore,
    ) -> Vec<Candidate> {
        let states = join_all(
            candidates
                .iter()
                .map(|candidate| bookmarks.is_bookmarked(candidate.url())),
        )
        .await;

        candidates
            .into_iter()
            .zip(states)
            .map(|(mut candidate, state)| {
                candidate.bookmarked = match state {
                    Ok(bookmarked) => bookmarked,
                    Err(e) => {
                        tracing::debug!(url = %candidate.url(), error = %e, "Bookmark lookup failed");
                        false
                    }
                };
                candidate
            })
            .collect()
    }

    /// [`order`](Self::order) followed by [`overlay_bookmarks`](Self::overlay_bookmarks)
    pub async fn rank(
        &self,
        text: &str,
        classification: &Classification,
        history: Vec<HistoryMatch>,
        bookmarks: &dyn BookmarkStore,
    ) -> Vec<Candidate> {
        let ordered = self.order(text, classification, history);
        self.overlay_bookmarks(ordered, bookmarks).await
    }
}

impl Default for CandidateRanker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RESULTS)
    }
}
