//! Location bar session
//!
//! Owns the typed text, the last computed candidate list and the selection,
//! and runs the recompute pipeline:
//!
//! ```text
//! classify ─┐
//! history ──┴─▶ decorate ─▶ order + cap ─▶ bookmark overlay ─▶ install
//! ```
//!
//! Recomputes may overlap. Each one is tagged with a generation number when
//! it is issued and only the latest issued generation may install its list.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use omnibar_navigation::{search_terms, BookmarkManager, HistoryManager, InputClassifier};
use omnibar_storage::{Database, Setting};

use crate::candidate::{Candidate, HistoryMatch};
use crate::collaborators::{Collaborators, ContextMenu, Navigator, SqliteBookmarks, SqliteHistory};
use crate::config::Config;
use crate::decorate::decorate;
use crate::rank::CandidateRanker;
use crate::selection::{Direction, SelectionController};
use crate::Result;

const CONTEXT_MENU_ID: &str = "active";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    pub text: String,
}

/// Read-only view handed to the renderer after every command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub input_value: String,
    pub candidates: Vec<Candidate>,
    pub selected_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetValueOutcome {
    /// The new list is installed
    Applied,
    /// Empty or unchanged input; nothing happened
    Ignored,
    /// A later input was issued while this one was computing
    Superseded,
}

#[derive(Default)]
struct SessionState {
    input: InputState,
    candidates: Vec<Candidate>,
    selection: SelectionController,
    generation: u64,
}

pub struct AutocompleteSession {
    classifier: InputClassifier,
    ranker: CandidateRanker,
    collaborators: Collaborators,
    state: RwLock<SessionState>,
}

impl AutocompleteSession {
    pub fn new(
        classifier: InputClassifier,
        ranker: CandidateRanker,
        collaborators: Collaborators,
    ) -> Self {
        Self {
            classifier,
            ranker,
            collaborators,
            state: RwLock::new(SessionState::default()),
        }
    }

    /// Build a session backed by the SQLite history and bookmark stores.
    ///
    /// Search engine settings persisted in the database override the
    /// configured ones; a stored template without `%s` is ignored.
    pub fn with_database(
        config: &Config,
        db: Database,
        navigator: Arc<dyn Navigator>,
        context_menu: Arc<dyn ContextMenu>,
    ) -> Result<Self> {
        config.validate()?;

        let mut classifier = InputClassifier::with_search_engine(
            config.search_engine.clone(),
            config.search_label.clone(),
        );
        match db.setting(Setting::SearchEngine)? {
            Some(template) if template.contains("%s") => {
                tracing::debug!(template = %template, "Using persisted search engine");
                classifier.set_search_engine(template);
            }
            Some(template) => {
                tracing::warn!(template = %template, "Ignoring persisted search engine without %s");
            }
            None => {}
        }
        if let Some(label) = db.setting(Setting::SearchLabel)? {
            classifier.set_search_label(label);
        }

        let collaborators = Collaborators {
            history: Arc::new(SqliteHistory::new(
                HistoryManager::new(db.clone()),
                config.history_limit,
            )),
            bookmarks: Arc::new(SqliteBookmarks::new(BookmarkManager::new(db))),
            navigator,
            context_menu,
        };

        Ok(Self::new(
            classifier,
            CandidateRanker::new(config.max_results),
            collaborators,
        ))
    }

    /// Replace the input and recompute the candidate list.
    ///
    /// A history failure still installs the navigate and search rows before
    /// the error is returned.
    pub async fn set_value(&self, text: &str) -> Result<SetValueOutcome> {
        let generation = {
            let mut state = self.state.write();
            if text.is_empty() || text == state.input.text {
                return Ok(SetValueOutcome::Ignored);
            }
            state.input.text = text.to_string();
            state.selection.reset();
            state.generation += 1;
            state.generation
        };

        let classification = self.classifier.classify(text);

        let (history, failure) = match self.collaborators.history.search(text).await {
            Ok(results) => (results, None),
            Err(e) => {
                tracing::warn!(error = %e, "History search failed, showing synthetic rows only");
                (Vec::new(), Some(e))
            }
        };

        let terms = search_terms(text);
        let history: Vec<HistoryMatch> = history
            .into_iter()
            .take(self.ranker.max_results())
            .map(|result| decorate(&terms, result))
            .collect();

        let candidates = self
            .ranker
            .rank(
                text,
                &classification,
                history,
                self.collaborators.bookmarks.as_ref(),
            )
            .await;

        {
            let mut state = self.state.write();
            if state.generation != generation {
                tracing::debug!(
                    generation,
                    latest = state.generation,
                    "Discarding stale candidates"
                );
                return Ok(SetValueOutcome::Superseded);
            }
            tracing::debug!(generation, count = candidates.len(), "Installed candidates");
            state.candidates = candidates;
            state.selection.reset();
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(SetValueOutcome::Applied),
        }
    }

    /// Move the highlight and return the text to preview in the input
    pub fn move_selection(&self, direction: Direction) -> Result<String> {
        let mut guard = self.state.write();
        let state = &mut *guard;

        let selected = state.selection.step(direction, &state.candidates)?;
        let preview = selected.preview().to_string();
        state.input.text = selected.url().to_string();

        Ok(preview)
    }

    /// Navigate to the highlighted candidate
    pub fn choose_selection(&self) -> Result<Candidate> {
        let state = self.state.read();
        let chosen = state
            .selection
            .choose(&state.candidates, self.collaborators.navigator.as_ref())?;

        tracing::info!(url = %chosen.url(), "Chose candidate");
        Ok(chosen.clone())
    }

    /// Select and navigate to the candidate at `index`
    pub fn click_result(&self, index: usize) -> Result<Candidate> {
        let mut guard = self.state.write();
        let state = &mut *guard;

        let chosen = state.selection.click_index(
            index,
            &state.candidates,
            self.collaborators.navigator.as_ref(),
        )?;

        tracing::info!(index, url = %chosen.url(), "Clicked candidate");
        Ok(chosen.clone())
    }

    /// Clear input, candidates and selection; in-flight recomputes are dropped
    pub fn reset(&self) {
        let mut state = self.state.write();
        state.input = InputState::default();
        state.candidates.clear();
        state.selection.reset();
        state.generation += 1;
    }

    pub fn show_context_menu(&self) {
        self.collaborators.context_menu.show(CONTEXT_MENU_ID);
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = self.state.read();
        Snapshot {
            input_value: state.input.text.clone(),
            candidates: state.candidates.clone(),
            selected_index: state.selection.index(),
        }
    }

    pub fn input_value(&self) -> String {
        self.state.read().input.text.clone()
    }

    pub fn selected_index(&self) -> usize {
        self.state.read().selection.index()
    }

    pub fn search_template(&self) -> &str {
        self.classifier.search_template()
    }
}

impl std::fmt::Debug for AutocompleteSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("AutocompleteSession")
            .field("input", &state.input.text)
            .field("candidates", &state.candidates.len())
            .field("selected", &state.selection.index())
            .field("generation", &state.generation)
            .finish()
    }
}
