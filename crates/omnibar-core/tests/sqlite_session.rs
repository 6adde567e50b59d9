//! End-to-end session over an in-memory SQLite database

use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;

use omnibar_core::{
    AutocompleteSession, BookmarkManager, CandidateKind, Config, ContextMenu, Database, Direction,
    HistoryManager, Navigator, SetValueOutcome, Setting,
};

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl Navigator for Recorder {
    fn load_url(&self, url: &str) {
        self.events.lock().push(format!("load {}", url));
    }

    fn close(&self) {
        self.events.lock().push("close".to_string());
    }
}

impl ContextMenu for Recorder {
    fn show(&self, context_id: &str) {
        self.events.lock().push(format!("menu {}", context_id));
    }
}

fn seeded_database() -> Database {
    let db = Database::open_in_memory().unwrap();
    let history = HistoryManager::new(db.clone());
    history
        .record_visit("https://example.com/docs", "Example Docs")
        .unwrap();
    history
        .record_visit("https://example.com/docs", "Example Docs")
        .unwrap();
    history
        .record_visit("https://example.org/", "Another <Example>")
        .unwrap();
    history
        .record_visit("https://unrelated.test/", "Nothing here")
        .unwrap();

    BookmarkManager::new(db.clone())
        .add("https://example.com/docs", "Docs")
        .unwrap();
    db
}

fn session(db: Database) -> (AutocompleteSession, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let config = Config::new(PathBuf::from("unused"));
    let session =
        AutocompleteSession::with_database(&config, db, recorder.clone(), recorder.clone())
            .unwrap();
    (session, recorder)
}

#[tokio::test]
async fn test_keystroke_to_navigation() {
    let (session, recorder) = session(seeded_database());

    let outcome = session.set_value("example").await.unwrap();
    assert_eq!(outcome, SetValueOutcome::Applied);

    let snapshot = session.snapshot();
    assert_eq!(snapshot.candidates.len(), 4);
    assert!(snapshot.candidates[0].is_search());
    assert_eq!(
        snapshot.candidates[0].url(),
        "https://duckduckgo.com/?q=example"
    );
    assert_eq!(snapshot.candidates[1].url(), "https://example");

    // most visited first
    match &snapshot.candidates[2].kind {
        CandidateKind::History(result) => {
            assert_eq!(result.url, "https://example.com/docs");
            assert_eq!(
                result.url_highlighted.as_deref(),
                Some("https://<strong>example</strong>.com/docs")
            );
            assert_eq!(
                result.title_highlighted.as_deref(),
                Some("<strong>Example</strong> Docs")
            );
        }
        other => panic!("Expected history row, got {:?}", other),
    }
    assert!(snapshot.candidates[2].bookmarked);

    match &snapshot.candidates[3].kind {
        CandidateKind::History(result) => {
            assert_eq!(
                result.title_highlighted.as_deref(),
                Some("Another &lt;<strong>Example</strong>&gt;")
            );
        }
        other => panic!("Expected history row, got {:?}", other),
    }
    assert!(!snapshot.candidates[3].bookmarked);

    session.move_selection(Direction::Down).unwrap();
    let preview = session.move_selection(Direction::Down).unwrap();
    assert_eq!(preview, "https://example.com/docs");

    let chosen = session.choose_selection().unwrap();
    assert_eq!(chosen.url(), "https://example.com/docs");
    assert_eq!(
        *recorder.events.lock(),
        vec!["load https://example.com/docs".to_string(), "close".to_string()]
    );
}

#[tokio::test]
async fn test_url_like_input_and_persisted_search_engine() {
    let db = seeded_database();
    db.store_setting(Setting::SearchEngine, "https://search.example/?q=%s")
        .unwrap();
    db.store_setting(Setting::SearchLabel, "Example Search")
        .unwrap();
    let (session, _) = session(db);
    assert_eq!(session.search_template(), "https://search.example/?q=%s");

    session.set_value("example.org").await.unwrap();
    let snapshot = session.snapshot();

    assert_eq!(snapshot.candidates[0].url(), "https://example.org");
    assert_eq!(
        snapshot.candidates[1].url(),
        "https://search.example/?q=example.org"
    );
    assert_eq!(snapshot.candidates[1].title(), "Example Search");
    // both terms must match, so only example.org is left
    assert_eq!(snapshot.candidates.len(), 3);
    assert_eq!(snapshot.candidates[2].url(), "https://example.org/");
}

#[test]
fn test_persisted_template_without_placeholder_is_ignored() {
    let db = seeded_database();
    db.store_setting(Setting::SearchEngine, "https://search.example/")
        .unwrap();
    let (session, _) = session(db);
    assert_eq!(session.search_template(), "https://duckduckgo.com/?q=%s");
}

#[tokio::test]
async fn test_no_history_matches() {
    let (session, recorder) = session(seeded_database());

    session.set_value("zzz qqq").await.unwrap();
    let snapshot = session.snapshot();
    assert_eq!(snapshot.candidates.len(), 2);
    assert!(snapshot.candidates[0].is_search());

    session.click_result(1).unwrap();
    session.show_context_menu();
    assert_eq!(
        *recorder.events.lock(),
        vec![
            "load https://zzz qqq".to_string(),
            "close".to_string(),
            "menu active".to_string(),
        ]
    );
}
