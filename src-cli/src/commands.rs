//! Line protocol commands
//!
//! One command per line, one JSON response per command. Navigation and
//! context menu requests show up as separate event lines before the
//! response they belong to.

use serde::Serialize;
use serde_json::{json, Value};
use std::str::FromStr;

use omnibar_core::Direction;

use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Set(String),
    Move(Direction),
    Choose,
    Click(usize),
    Reset,
    Menu,
    Snapshot,
    Visit { url: String, title: String },
    Bookmark { url: String, title: String },
    Unbookmark(String),
    History(usize),
    Forget(i64),
    ClearHistory,
    Bookmarks,
}

const DEFAULT_HISTORY_LIMIT: usize = 20;

impl FromStr for Request {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (verb, rest) = match line.split_once(' ') {
            Some((verb, rest)) => (verb, rest),
            None => (line, ""),
        };

        let request = match verb {
            // the rest of the line is the input verbatim, spaces included
            "set" => Request::Set(rest.to_string()),
            "up" => Request::Move(Direction::Up),
            "down" => Request::Move(Direction::Down),
            "choose" => Request::Choose,
            "click" => {
                let index = rest
                    .trim()
                    .parse()
                    .map_err(|_| format!("Invalid index: {:?}", rest.trim()))?;
                Request::Click(index)
            }
            "reset" => Request::Reset,
            "menu" => Request::Menu,
            "snapshot" => Request::Snapshot,
            "visit" => {
                let (url, title) = url_and_title(rest)?;
                Request::Visit { url, title }
            }
            "bookmark" => {
                let (url, title) = url_and_title(rest)?;
                Request::Bookmark { url, title }
            }
            "unbookmark" => {
                let (url, _) = url_and_title(rest)?;
                Request::Unbookmark(url)
            }
            "history" => match rest.trim() {
                "" => Request::History(DEFAULT_HISTORY_LIMIT),
                limit => Request::History(
                    limit
                        .parse()
                        .map_err(|_| format!("Invalid limit: {:?}", limit))?,
                ),
            },
            "forget" => {
                let id = rest
                    .trim()
                    .parse()
                    .map_err(|_| format!("Invalid history id: {:?}", rest.trim()))?;
                Request::Forget(id)
            }
            "clear-history" => Request::ClearHistory,
            "bookmarks" => Request::Bookmarks,
            other => return Err(format!("Unknown command: {}", other)),
        };

        Ok(request)
    }
}

fn url_and_title(rest: &str) -> Result<(String, String), String> {
    let rest = rest.trim();
    if rest.is_empty() {
        return Err("Missing URL".to_string());
    }

    Ok(match rest.split_once(char::is_whitespace) {
        Some((url, title)) => (url.to_string(), title.trim().to_string()),
        None => (rest.to_string(), String::new()),
    })
}

#[derive(Debug, Serialize)]
pub struct CommandResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

fn respond<T, E>(result: Result<T, E>) -> CommandResult<Value>
where
    T: Serialize,
    E: std::fmt::Display,
{
    match result {
        Ok(data) => match serde_json::to_value(data) {
            Ok(value) => CommandResult::ok(value),
            Err(e) => CommandResult::err(e.to_string()),
        },
        Err(e) => CommandResult::err(e.to_string()),
    }
}

pub async fn dispatch(state: &AppState, request: Request) -> CommandResult<Value> {
    let session = state.session();

    match request {
        Request::Set(text) => match session.set_value(&text).await {
            Ok(outcome) => CommandResult::ok(json!({
                "outcome": outcome,
                "snapshot": session.snapshot(),
            })),
            Err(e) => CommandResult::err(e.to_string()),
        },
        Request::Move(direction) => respond(session.move_selection(direction)),
        Request::Choose => respond(session.choose_selection()),
        Request::Click(index) => respond(session.click_result(index)),
        Request::Reset => {
            session.reset();
            respond::<_, String>(Ok(session.snapshot()))
        }
        Request::Menu => {
            session.show_context_menu();
            CommandResult::ok(Value::Null)
        }
        Request::Snapshot => respond::<_, String>(Ok(session.snapshot())),
        Request::Visit { url, title } => {
            tracing::debug!(url = %url, "Recording visit");
            respond(state.history().record_visit(&url, &title))
        }
        Request::Bookmark { url, title } => respond(state.bookmarks().add(&url, &title)),
        Request::Unbookmark(url) => respond(state.bookmarks().remove(&url)),
        Request::History(limit) => respond(state.history().recent(limit)),
        Request::Forget(id) => {
            tracing::info!(id, "Forgetting history entry");
            respond(state.history().delete(id))
        }
        Request::ClearHistory => {
            tracing::info!("Clearing history");
            respond(state.history().clear_all())
        }
        Request::Bookmarks => respond(state.bookmarks().list()),
    }
}
