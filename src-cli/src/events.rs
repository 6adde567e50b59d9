//! Side-effect events written to stdout
use parking_lot::Mutex;
use serde::Serialize;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use omnibar_core::{ContextMenu, Navigator};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    LoadUrl { url: String },
    Close,
    ContextMenu { context_id: String },
}

/// Serializes protocol lines onto one writer and records whether the
/// location bar asked to close.
pub struct EventWriter {
    out: Mutex<Box<dyn Write + Send>>,
    closed: AtomicBool,
}

impl EventWriter {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
            closed: AtomicBool::new(false),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    pub fn write_line<T: Serialize>(&self, value: &T) -> std::io::Result<()> {
        let line = serde_json::to_string(value)?;
        let mut out = self.out.lock();
        writeln!(out, "{}", line)?;
        out.flush()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn emit(&self, event: Event) {
        if let Err(e) = self.write_line(&event) {
            tracing::warn!(?event, error = %e, "Failed to write event");
        }
    }
}

impl Navigator for EventWriter {
    fn load_url(&self, url: &str) {
        self.emit(Event::LoadUrl {
            url: url.to_string(),
        });
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.emit(Event::Close);
    }
}

impl ContextMenu for EventWriter {
    fn show(&self, context_id: &str) {
        self.emit(Event::ContextMenu {
            context_id: context_id.to_string(),
        });
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Arc;

    /// Writer whose contents stay readable after being boxed
    #[derive(Clone, Default)]
    pub(crate) struct SharedBuffer(pub Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        pub fn lines(&self) -> Vec<String> {
            String::from_utf8_lossy(&self.0.lock())
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_events_are_json_lines() {
        let buffer = SharedBuffer::default();
        let writer = EventWriter::new(Box::new(buffer.clone()));

        writer.load_url("https://example.com/");
        writer.show("active");
        assert!(!writer.is_closed());
        writer.close();
        assert!(writer.is_closed());

        assert_eq!(
            buffer.lines(),
            vec![
                r#"{"event":"load_url","url":"https://example.com/"}"#.to_string(),
                r#"{"event":"context_menu","context_id":"active"}"#.to_string(),
                r#"{"event":"close"}"#.to_string(),
            ]
        );
    }
}
