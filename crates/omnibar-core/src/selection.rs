//! Selection State Machine
//!
//! ```text
//! index 0 ──down──▶ index 1 ──down──▶ … ──down──▶ index N-1 (stays)
//!  (stays) ◀──up──         ◀──up──        ◀──up──
//!
//! choose / click(i): navigate to the selected row, then close
//! ```
//!
//! The index resets to 0 whenever the candidate list is rebuilt.

use serde::{Deserialize, Serialize};

use crate::candidate::Candidate;
use crate::collaborators::Navigator;
use crate::error::OmnibarError;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            _ => Err(format!("Unknown direction: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionController {
    index: usize,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    pub fn move_up(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    pub fn move_down(&mut self, len: usize) {
        if self.index + 1 < len {
            self.index += 1;
        }
    }

    /// Move one row and return the newly selected candidate
    pub fn step<'a>(
        &mut self,
        direction: Direction,
        candidates: &'a [Candidate],
    ) -> Result<&'a Candidate> {
        if candidates.is_empty() {
            return Err(OmnibarError::NoCandidates);
        }

        match direction {
            Direction::Up => self.move_up(),
            Direction::Down => self.move_down(candidates.len()),
        }

        candidates
            .get(self.index)
            .ok_or(OmnibarError::IndexOutOfRange {
                index: self.index,
                len: candidates.len(),
            })
    }

    /// Navigate to the selected candidate and close the location bar
    pub fn choose<'a>(
        &self,
        candidates: &'a [Candidate],
        navigator: &dyn Navigator,
    ) -> Result<&'a Candidate> {
        if candidates.is_empty() {
            return Err(OmnibarError::NoCandidates);
        }

        let selected = candidates
            .get(self.index)
            .ok_or(OmnibarError::IndexOutOfRange {
                index: self.index,
                len: candidates.len(),
            })?;

        navigator.load_url(selected.url());
        navigator.close();

        Ok(selected)
    }

    /// Select `index` and choose it in one step
    pub fn click_index<'a>(
        &mut self,
        index: usize,
        candidates: &'a [Candidate],
        navigator: &dyn Navigator,
    ) -> Result<&'a Candidate> {
        if index >= candidates.len() {
            return Err(OmnibarError::IndexOutOfRange {
                index,
                len: candidates.len(),
            });
        }

        self.index = index;
        self.choose(candidates, navigator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::HistoryMatch;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingNavigator {
        calls: Mutex<Vec<String>>,
    }

    impl Navigator for RecordingNavigator {
        fn load_url(&self, url: &str) {
            self.calls.lock().push(format!("load {}", url));
        }

        fn close(&self) {
            self.calls.lock().push("close".to_string());
        }
    }

    fn candidates(n: usize) -> Vec<Candidate> {
        (0..n)
            .map(|i| Candidate::history(HistoryMatch::new(format!("https://r{i}.example"), "", None)))
            .collect()
    }

    #[test]
    fn test_moves_are_clamped() {
        let mut selection = SelectionController::new();

        selection.move_up();
        assert_eq!(selection.index(), 0);

        for _ in 0..3 {
            selection.move_down(5);
        }
        selection.move_up();
        assert_eq!(selection.index(), 2);

        for _ in 0..10 {
            selection.move_down(5);
        }
        assert_eq!(selection.index(), 4);

        selection.reset();
        assert_eq!(selection.index(), 0);
    }

    #[test]
    fn test_step_returns_selected_candidate() {
        let list = candidates(3);
        let mut selection = SelectionController::new();

        let selected = selection.step(Direction::Down, &list).unwrap();
        assert_eq!(selected.url(), "https://r1.example");

        let selected = selection.step(Direction::Up, &list).unwrap();
        assert_eq!(selected.url(), "https://r0.example");
    }

    #[test]
    fn test_empty_list_has_nothing_to_select() {
        let mut selection = SelectionController::new();
        let navigator = RecordingNavigator::default();

        assert!(matches!(
            selection.step(Direction::Down, &[]),
            Err(OmnibarError::NoCandidates)
        ));
        assert!(matches!(
            selection.choose(&[], &navigator),
            Err(OmnibarError::NoCandidates)
        ));
        assert_eq!(selection.index(), 0);
        assert!(navigator.calls.lock().is_empty());
    }

    #[test]
    fn test_click_matches_keyboard_choose() {
        let list = candidates(5);

        let keyboard = RecordingNavigator::default();
        let mut selection = SelectionController::new();
        for _ in 0..3 {
            selection.step(Direction::Down, &list).unwrap();
        }
        selection.choose(&list, &keyboard).unwrap();

        let mouse = RecordingNavigator::default();
        let mut selection = SelectionController::new();
        selection.click_index(3, &list, &mouse).unwrap();
        assert_eq!(selection.index(), 3);

        assert_eq!(*keyboard.calls.lock(), *mouse.calls.lock());
        assert_eq!(
            *mouse.calls.lock(),
            vec!["load https://r3.example".to_string(), "close".to_string()]
        );
    }

    #[test]
    fn test_click_out_of_range() {
        let list = candidates(2);
        let navigator = RecordingNavigator::default();
        let mut selection = SelectionController::new();

        let result = selection.click_index(2, &list, &navigator);
        assert!(matches!(
            result,
            Err(OmnibarError::IndexOutOfRange { index: 2, len: 2 })
        ));
        assert_eq!(selection.index(), 0);
        assert!(navigator.calls.lock().is_empty());
    }

    #[test]
    fn test_direction_from_str() {
        assert_eq!("UP".parse::<Direction>().unwrap(), Direction::Up);
        assert_eq!("down".parse::<Direction>().unwrap(), Direction::Down);
        assert!("left".parse::<Direction>().is_err());
    }
}
