//! Match highlighting for history rows
//!
//! The full-text index reports where each search term hit a row as groups of
//! four integers, `column term offset length`. The groups are decoded into
//! alternating unmatched/matched segments per field and rendered as escaped
//! text with `<strong>` around the matches.
//!
//! The span length is taken from the search term, not from the reported
//! length: the index reports the length of the whole matching token, while
//! only the typed prefix should be bold.
//!
//! Offsets are byte offsets into the UTF-8 field. Anything that does not
//! decode cleanly drops the affected group and leaves the rest of the row
//! highlighted; decoration never fails.

use std::borrow::Cow;

use crate::candidate::HistoryMatch;

const BOLD_OPEN: &str = "<strong>";
const BOLD_CLOSE: &str = "</strong>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Url,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MatchOffset {
    column: Column,
    term: usize,
    offset: usize,
}

/// Alternating unmatched/matched slices of each field, starting unmatched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSegments<'a> {
    pub url: Vec<&'a str>,
    pub title: Vec<&'a str>,
}

struct FieldCursor<'a> {
    text: &'a str,
    last_offset: usize,
    segments: Vec<&'a str>,
}

impl<'a> FieldCursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            last_offset: 0,
            segments: Vec::new(),
        }
    }

    /// Emit `[last_offset, offset)` then `[offset, offset + len)`.
    ///
    /// A match behind the cursor starts at the cursor; spans are clamped to
    /// the field. Returns false when the span does not sit on char
    /// boundaries.
    fn push_match(&mut self, offset: usize, len: usize) -> bool {
        let end_of_field = self.text.len();
        let start = offset.max(self.last_offset).min(end_of_field);
        let end = offset.saturating_add(len).min(end_of_field).max(start);

        match (
            self.text.get(self.last_offset..start),
            self.text.get(start..end),
        ) {
            (Some(plain), Some(bold)) => {
                self.segments.push(plain);
                self.segments.push(bold);
                self.last_offset = end;
                true
            }
            _ => false,
        }
    }

    fn finish(mut self) -> Vec<&'a str> {
        self.segments
            .push(self.text.get(self.last_offset..).unwrap_or_default());
        self.segments
    }
}

/// Decode every run of four consecutive numbers.
///
/// A token that is not a plain decimal number breaks the current run, so a
/// stray token costs at most the group it landed in.
fn parse_offsets(raw: &str) -> Vec<MatchOffset> {
    let mut groups = Vec::new();
    let mut run: Vec<usize> = Vec::with_capacity(4);

    for token in raw.split_whitespace() {
        let Some(number) = parse_number(token) else {
            run.clear();
            continue;
        };

        run.push(number);
        if run.len() == 4 {
            let (term, offset) = (run[1], run[2]);
            let column = match run[0] {
                0 => Some(Column::Url),
                1 => Some(Column::Title),
                _ => None,
            };
            if let Some(column) = column {
                groups.push(MatchOffset {
                    column,
                    term,
                    offset,
                });
            }
            run.clear();
        }
    }

    groups
}

/// ASCII digits only; signs and anything `usize` cannot hold are rejected
fn parse_number(token: &str) -> Option<usize> {
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// Split both fields of `result` at the reported match positions.
///
/// Returns `None` when the row carries no decodable offset groups.
pub fn segment_matches<'a>(
    search_terms: &[String],
    result: &'a HistoryMatch,
) -> Option<FieldSegments<'a>> {
    let raw = result.raw_offsets.as_deref()?;
    let tuples = parse_offsets(raw);
    if tuples.is_empty() {
        return None;
    }

    let mut url = FieldCursor::new(&result.url);
    let mut title = FieldCursor::new(&result.title);
    let mut last_tuple: Option<MatchOffset> = None;

    for tuple in tuples {
        // Several terms can hit the same position; only the first counts
        if let Some(last) = last_tuple {
            if last.column == tuple.column && last.offset == tuple.offset {
                continue;
            }
        }
        last_tuple = Some(tuple);

        let Some(term) = search_terms.get(tuple.term) else {
            tracing::trace!(term = tuple.term, "Offset references unknown search term");
            continue;
        };

        let cursor = match tuple.column {
            Column::Url => &mut url,
            Column::Title => &mut title,
        };
        if !cursor.push_match(tuple.offset, term.len()) {
            tracing::trace!(offset = tuple.offset, "Offset outside char boundaries");
        }
    }

    Some(FieldSegments {
        url: url.finish(),
        title: title.finish(),
    })
}

/// Populate `url_highlighted` and `title_highlighted`.
///
/// Rows without offsets are returned untouched and render as plain text.
pub fn decorate(search_terms: &[String], mut result: HistoryMatch) -> HistoryMatch {
    let Some(segments) = segment_matches(search_terms, &result) else {
        return result;
    };

    let url = join_segments(&segments.url);
    let title = join_segments(&segments.title);

    result.url_highlighted = Some(url);
    result.title_highlighted = Some(title);
    result
}

/// Escape every segment and wrap every other one, starting with the second,
/// in `<strong>`.
pub fn join_segments(segments: &[&str]) -> String {
    let mut out = String::new();
    for (i, segment) in segments.iter().enumerate() {
        let segment = escape(segment);
        if i % 2 == 1 {
            out.push_str(BOLD_OPEN);
            out.push_str(&segment);
            out.push_str(BOLD_CLOSE);
        } else {
            out.push_str(&segment);
        }
    }
    out
}

fn escape(segment: &str) -> Cow<'_, str> {
    if !segment.contains(['<', '>']) {
        return Cow::Borrowed(segment);
    }
    Cow::Owned(segment.replace('<', "&lt;").replace('>', "&gt;"))
}
