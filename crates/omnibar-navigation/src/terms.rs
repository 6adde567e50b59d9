//! Search term tokenization
//!
//! The history index uses SQLite's `simple` tokenizer, which treats every
//! ASCII character that is not alphanumeric as a separator. Input is split
//! the same way so that the term numbers reported in FTS `offsets()` line up
//! with the term list handed to the match decorator.

/// Split location-bar input into ordered search terms.
///
/// Case is preserved; only the byte length of each term is used for
/// highlighting, and FTS matching is case-insensitive.
pub fn search_terms(input: &str) -> Vec<String> {
    input
        .split(is_separator)
        .filter(|term| !term.is_empty())
        .map(str::to_string)
        .collect()
}

/// Build an FTS4 `MATCH` expression requiring every term as a prefix.
///
/// Returns `None` when there is nothing to search for.
pub fn match_expression(terms: &[String]) -> Option<String> {
    if terms.is_empty() {
        return None;
    }

    // Quoted so that upper-case AND/OR/NOT/NEAR stay plain terms
    let expr = terms
        .iter()
        .map(|term| format!("\"{term}*\""))
        .collect::<Vec<_>>()
        .join(" ");

    Some(expr)
}

fn is_separator(c: char) -> bool {
    c.is_ascii() && !c.is_ascii_alphanumeric()
}
