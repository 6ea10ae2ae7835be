//! Full-text query building for the card index.

/// Build an FTS5 MATCH expression doing prefix search on every term.
///
/// The query is split on every non-alphanumeric character, the same way the
/// `unicode61` tokenizer splits indexed text, so user input can never inject
/// FTS5 operators. Each term is quoted and suffixed with `*`; terms are
/// implicitly ANDed.
///
/// Returns `None` when no searchable term remains.
pub fn match_expression(query: &str) -> Option<String> {
    let terms: Vec<String> = query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|term| !term.is_empty())
        .map(|term| format!("\"{}\"*", term))
        .collect();

    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" "))
    }
}
