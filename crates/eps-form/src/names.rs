//! Given-name splitting

/// Split a free-text given-names string into first and second given name
///
/// The first whitespace-separated token is the first name; the remaining
/// tokens are rejoined with single spaces.
pub fn split_given_names(full: &str) -> (String, String) {
    let mut tokens = full.split_whitespace();

    let first = tokens.next().unwrap_or_default().to_string();
    let rest = tokens.collect::<Vec<_>>().join(" ");

    (first, rest)
}
