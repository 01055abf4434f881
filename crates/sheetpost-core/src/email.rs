use regex::Regex;
use std::sync::LazyLock;

static EMAIL_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

/// Trims surrounding whitespace and lowercases.
pub fn canonicalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Drops every whitespace character, including inside the address, and
/// lowercases.
pub fn clean_email(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

/// `local@domain.tld` with no whitespace or extra `@` in any part.
pub fn is_valid_email_format(value: &str) -> bool {
    EMAIL_FORMAT.is_match(value)
}
