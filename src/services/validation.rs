use std::sync::LazyLock;

use regex::Regex;

static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-1]?[0-9]|2[0-3]):[0-5][0-9](:[0-5][0-9])?$").unwrap());

// Shape only, no calendar check: "2025-13-40" passes.
static DATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\+\d{1,3})?[\s-]?\(?\d{1,4}\)?[\s-]?\d{1,4}[\s-]?\d{1,9}$").unwrap()
});

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// `H:MM` or `HH:MM` (0-23), optionally followed by `:SS` (0-59).
pub fn is_valid_time(s: &str) -> bool {
    TIME_RE.is_match(s)
}

/// Literal `YYYY-MM-DD` pattern match.
pub fn is_valid_date(s: &str) -> bool {
    DATE_RE.is_match(s)
}

/// Loose grouping of digit runs with an optional `+` country code. Not E.164.
pub fn is_valid_phone(s: &str) -> bool {
    PHONE_RE.is_match(s)
}

/// Minimal `local@domain.tld` shape check.
pub fn is_valid_email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}
