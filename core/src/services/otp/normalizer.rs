//! Canonical form of contact identifiers
//!
//! Every engine lookup goes through `normalize`, so two spellings of the same
//! phone number or email land on the same session and rate-limit entry.

use once_cell::sync::Lazy;
use regex::Regex;

/// Runs of ASCII decimal digits
static DIGIT_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").unwrap());

/// Whether the raw identifier is treated as an email address
pub fn is_email(identifier: &str) -> bool {
    identifier.contains('@')
}

/// Canonicalize a raw phone number or email address
///
/// Emails are trimmed and lowercased. Anything else is treated as a phone
/// number and reduced to its digits, so a string with no digits normalizes
/// to the empty key.
pub fn normalize(identifier: &str) -> String {
    if is_email(identifier) {
        return identifier.trim().to_lowercase();
    }

    DIGIT_RUNS
        .find_iter(identifier)
        .map(|m| m.as_str())
        .collect()
}
