//! Account labels: the `"<name> (<code>)"` strings journal entries use to
//! reference accounts.
//!
//! Entries carry no account id, so every per-account aggregation goes through
//! [`parse_label`]. Malformed labels are taken as they come; the extracted code
//! may be empty, in which case the entry matches no account.

/// Name and code recovered from a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLabel {
    pub name: String,
    pub code: String,
}

/// Split a label into name and code.
///
/// The code is everything after the last `(` with every `)` removed, trimmed.
/// The name is everything before the first `(`, trimmed. Without a `(` the
/// whole label is the name and the code is empty.
pub fn parse_label(label: &str) -> ParsedLabel {
    match (label.find('('), label.rfind('(')) {
        (Some(first), Some(last)) => ParsedLabel {
            name: label[..first].trim().to_string(),
            code: label[last + 1..].replace(')', "").trim().to_string(),
        },
        _ => ParsedLabel {
            name: label.to_string(),
            code: String::new(),
        },
    }
}

/// Code embedded in a label, or `""`.
pub fn extract_code(label: &str) -> String {
    parse_label(label).code
}

/// Canonical label for an account.
pub fn format_label(name: &str, code: &str) -> String {
    format!("{} ({})", name.trim(), code.trim())
}
