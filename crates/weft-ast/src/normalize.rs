//! Identifier normalization.

/// Return a case- and whitespace-normalized identifier.
///
/// Lowercases the label, collapses internal whitespace runs to single spaces
/// and trims the ends. Idempotent: normalizing an already-normalized string
/// returns it unchanged.
///
/// # Example
///
/// ```
/// use weft_ast::normalize_id;
///
/// assert_eq!(normalize_id("  My   Label "), "my label");
/// assert_eq!(normalize_id("my label"), "my label");
/// ```
#[must_use]
pub fn normalize_id(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
