//! SQL helpers.

/// Escapes LIKE wildcards so user text matches literally.
///
/// Use with `ESCAPE '\'`.
///
/// # Examples
///
/// ```
/// use symptom_advisor::storage::sqlite::escape_like_wildcards;
///
/// assert_eq!(escape_like_wildcards("100%"), "100\\%");
/// assert_eq!(escape_like_wildcards("heart_disease"), "heart\\_disease");
/// assert_eq!(escape_like_wildcards("a\\b"), "a\\\\b");
/// ```
#[must_use]
pub fn escape_like_wildcards(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            result.push('\\');
        }
        result.push(c);
    }
    result
}
