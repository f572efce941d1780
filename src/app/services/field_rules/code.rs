//! Clinic code normalization

use super::FieldOutcome;

/// Uppercase and strip everything that is not an ASCII letter or digit
///
/// Idempotent: normalizing an already-normalized code returns it unchanged.
pub fn normalize_code(raw: &str) -> FieldOutcome {
    let value: String = raw
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if value.is_empty() {
        FieldOutcome::failed(value, "clinic code is empty")
    } else {
        FieldOutcome::ok(value)
    }
}
