//! Word-overlap similarity between two free-text strings.

use crate::normalize::normalize_text;

/// Tokens must be longer than this many characters to count as a match.
pub const MIN_TOKEN_LEN: usize = 2;

/// Bonus added when one normalized text contains the other.
pub const SUBSTRING_BONUS: f64 = 2.0;

/// Score how well `query` overlaps with `candidate`.
///
/// Counts the tokens of `query` (longer than [`MIN_TOKEN_LEN`]) that also
/// appear in `candidate`, adds [`SUBSTRING_BONUS`] when either normalized text
/// contains the other, and divides by the token count of the longer side.
///
/// The result is asymmetric and not bounded to `[0, 1]`.
pub fn similarity(query: &str, candidate: &str) -> f64 {
    let normalized1 = normalize_text(query);
    let normalized2 = normalize_text(candidate);

    // Splitting "" yields one empty token, which keeps the denominator >= 1.
    let words1: Vec<&str> = normalized1.split(' ').collect();
    let words2: Vec<&str> = normalized2.split(' ').collect();
    let total_words = words1.len().max(words2.len());

    // Length counts chars, not UTF-16 units; only non-BMP letters differ.
    let mut matches = words1
        .iter()
        .filter(|w| w.chars().count() > MIN_TOKEN_LEN && words2.contains(*w))
        .count() as f64;

    if normalized1.contains(normalized2.as_str()) || normalized2.contains(normalized1.as_str()) {
        matches += SUBSTRING_BONUS;
    }

    matches / total_words as f64
}
