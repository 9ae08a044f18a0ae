//! Text canonicalization used by the knowledge base matcher.

use unicode_normalization::UnicodeNormalization;

/// Combining diacritical marks block removed after NFD decomposition.
const COMBINING_MARKS: std::ops::RangeInclusive<char> = '\u{0300}'..='\u{036F}';

/// Canonicalize text for lexical comparison.
///
/// Lowercases, strips accents (`"Política"` becomes `"politica"`), turns every
/// character that is neither a word character nor whitespace into a space and
/// collapses whitespace runs. Empty or symbol-only input yields `""`.
pub fn normalize_text(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !COMBINING_MARKS.contains(c))
        .map(|c| if is_word_char(c) || c.is_whitespace() { c } else { ' ' })
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
