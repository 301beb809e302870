//! Text normalization for product comparisons.
//!
//! Product names are typed on phones by different volunteers, so the same
//! item shows up as "Café Molido", "cafe molido" or "CAFÉ, molido!". Every
//! comparison goes through [`normalize_text`] first so that case, accents
//! and punctuation never count as differences.

use std::ops::RangeInclusive;
use unicode_normalization::UnicodeNormalization;

/// Combining Diacritical Marks block, left behind by NFD decomposition.
const COMBINING_MARKS: RangeInclusive<char> = '\u{0300}'..='\u{036f}';

/// Normalizes text into its canonical comparable form.
///
/// Steps, in order:
/// 1. lowercase
/// 2. Unicode canonical decomposition (NFD)
/// 3. drop combining marks (U+0300 to U+036F)
/// 4. drop anything that is not `a-z`, `0-9` or whitespace
/// 5. trim
///
/// Inner whitespace is kept as-is; "leche  entera" and "leche entera" differ
/// by one edit.
///
/// # Example
///
/// ```rust
/// use acopio::services::deduplication::normalize_text;
///
/// assert_eq!(normalize_text("Café"), "cafe");
/// assert_eq!(normalize_text("Leche, Entera!!"), "leche entera");
/// assert_eq!(normalize_text("  Ñandú 1L "), "nandu 1l");
/// ```
#[must_use]
pub fn normalize_text(text: &str) -> String {
    let folded: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !COMBINING_MARKS.contains(c))
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();

    folded.trim().to_string()
}

/// Normalizes an optional value; `None` becomes the empty string.
#[must_use]
pub fn normalize_optional(text: Option<&str>) -> String {
    text.map(normalize_text).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Café", "cafe" ; "acute accent")]
    #[test_case("AZÚCAR Morena", "azucar morena" ; "uppercase accent")]
    #[test_case("Piñata", "pinata" ; "tilde")]
    #[test_case("pingüino", "pinguino" ; "diaeresis")]
    #[test_case("Leche, Entera!!", "leche entera" ; "punctuation")]
    #[test_case("Aceite 1.5L", "aceite 15l" ; "decimal point dropped")]
    #[test_case("  arroz  ", "arroz" ; "surrounding whitespace")]
    #[test_case("frijol  negro", "frijol  negro" ; "inner whitespace kept")]
    #[test_case("", "" ; "empty")]
    #[test_case("!!!", "" ; "only punctuation")]
    #[test_case("日本茶", "" ; "non latin script")]
    fn test_normalize_text(input: &str, expected: &str) {
        assert_eq!(normalize_text(input), expected);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize_text("Atún en Aceite (140 g)");
        assert_eq!(normalize_text(&once), once);
    }

    #[test]
    fn test_precomposed_and_decomposed_agree() {
        // "é" as a single code point vs "e" + U+0301
        assert_eq!(normalize_text("caf\u{e9}"), normalize_text("cafe\u{301}"));
    }

    #[test]
    fn test_normalize_optional() {
        assert_eq!(normalize_optional(None), "");
        assert_eq!(normalize_optional(Some("Sal")), "sal");
    }
}
