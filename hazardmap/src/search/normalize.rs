//! Search text normalization.
//!
//! Shelter names and addresses mix half-width and full-width forms, hiragana
//! and katakana spellings of the same word, and arbitrary spacing. Both the
//! index and every query pass through [`normalize`] so that these variants
//! compare equal.

use unicode_normalization::UnicodeNormalization;

/// Upper bound on folding passes; real input settles after one or two.
const MAX_PASSES: usize = 4;

/// Canonicalizes text for fuzzy matching.
///
/// - width folding (NFKC): half-width katakana become full-width, full-width
///   letters, digits and spaces become their ASCII forms
/// - hiragana folded to katakana
/// - all whitespace removed
/// - lower-cased
///
/// The function is total and idempotent: `normalize(&normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
    let mut current = fold_once(text);
    for _ in 1..MAX_PASSES {
        // Dropping whitespace can put a combining mark next to a new base
        // character, which NFKC then composes on the next pass.
        let next = fold_once(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn fold_once(text: &str) -> String {
    text.nfkc()
        .map(hiragana_to_katakana)
        .flat_map(char::to_lowercase)
        .filter(|c| !c.is_whitespace())
        .nfkc()
        .collect()
}

/// Maps a hiragana code point onto its katakana counterpart.
///
/// The two blocks are laid out in parallel, 0x60 apart, for the syllables
/// ぁ (U+3041) through ゖ (U+3096) and the iteration marks ゝゞ.
fn hiragana_to_katakana(c: char) -> char {
    match c {
        '\u{3041}'..='\u{3096}' | '\u{309D}'..='\u{309E}' => {
            char::from_u32(c as u32 + 0x60).unwrap_or(c)
        }
        _ => c,
    }
}
