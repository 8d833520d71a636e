// src/extract/answer_key.rs

use std::sync::LazyLock;

use regex::Regex;

/// A labeled answer pair: question number, optional separator, letter A-D.
/// Matches entries like "1: B", "2) a" or "12 - D".
static LABELED_PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\s*[.):\-]?\s*([A-Da-d])\b").expect("valid regex"));

/// Normalizes a free-form answer key into ordered correct-option letters.
///
/// Two passes, mirroring how admins actually type keys:
/// 1. Labeled pairs ("1: B, 2: A"); if any are found, their letters win.
/// 2. Otherwise every character outside A-D is stripped and whatever letters
///    remain are used in order ("BACD", "b a c d", "B,A,C,D").
///
/// An absent or letter-free key yields an empty vector; the assembler then
/// defaults every correct index to 0.
pub fn align(key: Option<&str>) -> Vec<char> {
    let Some(key) = key else {
        return Vec::new();
    };

    let labeled: Vec<char> = LABELED_PAIR
        .captures_iter(key)
        .map(|cap| cap[1].chars().next().expect("single-letter capture"))
        .map(|c| c.to_ascii_uppercase())
        .collect();
    if !labeled.is_empty() {
        return labeled;
    }

    key.chars()
        .filter(|c| matches!(c.to_ascii_uppercase(), 'A'..='D'))
        .map(|c| c.to_ascii_uppercase())
        .collect()
}
