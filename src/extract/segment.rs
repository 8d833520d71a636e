// src/extract/segment.rs

use std::sync::LazyLock;

use regex::Regex;

/// A numeric question label at the start of a line: "12." or "3)".
static QUESTION_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*\d+[.)]").expect("valid regex"));

/// Splits extracted PDF text into candidate question blocks.
///
/// A new block starts at every line whose first token is a numeric label
/// (digits followed by `.` or `)`). Text before the first label (cover page,
/// instructions) becomes a block of its own and is rejected later by the
/// option parser. If no label is found anywhere, the whole text is a single
/// block.
pub fn blocks(text: &str) -> impl Iterator<Item = &str> {
    let mut starts: Vec<usize> = QUESTION_LABEL.find_iter(text).map(|m| m.start()).collect();
    if starts.first() != Some(&0) {
        starts.insert(0, 0);
    }
    starts.push(text.len());

    (0..starts.len() - 1)
        .map(move |i| &text[starts[i]..starts[i + 1]])
        .filter(|block| !block.trim().is_empty())
}
