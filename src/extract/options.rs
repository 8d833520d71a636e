// src/extract/options.rs

use std::sync::LazyLock;

use regex::Regex;

/// An option marker: optional opening bracket, a letter A-D, a closing
/// delimiter and at least one whitespace character, e.g. "A) ", "(b) ", "C. ".
static OPTION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[(\[]?([A-Da-d])[)\].]\s+").expect("valid regex"));

/// The numeric label prefixing a block, e.g. "12. " or "3) ".
static LEADING_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+[.)]\s*").expect("valid regex"));

/// A question sliced out of a block, before answer-key alignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedBlock {
    pub question_text: String,
    pub options: Vec<String>,
}

/// Maximum number of options kept per question; extra markers are dropped.
pub const MAX_OPTIONS: usize = 4;

/// Minimum number of markers for a block to count as a question.
pub const MIN_OPTIONS: usize = 2;

/// Parses one block into question text plus options.
///
/// Returns `None` when the block has fewer than two option markers or when
/// nothing but the numeric label precedes the first marker. Options run from
/// the end of their marker to the start of the next one (or end of block)
/// and are trimmed. At most four options are kept; blocks are never padded
/// up to four.
pub fn parse_block(block: &str) -> Option<ParsedBlock> {
    let markers: Vec<_> = OPTION_MARKER.find_iter(block).collect();
    if markers.len() < MIN_OPTIONS {
        return None;
    }

    let head = &block[..markers[0].start()];
    let question_text = LEADING_LABEL.replace(head, "").trim().to_string();
    if question_text.is_empty() {
        return None;
    }

    let options = markers
        .iter()
        .enumerate()
        .take(MAX_OPTIONS)
        .map(|(i, m)| {
            let end = markers.get(i + 1).map_or(block.len(), |next| next.start());
            block[m.end()..end].trim().to_string()
        })
        .collect();

    Some(ParsedBlock {
        question_text,
        options,
    })
}
