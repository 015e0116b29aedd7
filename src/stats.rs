use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref SENTENCE_TERMINATORS: Regex = Regex::new(r"[.!?]+").unwrap();
}

/// Character, word, sentence and line counts for a piece of text.
///
/// All lengths are counted in `char`s, so Hangul and Latin text mixed in the
/// same input are measured the same way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TextStatistics {
    pub total_chars: usize,
    pub non_space_chars: usize,
    pub word_count: usize,
    pub sentence_count: usize,
    pub line_count: usize,
}

impl TextStatistics {
    pub fn compute(text: &str) -> Self {
        let total_chars = text.chars().count();
        let non_space_chars = text.chars().filter(|c| !c.is_whitespace()).count();

        // Whitespace-only input has no words
        let word_count = text.split_whitespace().count();

        let sentence_count = SENTENCE_TERMINATORS
            .split(text)
            .filter(|sentence| !sentence.trim().is_empty())
            .count();

        // Lines holding only spaces still count, empty ones don't
        let line_count = text.split('\n').filter(|line| !line.is_empty()).count();

        Self {
            total_chars,
            non_space_chars,
            word_count,
            sentence_count,
            line_count,
        }
    }
}
