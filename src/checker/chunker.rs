use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Sentence terminator followed by whitespace
    static ref SENTENCE_BOUNDARY: Regex = Regex::new(r"[.!?](\s+)").unwrap();
}

pub const DEFAULT_MAX_CHUNK_LENGTH: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// 1-based position in submission order
    pub index: usize,
    pub content: String,
}

/// Split text into chunks of at most `max_length` characters, preferring
/// sentence boundaries and hard-splitting only sentences that don't fit.
pub fn split(text: &str, max_length: usize) -> Vec<Chunk> {
    let max_length = max_length.max(1);
    let mut chunks = Vec::new();
    let mut buffer = String::new();
    let mut buffer_len = 0;

    for token in tokenize(text) {
        let token_len = token.chars().count();

        if buffer_len + token_len > max_length && has_content(&buffer) {
            flush(&mut chunks, &buffer);
            buffer.clear();
            buffer_len = 0;
        }

        buffer.push_str(token);
        buffer_len += token_len;

        // A single sentence longer than the limit gets cut at the boundary
        while buffer_len > max_length {
            let cut = byte_offset(&buffer, max_length);
            let rest = buffer.split_off(cut);
            flush(&mut chunks, &buffer);
            buffer = rest;
            buffer_len -= max_length;
        }
    }

    flush(&mut chunks, &buffer);
    chunks
}

/// Alternating sentence / whitespace tokens; concatenating them yields `text`
fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;

    for caps in SENTENCE_BOUNDARY.captures_iter(text) {
        let Some(delimiter) = caps.get(1) else {
            continue;
        };
        tokens.push(&text[start..delimiter.start()]);
        tokens.push(delimiter.as_str());
        start = delimiter.end();
    }

    if start < text.len() {
        tokens.push(&text[start..]);
    }

    tokens
}

fn flush(chunks: &mut Vec<Chunk>, buffer: &str) {
    let content = buffer.trim();
    if content.is_empty() {
        return;
    }
    chunks.push(Chunk {
        index: chunks.len() + 1,
        content: content.to_string(),
    });
}

fn has_content(buffer: &str) -> bool {
    buffer.chars().any(|c| !c.is_whitespace())
}

fn byte_offset(s: &str, char_count: usize) -> usize {
    s.char_indices()
        .nth(char_count)
        .map(|(offset, _)| offset)
        .unwrap_or(s.len())
}
