//! Blank-line chunking of a plain-text knowledge corpus.

use crate::record::Chunk;

/// Splits `text` into trimmed, non-empty paragraphs.
///
/// Two or more consecutive newlines act as a single separator; `\r\n` line
/// endings are normalized first. Order follows the source text.
pub fn split_blank_lines(text: &str) -> Vec<String> {
    let normalized = text.replace("\r\n", "\n");
    normalized
        .split("\n\n")
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

/// Chunks a corpus and assigns ids `"0"`, `"1"`, ... in corpus order.
pub fn chunk_corpus(text: &str) -> Vec<Chunk> {
    split_blank_lines(text)
        .into_iter()
        .enumerate()
        .map(|(i, text)| Chunk {
            id: i.to_string(),
            text,
        })
        .collect()
}
