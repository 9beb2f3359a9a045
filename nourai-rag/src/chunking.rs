//! Document chunking for the ingestion pipeline.
//!
//! Provides the [`Chunker`] trait and [`RecursiveChunker`], which splits
//! hierarchically by paragraphs, then sentences, then words. All sizes are
//! measured in characters, not bytes, so accented Spanish text never splits
//! inside a code point.

use crate::document::{Chunk, Document};

/// A strategy for splitting documents into chunks.
///
/// Implementations produce [`Chunk`]s with text, inherited source metadata,
/// and a `chunk_index` assigned in document order. Embeddings are attached
/// later by the pipeline.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks. Returns an empty `Vec` for empty text.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// Splits text hierarchically: paragraphs → sentences → words.
///
/// Splits by paragraph separators (`\n\n`) first. Segments exceeding
/// `chunk_size` characters are split by sentence boundaries, then by words,
/// with `chunk_overlap` characters carried between size-split chunks.
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl RecursiveChunker {
    /// Create a new `RecursiveChunker`.
    ///
    /// # Arguments
    ///
    /// * `chunk_size` — maximum number of characters per chunk
    /// * `chunk_overlap` — characters shared between consecutive chunks
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self { chunk_size, chunk_overlap }
    }
}

impl Chunker for RecursiveChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        if document.content.is_empty() {
            return Vec::new();
        }

        let separators = ["\n\n", ". ", "! ", "? ", " "];
        let pieces =
            split_and_merge(&document.content, self.chunk_size, self.chunk_overlap, &separators);

        pieces
            .into_iter()
            .enumerate()
            .map(|(chunk_index, content)| Chunk {
                content,
                source: document.source.clone(),
                chunk_index,
                embedding: Vec::new(),
            })
            .collect()
    }
}

/// Split text by a separator, then merge segments into pieces that respect
/// `chunk_size`. Segments still exceeding `chunk_size` are split again with
/// the next-level separator.
fn split_and_merge(
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
    separators: &[&str],
) -> Vec<String> {
    if char_len(text) <= chunk_size || separators.is_empty() {
        return split_by_size(text, chunk_size, chunk_overlap);
    }

    let separator = separators[0];
    let remaining_separators = &separators[1..];

    let segments: Vec<&str> = if separator == " " {
        text.split(' ').collect()
    } else {
        split_keeping_separator(text, separator)
    };

    // Word-level segments lose their separator in the split; re-add the
    // space when merging so chunk text stays readable.
    let joiner = if separator == " " { " " } else { "" };

    let mut pieces = Vec::new();
    let mut current = String::new();

    for segment in segments {
        if current.is_empty() {
            current = segment.to_string();
        } else if char_len(&current) + joiner.len() + char_len(segment) <= chunk_size {
            current.push_str(joiner);
            current.push_str(segment);
        } else {
            flush_piece(&mut pieces, current, chunk_size, chunk_overlap, remaining_separators);
            current = segment.to_string();
        }
    }

    if !current.is_empty() {
        flush_piece(&mut pieces, current, chunk_size, chunk_overlap, remaining_separators);
    }

    pieces
}

/// Push a completed piece, recursing with the next separator level when it
/// still exceeds `chunk_size`.
fn flush_piece(
    pieces: &mut Vec<String>,
    piece: String,
    chunk_size: usize,
    chunk_overlap: usize,
    remaining_separators: &[&str],
) {
    if char_len(&piece) > chunk_size {
        pieces.extend(split_and_merge(&piece, chunk_size, chunk_overlap, remaining_separators));
    } else {
        pieces.push(piece);
    }
}

/// Split text at a separator, keeping the separator attached to the
/// preceding segment.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    let mut result = Vec::new();
    let mut start = 0;

    while let Some(pos) = text[start..].find(separator) {
        let end = start + pos + separator.len();
        result.push(&text[start..end]);
        start = end;
    }

    if start < text.len() {
        result.push(&text[start..]);
    }

    result
}

/// Character-count splitting with overlap, the last-resort level.
fn split_by_size(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let step = chunk_size.saturating_sub(chunk_overlap).max(1);
    let mut pieces = Vec::new();
    let mut start = 0;

    loop {
        let end = (start + chunk_size).min(chars.len());
        pieces.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += step;
    }

    pieces
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}
