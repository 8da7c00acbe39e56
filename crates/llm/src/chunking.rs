use casebrief_common::{CaseBriefError, Result};

/// Text chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    /// Position of the chunk in the document
    pub index: usize,

    /// Chunk text
    pub text: String,

    /// Start byte offset in original text
    pub start: usize,

    /// End byte offset in original text (exclusive)
    pub end: usize,
}

impl TextChunk {
    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Split text into consecutive chunks of at most `max_chars` characters.
///
/// Boundaries fall at fixed character offsets, so a chunk may end mid-word;
/// joining the chunks in order gives back `text` exactly.
pub fn chunk_text(text: &str, max_chars: usize) -> Result<Vec<TextChunk>> {
    if max_chars == 0 {
        return Err(CaseBriefError::config("max_chars must be greater than 0"));
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (offset, _) in text.char_indices() {
        if count == max_chars {
            chunks.push(slice(text, chunks.len(), start, offset));
            start = offset;
            count = 0;
        }
        count += 1;
    }

    if start < text.len() {
        chunks.push(slice(text, chunks.len(), start, text.len()));
    }

    Ok(chunks)
}

fn slice(text: &str, index: usize, start: usize, end: usize) -> TextChunk {
    TextChunk {
        index,
        text: text[start..end].to_string(),
        start,
        end,
    }
}
