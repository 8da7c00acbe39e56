use serde::{Deserialize, Serialize};

use crate::prompts::Role;

/// Text generation request
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    /// Model name (e.g., "gemini-2.5-flash")
    pub model: String,

    /// Prompt text
    pub prompt: String,
}

impl GenerateRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
        }
    }
}

/// Text generation response
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GenerateResponse {
    /// Generated text, absent when the service produced none
    pub text: Option<String>,
}

impl GenerateResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    pub fn empty() -> Self {
        Self { text: None }
    }
}

/// How a chunk summary was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryOutcome {
    /// Service returned text
    Generated,
    /// Service succeeded but returned nothing
    Empty,
    /// Every attempt hit a server error
    Exhausted,
}

/// Summary of a single chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkSummary {
    /// Index of the source chunk
    pub index: usize,

    /// Summary text or placeholder
    pub text: String,

    pub outcome: SummaryOutcome,

    /// Service calls made for this chunk
    pub attempts: u32,
}

/// Summarization result for a whole document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseSummary {
    /// Chunk summaries joined by blank lines
    pub text: String,

    /// Per-chunk summaries in chunk order
    pub chunks: Vec<ChunkSummary>,

    /// Role the summary was written for
    pub role: String,

    /// Model used
    pub model: String,
}

impl CaseSummary {
    /// Create new summary
    pub fn new(text: String, chunks: Vec<ChunkSummary>, role: Role, model: String) -> Self {
        Self {
            text,
            chunks,
            role: role.to_string(),
            model,
        }
    }

    /// Chunks that fell back to a placeholder after exhausting retries
    pub fn exhausted_chunks(&self) -> usize {
        self.chunks
            .iter()
            .filter(|c| c.outcome == SummaryOutcome::Exhausted)
            .count()
    }
}
