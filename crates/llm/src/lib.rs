//! casebrief LLM integration
//!
//! Chunking, role prompts, Gemini client and retrying summarization

mod chunking;
mod client;
mod llm_trait;
mod prompts;
mod retry;
mod summarize;
mod types;

#[cfg(test)]
mod testing;

pub use chunking::{chunk_text, TextChunk};
pub use client::{classify_status, GeminiClient};
pub use llm_trait::LlmClient;
pub use prompts::{build_prompt, Role, CONCISE_PROMPT, LAWYER_PROMPT, PUBLIC_PROMPT, STUDENT_PROMPT};
pub use retry::{AttemptOutcome, RetryMachine, RetryPolicy, RetryState};
pub use summarize::{assemble, Summarizer, NO_SUMMARY_PLACEHOLDER, SERVER_ERROR_PLACEHOLDER};
pub use types::{CaseSummary, ChunkSummary, GenerateRequest, GenerateResponse, SummaryOutcome};
