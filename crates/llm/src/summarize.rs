use casebrief_common::{AppConfig, Result};
use futures::{stream, StreamExt, TryStreamExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::chunking::chunk_text;
use crate::llm_trait::LlmClient;
use crate::prompts::Role;
use crate::retry::{AttemptOutcome, RetryMachine, RetryPolicy, RetryState};
use crate::types::{CaseSummary, ChunkSummary, GenerateRequest, SummaryOutcome};

/// Placeholder when the service succeeds with no text
pub const NO_SUMMARY_PLACEHOLDER: &str = "No summary returned";

/// Placeholder when every attempt for a chunk hit a server error
pub const SERVER_ERROR_PLACEHOLDER: &str = "Summary could not be generated due to server error.";

/// Summarizer for long case documents: chunk, summarize each chunk with
/// retries, join the results in order
pub struct Summarizer {
    client: Arc<dyn LlmClient>,
    policy: RetryPolicy,
    concurrency: usize,
}

impl Summarizer {
    /// Create new summarizer that processes chunks one at a time
    pub fn new(client: Arc<dyn LlmClient>, policy: RetryPolicy) -> Self {
        Self {
            client,
            policy,
            concurrency: 1,
        }
    }

    /// Create summarizer from application config
    pub fn from_config(client: Arc<dyn LlmClient>, config: &AppConfig) -> Result<Self> {
        let policy = RetryPolicy::new(
            config.max_retries,
            Duration::from_millis(config.backoff_base_ms),
        )?;
        Ok(Self::new(client, policy).with_concurrency(config.concurrency))
    }

    /// Allow up to `concurrency` chunks in flight (minimum 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// Summarize a whole document for the given role
    pub async fn summarize_document(&self, role: Role, text: &str, max_chars: usize) -> Result<CaseSummary> {
        let chunks = chunk_text(text, max_chars)?;
        let total = chunks.len();
        info!(
            "Starting summarization - Text length: {} chars, {} chunks, role: {}",
            text.chars().count(),
            total,
            role
        );

        let prompts = chunks.into_iter().map(|chunk| (chunk.index, role.prompt(&chunk.text)));

        // `buffered` yields results in input order regardless of completion order
        let summaries: Vec<ChunkSummary> = stream::iter(prompts)
            .map(|(index, prompt)| async move { self.summarize_chunk(index, total, &prompt).await })
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        let combined = assemble(&summaries.iter().map(|s| s.text.as_str()).collect::<Vec<_>>());
        info!("Combined chunk summaries - Length: {} chars", combined.len());

        Ok(CaseSummary::new(
            combined,
            summaries,
            role,
            self.model().to_string(),
        ))
    }

    /// Summarize one chunk's prompt, logging progress against its index
    pub async fn summarize_chunk(&self, index: usize, total: usize, prompt: &str) -> Result<ChunkSummary> {
        info!("Summarizing chunk {}/{}", index + 1, total);
        let mut summary = self.summarize(prompt).await?;
        summary.index = index;
        Ok(summary)
    }

    /// Summarize a single prompt with bounded retries.
    ///
    /// Server errors are retried with exponential backoff and end in a
    /// placeholder once attempts run out. Any other service error is returned.
    pub async fn summarize(&self, prompt: &str) -> Result<ChunkSummary> {
        let mut machine = RetryMachine::new(self.policy);
        let max_attempts = self.policy.max_attempts;
        let mut response = None;

        loop {
            match machine.state() {
                RetryState::Attempting { attempt } => {
                    debug!("Attempt {}/{}", attempt + 1, max_attempts);
                    let request = GenerateRequest::new(self.model(), prompt);

                    match self.client.generate(request).await {
                        Ok(r) => {
                            response = Some(r);
                            machine.record(AttemptOutcome::Success);
                        }
                        Err(e) if e.is_retryable() => {
                            warn!("Server error on attempt {}/{}: {}", attempt + 1, max_attempts, e);
                            machine.record(AttemptOutcome::RetryableFailure);
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
                RetryState::Backoff { delay, .. } => {
                    info!("Retrying in {:?}...", delay);
                    tokio::time::sleep(delay).await;
                    machine.resume();
                }
                RetryState::Succeeded { .. } => {
                    // A blank answer is a successful call, not a retryable failure
                    let text = response
                        .take()
                        .and_then(|r| r.text)
                        .map(|t| t.trim().to_string())
                        .filter(|t| !t.is_empty());

                    let (text, outcome) = match text {
                        Some(t) => (t, SummaryOutcome::Generated),
                        None => (NO_SUMMARY_PLACEHOLDER.to_string(), SummaryOutcome::Empty),
                    };
                    return Ok(ChunkSummary {
                        index: 0,
                        text,
                        outcome,
                        attempts: machine.attempts(),
                    });
                }
                RetryState::Exhausted { attempts } => {
                    warn!("Giving up after {} attempts", attempts);
                    return Ok(ChunkSummary {
                        index: 0,
                        text: SERVER_ERROR_PLACEHOLDER.to_string(),
                        outcome: SummaryOutcome::Exhausted,
                        attempts,
                    });
                }
            }
        }
    }
}

/// Join chunk summaries in order with a blank line between them
pub fn assemble<S: AsRef<str>>(summaries: &[S]) -> String {
    summaries
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedClient;
    use crate::types::GenerateResponse;
    use casebrief_common::{CaseBriefError, ServiceError};
    use tokio::time::Instant;

    fn summarizer(client: Arc<ScriptedClient>, max_attempts: u32) -> Summarizer {
        Summarizer::new(
            client,
            RetryPolicy::new(max_attempts, Duration::from_secs(1)).unwrap(),
        )
    }

    #[test]
    fn test_assemble() {
        let empty: [&str; 0] = [];
        assert_eq!(assemble(&empty), "");
        assert_eq!(assemble(&["only"]), "only");
        assert_eq!(assemble(&["a", "b", "c"]), "a\n\nb\n\nc");
        assert_eq!(assemble(&["a", "b"]), assemble(&["a", "b"]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_after_five_server_errors() {
        let client = Arc::new(ScriptedClient::always(|| Err(ServiceError::server(503, "unavailable"))));
        let s = summarizer(client.clone(), 5);

        let started = Instant::now();
        let summary = s.summarize("prompt").await.unwrap();

        assert_eq!(summary.text, SERVER_ERROR_PLACEHOLDER);
        assert_eq!(summary.outcome, SummaryOutcome::Exhausted);
        assert_eq!(summary.attempts, 5);
        assert_eq!(client.calls(), 5);
        // 1 + 2 + 4 + 8
        assert_eq!(started.elapsed(), Duration::from_secs(15));
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_third_attempt() {
        let client = Arc::new(ScriptedClient::new(vec![
            Err(ServiceError::server(500, "internal")),
            Err(ServiceError::server(503, "unavailable")),
            Ok(GenerateResponse::text("Right to life includes...")),
        ]));
        let s = summarizer(client.clone(), 5);

        let started = Instant::now();
        let summary = s.summarize("prompt").await.unwrap();

        assert_eq!(summary.text, "Right to life includes...");
        assert_eq!(summary.outcome, SummaryOutcome::Generated);
        assert_eq!(summary.attempts, 3);
        assert_eq!(client.calls(), 3);
        assert_eq!(started.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_response_is_not_retried() {
        for response in [GenerateResponse::text(""), GenerateResponse::text("  \n "), GenerateResponse::empty()] {
            let client = Arc::new(ScriptedClient::new(vec![Ok(response)]));
            let s = summarizer(client.clone(), 5);

            let started = Instant::now();
            let summary = s.summarize("prompt").await.unwrap();

            assert_eq!(summary.text, NO_SUMMARY_PLACEHOLDER);
            assert_eq!(summary.outcome, SummaryOutcome::Empty);
            assert_eq!(client.calls(), 1);
            assert_eq!(started.elapsed(), Duration::ZERO);
        }
    }

    #[tokio::test]
    async fn test_response_text_is_trimmed() {
        let client = Arc::new(ScriptedClient::new(vec![Ok(GenerateResponse::text("\n  Held: appeal dismissed.  \n"))]));
        let summary = summarizer(client, 5).summarize("prompt").await.unwrap();
        assert_eq!(summary.text, "Held: appeal dismissed.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_server_error_propagates_without_retry() {
        let client = Arc::new(ScriptedClient::new(vec![
            Err(ServiceError::server(503, "unavailable")),
            Err(ServiceError::client(403, "API key not valid")),
        ]));
        let s = summarizer(client.clone(), 5);

        let err = s.summarize("prompt").await.unwrap_err();
        assert!(matches!(err, CaseBriefError::Service(ServiceError::Client { status: 403, .. })));
        assert_eq!(client.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_chunk_does_not_stop_document() {
        let client = Arc::new(ScriptedClient::new(vec![
            Ok(GenerateResponse::text("first")),
            Err(ServiceError::server(503, "a")),
            Err(ServiceError::server(503, "b")),
            Ok(GenerateResponse::text("third")),
        ]));
        let s = summarizer(client.clone(), 2);

        let result = s.summarize_document(Role::Public, "aaaabbbbcc", 4).await.unwrap();

        assert_eq!(result.chunks.len(), 3);
        assert_eq!(result.text, format!("first\n\n{}\n\nthird", SERVER_ERROR_PLACEHOLDER));
        assert_eq!(result.exhausted_chunks(), 1);
        assert_eq!(result.role, "public");
        assert_eq!(
            result.chunks.iter().map(|c| c.index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[tokio::test]
    async fn test_document_prompts_follow_chunk_order() {
        let client = Arc::new(ScriptedClient::echo());
        let s = summarizer(client.clone(), 5);

        s.summarize_document(Role::Student, "0123456789", 3).await.unwrap();

        let prompts = client.prompts();
        assert_eq!(prompts.len(), 4);
        for (prompt, chunk) in prompts.iter().zip(["012", "345", "678", "9"]) {
            assert_eq!(prompt, &Role::Student.prompt(chunk));
        }
    }

    #[tokio::test]
    async fn test_empty_document_makes_no_calls() {
        let client = Arc::new(ScriptedClient::echo());
        let result = summarizer(client.clone(), 5)
            .summarize_document(Role::Lawyer, "", 8000)
            .await
            .unwrap();
        assert_eq!(result.text, "");
        assert!(result.chunks.is_empty());
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_max_chars_fails_before_any_call() {
        let client = Arc::new(ScriptedClient::echo());
        let err = summarizer(client.clone(), 5)
            .summarize_document(Role::Lawyer, "text", 0)
            .await
            .unwrap_err();
        assert!(matches!(err, CaseBriefError::Config(_)));
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_summaries_keep_chunk_order() {
        // chunk 'a' is slowest, chunk 'h' answers immediately
        let client = Arc::new(ScriptedClient::echo().with_latency(|prompt| {
            let last = prompt.bytes().last().unwrap_or(b'h');
            Duration::from_millis(10 * u64::from(b'h'.saturating_sub(last)))
        }));
        let s = summarizer(client.clone(), 5).with_concurrency(4);

        let text: String = ('a'..='h').map(|c| c.to_string().repeat(5)).collect();
        let result = s.summarize_document(Role::Unspecified, &text, 5).await.unwrap();

        let expected: Vec<String> = ('a'..='h')
            .map(|c| Role::Unspecified.prompt(&c.to_string().repeat(5)))
            .collect();
        assert_eq!(result.chunks.iter().map(|c| c.text.clone()).collect::<Vec<_>>(), expected);
        assert_eq!(result.text, expected.join("\n\n"));
    }
}
