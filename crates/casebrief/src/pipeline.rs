use casebrief_common::{AppConfig, Result};
use casebrief_llm::{CaseSummary, LlmClient, Role, Summarizer};
use casebrief_source::DocumentSource;
use std::sync::Arc;
use tracing::{info, warn};

/// Load one document and summarize it for the configured role.
///
/// Everything the run needs comes in through the arguments, so tests can
/// swap in fake sources and clients.
pub async fn run(
    config: &AppConfig,
    source: &dyn DocumentSource,
    client: Arc<dyn LlmClient>,
) -> Result<CaseSummary> {
    config.validate()?;
    let summarizer = Summarizer::from_config(client, config)?;

    let document = source.load().await?;
    info!(
        "Loaded document {} ({}): {} chars",
        document.id,
        document.title,
        document.text.chars().count()
    );
    if document.text.trim().is_empty() {
        warn!("Document {} has no text to summarize", document.id);
    }

    let role = Role::parse(&config.role);
    let summary = summarizer
        .summarize_document(role, &document.text, config.max_chars)
        .await?;

    let exhausted = summary.exhausted_chunks();
    if exhausted > 0 {
        warn!(
            "{} of {} chunks fell back to the server error placeholder",
            exhausted,
            summary.chunks.len()
        );
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use casebrief_common::{CaseBriefError, ServiceError};
    use casebrief_llm::{GenerateRequest, GenerateResponse, LAWYER_PROMPT};
    use casebrief_source::Document;
    use std::sync::Mutex;

    struct StaticSource(String);

    #[async_trait]
    impl DocumentSource for StaticSource {
        async fn load(&self) -> Result<Document> {
            Ok(Document::new("test", "Test v. State", self.0.clone()))
        }
    }

    /// Answers "summary N" and remembers every prompt
    #[derive(Default)]
    struct CountingClient {
        prompts: Mutex<Vec<String>>,
        fail_with: Option<ServiceError>,
    }

    #[async_trait]
    impl LlmClient for CountingClient {
        async fn generate(&self, request: GenerateRequest) -> std::result::Result<GenerateResponse, ServiceError> {
            if let Some(e) = &self.fail_with {
                return Err(e.clone());
            }
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(request.prompt);
            Ok(GenerateResponse::text(format!("summary {}", prompts.len())))
        }

        fn model(&self) -> &str {
            "counting"
        }
    }

    fn lawyer_config() -> AppConfig {
        AppConfig {
            role: " Lawyer ".to_string(),
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn test_seventeen_thousand_chars_as_lawyer() {
        let text: String = (0..17_000).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        let client = Arc::new(CountingClient::default());

        let summary = run(&lawyer_config(), &StaticSource(text.clone()), client.clone())
            .await
            .unwrap();

        let prompts = client.prompts.lock().unwrap().clone();
        assert_eq!(prompts.len(), 3);

        let chunks = [&text[..8000], &text[8000..16000], &text[16000..]];
        assert_eq!(chunks.map(str::len), [8000, 8000, 1000]);
        for (prompt, chunk) in prompts.iter().zip(chunks) {
            assert!(prompt.starts_with(LAWYER_PROMPT));
            for section in ["Facts", "Issues", "Arguments", "Court Reasoning", "Judgment", "Key Takeaways"] {
                assert!(prompt.contains(section));
            }
            assert!(prompt.ends_with(chunk));
        }

        assert_eq!(summary.text, "summary 1\n\nsummary 2\n\nsummary 3");
        assert_eq!(summary.role, "lawyer");
        assert_eq!(summary.model, "counting");
    }

    #[tokio::test]
    async fn test_non_transient_error_aborts_run() {
        let client = Arc::new(CountingClient {
            fail_with: Some(ServiceError::client(400, "invalid argument")),
            ..CountingClient::default()
        });

        let err = run(&lawyer_config(), &StaticSource("some text".into()), client)
            .await
            .unwrap_err();
        assert!(matches!(err, CaseBriefError::Service(ServiceError::Client { .. })));
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected_before_loading() {
        let config = AppConfig {
            max_chars: 0,
            ..AppConfig::default()
        };
        let client = Arc::new(CountingClient::default());

        let err = run(&config, &StaticSource("text".into()), client.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, CaseBriefError::Config(_)));
        assert!(client.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_document_gives_empty_summary() {
        let client = Arc::new(CountingClient::default());
        let summary = run(&AppConfig::default(), &StaticSource(String::new()), client)
            .await
            .unwrap();
        assert_eq!(summary.text, "");
        assert_eq!(summary.role, "unspecified");
    }
}
