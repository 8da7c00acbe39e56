use async_trait::async_trait;
use casebrief_common::{AppConfig, CaseBriefError, Result, ServiceError};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::llm_trait::LlmClient;
use crate::types::{GenerateRequest, GenerateResponse};

/// Gemini `generateContent` API client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    endpoint: String,
    api_key: String,
    model: String,
    client: Client,
}

impl GeminiClient {
    /// Create new Gemini client
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(CaseBriefError::config(
                "Gemini API key is missing. Set GOOGLE_API_KEY or google_api_key in config.",
            ));
        }

        let endpoint = endpoint.into().trim().trim_end_matches('/').to_string();
        let model = model.into().trim().to_string();

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        info!("Gemini client initialized: {} ({})", endpoint, model);
        Ok(Self {
            endpoint,
            api_key,
            model,
            client,
        })
    }

    /// Create client from application config
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            &config.gemini_endpoint,
            &config.google_api_key,
            &config.llm_model,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    fn request_url(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, model)
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate(&self, request: GenerateRequest) -> std::result::Result<GenerateResponse, ServiceError> {
        debug!(
            "Sending generate request to Gemini - Model: {}, Prompt length: {}",
            request.model,
            request.prompt.len()
        );

        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: request.prompt,
                }],
            }],
        };

        let response = self
            .client
            .post(self.request_url(&request.model))
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(classify_status(status, message));
        }

        let payload: GeminiResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::InvalidResponse(e.without_url().to_string()))?;

        let text = payload.text();
        debug!(
            "Received response from Gemini - Length: {}",
            text.as_deref().map_or(0, str::len)
        );

        Ok(GenerateResponse { text })
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Map a non-success HTTP status to the service error taxonomy
pub fn classify_status(status: StatusCode, message: String) -> ServiceError {
    if status.is_server_error() {
        ServiceError::server(status.as_u16(), message)
    } else {
        ServiceError::client(status.as_u16(), message)
    }
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContentResponse>,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Debug, Deserialize)]
struct GeminiPartResponse {
    text: Option<String>,
}

impl GeminiResponse {
    /// Text parts of the first candidate, concatenated
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let parts: Vec<&str> = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.concat())
        }
    }
}
