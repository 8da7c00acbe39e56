use async_trait::async_trait;
use casebrief_common::ServiceError;

use crate::types::{GenerateRequest, GenerateResponse};

/// Common trait for summarization service clients
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate text from a prompt (one service call, no retries)
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, ServiceError>;

    /// Model identifier sent with each request
    fn model(&self) -> &str;
}
