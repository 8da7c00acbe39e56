//! Scripted `LlmClient` for tests

use async_trait::async_trait;
use casebrief_common::ServiceError;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::llm_trait::LlmClient;
use crate::types::{GenerateRequest, GenerateResponse};

type Reply = Result<GenerateResponse, ServiceError>;

enum Mode {
    /// Replies in order; fails once the script runs out
    Script(Mutex<VecDeque<Reply>>),
    /// Same reply every time
    Always(Box<dyn Fn() -> Reply + Send + Sync>),
    /// Replies with the prompt itself
    Echo,
}

pub struct ScriptedClient {
    mode: Mode,
    latency: Option<Box<dyn Fn(&str) -> Duration + Send + Sync>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self::with_mode(Mode::Script(Mutex::new(replies.into())))
    }

    pub fn always(reply: impl Fn() -> Reply + Send + Sync + 'static) -> Self {
        Self::with_mode(Mode::Always(Box::new(reply)))
    }

    pub fn echo() -> Self {
        Self::with_mode(Mode::Echo)
    }

    fn with_mode(mode: Mode) -> Self {
        Self {
            mode,
            latency: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Delay each reply by an amount derived from the prompt
    pub fn with_latency(mut self, latency: impl Fn(&str) -> Duration + Send + Sync + 'static) -> Self {
        self.latency = Some(Box::new(latency));
        self
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, ServiceError> {
        self.prompts.lock().unwrap().push(request.prompt.clone());

        if let Some(latency) = &self.latency {
            tokio::time::sleep(latency(&request.prompt)).await;
        }

        match &self.mode {
            Mode::Script(replies) => replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ServiceError::InvalidResponse("script exhausted".into()))),
            Mode::Always(reply) => reply(),
            Mode::Echo => Ok(GenerateResponse::text(request.prompt)),
        }
    }

    fn model(&self) -> &str {
        "scripted"
    }
}
