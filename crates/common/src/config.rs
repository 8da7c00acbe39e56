use crate::error::CaseBriefError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default chunk size bound, in characters
pub const DEFAULT_MAX_CHARS: usize = 8000;

/// Default number of attempts per chunk
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Default Gemini model
pub const DEFAULT_LLM_MODEL: &str = "gemini-2.5-flash";

/// casebrief application configuration
///
/// Passed explicitly into the pipeline entry point; nothing below the binary
/// reads the environment on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Gemini API key
    pub google_api_key: String,

    /// Indian Kanoon API token
    pub kanoon_api_key: String,

    /// Gemini API base URL
    pub gemini_endpoint: String,

    /// Summarization model name
    pub llm_model: String,

    /// Indian Kanoon API base URL
    pub kanoon_base_url: String,

    /// Summary style (public / student / lawyer, anything else = concise)
    pub role: String,

    /// Maximum characters per chunk
    pub max_chars: usize,

    /// Attempts per chunk before giving up
    pub max_retries: u32,

    /// Backoff unit in milliseconds (wait = unit * 2^attempt)
    pub backoff_base_ms: u64,

    /// Chunks summarized at the same time (1 = sequential)
    pub concurrency: usize,

    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,

    /// Log directory
    pub log_dir: PathBuf,

    /// Log level
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            google_api_key: String::new(),
            kanoon_api_key: String::new(),
            gemini_endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            kanoon_base_url: "https://api.indiankanoon.org".to_string(),
            role: String::new(),
            max_chars: DEFAULT_MAX_CHARS,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base_ms: 1000,
            concurrency: 1,
            request_timeout_secs: 120,
            log_dir: PathBuf::from("./logs"),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then an optional TOML file, then
    /// `CASEBRIEF_*` variables, then `GOOGLE_API_KEY` / `KANOON_API_KEY`.
    pub fn load(path: Option<&Path>) -> Result<Self, CaseBriefError> {
        // Load .env file (ignore if not exists)
        let _ = dotenv::dotenv();

        let mut builder = config::Config::builder();
        if let Some(path) = path {
            if !path.exists() {
                return Err(CaseBriefError::config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(config::File::from(path));
        }
        builder = builder.add_source(config::Environment::with_prefix("CASEBRIEF").try_parsing(true));

        let mut config: AppConfig = builder.build()?.try_deserialize()?;

        if let Ok(key) = std::env::var("GOOGLE_API_KEY") {
            config.google_api_key = key;
        }
        if let Ok(key) = std::env::var("KANOON_API_KEY") {
            config.kanoon_api_key = key;
        }

        // Ensure required directories exist
        config.ensure_directories()?;

        Ok(config)
    }

    /// Ensure required directories exist, create if not
    pub fn ensure_directories(&self) -> Result<(), CaseBriefError> {
        if !self.log_dir.exists() {
            std::fs::create_dir_all(&self.log_dir).map_err(|e| {
                CaseBriefError::config(format!(
                    "Failed to create directory {}: {}",
                    self.log_dir.display(),
                    e
                ))
            })?;
        }

        Ok(())
    }

    /// Get log file path
    pub fn get_log_path(&self, filename: &str) -> PathBuf {
        self.log_dir.join(filename)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), CaseBriefError> {
        if self.max_chars == 0 {
            return Err(CaseBriefError::config("max_chars must be greater than 0"));
        }

        if self.max_retries == 0 {
            return Err(CaseBriefError::config("max_retries must be at least 1"));
        }

        if self.concurrency == 0 {
            return Err(CaseBriefError::config("concurrency must be at least 1"));
        }

        crate::logger::parse_log_level(&self.log_level)?;

        if self.llm_model.trim().is_empty() {
            return Err(CaseBriefError::config("LLM model name cannot be empty"));
        }

        for (name, url) in [
            ("Gemini endpoint", &self.gemini_endpoint),
            ("Kanoon base URL", &self.kanoon_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(CaseBriefError::config(format!(
                    "{} must start with http:// or https://",
                    name
                )));
            }
        }

        Ok(())
    }
}
