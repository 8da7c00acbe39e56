/// Failure reported by the summarization service client.
///
/// Which failures are worth retrying is a policy of this crate, not of the
/// HTTP library underneath: only server-side errors are considered transient.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// Server-side failure (5xx, service unavailable)
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Request rejected by the service (bad request, auth, quota)
    #[error("client error ({status}): {message}")]
    Client { status: u16, message: String },

    /// Request never reached the service or the connection dropped
    #[error("transport error: {0}")]
    Transport(String),

    /// Service answered with a body we could not decode
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ServiceError {
    /// Create server error
    pub fn server<S: Into<String>>(status: u16, msg: S) -> Self {
        Self::Server {
            status,
            message: msg.into(),
        }
    }

    /// Create client error
    pub fn client<S: Into<String>>(status: u16, msg: S) -> Self {
        Self::Client {
            status,
            message: msg.into(),
        }
    }

    /// Whether another attempt may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Server { .. })
    }
}

/// casebrief error types
#[derive(Debug, thiserror::Error)]
pub enum CaseBriefError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Document source error (search / fetch)
    #[error("Document source error: {0}")]
    Source(String),

    /// Text extraction error (HTML / PDF)
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Summarization service error that was not recovered locally
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General error (anyhow integration)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CaseBriefError {
    /// Create config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create document source error
    pub fn source<S: Into<String>>(msg: S) -> Self {
        Self::Source(msg.into())
    }

    /// Create extraction error
    pub fn extraction<S: Into<String>>(msg: S) -> Self {
        Self::Extraction(msg.into())
    }

    /// Create not found error
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Whether this wraps a transient service failure
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Service(e) => e.is_retryable(),
            _ => false,
        }
    }
}

impl From<config::ConfigError> for CaseBriefError {
    fn from(error: config::ConfigError) -> Self {
        Self::Config(error.to_string())
    }
}
