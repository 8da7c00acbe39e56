pub mod config;
pub mod error;
pub mod logger;

// Re-export commonly used types
pub use self::config::AppConfig;
pub use error::{CaseBriefError, ServiceError};
pub type Result<T> = std::result::Result<T, CaseBriefError>;
