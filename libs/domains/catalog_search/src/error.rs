use core_config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SemanticSearchError {
    #[error("Vector store error: {0}")]
    Store(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type SemanticSearchResult<T> = Result<T, SemanticSearchError>;

impl From<qdrant_client::QdrantError> for SemanticSearchError {
    fn from(err: qdrant_client::QdrantError) -> Self {
        SemanticSearchError::Store(err.to_string())
    }
}

impl From<reqwest::Error> for SemanticSearchError {
    fn from(err: reqwest::Error) -> Self {
        SemanticSearchError::Embedding(err.to_string())
    }
}

impl From<serde_json::Error> for SemanticSearchError {
    fn from(err: serde_json::Error) -> Self {
        SemanticSearchError::Internal(format!("JSON error: {}", err))
    }
}

impl From<ConfigError> for SemanticSearchError {
    fn from(err: ConfigError) -> Self {
        SemanticSearchError::Config(err.to_string())
    }
}
