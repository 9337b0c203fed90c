use async_trait::async_trait;

use crate::error::SemanticSearchResult;
use crate::models::EmbeddingVector;

/// Trait for embedding generation providers
///
/// Implementations turn one text into one dense vector. Length validation
/// against the index dimensionality is left to the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Model identifier, used for logging
    fn model_name(&self) -> String;

    /// Generate the embedding for a single text
    async fn embed(&self, text: &str) -> SemanticSearchResult<EmbeddingVector>;
}
