use async_trait::async_trait;
use uuid::Uuid;

use crate::error::SemanticSearchResult;
use crate::models::{EmbeddingRecord, ScoredRecord, VectorQuery};

/// Vector store contract
///
/// Every collection uses cosine distance. Implementations must return search
/// results in descending score order and treat `upsert`/`delete` as
/// idempotent by id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VectorRepository: Send + Sync {
    /// Names of all existing collections
    async fn list_collections(&self) -> SemanticSearchResult<Vec<String>>;

    /// Create a cosine-distance collection with the given dimensionality
    async fn create_collection(&self, name: &str, dimension: u64) -> SemanticSearchResult<()>;

    /// Insert or overwrite the record with the same id
    async fn upsert(&self, collection: &str, record: EmbeddingRecord) -> SemanticSearchResult<Uuid>;

    /// Remove records by id. Unknown ids are not an error.
    async fn delete(&self, collection: &str, ids: Vec<Uuid>) -> SemanticSearchResult<()>;

    /// Approximate nearest-neighbor search
    async fn search(
        &self,
        collection: &str,
        query: VectorQuery,
    ) -> SemanticSearchResult<Vec<ScoredRecord>>;

    /// Release client resources. Called once at shutdown.
    async fn close(&self) -> SemanticSearchResult<()> {
        Ok(())
    }
}
