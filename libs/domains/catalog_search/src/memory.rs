use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{SemanticSearchError, SemanticSearchResult};
use crate::models::{EmbeddingRecord, ScoredRecord, VectorQuery};
use crate::repository::VectorRepository;

struct Collection {
    dimension: usize,
    records: HashMap<Uuid, EmbeddingRecord>,
}

/// Exact-search vector store kept in process memory.
///
/// Scores with brute-force cosine similarity, so `SearchParams` are ignored.
/// Used by tests and by hosts that want semantic search without a Qdrant.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    collections: Arc<RwLock<HashMap<String, Collection>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records stored in a collection, `None` if it does not exist
    pub async fn record_count(&self, collection: &str) -> Option<usize> {
        let collections = self.collections.read().await;
        collections.get(collection).map(|c| c.records.len())
    }

    pub async fn get(&self, collection: &str, id: Uuid) -> Option<EmbeddingRecord> {
        let collections = self.collections.read().await;
        collections
            .get(collection)
            .and_then(|c| c.records.get(&id).cloned())
    }
}

fn collection_not_found(name: &str) -> SemanticSearchError {
    SemanticSearchError::Store(format!("Collection '{}' not found", name))
}

/// Cosine similarity of two vectors. Zero-norm inputs score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorRepository for InMemoryRepository {
    async fn list_collections(&self) -> SemanticSearchResult<Vec<String>> {
        let collections = self.collections.read().await;
        Ok(collections.keys().cloned().collect())
    }

    async fn create_collection(&self, name: &str, dimension: u64) -> SemanticSearchResult<()> {
        let mut collections = self.collections.write().await;
        if collections.contains_key(name) {
            return Err(SemanticSearchError::Store(format!(
                "Collection '{}' already exists",
                name
            )));
        }

        collections.insert(
            name.to_string(),
            Collection {
                dimension: dimension as usize,
                records: HashMap::new(),
            },
        );
        Ok(())
    }

    async fn upsert(&self, collection: &str, record: EmbeddingRecord) -> SemanticSearchResult<Uuid> {
        let mut collections = self.collections.write().await;
        let coll = collections
            .get_mut(collection)
            .ok_or_else(|| collection_not_found(collection))?;

        if record.vector.len() != coll.dimension {
            return Err(SemanticSearchError::DimensionMismatch {
                expected: coll.dimension,
                actual: record.vector.len(),
            });
        }

        let id = record.id;
        coll.records.insert(id, record);
        Ok(id)
    }

    async fn delete(&self, collection: &str, ids: Vec<Uuid>) -> SemanticSearchResult<()> {
        let mut collections = self.collections.write().await;
        let coll = collections
            .get_mut(collection)
            .ok_or_else(|| collection_not_found(collection))?;

        for id in ids {
            coll.records.remove(&id);
        }
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        query: VectorQuery,
    ) -> SemanticSearchResult<Vec<ScoredRecord>> {
        let collections = self.collections.read().await;
        let coll = collections
            .get(collection)
            .ok_or_else(|| collection_not_found(collection))?;

        if query.vector.len() != coll.dimension {
            return Err(SemanticSearchError::DimensionMismatch {
                expected: coll.dimension,
                actual: query.vector.len(),
            });
        }

        let mut hits: Vec<ScoredRecord> = coll
            .records
            .values()
            .filter(|record| query.filter.matches(&record.payload))
            .map(|record| ScoredRecord {
                id: record.id,
                score: cosine_similarity(&query.vector, &record.vector),
                payload: Some(record.payload.clone()),
            })
            .filter(|hit| hit.score >= query.score_threshold)
            .collect();

        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(query.limit as usize);

        Ok(hits)
    }
}
