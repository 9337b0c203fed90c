use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::config::{IndexSettings, SemanticSearchConfig};
use crate::embedding::{EmbeddingProvider, OpenAIProvider};
use crate::error::{SemanticSearchError, SemanticSearchResult};
use crate::models::{
    ConnectionState, EmbeddingRecord, EmbeddingVector, IndexedItem, SearchFilter, SearchHit,
    SearchParams, SearchQuery, VectorQuery,
};
use crate::qdrant::{QdrantConfig, QdrantRepository};
use crate::repository::VectorRepository;

/// The store handle only exists while connected
enum Connection {
    Disconnected,
    Connected(Arc<dyn VectorRepository>),
    Degraded { reason: String },
}

/// Embedding index for catalog items with fail-open semantics.
///
/// Every operation absorbs provider and store failures: callers get `None`,
/// an empty result or `false`, never an error. Without a reachable store the
/// service runs in degraded mode for the rest of the process lifetime.
///
/// `connect` and `close` need `&mut self` and are driven by the host during
/// startup and shutdown. In between the service is shared behind an `Arc`.
pub struct EmbeddingIndexService {
    settings: IndexSettings,
    qdrant: Option<QdrantConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    connection: Connection,
}

impl EmbeddingIndexService {
    pub fn new(settings: IndexSettings) -> Self {
        Self {
            settings,
            qdrant: None,
            embedding_provider: None,
            connection: Connection::Disconnected,
        }
    }

    /// Build the service with the Qdrant store and OpenAI provider described
    /// by `config`. Absent parts stay absent; nothing is contacted yet.
    pub fn from_config(config: SemanticSearchConfig) -> SemanticSearchResult<Self> {
        let mut service = Self::new(config.index);

        if let Some(qdrant) = config.qdrant {
            service = service.with_qdrant(qdrant);
        }

        match config.openai {
            Some(openai) => {
                info!(model = %openai.model, "OpenAI embedding provider configured");
                service = service.with_embedding_provider(Arc::new(OpenAIProvider::new(openai)?));
            }
            None => warn!("OPENAI_API_KEY not set, embeddings are disabled"),
        }

        Ok(service)
    }

    pub fn with_qdrant(mut self, config: QdrantConfig) -> Self {
        self.qdrant = Some(config);
        self
    }

    pub fn with_embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    pub fn settings(&self) -> &IndexSettings {
        &self.settings
    }

    pub fn state(&self) -> ConnectionState {
        match self.connection {
            Connection::Disconnected => ConnectionState::Disconnected,
            Connection::Connected(_) => ConnectionState::Connected,
            Connection::Degraded { .. } => ConnectionState::Degraded,
        }
    }

    /// Why the service entered degraded mode
    pub fn degraded_reason(&self) -> Option<&str> {
        match &self.connection {
            Connection::Degraded { reason } => Some(reason),
            _ => None,
        }
    }

    pub fn embedding_model(&self) -> Option<String> {
        self.embedding_provider.as_ref().map(|p| p.model_name())
    }

    // ===== Lifecycle =====

    /// Connect to the configured Qdrant endpoint and make sure the collection
    /// exists. Never fails: any problem switches the service to degraded mode.
    ///
    /// Only acts on a disconnected service.
    #[instrument(skip(self), fields(collection = %self.settings.collection))]
    pub async fn connect(&mut self) {
        if !matches!(self.connection, Connection::Disconnected) {
            debug!(state = %self.state(), "connect skipped");
            return;
        }

        let Some(config) = self.qdrant.clone() else {
            self.degrade("QDRANT_URL not configured".to_string());
            return;
        };

        match QdrantRepository::new(&config) {
            Ok(repository) => {
                info!(url = %config.url, "Connecting to Qdrant");
                self.connect_with_repository(Arc::new(repository)).await;
            }
            Err(e) => self.degrade(e.to_string()),
        }
    }

    /// `connect` bounded by a wall-clock timeout. Running out of time counts
    /// as a connection failure.
    pub async fn connect_with_timeout(&mut self, timeout: Duration) {
        if tokio::time::timeout(timeout, self.connect()).await.is_err() {
            self.degrade(format!("connect timed out after {}ms", timeout.as_millis()));
        }
    }

    /// Connect using an already built store, e.g. the in-memory one
    pub async fn connect_with_repository(&mut self, repository: Arc<dyn VectorRepository>) {
        if !matches!(self.connection, Connection::Disconnected) {
            debug!(state = %self.state(), "connect skipped");
            return;
        }

        match Self::ensure_collection(repository.as_ref(), &self.settings).await {
            Ok(()) => {
                info!(
                    collection = %self.settings.collection,
                    dimension = self.settings.dimension,
                    "Semantic search connected"
                );
                self.connection = Connection::Connected(repository);
            }
            Err(e) => self.degrade(format!("collection setup failed: {}", e)),
        }
    }

    /// Create the configured collection (cosine, dimension `D`) unless it
    /// already exists
    pub async fn ensure_collection(
        repository: &dyn VectorRepository,
        settings: &IndexSettings,
    ) -> SemanticSearchResult<()> {
        let collections = repository.list_collections().await?;
        if collections.iter().any(|name| *name == settings.collection) {
            debug!(collection = %settings.collection, "Collection already exists");
            return Ok(());
        }

        repository
            .create_collection(&settings.collection, settings.dimension as u64)
            .await?;
        info!(
            collection = %settings.collection,
            dimension = settings.dimension,
            "Created collection"
        );
        Ok(())
    }

    /// Release the store client and return to `Disconnected`. Best effort.
    pub async fn close(&mut self) {
        let connection = std::mem::replace(&mut self.connection, Connection::Disconnected);

        if let Connection::Connected(repository) = connection {
            match repository.close().await {
                Ok(()) => info!("Semantic search connection closed"),
                Err(e) => warn!(error = %e, "Failed to close vector store client"),
            }
        }
    }

    fn degrade(&mut self, reason: String) {
        warn!(reason = %reason, "Semantic search running in degraded mode");
        self.connection = Connection::Degraded { reason };
    }

    fn repository(&self) -> Option<&Arc<dyn VectorRepository>> {
        match &self.connection {
            Connection::Connected(repository) => Some(repository),
            _ => None,
        }
    }

    // ===== Operations =====

    /// Single entry point for turning text into a vector. Any failure,
    /// including a vector of the wrong length, yields `None`.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn generate_embedding(&self, text: &str) -> Option<EmbeddingVector> {
        let Some(provider) = &self.embedding_provider else {
            warn!("No embedding provider configured");
            return None;
        };

        match provider.embed(text).await {
            Ok(vector) if vector.len() == self.settings.dimension => Some(vector),
            Ok(vector) => {
                let err = SemanticSearchError::DimensionMismatch {
                    expected: self.settings.dimension,
                    actual: vector.len(),
                };
                error!(error = %err, "Embedding rejected");
                None
            }
            Err(e) => {
                error!(error = %e, "Embedding generation failed");
                None
            }
        }
    }

    /// Embed the item and upsert it under its id. Returns the id on success.
    #[instrument(skip(self, item), fields(tool_id = %item.id))]
    pub async fn index(&self, item: &IndexedItem) -> Option<Uuid> {
        let vector = self.generate_embedding(&item.embedding_text()).await?;

        let Some(repository) = self.repository() else {
            debug!(state = %self.state(), "Not connected, item not indexed");
            return None;
        };

        let record = EmbeddingRecord::new(item, vector);
        match repository.upsert(&self.settings.collection, record).await {
            Ok(_) => {
                debug!("Item indexed");
                Some(item.id)
            }
            Err(e) => {
                error!(error = %e, "Failed to upsert embedding");
                None
            }
        }
    }

    /// Re-index an item. Upsert overwrites the previous record entirely.
    pub async fn update(&self, item: &IndexedItem) -> Option<Uuid> {
        self.index(item).await
    }

    /// Semantic search over indexed items, best match first
    #[instrument(skip(self, query), fields(limit = query.limit, category = ?query.category))]
    pub async fn search(&self, query: &SearchQuery) -> Vec<SearchHit> {
        let Some(repository) = self.repository() else {
            debug!(state = %self.state(), "Not connected, returning no results");
            return Vec::new();
        };

        if query.limit == 0 {
            return Vec::new();
        }

        let Some(vector) = self.generate_embedding(&query.text).await else {
            return Vec::new();
        };

        let vector_query = VectorQuery {
            vector,
            filter: SearchFilter {
                category: query.category.clone(),
            },
            limit: query.limit,
            score_threshold: query.score_threshold,
            params: SearchParams {
                hnsw_ef: self.settings.hnsw_ef,
                exact: false,
            },
        };

        match repository
            .search(&self.settings.collection, vector_query)
            .await
        {
            Ok(records) => {
                let total = records.len();
                let hits: Vec<SearchHit> = records
                    .into_iter()
                    .filter_map(SearchHit::from_record)
                    .collect();
                if hits.len() < total {
                    debug!(skipped = total - hits.len(), "Skipped records without payload");
                }
                debug!(hits = hits.len(), "Search completed");
                hits
            }
            Err(e) => {
                error!(error = %e, "Vector search failed");
                Vec::new()
            }
        }
    }

    /// Remove an item's embedding. Deleting an id that was never indexed
    /// still succeeds.
    #[instrument(skip(self), fields(tool_id = %id))]
    pub async fn delete(&self, id: Uuid) -> bool {
        let Some(repository) = self.repository() else {
            debug!(state = %self.state(), "Not connected, nothing deleted");
            return false;
        };

        match repository.delete(&self.settings.collection, vec![id]).await {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "Failed to delete embedding");
                false
            }
        }
    }
}
