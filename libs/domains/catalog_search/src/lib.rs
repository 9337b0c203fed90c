//! Catalog Semantic Search
//!
//! Embedding index for catalog items: every item is turned into a dense vector
//! by an embedding provider and stored in Qdrant, so the catalog can be
//! searched by meaning instead of keywords.
//!
//! The service fails open. Without a reachable Qdrant it runs in degraded
//! mode and every operation returns `None`, an empty list or `false`, so the
//! rest of the catalog keeps working.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────┐
//! │ EmbeddingIndexService │  ← connection state, fail-open operations
//! └───────────┬───────────┘
//!             │
//! ┌───────────▼──────────┐     ┌───────────────────┐
//! │   VectorRepository   │     │ EmbeddingProvider │
//! │       (trait)        │     │      (trait)      │
//! └───────────┬──────────┘     └─────────┬─────────┘
//!             │                          │
//! ┌───────────▼──────────┐     ┌─────────▼─────────┐
//! │   QdrantRepository   │     │   OpenAIProvider  │
//! │  InMemoryRepository  │     └───────────────────┘
//! └──────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use core_config::FromEnv;
//! use domain_catalog_search::{
//!     EmbeddingIndexService, IndexedItem, SearchQuery, SemanticSearchConfig,
//! };
//! use uuid::Uuid;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SemanticSearchConfig::from_env()?;
//! let timeout = config.index.connect_timeout;
//!
//! let mut service = EmbeddingIndexService::from_config(config)?;
//! service.connect_with_timeout(timeout).await;
//! let service = Arc::new(service);
//!
//! let item = IndexedItem::new(Uuid::new_v4(), "Whisper", "Speech recognition", "audio")
//!     .with_tags(["transcription"]);
//! service.index(&item).await;
//!
//! let hits = service
//!     .search(&SearchQuery::new("turn a podcast into text").with_limit(5))
//!     .await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod embedding;
pub mod error;
pub mod memory;
pub mod models;
pub mod qdrant;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use config::{IndexSettings, SemanticSearchConfig};
pub use embedding::{EmbeddingProvider, OpenAIConfig, OpenAIProvider};
pub use error::{SemanticSearchError, SemanticSearchResult};
pub use memory::InMemoryRepository;
pub use models::{
    ConnectionState, EmbeddingRecord, EmbeddingVector, IndexedItem, ItemPayload, ScoredRecord,
    SearchFilter, SearchHit, SearchParams, SearchQuery, VectorQuery,
};
pub use qdrant::{QdrantConfig, QdrantRepository};
pub use repository::VectorRepository;
pub use service::EmbeddingIndexService;
