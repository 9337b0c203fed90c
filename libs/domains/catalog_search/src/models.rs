use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Dense embedding produced by the provider. Always exactly the configured
/// dimensionality once it has passed through the service.
pub type EmbeddingVector = Vec<f32>;

/// Default number of hits requested by a search
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;

/// Default minimum cosine similarity for a hit
pub const DEFAULT_SCORE_THRESHOLD: f32 = 0.5;

/// Default HNSW exploration factor used at query time
pub const DEFAULT_HNSW_EF: u64 = 128;

/// A catalog item as handed over by the caller for indexing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedItem {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl IndexedItem {
    pub fn new(
        id: Uuid,
        name: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            category: category.into(),
            tags: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Text that gets embedded for this item.
    ///
    /// Field order and separators are fixed: changing them changes every
    /// stored vector, so a re-index of the whole catalog would be required.
    pub fn embedding_text(&self) -> String {
        format!(
            "{}. {}. Category: {}. Tags: {}",
            self.name,
            self.description,
            self.category,
            self.tags.join(", ")
        )
    }
}

/// Structured attributes stored next to each vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPayload {
    pub tool_id: Uuid,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl From<&IndexedItem> for ItemPayload {
    fn from(item: &IndexedItem) -> Self {
        Self {
            tool_id: item.id,
            name: item.name.clone(),
            category: item.category.clone(),
            tags: item.tags.clone(),
        }
    }
}

/// Unit of storage in the vector store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    pub id: Uuid,
    pub vector: EmbeddingVector,
    pub payload: ItemPayload,
}

impl EmbeddingRecord {
    pub fn new(item: &IndexedItem, vector: EmbeddingVector) -> Self {
        Self {
            id: item.id,
            vector,
            payload: ItemPayload::from(item),
        }
    }
}

/// Attribute filter applied by the store before scoring.
///
/// Only exact category matching is supported. Tags are stored in the payload
/// but cannot be filtered on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilter {
    pub category: Option<String>,
}

impl SearchFilter {
    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none()
    }

    pub fn matches(&self, payload: &ItemPayload) -> bool {
        match &self.category {
            Some(category) => payload.category == *category,
            None => true,
        }
    }
}

/// ANN search tuning passed through to the store
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    pub hnsw_ef: u64,
    pub exact: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            hnsw_ef: DEFAULT_HNSW_EF,
            exact: false,
        }
    }
}

/// Store-level nearest-neighbor query
#[derive(Debug, Clone, PartialEq)]
pub struct VectorQuery {
    pub vector: EmbeddingVector,
    pub filter: SearchFilter,
    pub limit: u32,
    /// Inclusive lower bound on the similarity score
    pub score_threshold: f32,
    pub params: SearchParams,
}

/// Store-level search result, in the order the store returned it
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRecord {
    pub id: Uuid,
    pub score: f32,
    pub payload: Option<ItemPayload>,
}

/// Caller-facing semantic search request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub text: String,
    pub limit: u32,
    pub category: Option<String>,
    pub score_threshold: f32,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            limit: DEFAULT_SEARCH_LIMIT,
            category: None,
            score_threshold: DEFAULT_SCORE_THRESHOLD,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the minimum similarity, clamped to `[0, 1]`
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.score_threshold = threshold.clamp(0.0, 1.0);
        self
    }
}

/// A single semantic search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub tool_id: Uuid,
    pub score: f32,
    pub name: String,
    pub category: String,
}

impl SearchHit {
    /// Build a hit from a scored record. Records stored without a payload
    /// carry nothing the caller can display and yield `None`.
    pub fn from_record(record: ScoredRecord) -> Option<Self> {
        let payload = record.payload?;
        Some(Self {
            tool_id: payload.tool_id,
            score: record.score,
            name: payload.name,
            category: payload.category,
        })
    }
}

/// Connection state of the embedding index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Disconnected,
    Connected,
    Degraded,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connected => "connected",
            ConnectionState::Degraded => "degraded",
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
