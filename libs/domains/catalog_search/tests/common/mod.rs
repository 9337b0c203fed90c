//! Shared fixtures for the catalog search integration tests

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use domain_catalog_search::{
    EmbeddingIndexService, EmbeddingProvider, EmbeddingVector, IndexSettings, IndexedItem,
    SemanticSearchResult,
};
use test_utils::TestDataBuilder;

const VOCABULARY: [&str; 12] = [
    "image",
    "video",
    "audio",
    "speech",
    "text",
    "code",
    "generation",
    "editing",
    "music",
    "transcription",
    "writing",
    "chat",
];

/// Deterministic bag-of-words embedder: one dimension per vocabulary word
pub struct KeywordEmbedder;

impl KeywordEmbedder {
    pub const DIMENSION: usize = VOCABULARY.len();

    pub fn vector(text: &str) -> EmbeddingVector {
        let mut vector = vec![0.0; Self::DIMENSION];
        for token in text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            if let Some(i) = VOCABULARY.iter().position(|word| *word == token) {
                vector[i] += 1.0;
            }
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    fn model_name(&self) -> String {
        "keyword-test".to_string()
    }

    async fn embed(&self, text: &str) -> SemanticSearchResult<EmbeddingVector> {
        Ok(Self::vector(text))
    }
}

pub fn settings(collection: &str) -> IndexSettings {
    IndexSettings::default()
        .with_collection(collection)
        .with_dimension(KeywordEmbedder::DIMENSION)
}

/// Service with the keyword embedder that has not been connected yet
pub fn service(collection: &str) -> EmbeddingIndexService {
    EmbeddingIndexService::new(settings(collection))
        .with_embedding_provider(Arc::new(KeywordEmbedder))
}

pub struct Catalog {
    pub whisper: IndexedItem,
    pub midjourney: IndexedItem,
    pub runway: IndexedItem,
    pub copilot: IndexedItem,
}

impl Catalog {
    pub fn new(builder: &TestDataBuilder) -> Self {
        Self {
            whisper: IndexedItem::new(
                builder.item_id(0),
                "Whisper",
                "Speech to text transcription",
                "audio",
            )
            .with_tags(["speech"]),
            midjourney: IndexedItem::new(
                builder.item_id(1),
                "Midjourney",
                "Image generation from text prompts",
                "image",
            )
            .with_tags(["art"]),
            runway: IndexedItem::new(
                builder.item_id(2),
                "Runway",
                "Video editing and video generation",
                "video",
            ),
            copilot: IndexedItem::new(
                builder.item_id(3),
                "Copilot",
                "Code completion and chat",
                "code",
            ),
        }
    }

    pub fn all(&self) -> [&IndexedItem; 4] {
        [&self.whisper, &self.midjourney, &self.runway, &self.copilot]
    }
}

pub async fn index_all(service: &EmbeddingIndexService, catalog: &Catalog) {
    for item in catalog.all() {
        assert_eq!(service.index(item).await, Some(item.id), "index {}", item.name);
    }
}
