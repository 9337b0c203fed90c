//! Integration tests for the catalog search service
//!
//! These tests drive the public service API against the in-memory store and
//! a deterministic keyword embedder to check:
//! - Indexed items can be found again
//! - Re-indexing and deletion are idempotent
//! - Category filter and score threshold are applied exactly
//! - Degraded mode never fails the caller

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{Catalog, KeywordEmbedder, index_all, service};
use domain_catalog_search::*;
use test_utils::{TestDataBuilder, assertions::*};

async fn connected(collection: &str) -> (EmbeddingIndexService, InMemoryRepository) {
    let repo = InMemoryRepository::new();
    let mut service = service(collection);
    service.connect_with_repository(Arc::new(repo.clone())).await;
    assert_eq!(service.state(), ConnectionState::Connected);
    (service, repo)
}

// ============================================================================
// Indexing and search
// ============================================================================

#[tokio::test]
async fn test_index_then_search_by_description() {
    let builder = TestDataBuilder::from_test_name("round_trip");
    let (service, _) = connected("items").await;
    let catalog = Catalog::new(&builder);
    index_all(&service, &catalog).await;

    for item in catalog.all() {
        let query = SearchQuery::new(item.description.clone())
            .with_limit(10)
            .with_threshold(0.0);
        let hits = service.search(&query).await;

        assert!(
            hits.iter().any(|hit| hit.tool_id == item.id),
            "{} not found by its own description",
            item.name
        );
    }
}

#[tokio::test]
async fn test_connect_creates_collection_once() {
    let repo = InMemoryRepository::new();

    let mut first = service("items");
    first.connect_with_repository(Arc::new(repo.clone())).await;
    let mut second = service("items");
    second.connect_with_repository(Arc::new(repo.clone())).await;

    assert_eq!(first.state(), ConnectionState::Connected);
    assert_eq!(second.state(), ConnectionState::Connected);
    assert_eq!(repo.list_collections().await.unwrap(), vec!["items"]);
}

#[tokio::test]
async fn test_reindex_keeps_single_latest_record() {
    let builder = TestDataBuilder::from_test_name("reindex");
    let (service, repo) = connected("items").await;
    let mut item = Catalog::new(&builder).runway;

    service.index(&item).await;
    item.description = "Music and audio editing".to_string();
    let id = assert_some(service.update(&item).await, "update should succeed");

    assert_uuid_eq(id, item.id, "updated id");
    assert_eq!(repo.record_count("items").await, Some(1));

    let stored = assert_some(repo.get("items", item.id).await, "record should exist");
    assert_eq!(stored.vector, KeywordEmbedder::vector(&item.embedding_text()));
}

#[tokio::test]
async fn test_results_are_best_first_and_limited() {
    let builder = TestDataBuilder::from_test_name("ordering");
    let (service, _) = connected("items").await;
    let catalog = Catalog::new(&builder);
    index_all(&service, &catalog).await;

    let query = SearchQuery::new("video generation").with_threshold(0.0);
    let hits = service.search(&query).await;
    let scores: Vec<f32> = hits.iter().map(|hit| hit.score).collect();

    assert!(hits.len() >= 2);
    assert_uuid_eq(hits[0].tool_id, catalog.runway.id, "best match");
    assert_descending(&scores, "video generation");

    let hits = service.search(&query.clone().with_limit(1)).await;
    assert_eq!(hits.len(), 1);
}

#[tokio::test]
async fn test_category_filter_is_exact() {
    let builder = TestDataBuilder::from_test_name("category_filter");
    let (service, _) = connected("items").await;
    let catalog = Catalog::new(&builder);
    index_all(&service, &catalog).await;

    let unfiltered = service
        .search(&SearchQuery::new("generation").with_threshold(0.0))
        .await;
    assert!(unfiltered.iter().any(|h| h.tool_id == catalog.midjourney.id));
    assert!(unfiltered.iter().any(|h| h.tool_id == catalog.runway.id));

    let images = service
        .search(
            &SearchQuery::new("generation")
                .with_category("image")
                .with_threshold(0.0),
        )
        .await;
    assert_eq!(images.len(), 1);
    assert_uuid_eq(images[0].tool_id, catalog.midjourney.id, "image hit");
    assert_eq!(images[0].category, "image");

    let wrong_case = service
        .search(
            &SearchQuery::new("generation")
                .with_category("Image")
                .with_threshold(0.0),
        )
        .await;
    assert!(wrong_case.is_empty());
}

#[tokio::test]
async fn test_tags_are_not_a_filter() {
    let builder = TestDataBuilder::from_test_name("tags_not_filter");
    let (service, _) = connected("items").await;
    let catalog = Catalog::new(&builder);
    index_all(&service, &catalog).await;

    let hits = service
        .search(
            &SearchQuery::new("speech")
                .with_category("speech")
                .with_threshold(0.0),
        )
        .await;
    assert!(hits.is_empty());
}

#[tokio::test]
async fn test_threshold_boundary_is_inclusive() {
    let builder = TestDataBuilder::from_test_name("threshold_boundary");
    let (service, _) = connected("items").await;
    let catalog = Catalog::new(&builder);
    index_all(&service, &catalog).await;

    let base = SearchQuery::new("image generation").with_category("image");
    let hits = service.search(&base.clone().with_threshold(0.0)).await;
    assert_eq!(hits.len(), 1);
    let score = hits[0].score;
    assert!(score > 0.0 && score < 1.0);

    let at_score = service.search(&base.clone().with_threshold(score)).await;
    assert_eq!(at_score.len(), 1, "score equal to threshold is kept");

    let just_above = f32::from_bits(score.to_bits() + 1);
    let above = service.search(&base.with_threshold(just_above)).await;
    assert!(above.is_empty(), "score below threshold is dropped");
}

// ============================================================================
// Deletion
// ============================================================================

#[tokio::test]
async fn test_delete_removes_and_is_idempotent() {
    let builder = TestDataBuilder::from_test_name("delete");
    let (service, repo) = connected("items").await;
    let catalog = Catalog::new(&builder);
    index_all(&service, &catalog).await;

    assert!(service.delete(catalog.whisper.id).await);
    assert!(service.delete(catalog.whisper.id).await);
    assert_eq!(repo.record_count("items").await, Some(3));

    let query = SearchQuery::new(catalog.whisper.description.clone()).with_threshold(0.0);
    let hits = service.search(&query).await;
    assert!(hits.iter().all(|hit| hit.tool_id != catalog.whisper.id));
}

// ============================================================================
// Degraded mode and lifecycle
// ============================================================================

#[tokio::test]
async fn test_degraded_without_endpoint() {
    let builder = TestDataBuilder::from_test_name("degraded");
    let catalog = Catalog::new(&builder);

    let mut service = service("items");
    service.connect_with_timeout(Duration::from_secs(5)).await;

    assert_eq!(service.state(), ConnectionState::Degraded);
    assert!(service.degraded_reason().is_some());
    assert_eq!(service.index(&catalog.whisper).await, None);
    assert_eq!(service.update(&catalog.whisper).await, None);
    assert!(service.search(&SearchQuery::new("speech")).await.is_empty());
    assert!(!service.delete(catalog.whisper.id).await);
}

#[tokio::test]
async fn test_no_provider_indexes_nothing() {
    let builder = TestDataBuilder::from_test_name("no_provider");
    let repo = InMemoryRepository::new();
    let mut service = EmbeddingIndexService::new(common::settings("items"));
    service.connect_with_repository(Arc::new(repo.clone())).await;

    assert_eq!(service.state(), ConnectionState::Connected);
    assert_eq!(service.index(&Catalog::new(&builder).copilot).await, None);
    assert_eq!(repo.record_count("items").await, Some(0));
}

#[tokio::test]
async fn test_close_returns_to_disconnected() {
    let builder = TestDataBuilder::from_test_name("close");
    let (mut service, _) = connected("items").await;
    let catalog = Catalog::new(&builder);
    index_all(&service, &catalog).await;

    service.close().await;

    assert_eq!(service.state(), ConnectionState::Disconnected);
    assert!(service.search(&SearchQuery::new("code chat")).await.is_empty());
    assert!(!service.delete(catalog.copilot.id).await);
}

#[tokio::test]
async fn test_shared_service_handles_concurrent_requests() {
    let builder = TestDataBuilder::from_test_name("concurrent");
    let (service, repo) = connected("items").await;
    let service = Arc::new(service);
    let catalog = Catalog::new(&builder);

    let handles: Vec<_> = catalog
        .all()
        .into_iter()
        .cloned()
        .map(|item| {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.index(&item).await })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().is_some());
    }
    assert_eq!(repo.record_count("items").await, Some(4));
}
