use std::sync::Arc;

use domain_catalog_search::{ConnectionState, EmbeddingIndexService, SemanticSearchConfig};
use eyre::{Result, WrapErr};
use tracing::{info, warn};

/// Build the service from configuration and connect it within the configured
/// startup timeout. An unreachable store leaves the service degraded, not
/// failed.
pub async fn start_semantic_search(
    config: SemanticSearchConfig,
) -> Result<Arc<EmbeddingIndexService>> {
    let timeout = config.index.connect_timeout;
    let mut service = EmbeddingIndexService::from_config(config)
        .wrap_err("Failed to build semantic search service")?;

    service.connect_with_timeout(timeout).await;

    match service.state() {
        ConnectionState::Connected => info!(
            collection = %service.settings().collection,
            "Semantic search ready"
        ),
        state => warn!(
            %state,
            reason = service.degraded_reason().unwrap_or("unknown"),
            "Semantic search unavailable, continuing without it"
        ),
    }

    Ok(Arc::new(service))
}

/// Close the store connection. Requires the last reference to the service.
pub async fn shutdown(service: Arc<EmbeddingIndexService>) {
    info!("Shutting down: closing semantic search connection");

    match Arc::try_unwrap(service) {
        Ok(mut service) => service.close().await,
        Err(_) => warn!("Semantic search service still in use, skipping close"),
    }
}
