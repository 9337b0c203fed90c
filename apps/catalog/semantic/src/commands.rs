use domain_catalog_search::{EmbeddingIndexService, IndexedItem, SearchQuery};
use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;

use crate::cli::Command;

/// Run one command against the service and describe the outcome as JSON.
///
/// The service never fails, so neither does this: a degraded index shows up
/// as `"state": "degraded"` next to an empty or negative result.
pub async fn execute(service: &EmbeddingIndexService, command: Command) -> Value {
    match command {
        Command::Status => json!({
            "state": service.state(),
            "degraded_reason": service.degraded_reason(),
            "collection": service.settings().collection,
            "dimension": service.settings().dimension,
            "embedding_model": service.embedding_model(),
        }),

        Command::Index {
            id,
            name,
            description,
            category,
            tags,
            update,
        } => {
            let item = IndexedItem::new(id.unwrap_or_else(Uuid::new_v4), name, description, category)
                .with_tags(tags);

            let result = if update {
                service.update(&item).await
            } else {
                service.index(&item).await
            };
            info!(tool_id = %item.id, indexed = result.is_some(), "Index command finished");

            json!({
                "id": item.id,
                "indexed": result.is_some(),
                "state": service.state(),
            })
        }

        Command::Search {
            query,
            limit,
            category,
            threshold,
        } => {
            let mut search = SearchQuery::new(query)
                .with_limit(limit)
                .with_threshold(threshold);
            if let Some(category) = category {
                search = search.with_category(category);
            }

            let hits = service.search(&search).await;

            json!({
                "query": search.text,
                "hits": hits,
                "state": service.state(),
            })
        }

        Command::Delete { id } => json!({
            "id": id,
            "deleted": service.delete(id).await,
            "state": service.state(),
        }),
    }
}
