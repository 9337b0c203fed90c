use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    self, Condition, CreateCollectionBuilder, DeletePointsBuilder, Distance, Filter, ListValue,
    PointId, PointStruct, PointsIdsList, SearchParamsBuilder, SearchPointsBuilder,
    UpsertPointsBuilder, Value as QdrantValue, VectorParamsBuilder,
};
use tracing::{debug, warn};
use uuid::Uuid;

use super::QdrantConfig;
use crate::error::{SemanticSearchError, SemanticSearchResult};
use crate::models::{EmbeddingRecord, ItemPayload, ScoredRecord, SearchFilter, VectorQuery};
use crate::repository::VectorRepository;

/// Qdrant-backed implementation of VectorRepository
pub struct QdrantRepository {
    client: Qdrant,
}

impl QdrantRepository {
    /// Build a client for the configured endpoint.
    ///
    /// The gRPC channel is established lazily, so this only fails on an
    /// unusable configuration. Reachability is first tested by the first call.
    pub fn new(config: &QdrantConfig) -> SemanticSearchResult<Self> {
        let mut builder = Qdrant::from_url(&config.url);

        if let Some(api_key) = config.effective_api_key() {
            builder = builder.api_key(api_key.to_string());
        }

        builder = builder.timeout(Duration::from_secs(config.timeout_secs));

        let client = builder
            .build()
            .map_err(|e| SemanticSearchError::Store(format!("Failed to build client: {}", e)))?;

        Ok(Self { client })
    }

    pub fn from_client(client: Qdrant) -> Self {
        Self { client }
    }

    fn uuid_to_point_id(id: Uuid) -> PointId {
        PointId::from(id.to_string())
    }

    fn point_id_to_uuid(point_id: &PointId) -> SemanticSearchResult<Uuid> {
        match &point_id.point_id_options {
            Some(qdrant::point_id::PointIdOptions::Uuid(uuid_str)) => Uuid::parse_str(uuid_str)
                .map_err(|e| SemanticSearchError::Internal(format!("Invalid UUID: {}", e))),
            Some(qdrant::point_id::PointIdOptions::Num(num)) => Ok(Uuid::from_u128(*num as u128)),
            None => Err(SemanticSearchError::Internal("Missing point ID".to_string())),
        }
    }

    fn to_qdrant_filter(filter: &SearchFilter) -> Option<Filter> {
        filter
            .category
            .as_ref()
            .map(|category| Filter::must([Condition::matches("category", category.clone())]))
    }

    fn payload_to_qdrant(
        payload: &ItemPayload,
    ) -> SemanticSearchResult<HashMap<String, QdrantValue>> {
        let serde_json::Value::Object(map) = serde_json::to_value(payload)? else {
            return Err(SemanticSearchError::Internal(
                "Payload did not serialize to an object".to_string(),
            ));
        };

        Ok(map
            .into_iter()
            .filter_map(|(key, val)| json_to_qdrant_value(val).map(|v| (key, v)))
            .collect())
    }

    fn qdrant_to_payload(payload: HashMap<String, QdrantValue>) -> Option<ItemPayload> {
        if payload.is_empty() {
            return None;
        }

        let map: serde_json::Map<String, serde_json::Value> = payload
            .into_iter()
            .filter_map(|(key, val)| qdrant_value_to_json(val).map(|v| (key, v)))
            .collect();

        match serde_json::from_value(serde_json::Value::Object(map)) {
            Ok(payload) => Some(payload),
            Err(e) => {
                warn!(error = %e, "Stored payload does not match the item schema");
                None
            }
        }
    }
}

fn json_to_qdrant_value(val: serde_json::Value) -> Option<QdrantValue> {
    match val {
        serde_json::Value::Null => None,
        serde_json::Value::Bool(b) => Some(QdrantValue::from(b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(QdrantValue::from(i))
            } else {
                n.as_f64().map(QdrantValue::from)
            }
        }
        serde_json::Value::String(s) => Some(QdrantValue::from(s)),
        serde_json::Value::Array(items) => Some(QdrantValue {
            kind: Some(qdrant::value::Kind::ListValue(ListValue {
                values: items.into_iter().filter_map(json_to_qdrant_value).collect(),
            })),
        }),
        // Nested objects are not part of the item payload
        serde_json::Value::Object(_) => Some(QdrantValue::from(val.to_string())),
    }
}

fn qdrant_value_to_json(val: QdrantValue) -> Option<serde_json::Value> {
    use qdrant::value::Kind;

    match val.kind {
        Some(Kind::NullValue(_)) => Some(serde_json::Value::Null),
        Some(Kind::BoolValue(b)) => Some(serde_json::Value::Bool(b)),
        Some(Kind::IntegerValue(i)) => Some(serde_json::Value::Number(i.into())),
        Some(Kind::DoubleValue(f)) => {
            serde_json::Number::from_f64(f).map(serde_json::Value::Number)
        }
        Some(Kind::StringValue(s)) => Some(serde_json::Value::String(s)),
        Some(Kind::ListValue(list)) => Some(serde_json::Value::Array(
            list.values
                .into_iter()
                .filter_map(qdrant_value_to_json)
                .collect(),
        )),
        _ => None,
    }
}

#[async_trait]
impl VectorRepository for QdrantRepository {
    async fn list_collections(&self) -> SemanticSearchResult<Vec<String>> {
        let response = self.client.list_collections().await?;

        Ok(response
            .collections
            .into_iter()
            .map(|collection| collection.name)
            .collect())
    }

    async fn create_collection(&self, name: &str, dimension: u64) -> SemanticSearchResult<()> {
        let builder = CreateCollectionBuilder::new(name)
            .vectors_config(VectorParamsBuilder::new(dimension, Distance::Cosine));

        self.client.create_collection(builder).await?;
        Ok(())
    }

    async fn upsert(&self, collection: &str, record: EmbeddingRecord) -> SemanticSearchResult<Uuid> {
        let point = PointStruct::new(
            Self::uuid_to_point_id(record.id),
            record.vector,
            Self::payload_to_qdrant(&record.payload)?,
        );

        let builder = UpsertPointsBuilder::new(collection, vec![point]).wait(true);
        self.client.upsert_points(builder).await?;

        Ok(record.id)
    }

    async fn delete(&self, collection: &str, ids: Vec<Uuid>) -> SemanticSearchResult<()> {
        let point_ids: Vec<PointId> = ids.into_iter().map(Self::uuid_to_point_id).collect();

        let builder = DeletePointsBuilder::new(collection)
            .points(PointsIdsList { ids: point_ids })
            .wait(true);

        self.client.delete_points(builder).await?;
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        query: VectorQuery,
    ) -> SemanticSearchResult<Vec<ScoredRecord>> {
        let mut builder = SearchPointsBuilder::new(collection, query.vector, query.limit as u64)
            .score_threshold(query.score_threshold)
            .with_payload(true)
            .params(
                SearchParamsBuilder::default()
                    .hnsw_ef(query.params.hnsw_ef)
                    .exact(query.params.exact),
            );

        if let Some(filter) = Self::to_qdrant_filter(&query.filter) {
            builder = builder.filter(filter);
        }

        let results = self.client.search_points(builder).await?;
        debug!(hits = results.result.len(), "Qdrant search completed");

        results
            .result
            .into_iter()
            .map(|point| {
                let id = point
                    .id
                    .as_ref()
                    .map(Self::point_id_to_uuid)
                    .transpose()?
                    .ok_or_else(|| SemanticSearchError::Internal("Missing point ID".to_string()))?;

                Ok(ScoredRecord {
                    id,
                    score: point.score,
                    payload: Self::qdrant_to_payload(point.payload),
                })
            })
            .collect()
    }

    // The gRPC channel is released when the client is dropped
}
