use std::time::Duration;

use core_config::{ConfigError, FromEnv, env_optional, env_or_default, env_parse_or};

use crate::embedding::{DEFAULT_EMBEDDING_MODEL, DEFAULT_OPENAI_BASE_URL, OpenAIConfig};
use crate::models::DEFAULT_HNSW_EF;
use crate::qdrant::QdrantConfig;

pub const DEFAULT_COLLECTION: &str = "tool_embeddings";
pub const DEFAULT_DIMENSION: usize = 1536;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Settings fixed for the lifetime of one index deployment
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSettings {
    pub collection: String,
    /// Dimensionality `D` of every stored vector
    pub dimension: usize,
    pub hnsw_ef: u64,
    /// Upper bound on `connect_with_timeout` at startup
    pub connect_timeout: Duration,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            collection: DEFAULT_COLLECTION.to_string(),
            dimension: DEFAULT_DIMENSION,
            hnsw_ef: DEFAULT_HNSW_EF,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

impl IndexSettings {
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }
}

impl FromEnv for IndexSettings {
    fn from_env() -> Result<Self, ConfigError> {
        let dimension: usize = env_parse_or("EMBEDDING_DIMENSIONS", DEFAULT_DIMENSION)?;
        if dimension == 0 {
            return Err(ConfigError::ParseError {
                key: "EMBEDDING_DIMENSIONS".to_string(),
                details: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            collection: env_or_default("QDRANT_COLLECTION", DEFAULT_COLLECTION),
            dimension,
            hnsw_ef: env_parse_or("QDRANT_HNSW_EF", DEFAULT_HNSW_EF)?,
            connect_timeout: Duration::from_secs(env_parse_or(
                "VECTOR_CONNECT_TIMEOUT_SECS",
                DEFAULT_CONNECT_TIMEOUT_SECS,
            )?),
        })
    }
}

/// Complete configuration for the semantic search service.
///
/// A missing `QDRANT_URL` or `OPENAI_API_KEY` is not an error: the
/// corresponding dependency is simply absent and the service degrades.
#[derive(Debug, Clone)]
pub struct SemanticSearchConfig {
    pub qdrant: Option<QdrantConfig>,
    pub index: IndexSettings,
    pub openai: Option<OpenAIConfig>,
}

impl FromEnv for SemanticSearchConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let index = IndexSettings::from_env()?;

        let qdrant = match env_optional("QDRANT_URL") {
            Some(url) => {
                let mut config =
                    QdrantConfig::new(url).with_timeout(env_parse_or("QDRANT_TIMEOUT_SECS", 30)?);
                if let Some(api_key) = env_optional("QDRANT_API_KEY") {
                    config = config.with_api_key(api_key);
                }
                Some(config)
            }
            None => None,
        };

        let openai = match env_optional("OPENAI_API_KEY") {
            Some(api_key) => Some(
                OpenAIConfig::new(api_key)
                    .with_base_url(env_or_default("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL))
                    .with_model(env_or_default("EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL))
                    .with_dimensions(index.dimension as u32)
                    .with_timeout(env_parse_or("OPENAI_TIMEOUT_SECS", 30)?),
            ),
            None => None,
        };

        Ok(Self {
            qdrant,
            index,
            openai,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 11] = [
        "QDRANT_URL",
        "QDRANT_API_KEY",
        "QDRANT_COLLECTION",
        "QDRANT_TIMEOUT_SECS",
        "QDRANT_HNSW_EF",
        "EMBEDDING_DIMENSIONS",
        "EMBEDDING_MODEL",
        "OPENAI_API_KEY",
        "OPENAI_BASE_URL",
        "OPENAI_TIMEOUT_SECS",
        "VECTOR_CONNECT_TIMEOUT_SECS",
    ];

    #[test]
    fn test_defaults_without_env() {
        temp_env::with_vars_unset(VARS, || {
            let config = SemanticSearchConfig::from_env().unwrap();

            assert!(config.qdrant.is_none());
            assert!(config.openai.is_none());
            assert_eq!(config.index, IndexSettings::default());
            assert_eq!(config.index.collection, "tool_embeddings");
            assert_eq!(config.index.dimension, 1536);
            assert_eq!(config.index.connect_timeout, Duration::from_secs(5));
        });
    }

    #[test]
    fn test_blank_qdrant_url_means_degraded() {
        temp_env::with_vars([("QDRANT_URL", Some(""))], || {
            let config = SemanticSearchConfig::from_env().unwrap();
            assert!(config.qdrant.is_none());
        });
    }

    #[test]
    fn test_full_env() {
        temp_env::with_vars(
            [
                ("QDRANT_URL", Some("https://xyz.cloud.qdrant.io:6334")),
                ("QDRANT_API_KEY", Some("qdrant-secret")),
                ("QDRANT_COLLECTION", Some("catalog")),
                ("QDRANT_TIMEOUT_SECS", Some("10")),
                ("QDRANT_HNSW_EF", Some("64")),
                ("EMBEDDING_DIMENSIONS", Some("256")),
                ("EMBEDDING_MODEL", Some("text-embedding-3-large")),
                ("OPENAI_API_KEY", Some("sk-test")),
                ("OPENAI_BASE_URL", None),
                ("OPENAI_TIMEOUT_SECS", None),
                ("VECTOR_CONNECT_TIMEOUT_SECS", Some("2")),
            ],
            || {
                let config = SemanticSearchConfig::from_env().unwrap();

                let qdrant = config.qdrant.unwrap();
                assert_eq!(qdrant.url, "https://xyz.cloud.qdrant.io:6334");
                assert_eq!(qdrant.effective_api_key(), Some("qdrant-secret"));
                assert_eq!(qdrant.timeout_secs, 10);

                assert_eq!(config.index.collection, "catalog");
                assert_eq!(config.index.dimension, 256);
                assert_eq!(config.index.hnsw_ef, 64);
                assert_eq!(config.index.connect_timeout, Duration::from_secs(2));

                let openai = config.openai.unwrap();
                assert_eq!(openai.model, "text-embedding-3-large");
                assert_eq!(openai.dimensions, Some(256));
                assert_eq!(openai.base_url, DEFAULT_OPENAI_BASE_URL);
                assert_eq!(openai.timeout_secs, 30);
            },
        );
    }

    #[test]
    fn test_invalid_dimension() {
        temp_env::with_var("EMBEDDING_DIMENSIONS", Some("wide"), || {
            assert!(matches!(
                IndexSettings::from_env(),
                Err(ConfigError::ParseError { .. })
            ));
        });

        temp_env::with_var("EMBEDDING_DIMENSIONS", Some("0"), || {
            assert!(IndexSettings::from_env().is_err());
        });
    }
}
