//! Shared test utilities for domain testing
//!
//! This crate provides reusable test infrastructure for all domain crates:
//! - `TestQdrant`: Qdrant container with automatic cleanup (feature: "qdrant")
//! - `TestDataBuilder`: Deterministic test data generation (always available)
//! - `assertions`: Custom assertion helpers (always available)
//!
//! # Features
//!
//! - `qdrant`: Enables Qdrant test infrastructure
//! - `all`: Enables all container-backed test infrastructure
//!
//! # Usage
//!
//! Add `features = ["qdrant"]` to your dev-dependencies:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { workspace = true, features = ["qdrant"] }
//! ```
//!
//! Then in your tests:
//!
//! ```rust,ignore
//! use test_utils::{TestDataBuilder, TestQdrant};
//!
//! #[tokio::test]
//! #[ignore = "requires Docker"]
//! async fn my_qdrant_test() {
//!     let qdrant = TestQdrant::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_qdrant_test");
//!
//!     let collection = builder.name("collection", "main");
//!     let item_id = builder.item_id(0);
//! }
//! ```

use uuid::Uuid;

#[cfg(feature = "qdrant")]
mod qdrant;

#[cfg(feature = "qdrant")]
pub use qdrant::TestQdrant;

/// Builder for test data with deterministic randomization
///
/// This ensures tests are reproducible by using seeded random data.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// This is the recommended way to create a builder for consistent test data.
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_index_item");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Generate the id of the `n`th catalog item of a test.
    ///
    /// Ids are stable across runs and distinct for distinct `n`.
    pub fn item_id(&self, n: u64) -> Uuid {
        let mut uuid_bytes = [0u8; 16];
        uuid_bytes[..8].copy_from_slice(&self.seed.to_le_bytes());
        uuid_bytes[8..16].copy_from_slice(&n.to_be_bytes());
        Uuid::from_bytes(uuid_bytes)
    }

    /// Generate a unique name for testing
    ///
    /// # Arguments
    ///
    /// * `prefix` - The type of resource (e.g., "collection", "item")
    /// * `suffix` - A unique identifier within the test (e.g., "main", "backup")
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("my_test");
    /// let name = builder.name("collection", "main");
    /// // Returns: "test-collection-12345-main"
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }
}

/// Test assertion helpers
pub mod assertions {
    use uuid::Uuid;

    /// Assert that two UUIDs are equal with a nice error message
    pub fn assert_uuid_eq(actual: Uuid, expected: Uuid, context: &str) {
        assert_eq!(
            actual, expected,
            "{}: expected UUID {}, got {}",
            context, expected, actual
        );
    }

    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert that scores never increase from one result to the next
    pub fn assert_descending(scores: &[f32], context: &str) {
        for pair in scores.windows(2) {
            assert!(
                pair[0] >= pair[1],
                "{}: scores not in descending order: {:?}",
                context,
                scores
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_builder_deterministic() {
        let builder1 = TestDataBuilder::new(42);
        let builder2 = TestDataBuilder::new(42);

        assert_eq!(builder1.item_id(0), builder2.item_id(0));
        assert_eq!(
            builder1.name("collection", "test"),
            builder2.name("collection", "test")
        );
    }

    #[test]
    fn test_item_ids_distinct_within_test() {
        let builder = TestDataBuilder::from_test_name("my_test");
        assert_ne!(builder.item_id(0), builder.item_id(1));
    }

    #[test]
    fn test_data_builder_different_names() {
        let builder1 = TestDataBuilder::from_test_name("test1");
        let builder2 = TestDataBuilder::from_test_name("test2");

        // Different test names should generate different data
        assert_ne!(builder1.item_id(0), builder2.item_id(0));
    }

    #[test]
    #[should_panic(expected = "not in descending order")]
    fn test_assert_descending_rejects_increase() {
        assertions::assert_descending(&[0.9, 0.5, 0.7], "scores");
    }
}
