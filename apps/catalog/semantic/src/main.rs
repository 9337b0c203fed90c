//! Catalog Semantic Search - Entry Point
//!
//! Minimal entry point that delegates to the library.

#[tokio::main]
async fn main() -> eyre::Result<()> {
    catalog_semantic::run().await
}
