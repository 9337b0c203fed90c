//! Catalog Semantic Search CLI
//!
//! Drives the embedding index through one full lifecycle per invocation:
//!
//! ```text
//! env ──▶ SemanticSearchConfig ──▶ EmbeddingIndexService
//!                                        │ connect_with_timeout
//!                                        ▼
//!                          status | index | search | delete
//!                                        │ JSON on stdout
//!                                        ▼
//!                                      close
//! ```
//!
//! A missing or unreachable Qdrant is not fatal: the command still runs in
//! degraded mode and reports it in its output.
//!
//! ## Modules
//!
//! - `cli`: Argument parsing
//! - `commands`: Command execution
//! - `startup`: Service construction, connection and shutdown

pub mod cli;
pub mod commands;
pub mod startup;

use clap::Parser;
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{Environment, FromEnv};
use domain_catalog_search::SemanticSearchConfig;
use eyre::{Result, WrapErr};

use cli::Cli;

pub use startup::{shutdown, start_semantic_search};

pub async fn run() -> Result<()> {
    install_color_eyre();

    let environment = Environment::from_env();
    init_tracing(&environment);

    let cli = Cli::parse();

    let config =
        SemanticSearchConfig::from_env().wrap_err("Invalid semantic search configuration")?;
    let service = start_semantic_search(config).await?;

    let output = commands::execute(&service, cli.command).await;

    shutdown(service).await;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
