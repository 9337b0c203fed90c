use clap::{Parser, Subcommand};
use domain_catalog_search::models::{DEFAULT_SCORE_THRESHOLD, DEFAULT_SEARCH_LIMIT};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "catalog-semantic")]
#[command(about = "Index and search catalog items by meaning")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Show connection state and index settings
    Status,

    /// Embed a catalog item and store it in the index
    Index {
        /// Item id. A new one is generated when omitted.
        #[arg(long)]
        id: Option<Uuid>,

        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long)]
        category: String,

        /// Tag to attach, repeatable
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Re-index an existing item
        #[arg(long)]
        update: bool,
    },

    /// Search indexed items with a natural language query
    Search {
        query: String,

        #[arg(short, long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: u32,

        /// Only return items of this category (exact match)
        #[arg(short, long)]
        category: Option<String>,

        /// Minimum similarity in [0, 1]
        #[arg(short, long, default_value_t = DEFAULT_SCORE_THRESHOLD)]
        threshold: f32,
    },

    /// Remove an item from the index
    Delete {
        #[arg(long)]
        id: Uuid,
    },
}
