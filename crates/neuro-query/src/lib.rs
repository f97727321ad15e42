//! Neuro Query
//!
//! Headless core of a neuroinformatics query builder: pick terms from a
//! vocabulary to build a free-text query, and browse the studies the backend
//! returns for it.
//!
//! # Features
//!
//! - **TermCatalog**: one-shot vocabulary load, case-insensitive search, pages of 30
//! - **QueryState**: the query string, appended to by term picks
//! - **StudyResultSet**: cancel-and-reissue fetching guarded by a generation
//!   counter, sortable pages of 20
//! - **ResultView**: study count reported back to the query panel
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use neuro_query::{Config, NeuroQueryClient, QueryPipeline, TermCatalog};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let client = Arc::new(NeuroQueryClient::new(config)?);
//!
//!     let mut catalog = TermCatalog::new();
//!     catalog.load(client.as_ref()).await;
//!
//!     let pipeline = QueryPipeline::new(client);
//!     catalog.on_pick(pipeline.pick_handler());
//!     catalog.select(0);
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod formatters;
pub mod models;
pub mod observe;
pub mod pagination;
pub mod pipeline;
pub mod query;
pub mod repl;
pub mod studies;
pub mod view;

pub use catalog::TermCatalog;
pub use client::{NeuroQueryClient, StudyBackend};
pub use config::Config;
pub use error::{ClientError, ClientResult};
pub use pipeline::QueryPipeline;
pub use query::QueryState;
pub use studies::StudyResultSet;
pub use view::ResultView;
