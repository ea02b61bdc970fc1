//! Bqdoc: BigQuery dataset schema extraction and Markdown documentation.
//!
//! Bqdoc walks the tables of a dataset, records each table's declared
//! schema, and goes one level deeper for JSON columns: it samples real
//! rows and infers the structural shape of the stored documents, so the
//! generated documentation shows what actually lives inside them.
//!
//! # Core Principles
//!
//! - **Read-only**: only metadata reads and bounded `SELECT` sampling queries
//! - **Resilient**: a failed sampling query costs one table its annotations,
//!   never the whole run
//! - **Source-agnostic core**: the pipeline runs against any
//!   [`MetadataSource`] + [`TabularDataSource`] pair, BigQuery or mock
//!
//! # Example
//!
//! ```no_run
//! use bqdoc::{BigQueryClient, Extractor, markdown};
//!
//! let client = BigQueryClient::from_env(None).unwrap();
//! let mut extractor = Extractor::new();
//! let schemas = extractor.extract_dataset(&client, "analytics").unwrap();
//!
//! let document = markdown::render_dataset("analytics", &schemas);
//! println!("{}", document);
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod inference;
pub mod markdown;
pub mod sampler;
pub mod schema;
pub mod source;

pub use error::{BqdocError, Result};
pub use extract::{Extractor, ExtractorConfig};
pub use inference::Inferencer;
pub use sampler::Sampler;
pub use schema::{ColumnSchema, JsonSample, JsonShape, TableRef, TableSchema};
pub use source::{BigQueryClient, MetadataSource, MockWarehouse, Row, TabularDataSource};
