//! Data sources: the BigQuery REST client and an in-memory mock.

mod bigquery;
mod mock;
mod provider;

pub use bigquery::BigQueryClient;
pub use mock::MockWarehouse;
pub use provider::{MetadataSource, Row, TabularDataSource};
