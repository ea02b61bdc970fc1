//! Data source traits for table metadata and row queries.

use serde_json::{Map, Value};

use crate::error::Result;
use crate::schema::{TableRef, TableSchema};

/// A single result row, keyed by column name.
///
/// Values arrive exactly as the source produced them; in particular,
/// BigQuery returns JSON-typed cells as JSON text.
pub type Row = Map<String, Value>;

/// Read access to table metadata within a dataset.
pub trait MetadataSource {
    /// List the tables in a dataset.
    fn list_tables(&self, dataset_id: &str) -> Result<Vec<TableRef>>;

    /// Fetch the full schema and metadata for one table.
    fn describe_table(&self, dataset_id: &str, table_id: &str) -> Result<TableSchema>;
}

/// Read access to row data through SQL queries.
pub trait TabularDataSource {
    /// Run a query and return at most `max_rows` result rows.
    fn query(&self, sql: &str, max_rows: usize) -> Result<Vec<Row>>;
}
