//! In-memory data source for tests and offline runs.

use std::cell::RefCell;

use crate::error::{BqdocError, Result};
use crate::schema::{TableRef, TableSchema};

use super::provider::{MetadataSource, Row, TabularDataSource};

/// Mock warehouse that returns canned metadata and rows.
///
/// Every query returns the same registered rows (or the configured
/// error), and the SQL text of each query is recorded so tests can
/// assert how many queries ran and what they asked for.
pub struct MockWarehouse {
    tables: Vec<TableSchema>,
    rows: Vec<Row>,
    query_error: Option<String>,
    queries: RefCell<Vec<String>>,
}

impl MockWarehouse {
    /// Create an empty mock warehouse.
    pub fn new() -> Self {
        Self {
            tables: Vec::new(),
            rows: Vec::new(),
            query_error: None,
            queries: RefCell::new(Vec::new()),
        }
    }

    /// Register a table for `list_tables`/`describe_table`.
    pub fn with_table(mut self, table: TableSchema) -> Self {
        self.tables.push(table);
        self
    }

    /// Set the rows every query returns.
    pub fn with_rows(mut self, rows: Vec<Row>) -> Self {
        self.rows = rows;
        self
    }

    /// Make every query fail with the given message.
    pub fn with_query_error(mut self, message: impl Into<String>) -> Self {
        self.query_error = Some(message.into());
        self
    }

    /// SQL text of every query issued so far.
    pub fn queries(&self) -> Vec<String> {
        self.queries.borrow().clone()
    }

    /// Number of queries issued so far.
    pub fn query_count(&self) -> usize {
        self.queries.borrow().len()
    }
}

impl Default for MockWarehouse {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataSource for MockWarehouse {
    fn list_tables(&self, dataset_id: &str) -> Result<Vec<TableRef>> {
        Ok(self
            .tables
            .iter()
            .map(|table| TableRef::new(dataset_id, table.name.clone()))
            .collect())
    }

    fn describe_table(&self, dataset_id: &str, table_id: &str) -> Result<TableSchema> {
        self.tables
            .iter()
            .find(|table| table.name == table_id)
            .cloned()
            .ok_or_else(|| BqdocError::Api {
                status: 404,
                message: format!("Not found: table {}.{}", dataset_id, table_id),
            })
    }
}

impl TabularDataSource for MockWarehouse {
    fn query(&self, sql: &str, max_rows: usize) -> Result<Vec<Row>> {
        self.queries.borrow_mut().push(sql.to_string());
        if let Some(message) = &self.query_error {
            return Err(BqdocError::Api {
                status: 500,
                message: message.clone(),
            });
        }
        Ok(self.rows.iter().take(max_rows).cloned().collect())
    }
}
