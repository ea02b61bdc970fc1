//! Table-level schema and references.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::column::ColumnSchema;

/// Reference to a table within a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRef {
    pub dataset_id: String,
    pub table_id: String,
}

impl TableRef {
    pub fn new(dataset_id: impl Into<String>, table_id: impl Into<String>) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            table_id: table_id.into(),
        }
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.dataset_id, self.table_id)
    }
}

/// Schema and metadata for an entire table.
///
/// Built once per table per run from the metadata source, annotated with
/// JSON samples during extraction, and treated as read-only afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct TableSchema {
    /// Table name (the table ID within its dataset).
    pub name: String,
    /// Table description, when one is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Row count reported by the metadata source.
    pub num_rows: u64,
    /// Creation timestamp, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    /// Schemas for each column, in declared order.
    pub columns: Vec<ColumnSchema>,
}

impl TableSchema {
    /// Create a new empty table schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            num_rows: 0,
            created: None,
            columns: Vec::new(),
        }
    }

    /// Create a table schema with the given columns.
    pub fn with_columns(name: impl Into<String>, columns: Vec<ColumnSchema>) -> Self {
        Self {
            columns,
            ..Self::new(name)
        }
    }

    /// Get a column by name.
    pub fn get_column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get all column names.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Names of all columns declared as JSON, in declared order.
    pub fn json_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.is_json())
            .map(|c| c.name.clone())
            .collect()
    }
}
