//! Column schema definition and JSON sample annotations.

use serde::Serialize;
use serde_json::Value;

use super::shape::JsonShape;

/// Declared type string BigQuery reports for native JSON columns.
pub const JSON_FIELD_TYPE: &str = "JSON";

/// Inferred shape plus display samples for a JSON column.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSample {
    /// Structural schema merged across every parsed sample value.
    pub schema: JsonShape,
    /// Parsed values kept for display (at most three).
    pub samples: Vec<Value>,
}

/// Schema for a single column.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSchema {
    /// Column name.
    pub name: String,
    /// Declared BigQuery type (e.g. `STRING`, `INTEGER`, `JSON`).
    #[serde(rename = "type")]
    pub field_type: String,
    /// Column mode: `NULLABLE`, `REQUIRED` or `REPEATED`.
    pub mode: String,
    /// Column description, empty when none was set.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Sampled JSON shape, present only on annotated JSON columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_sample: Option<JsonSample>,
}

impl ColumnSchema {
    /// Create a new column schema with no description or annotation.
    pub fn new(
        name: impl Into<String>,
        field_type: impl Into<String>,
        mode: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            mode: mode.into(),
            description: String::new(),
            json_sample: None,
        }
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whether the declared type marks this as a JSON column.
    pub fn is_json(&self) -> bool {
        self.field_type.eq_ignore_ascii_case(JSON_FIELD_TYPE)
    }
}
