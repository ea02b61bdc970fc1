//! Markdown rendering for extracted dataset schemas.

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::{BqdocError, Result};
use crate::schema::TableSchema;

/// Renders a whole dataset as one Markdown document: header, table of
/// contents, then one anchored section per table.
pub fn render_dataset(dataset_id: &str, schemas: &[TableSchema]) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("# Dataset: {}", dataset_id));
    lines.push(String::new());
    lines.push(format!(
        "This document contains the schema information for {} tables in the `{}` dataset.",
        schemas.len(),
        dataset_id
    ));
    lines.push(String::new());

    lines.push("## Tables".to_string());
    lines.push(String::new());
    for table in schemas {
        lines.push(format!(
            "- [{}](#{})",
            table.name,
            table.name.to_lowercase()
        ));
    }
    lines.push(String::new());
    lines.push("---".to_string());
    lines.push(String::new());

    for table in schemas {
        lines.push(format!("<a id='{}'></a>", table.name.to_lowercase()));
        lines.push(render_table(table));
        lines.push("---".to_string());
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Renders one table: metadata, the column table, and a detail section
/// for every annotated JSON column.
pub fn render_table(table: &TableSchema) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("# Table: {}", table.name));
    lines.push(String::new());

    if let Some(description) = &table.description {
        lines.push(description.clone());
        lines.push(String::new());
    }

    lines.push(format!("**Rows**: {}", thousands(table.num_rows)));
    if let Some(created) = &table.created {
        lines.push(format!("**Created**: {}", created.to_rfc3339()));
    }
    lines.push(String::new());

    lines.push("## Schema".to_string());
    lines.push(String::new());
    lines.push("| Field | Type | Mode | Description |".to_string());
    lines.push("|-------|------|------|-------------|".to_string());
    for column in &table.columns {
        lines.push(format!(
            "| {} | {} | {} | {} |",
            column.name,
            column.field_type,
            column.mode,
            table_cell(&column.description)
        ));
    }
    lines.push(String::new());

    for column in &table.columns {
        let Some(sample) = &column.json_sample else {
            continue;
        };

        lines.push(format!("### JSON Field: {}", column.name));
        lines.push(String::new());
        lines.push("#### Schema".to_string());
        lines.push("```json".to_string());
        lines.push(pretty(&sample.schema));
        lines.push("```".to_string());
        lines.push(String::new());

        if !sample.samples.is_empty() {
            lines.push("#### Sample Values".to_string());
            for (i, value) in sample.samples.iter().enumerate() {
                lines.push(format!("**Sample {}:**", i + 1));
                lines.push("```json".to_string());
                lines.push(pretty(value));
                lines.push("```".to_string());
                lines.push(String::new());
            }
        }
    }

    lines.join("\n")
}

/// Writes rendered Markdown to a file.
pub fn save(content: &str, path: &Path) -> Result<()> {
    fs::write(path, content).map_err(|e| BqdocError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!("Saved markdown to {}", path.display());
    Ok(())
}

fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

/// Escapes a description for use inside a Markdown table cell.
fn table_cell(text: &str) -> String {
    text.replace('\n', " ").replace('|', "\\|")
}

/// Formats a count with thousands separators (`1234567` -> `1,234,567`).
fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
