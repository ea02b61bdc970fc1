//! Example: Extract a dataset schema without touching BigQuery.
//!
//! Usage:
//!   cargo run --example extract
//!
//! Runs the full extraction pipeline against an in-memory warehouse and
//! prints the rendered Markdown document to stdout.

use serde_json::json;

use bqdoc::{ColumnSchema, Extractor, ExtractorConfig, MockWarehouse, Row, TableSchema, markdown};

fn main() -> bqdoc::Result<()> {
    // A small dataset: one table with a JSON column, one without.
    let mut events = TableSchema::with_columns(
        "events",
        vec![
            ColumnSchema::new("id", "INTEGER", "REQUIRED"),
            ColumnSchema::new("kind", "STRING", "NULLABLE").with_description("Event kind"),
            ColumnSchema::new("payload", "JSON", "NULLABLE")
                .with_description("Raw event payload"),
        ],
    );
    events.description = Some("Clickstream events captured by the web frontend.".to_string());
    events.num_rows = 4;

    let mut users = TableSchema::with_columns(
        "users",
        vec![
            ColumnSchema::new("user_id", "STRING", "REQUIRED"),
            ColumnSchema::new("created_at", "TIMESTAMP", "REQUIRED"),
        ],
    );
    users.num_rows = 2;

    // Sampled payload cells: three parse, one is garbage and gets skipped.
    let rows = vec![
        payload_row(json!(r#"{"user": "alice", "clicks": 3}"#)),
        payload_row(json!(r#"{"user": "bob", "clicks": 1, "referrer": "news"}"#)),
        payload_row(json!("not valid json")),
        payload_row(json!(r#"{"user": "carol"}"#)),
    ];

    let warehouse = MockWarehouse::new()
        .with_table(events)
        .with_table(users)
        .with_rows(rows);

    // Seeded so the output is stable from run to run.
    let config = ExtractorConfig {
        seed: Some(42),
        ..ExtractorConfig::default()
    };
    let mut extractor = Extractor::with_config(config);
    let schemas = extractor.extract_dataset(&warehouse, "analytics")?;

    println!("{}", markdown::render_dataset("analytics", &schemas));
    Ok(())
}

fn payload_row(value: serde_json::Value) -> Row {
    let mut row = Row::new();
    row.insert("payload".to_string(), value);
    row
}
