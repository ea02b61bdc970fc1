//! Integration tests for the extraction pipeline.
//!
//! These tests drive `Extractor` end to end against a `MockWarehouse`,
//! covering JSON column annotation, failure recovery, and the rendered
//! Markdown document.

use std::fs;

use serde_json::{Value, json};
use tempfile::TempDir;

use bqdoc::{ColumnSchema, Extractor, ExtractorConfig, MockWarehouse, Row, TableSchema, markdown};

/// Helper to build a query result row from column/value pairs.
fn row(pairs: &[(&str, Value)]) -> Row {
    let mut row = Row::new();
    for (column, value) in pairs {
        row.insert(column.to_string(), value.clone());
    }
    row
}

/// A table with a JSON column alongside a plain column.
fn events_table(num_rows: u64) -> TableSchema {
    let mut table = TableSchema::with_columns(
        "events",
        vec![
            ColumnSchema::new("id", "INTEGER", "REQUIRED"),
            ColumnSchema::new("payload", "JSON", "NULLABLE").with_description("Event payload"),
        ],
    );
    table.num_rows = num_rows;
    table
}

/// A table with no JSON columns at all.
fn logs_table() -> TableSchema {
    let mut table = TableSchema::with_columns(
        "logs",
        vec![
            ColumnSchema::new("ts", "TIMESTAMP", "REQUIRED"),
            ColumnSchema::new("message", "STRING", "NULLABLE"),
        ],
    );
    table.num_rows = 1_000;
    table
}

// =============================================================================
// JSON Annotation Tests
// =============================================================================

#[test]
fn test_json_column_annotated_from_sampled_rows() {
    // Five sampled values: three parse, two are garbage.
    let warehouse = MockWarehouse::new()
        .with_table(events_table(5))
        .with_rows(vec![
            row(&[("payload", json!(r#"{"user": "alice", "clicks": 3}"#))]),
            row(&[("payload", json!(r#"{"user": "bob"}"#))]),
            row(&[("payload", json!("not json at all"))]),
            row(&[(
                "payload",
                json!(r#"{"user": "carol", "clicks": 7, "tags": ["a"]}"#),
            )]),
            row(&[("payload", json!("{broken"))]),
        ]);

    let mut extractor = Extractor::new();
    let schemas = extractor
        .extract_dataset(&warehouse, "analytics")
        .expect("Extraction failed");

    assert_eq!(schemas.len(), 1);
    let payload = schemas[0].get_column("payload").expect("payload column");
    let sample = payload
        .json_sample
        .as_ref()
        .expect("payload should be annotated");

    // All three parseable values are kept for display.
    assert_eq!(sample.samples.len(), 3);

    // The merged schema is an object covering every observed key.
    let schema_json = serde_json::to_value(&sample.schema).expect("Serialization failed");
    assert_eq!(schema_json["type"], "object");
    let properties = schema_json["properties"]
        .as_object()
        .expect("object schema should list properties");
    assert!(properties.contains_key("user"));
    assert!(properties.contains_key("clicks"));
    assert!(properties.contains_key("tags"));

    // Non-JSON columns are never annotated.
    assert!(schemas[0].get_column("id").expect("id column").json_sample.is_none());
}

#[test]
fn test_all_json_columns_share_one_query() {
    let mut table = TableSchema::with_columns(
        "sessions",
        vec![
            ColumnSchema::new("context", "JSON", "NULLABLE"),
            ColumnSchema::new("device", "JSON", "NULLABLE"),
        ],
    );
    table.num_rows = 2;

    let warehouse = MockWarehouse::new().with_table(table).with_rows(vec![
        row(&[
            ("context", json!({"page": "/home"})),
            ("device", json!({"os": "linux"})),
        ]),
        row(&[
            ("context", json!({"page": "/about"})),
            ("device", json!({"os": "macos"})),
        ]),
    ]);

    let mut extractor = Extractor::new();
    let schemas = extractor
        .extract_dataset(&warehouse, "analytics")
        .expect("Extraction failed");

    // One sampling query covers both JSON columns.
    assert_eq!(warehouse.query_count(), 1);
    let queries = warehouse.queries();
    assert!(queries[0].contains("`context`"));
    assert!(queries[0].contains("`device`"));

    let table = &schemas[0];
    assert!(table.get_column("context").expect("context").json_sample.is_some());
    assert!(table.get_column("device").expect("device").json_sample.is_some());
}

#[test]
fn test_plain_tables_issue_no_queries() {
    let warehouse = MockWarehouse::new().with_table(logs_table());

    let mut extractor = Extractor::new();
    let schemas = extractor
        .extract_dataset(&warehouse, "analytics")
        .expect("Extraction failed");

    assert_eq!(warehouse.query_count(), 0);
    assert!(schemas[0].columns.iter().all(|c| c.json_sample.is_none()));
}

#[test]
fn test_empty_table_skips_sampling() {
    let warehouse = MockWarehouse::new().with_table(events_table(0));

    let mut extractor = Extractor::new();
    let schemas = extractor
        .extract_dataset(&warehouse, "analytics")
        .expect("Extraction failed");

    assert_eq!(warehouse.query_count(), 0);
    assert!(schemas[0].get_column("payload").expect("payload").json_sample.is_none());
}

#[test]
fn test_sampling_respects_configured_sizes() {
    let rows: Vec<Row> = (0..50)
        .map(|i| row(&[("payload", json!(format!(r#"{{"n": {}}}"#, i)))]))
        .collect();
    let warehouse = MockWarehouse::new()
        .with_table(events_table(50))
        .with_rows(rows);

    let config = ExtractorConfig {
        row_limit: 20,
        sample_size: 5,
        seed: Some(7),
    };
    let mut extractor = Extractor::with_config(config);
    let schemas = extractor
        .extract_dataset(&warehouse, "analytics")
        .expect("Extraction failed");

    // The configured row limit flows into the sampling query.
    assert_eq!(
        warehouse.queries(),
        vec![
            "SELECT `payload` FROM `analytics.events` WHERE `payload` IS NOT NULL LIMIT 20"
                .to_string()
        ]
    );

    // Five rows sampled, at most three kept for display.
    let sample = schemas[0]
        .get_column("payload")
        .expect("payload")
        .json_sample
        .as_ref()
        .expect("payload should be annotated");
    assert_eq!(sample.samples.len(), 3);
}

// =============================================================================
// Failure Recovery Tests
// =============================================================================

#[test]
fn test_failed_sampling_query_does_not_fail_the_run() {
    let warehouse = MockWarehouse::new()
        .with_table(events_table(10))
        .with_table(logs_table())
        .with_query_error("Exceeded rate limits for this project");

    let mut extractor = Extractor::new();
    let schemas = extractor
        .extract_dataset(&warehouse, "analytics")
        .expect("Extraction should survive query failures");

    // Both tables come back; the JSON column just stays unannotated.
    assert_eq!(schemas.len(), 2);
    assert!(schemas[0].get_column("payload").expect("payload").json_sample.is_none());
    assert_eq!(schemas[1].name, "logs");
}

#[test]
fn test_unparseable_values_leave_column_unannotated() {
    let warehouse = MockWarehouse::new()
        .with_table(events_table(2))
        .with_rows(vec![
            row(&[("payload", json!("oops"))]),
            row(&[("payload", json!("also not json"))]),
        ]);

    let mut extractor = Extractor::new();
    let schemas = extractor
        .extract_dataset(&warehouse, "analytics")
        .expect("Extraction failed");

    assert!(schemas[0].get_column("payload").expect("payload").json_sample.is_none());
}

#[test]
fn test_missing_table_is_a_hard_error() {
    let warehouse = MockWarehouse::new().with_table(events_table(5));

    let mut extractor = Extractor::new();
    let result = extractor.extract_table(&warehouse, "analytics", "vanished");

    assert!(result.is_err());
}

// =============================================================================
// Markdown Output Tests
// =============================================================================

#[test]
fn test_end_to_end_markdown_document() {
    let warehouse = MockWarehouse::new()
        .with_table(events_table(5))
        .with_table(logs_table())
        .with_rows(vec![
            row(&[("payload", json!(r#"{"user": "alice"}"#))]),
            row(&[("payload", json!(r#"{"user": "bob", "clicks": 2}"#))]),
        ]);

    let mut extractor = Extractor::new();
    let schemas = extractor
        .extract_dataset(&warehouse, "analytics")
        .expect("Extraction failed");
    let document = markdown::render_dataset("analytics", &schemas);

    // Document skeleton.
    assert!(document.starts_with("# Dataset: analytics"));
    assert!(document.contains(
        "This document contains the schema information for 2 tables in the `analytics` dataset."
    ));

    // Table of contents with anchors.
    assert!(document.contains("- [events](#events)"));
    assert!(document.contains("- [logs](#logs)"));
    assert!(document.contains("<a id='events'></a>"));
    assert!(document.contains("<a id='logs'></a>"));

    // Column tables.
    assert!(document.contains("| payload | JSON | NULLABLE | Event payload |"));
    assert!(document.contains("| message | STRING | NULLABLE |  |"));

    // The annotated JSON column gets a detail section with samples.
    assert!(document.contains("### JSON Field: payload"));
    assert!(document.contains("#### Schema"));
    assert!(document.contains("#### Sample Values"));
    assert!(document.contains("**Sample 1:**"));
    assert!(document.contains("\"user\""));
}

#[test]
fn test_unannotated_json_column_gets_no_detail_section() {
    let warehouse = MockWarehouse::new()
        .with_table(events_table(3))
        .with_query_error("backend unavailable");

    let mut extractor = Extractor::new();
    let schemas = extractor
        .extract_dataset(&warehouse, "analytics")
        .expect("Extraction failed");
    let document = markdown::render_dataset("analytics", &schemas);

    // The column row is still there, but no JSON Field section follows.
    assert!(document.contains("| payload | JSON | NULLABLE | Event payload |"));
    assert!(!document.contains("### JSON Field: payload"));
}

#[test]
fn test_schema_serialization() {
    let warehouse = MockWarehouse::new()
        .with_table(events_table(2))
        .with_rows(vec![row(&[("payload", json!(r#"{"k": 1}"#))])]);

    let mut extractor = Extractor::new();
    let schemas = extractor
        .extract_dataset(&warehouse, "analytics")
        .expect("Extraction failed");

    let json = serde_json::to_string_pretty(&schemas[0]).expect("Serialization failed");
    assert!(json.contains("\"columns\""));
    assert!(json.contains("\"type\": \"JSON\""));
    assert!(json.contains("\"json_sample\""));
}

// =============================================================================
// File Save Tests
// =============================================================================

#[test]
fn test_document_round_trips_through_save() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("analytics.md");

    let document = markdown::render_dataset("analytics", &[logs_table()]);
    markdown::save(&document, &path).expect("Save failed");

    let written = fs::read_to_string(&path).expect("Read failed");
    assert_eq!(written, document);
}

#[test]
fn test_save_into_missing_directory_fails_with_path() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("no_such_dir").join("analytics.md");

    let result = markdown::save("# Dataset: analytics", &path);
    let err = result.expect_err("Save into a missing directory should fail");
    assert!(err.to_string().contains("no_such_dir"));
}
