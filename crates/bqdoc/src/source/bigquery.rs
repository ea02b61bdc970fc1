//! BigQuery REST API client.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::blocking::{Client, Response};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::config;
use crate::error::{BqdocError, Result};
use crate::schema::{ColumnSchema, TableRef, TableSchema};

use super::provider::{MetadataSource, Row, TabularDataSource};

/// BigQuery v2 REST API endpoint.
const API_URL: &str = "https://bigquery.googleapis.com/bigquery/v2";

/// Page size for table listing requests.
const LIST_PAGE_SIZE: usize = 1000;

/// How long the API may hold a query open before reporting it incomplete.
const QUERY_TIMEOUT_MS: u64 = 30_000;

/// BigQuery client backed by the v2 REST API.
///
/// Implements [`MetadataSource`] for table listing/description and
/// [`TabularDataSource`] for sampling queries. Authentication uses a
/// bearer token from the environment; acquiring one is the caller's
/// concern (`gcloud auth print-access-token` or similar).
pub struct BigQueryClient {
    client: Client,
    project_id: String,
    token: String,
}

impl BigQueryClient {
    /// Create a new client for a project with the given bearer token.
    pub fn new(project_id: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| BqdocError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            project_id: project_id.into(),
            token: token.into(),
        })
    }

    /// Create from the environment.
    ///
    /// The project comes from `project`, then `PROJECT_ID`, then the
    /// built-in default; the token must be present in
    /// `GOOGLE_OAUTH_ACCESS_TOKEN`.
    pub fn from_env(project: Option<&str>) -> Result<Self> {
        let project_id = config::resolve_project(project);
        let token = config::access_token()?;
        info!("BigQuery client initialized for project {}", project_id);
        Self::new(project_id, token)
    }

    /// The project this client issues requests against.
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let bearer = format!("Bearer {}", self.token);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&bearer)
                .map_err(|e| BqdocError::Config(format!("Invalid access token: {}", e)))?,
        );
        Ok(headers)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str, params: &[(&str, String)]) -> Result<T> {
        let response = self
            .client
            .get(url)
            .headers(self.build_headers()?)
            .query(params)
            .send()?;
        decode_response(response)
    }

    fn post_json<T: DeserializeOwned>(&self, url: &str, body: &Value) -> Result<T> {
        let response = self
            .client
            .post(url)
            .headers(self.build_headers()?)
            .json(body)
            .send()?;
        decode_response(response)
    }
}

impl MetadataSource for BigQueryClient {
    fn list_tables(&self, dataset_id: &str) -> Result<Vec<TableRef>> {
        let url = format!(
            "{}/projects/{}/datasets/{}/tables",
            API_URL, self.project_id, dataset_id
        );

        let mut tables = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut params = vec![("maxResults", LIST_PAGE_SIZE.to_string())];
            if let Some(token) = &page_token {
                params.push(("pageToken", token.clone()));
            }

            let page: TableListResponse = self.get_json(&url, &params)?;
            tables.extend(page.tables.into_iter().map(|entry| {
                TableRef::new(
                    entry.table_reference.dataset_id,
                    entry.table_reference.table_id,
                )
            }));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!("Listed {} tables in dataset {}", tables.len(), dataset_id);
        Ok(tables)
    }

    fn describe_table(&self, dataset_id: &str, table_id: &str) -> Result<TableSchema> {
        let url = format!(
            "{}/projects/{}/datasets/{}/tables/{}",
            API_URL, self.project_id, dataset_id, table_id
        );
        let resource: TableResource = self.get_json(&url, &[])?;
        Ok(table_from_resource(resource))
    }
}

impl TabularDataSource for BigQueryClient {
    fn query(&self, sql: &str, max_rows: usize) -> Result<Vec<Row>> {
        let url = format!("{}/projects/{}/queries", API_URL, self.project_id);
        let body = json!({
            "query": sql,
            "useLegacySql": false,
            "maxResults": max_rows,
            "timeoutMs": QUERY_TIMEOUT_MS,
        });

        debug!("Running query: {}", sql);
        let response: QueryResponse = self.post_json(&url, &body)?;
        rows_from_response(response)
    }
}

fn decode_response<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(BqdocError::Api {
            status: status.as_u16(),
            message: api_error_message(&body),
        });
    }
    Ok(response.json()?)
}

/// Pulls the message out of a BigQuery error envelope, falling back to
/// the raw body when it is not the standard `{"error": {...}}` shape.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorResponse>(body)
        .map(|decoded| decoded.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

fn table_from_resource(resource: TableResource) -> TableSchema {
    let columns = resource
        .schema
        .map(|s| s.fields)
        .unwrap_or_default()
        .into_iter()
        .map(|field| ColumnSchema {
            name: field.name,
            field_type: field.field_type,
            mode: field.mode.unwrap_or_else(|| "NULLABLE".to_string()),
            description: field.description.unwrap_or_default(),
            json_sample: None,
        })
        .collect();

    TableSchema {
        name: resource.table_reference.table_id,
        description: resource.description.filter(|d| !d.is_empty()),
        num_rows: resource
            .num_rows
            .as_deref()
            .and_then(|n| n.parse().ok())
            .unwrap_or(0),
        created: resource
            .creation_time
            .as_deref()
            .and_then(parse_epoch_millis),
        columns,
    }
}

/// BigQuery reports `creationTime` as a stringified epoch-milliseconds value.
fn parse_epoch_millis(text: &str) -> Option<DateTime<Utc>> {
    text.parse().ok().and_then(DateTime::from_timestamp_millis)
}

/// Zips each row's cells with the response schema's field names.
fn rows_from_response(response: QueryResponse) -> Result<Vec<Row>> {
    if !response.job_complete {
        return Err(BqdocError::UnexpectedResponse(
            "query did not complete within the request timeout".to_string(),
        ));
    }

    let names: Vec<String> = response
        .schema
        .map(|s| s.fields.into_iter().map(|f| f.name).collect())
        .unwrap_or_default();

    let mut rows = Vec::with_capacity(response.rows.len());
    for row in response.rows {
        let mut decoded = Row::new();
        for (name, cell) in names.iter().zip(row.f) {
            decoded.insert(name.clone(), cell.v);
        }
        rows.push(decoded);
    }
    Ok(rows)
}

/// Response from the `tables.list` endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TableListResponse {
    #[serde(default)]
    tables: Vec<TableListEntry>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TableListEntry {
    table_reference: TableReference,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TableReference {
    dataset_id: String,
    table_id: String,
}

/// Table resource from the `tables.get` endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TableResource {
    table_reference: TableReference,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    num_rows: Option<String>,
    #[serde(default)]
    creation_time: Option<String>,
    #[serde(default)]
    schema: Option<FieldList>,
}

#[derive(Debug, Deserialize)]
struct FieldList {
    #[serde(default)]
    fields: Vec<Field>,
}

#[derive(Debug, Deserialize)]
struct Field {
    name: String,
    #[serde(rename = "type")]
    field_type: String,
    #[serde(default)]
    mode: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Response from the `jobs.query` endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResponse {
    #[serde(default)]
    job_complete: bool,
    #[serde(default)]
    schema: Option<FieldList>,
    #[serde(default)]
    rows: Vec<QueryRow>,
}

#[derive(Debug, Deserialize)]
struct QueryRow {
    #[serde(default)]
    f: Vec<QueryCell>,
}

#[derive(Debug, Deserialize)]
struct QueryCell {
    #[serde(default)]
    v: Value,
}

/// Error envelope returned by the API on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_from_resource() {
        let resource: TableResource = serde_json::from_value(json!({
            "kind": "bigquery#table",
            "tableReference": {
                "projectId": "demo",
                "datasetId": "analytics",
                "tableId": "events"
            },
            "description": "Raw event stream",
            "numRows": "12345",
            "creationTime": "1700000000000",
            "schema": {
                "fields": [
                    {"name": "id", "type": "INTEGER", "mode": "REQUIRED"},
                    {"name": "payload", "type": "JSON", "description": "event body"},
                    {"name": "name", "type": "STRING"}
                ]
            }
        }))
        .unwrap();

        let table = table_from_resource(resource);
        assert_eq!(table.name, "events");
        assert_eq!(table.description.as_deref(), Some("Raw event stream"));
        assert_eq!(table.num_rows, 12345);
        assert_eq!(table.created, DateTime::from_timestamp_millis(1_700_000_000_000));
        assert_eq!(table.column_count(), 3);

        let payload = table.get_column("payload").unwrap();
        assert!(payload.is_json());
        assert_eq!(payload.mode, "NULLABLE");
        assert_eq!(payload.description, "event body");
        let name = table.get_column("name").unwrap();
        assert!(name.description.is_empty());
    }

    #[test]
    fn test_empty_description_becomes_none() {
        let resource: TableResource = serde_json::from_value(json!({
            "tableReference": {"datasetId": "d", "tableId": "t"},
            "description": ""
        }))
        .unwrap();

        let table = table_from_resource(resource);
        assert_eq!(table.description, None);
        assert_eq!(table.num_rows, 0);
        assert_eq!(table.created, None);
        assert_eq!(table.column_count(), 0);
    }

    #[test]
    fn test_rows_zip_with_schema_fields() {
        let response: QueryResponse = serde_json::from_value(json!({
            "kind": "bigquery#queryResponse",
            "jobComplete": true,
            "schema": {"fields": [
                {"name": "payload", "type": "JSON"},
                {"name": "count", "type": "INTEGER"}
            ]},
            "rows": [
                {"f": [{"v": "{\"a\": 1}"}, {"v": "7"}]},
                {"f": [{"v": null}, {"v": "8"}]}
            ]
        }))
        .unwrap();

        let rows = rows_from_response(response).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("payload"), Some(&json!("{\"a\": 1}")));
        assert_eq!(rows[0].get("count"), Some(&json!("7")));
        assert_eq!(rows[1].get("payload"), Some(&Value::Null));
    }

    #[test]
    fn test_no_rows_returned() {
        let response: QueryResponse = serde_json::from_value(json!({
            "jobComplete": true,
            "schema": {"fields": [{"name": "payload", "type": "JSON"}]},
            "totalRows": "0"
        }))
        .unwrap();

        let rows = rows_from_response(response).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_incomplete_job_is_an_error() {
        let response: QueryResponse =
            serde_json::from_value(json!({"jobComplete": false})).unwrap();

        let result = rows_from_response(response);
        assert!(matches!(result, Err(BqdocError::UnexpectedResponse(_))));
    }

    #[test]
    fn test_api_error_message_extraction() {
        let body = r#"{"error": {"code": 404, "message": "Not found: Dataset demo:missing", "status": "NOT_FOUND"}}"#;
        assert_eq!(api_error_message(body), "Not found: Dataset demo:missing");

        assert_eq!(api_error_message("  plain failure  "), "plain failure");
    }

    #[test]
    fn test_table_list_decoding() {
        let page: TableListResponse = serde_json::from_value(json!({
            "kind": "bigquery#tableList",
            "tables": [
                {"tableReference": {"datasetId": "analytics", "tableId": "events"}},
                {"tableReference": {"datasetId": "analytics", "tableId": "users"}}
            ],
            "nextPageToken": "abc"
        }))
        .unwrap();
        assert_eq!(page.tables.len(), 2);
        assert_eq!(page.next_page_token.as_deref(), Some("abc"));

        // An empty dataset omits the tables array entirely.
        let empty: TableListResponse =
            serde_json::from_value(json!({"kind": "bigquery#tableList"})).unwrap();
        assert!(empty.tables.is_empty());
        assert_eq!(empty.next_page_token, None);
    }
}
