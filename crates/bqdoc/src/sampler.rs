//! Bounded random sampling of JSON column values.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::source::TabularDataSource;

/// Default cap on rows fetched per sampling query.
pub const DEFAULT_ROW_LIMIT: usize = 100;

/// Default number of rows randomly kept from the fetched set.
pub const DEFAULT_SAMPLE_SIZE: usize = 10;

// Identifiers get interpolated into SQL, so only word characters are
// accepted; anything else is treated like a failed query.
static SAFE_IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").unwrap());

/// Randomly samples non-null JSON column values from a table.
///
/// One query fetches up to `row_limit` rows where every requested column
/// is non-null, and `sample_size` of them are kept (all of them when
/// fewer arrive). Sampling failures are logged and produce an empty
/// mapping, so a single bad table never aborts a dataset run.
pub struct Sampler {
    row_limit: usize,
    sample_size: usize,
    rng: fastrand::Rng,
}

impl Sampler {
    /// Create a sampler with its own RNG state.
    pub fn new(row_limit: usize, sample_size: usize) -> Self {
        Self {
            row_limit,
            sample_size,
            rng: fastrand::Rng::new(),
        }
    }

    /// Create a sampler with a fixed seed, for reproducible runs.
    pub fn with_seed(row_limit: usize, sample_size: usize, seed: u64) -> Self {
        Self {
            row_limit,
            sample_size,
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Sample values for `columns` from `dataset_id.table_id`.
    ///
    /// Returns a map from column name to the values of the selected
    /// rows. With no columns to sample, returns an empty map without
    /// issuing a query.
    pub fn sample(
        &mut self,
        source: &dyn TabularDataSource,
        dataset_id: &str,
        table_id: &str,
        columns: &[String],
    ) -> HashMap<String, Vec<Value>> {
        if columns.is_empty() {
            return HashMap::new();
        }

        let Some(sql) = build_sample_query(dataset_id, table_id, columns, self.row_limit) else {
            warn!(
                "Skipping sampling for {}.{}: identifier not safe to quote",
                dataset_id, table_id
            );
            return HashMap::new();
        };

        let rows = match source.query(&sql, self.row_limit) {
            Ok(rows) => rows,
            Err(e) => {
                warn!(
                    "Sampling query failed for {}.{}: {}",
                    dataset_id, table_id, e
                );
                return HashMap::new();
            }
        };

        if rows.is_empty() {
            warn!("No non-null rows to sample in {}.{}", dataset_id, table_id);
            return HashMap::new();
        }

        let fetched = rows.len();
        let selected = if fetched > self.sample_size {
            self.rng.choose_multiple(rows, self.sample_size)
        } else {
            rows
        };
        debug!(
            "Sampled {} of {} fetched rows from {}.{}",
            selected.len(),
            fetched,
            dataset_id,
            table_id
        );

        let mut by_column = HashMap::with_capacity(columns.len());
        for column in columns {
            let values: Vec<Value> = selected
                .iter()
                .filter_map(|row| row.get(column).cloned())
                .collect();
            by_column.insert(column.clone(), values);
        }
        by_column
    }
}

/// Builds the sampling query, or `None` when an identifier is unsafe.
fn build_sample_query(
    dataset_id: &str,
    table_id: &str,
    columns: &[String],
    limit: usize,
) -> Option<String> {
    let safe = |ident: &str| SAFE_IDENTIFIER.is_match(ident);
    if !safe(dataset_id) || !safe(table_id) || !columns.iter().all(|c| safe(c)) {
        return None;
    }

    let select_list = columns
        .iter()
        .map(|c| format!("`{}`", c))
        .collect::<Vec<_>>()
        .join(", ");
    let predicate = columns
        .iter()
        .map(|c| format!("`{}` IS NOT NULL", c))
        .collect::<Vec<_>>()
        .join(" AND ");

    Some(format!(
        "SELECT {} FROM `{}.{}` WHERE {} LIMIT {}",
        select_list, dataset_id, table_id, predicate, limit
    ))
}
