//! Extraction pipeline: describe tables, sample JSON columns, annotate schemas.

use tracing::{debug, info};

use crate::error::Result;
use crate::inference::Inferencer;
use crate::sampler::{DEFAULT_ROW_LIMIT, DEFAULT_SAMPLE_SIZE, Sampler};
use crate::schema::TableSchema;
use crate::source::{MetadataSource, TabularDataSource};

/// Configuration for the extraction pipeline.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Maximum rows fetched per sampling query.
    pub row_limit: usize,
    /// Rows randomly kept from the fetched set.
    pub sample_size: usize,
    /// Seed for reproducible sampling (`None` = fresh randomness).
    pub seed: Option<u64>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            row_limit: DEFAULT_ROW_LIMIT,
            sample_size: DEFAULT_SAMPLE_SIZE,
            seed: None,
        }
    }
}

/// The extraction engine.
///
/// Pulls table schemas from a metadata source and annotates JSON
/// columns with shapes inferred from sampled rows. Metadata failures
/// propagate to the caller; sampling failures only cost the affected
/// table its annotations.
pub struct Extractor {
    sampler: Sampler,
    inferencer: Inferencer,
}

impl Extractor {
    /// Create a new extractor with default configuration.
    pub fn new() -> Self {
        Self::with_config(ExtractorConfig::default())
    }

    /// Create an extractor with custom configuration.
    pub fn with_config(config: ExtractorConfig) -> Self {
        let sampler = match config.seed {
            Some(seed) => Sampler::with_seed(config.row_limit, config.sample_size, seed),
            None => Sampler::new(config.row_limit, config.sample_size),
        };
        Self {
            sampler,
            inferencer: Inferencer::new(),
        }
    }

    /// Extract the schema of every table in a dataset, in listing order.
    pub fn extract_dataset<S>(&mut self, source: &S, dataset_id: &str) -> Result<Vec<TableSchema>>
    where
        S: MetadataSource + TabularDataSource,
    {
        let tables = source.list_tables(dataset_id)?;
        info!(
            "Extracting {} tables from dataset {}",
            tables.len(),
            dataset_id
        );

        let mut schemas = Vec::with_capacity(tables.len());
        for table in &tables {
            schemas.push(self.extract_table(source, dataset_id, &table.table_id)?);
        }
        Ok(schemas)
    }

    /// Extract one table's schema and annotate its JSON columns.
    pub fn extract_table<S>(
        &mut self,
        source: &S,
        dataset_id: &str,
        table_id: &str,
    ) -> Result<TableSchema>
    where
        S: MetadataSource + TabularDataSource,
    {
        let mut table = source.describe_table(dataset_id, table_id)?;
        debug!("Retrieved schema for {}.{}", dataset_id, table_id);
        self.annotate_json_columns(source, dataset_id, table_id, &mut table);
        Ok(table)
    }

    /// Samples all JSON columns with a single query and attaches the
    /// inferred shape to each column that produced parseable values.
    fn annotate_json_columns(
        &mut self,
        source: &dyn TabularDataSource,
        dataset_id: &str,
        table_id: &str,
        table: &mut TableSchema,
    ) {
        let json_columns = table.json_columns();
        if json_columns.is_empty() {
            return;
        }
        if table.num_rows == 0 {
            debug!(
                "Table {}.{} is empty; skipping JSON sampling",
                dataset_id, table_id
            );
            return;
        }

        info!(
            "Sampling {} JSON column(s) in {}.{}",
            json_columns.len(),
            dataset_id,
            table_id
        );
        let mut sampled = self
            .sampler
            .sample(source, dataset_id, table_id, &json_columns);
        for column in table.columns.iter_mut().filter(|c| c.is_json()) {
            let Some(values) = sampled.remove(&column.name) else {
                continue;
            };
            column.json_sample = self.inferencer.infer(&column.name, &values);
        }
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}
