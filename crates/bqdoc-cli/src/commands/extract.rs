//! Extract command - document a dataset's schema as Markdown.

use std::path::PathBuf;

use colored::Colorize;
use tracing::{debug, warn};

use bqdoc::{BigQueryClient, Extractor, MetadataSource, config, markdown};

pub fn run(
    dataset: String,
    output: PathBuf,
    project: Option<String>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Credential preflight before any network traffic.
    match config::check_credentials() {
        Ok(detail) => debug!("{}", detail),
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Please set the GOOGLE_APPLICATION_CREDENTIALS environment variable.");
            std::process::exit(1);
        }
    }

    let client = BigQueryClient::from_env(project.as_deref())?;

    let tables = client.list_tables(&dataset)?;
    if tables.is_empty() {
        println!("Warning: No tables found in dataset '{}'", dataset);
        return Ok(());
    }

    println!(
        "Found {} tables in dataset '{}'",
        tables.len().to_string().white().bold(),
        dataset
    );

    let mut extractor = Extractor::new();
    let mut schemas = Vec::with_capacity(tables.len());

    for table in &tables {
        println!(
            "{} {}",
            "Extracting".cyan().bold(),
            table.to_string().white()
        );

        let schema = extractor.extract_table(&client, &dataset, &table.table_id)?;

        if verbose {
            let json_count = schema.json_columns().len();
            println!(
                "  {} columns ({} JSON)",
                schema.column_count().to_string().white().bold(),
                json_count
            );
        }

        schemas.push(schema);
    }

    println!("Formatting as Markdown...");
    let content = markdown::render_dataset(&dataset, &schemas);

    // A failed write costs us the file, not the run.
    match markdown::save(&content, &output) {
        Ok(()) => {
            println!(
                "{} {}",
                "Successfully saved schema to".green().bold(),
                output.display().to_string().white()
            );
        }
        Err(e) => {
            warn!("Could not save output: {}", e);
            eprintln!("Warning: {}", e);
        }
    }

    Ok(())
}
