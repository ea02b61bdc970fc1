//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// bqdoc: BigQuery dataset schema documentation generator
#[derive(Parser)]
#[command(name = "bqdoc")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract a dataset's schema and write it as a Markdown document
    Extract {
        /// BigQuery dataset ID to document
        #[arg(short, long)]
        dataset: String,

        /// Path for the generated Markdown file
        #[arg(value_name = "OUTPUT_FILE")]
        output: PathBuf,

        /// Google Cloud project ID (default: $PROJECT_ID)
        #[arg(short, long)]
        project: Option<String>,
    },
}
