// ==============================================================================
// main.rs - Interactome Loader Entry Point
// ==============================================================================
// Description: Command line wrapper for dataset loading, queries and graph stats
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use interactome_loader::graph_stats;
use interactome_loader::query::DEFAULT_WARNING_THRESHOLD;
use interactome_loader::{Dataset, DatasetConfig};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a dataset from a JSON config and optionally checkpoint it
    Load {
        /// Dataset config (label, edge_files, node_files, other_files, data_dir)
        #[arg(short, long, env = "INTERACTOME_CONFIG")]
        config: PathBuf,

        /// Where to write the dataset checkpoint
        #[arg(long)]
        checkpoint: Option<PathBuf>,
    },

    /// Query node feature columns from a checkpointed dataset
    Query {
        /// Checkpoint written by `load`
        #[arg(long)]
        checkpoint: PathBuf,

        /// Comma-separated column names
        #[arg(short, long, value_delimiter = ',', required = true)]
        columns: Vec<String>,

        /// Coverage fraction at or below which a warning is raised
        #[arg(long, default_value_t = DEFAULT_WARNING_THRESHOLD)]
        threshold: f64,

        /// Write the selected rows as TSV instead of only reporting coverage
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compute degree, clustering and betweenness for an edge list
    Stats {
        /// Edge list with `source target rank` lines
        #[arg(short, long)]
        input: PathBuf,

        /// JSON output path
        #[arg(short, long)]
        output: PathBuf,

        /// Treat edges as directed
        #[arg(long)]
        directed: bool,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "interactome_loader=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    match args.command {
        Command::Load { config, checkpoint } => {
            let config = DatasetConfig::from_json_file(&config)
                .with_context(|| format!("Failed to read dataset config {:?}", config))?;
            let dataset = Dataset::load(&config)
                .with_context(|| format!("Failed to load dataset '{}'", config.label))?;

            info!(
                "Dataset '{}': {} nodes, columns {:?}",
                dataset.label(),
                dataset.node_table().len(),
                dataset.node_table().column_names()
            );

            if let Some(path) = checkpoint {
                dataset
                    .to_file(&path)
                    .with_context(|| format!("Failed to write checkpoint {:?}", path))?;
            }
        }

        Command::Query {
            checkpoint,
            columns,
            threshold,
            output,
        } => {
            let dataset = Dataset::from_file(&checkpoint)
                .with_context(|| format!("Failed to restore checkpoint {:?}", checkpoint))?
                .with_warning_threshold(threshold);

            // low-coverage diagnostics are already logged by the query engine
            let selection = dataset.request_node_columns(columns.as_slice())?;

            info!(
                "{} of {} nodes ({:.2}%) have data in {:?}",
                selection.coverage.rows_kept,
                selection.coverage.total_rows,
                selection.coverage_percent(),
                selection.coverage.columns
            );

            if let Some(path) = output {
                selection
                    .table
                    .to_tsv_file(&path)
                    .with_context(|| format!("Failed to write {:?}", path))?;
                info!("Wrote selection to {:?}", path);
            }
        }

        Command::Stats {
            input,
            output,
            directed,
        } => {
            let report = graph_stats::run(&input, &output, directed)
                .with_context(|| format!("Failed to compute statistics for {:?}", input))?;
            info!("Computed {} statistics: {:?}", report.len(), report.keys().collect::<Vec<_>>());
        }
    }

    Ok(())
}
