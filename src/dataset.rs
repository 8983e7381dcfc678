// ==============================================================================
// dataset.rs - Dataset Container
// ==============================================================================
// Description: Loads a configured network dataset and exposes read-only views
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{DataError, Result};
use crate::merger::build_node_table;
use crate::models::{InteractionTable, NodeId};
use crate::node_table::NodeTable;
use crate::parsers::InteractomeParser;
use crate::query::{ColumnSelection, QueryEngine, DEFAULT_WARNING_THRESHOLD};

/// Bumped whenever the serialized `Dataset` layout changes
const CHECKPOINT_FORMAT_VERSION: u32 = 1;

/// Dataset description, normally one entry of the run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub label: String,
    /// Only the first entry is loaded
    pub edge_files: Vec<PathBuf>,
    #[serde(default)]
    pub node_files: Vec<PathBuf>,
    #[serde(default)]
    pub other_files: Vec<PathBuf>,
    pub data_dir: PathBuf,
}

impl DatasetConfig {
    /// Read a dataset description from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| DataError::io(path, e))?;
        let config: DatasetConfig = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| DataError::Config(format!("{:?}: {}", path, e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.edge_files.is_empty() {
            return Err(DataError::Config(format!(
                "dataset '{}' lists no edge_files",
                self.label
            )));
        }
        Ok(())
    }
}

/// A loaded network dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    label: String,
    interactome: InteractionTable,
    node_table: NodeTable,
    node_set: BTreeSet<NodeId>,
    other_files: Vec<PathBuf>,
    warning_threshold: f64,
}

#[derive(Serialize, Deserialize)]
struct CheckpointEnvelope {
    format_version: u32,
    saved_at: DateTime<Utc>,
    /// Hex SHA-256 of `dataset`
    sha256: String,
    /// Serialized `Dataset` JSON
    dataset: String,
}

impl Dataset {
    /// Load every file named in `config`
    ///
    /// # Process
    /// 1. Parse `edge_files[0]` as the interaction table
    /// 2. Merge `node_files` into the node table, in order
    /// 3. Keep `other_files` as opaque references
    ///
    /// Any failure aborts the load; no partially-built dataset is returned.
    pub fn load(config: &DatasetConfig) -> Result<Self> {
        config.validate()?;
        info!("Loading dataset '{}' from {:?}", config.label, config.data_dir);

        // TODO: merge additional edge files once the interactome supports multiple sources
        if config.edge_files.len() > 1 {
            warn!(
                "Dataset '{}' lists {} edge files; only {:?} is loaded",
                config.label,
                config.edge_files.len(),
                config.edge_files[0]
            );
        }

        let interactome_path = config.data_dir.join(&config.edge_files[0]);
        let interactome = InteractomeParser::new().parse(&interactome_path)?;

        let node_table = build_node_table(&interactome, &config.node_files, &config.data_dir)?;
        let node_set = node_table.node_ids().iter().cloned().collect();

        info!(
            "Dataset '{}' loaded: {} nodes, {} interactions, {} feature columns",
            config.label,
            node_table.len(),
            interactome.len(),
            node_table.columns().len()
        );

        Ok(Self {
            label: config.label.clone(),
            interactome,
            node_table,
            node_set,
            other_files: config.other_files.clone(),
            warning_threshold: DEFAULT_WARNING_THRESHOLD,
        })
    }

    /// Override the coverage fraction at or below which queries warn
    pub fn with_warning_threshold(mut self, warning_threshold: f64) -> Self {
        self.warning_threshold = warning_threshold;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn node_table(&self) -> &NodeTable {
        &self.node_table
    }

    pub fn node_ids(&self) -> &BTreeSet<NodeId> {
        &self.node_set
    }

    /// Copy of the interaction table
    pub fn interactome(&self) -> InteractionTable {
        self.interactome.clone()
    }

    /// Copy of the auxiliary file list
    pub fn other_files(&self) -> Vec<PathBuf> {
        self.other_files.clone()
    }

    pub fn request_node_columns<S: AsRef<str>>(&self, columns: &[S]) -> Result<ColumnSelection> {
        QueryEngine::with_threshold(self.warning_threshold).request_node_columns(&self.node_table, columns)
    }

    pub fn request_edge_columns<S: AsRef<str>>(&self, columns: &[S]) -> Result<NodeTable> {
        QueryEngine::with_threshold(self.warning_threshold).request_edge_columns(columns)
    }

    /// Save the dataset as a gzip-compressed checkpoint
    ///
    /// The format is tied to this crate version and is not meant for exchange.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let dataset = serde_json::to_string(self)
            .map_err(|e| DataError::Checkpoint(format!("Failed to serialize dataset: {}", e)))?;
        let envelope = CheckpointEnvelope {
            format_version: CHECKPOINT_FORMAT_VERSION,
            saved_at: Utc::now(),
            sha256: sha256_hex(dataset.as_bytes()),
            dataset,
        };

        let file = File::create(path).map_err(|e| DataError::io(path, e))?;
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        serde_json::to_writer(&mut encoder, &envelope)
            .map_err(|e| DataError::Checkpoint(format!("Failed to write checkpoint: {}", e)))?;
        encoder
            .finish()
            .and_then(|mut writer| writer.flush())
            .map_err(|e| DataError::io(path, e))?;

        info!("Saved dataset '{}' checkpoint to {:?}", self.label, path);
        Ok(())
    }

    /// Restore a dataset saved with [`Dataset::to_file`]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| DataError::io(path, e))?;
        let decoder = GzDecoder::new(BufReader::new(file));

        let envelope: CheckpointEnvelope = serde_json::from_reader(decoder)
            .map_err(|e| DataError::Checkpoint(format!("Unreadable checkpoint {:?}: {}", path, e)))?;

        if envelope.format_version != CHECKPOINT_FORMAT_VERSION {
            return Err(DataError::Checkpoint(format!(
                "Checkpoint format version {} is not supported (expected {})",
                envelope.format_version, CHECKPOINT_FORMAT_VERSION
            )));
        }

        if sha256_hex(envelope.dataset.as_bytes()) != envelope.sha256 {
            return Err(DataError::Checkpoint(format!(
                "Checksum mismatch in {:?}",
                path
            )));
        }

        let dataset: Dataset = serde_json::from_str(&envelope.dataset)
            .map_err(|e| DataError::Checkpoint(format!("Corrupt dataset payload: {}", e)))?;

        info!(
            "Restored dataset '{}' (saved {}) from {:?}",
            dataset.label, envelope.saved_at, path
        );
        Ok(dataset)
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
