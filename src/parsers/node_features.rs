// ==============================================================================
// node_features.rs - Node Feature File Parser
// ==============================================================================
// Description: Parser for per-node feature tables and indicator lists
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================
// Format: Tab-delimited text
//
// Indicator file (one column, no header) - every listed node is True:
//   TP53
//   MDM2
//
// Valued file (header row, first column is the node identifier):
//   NODEID    expression    pathway
//   TP53      4.2           apoptosis
//   MDM2      NA            apoptosis
// ==============================================================================

use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{DataError, Result};
use crate::models::{NodeId, Value};

/// Semantic type of a node feature file, decided by its column count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureFileKind {
    /// Single column of node identifiers; presence means True
    Indicator,
    /// Header plus identifier column plus one or more named value columns
    Valued,
}

impl FeatureFileKind {
    /// Classify a file from the width of its first row.
    ///
    /// Returns `None` for a zero-width (empty) file.
    pub fn classify(width: usize) -> Option<Self> {
        match width {
            0 => None,
            1 => Some(FeatureFileKind::Indicator),
            _ => Some(FeatureFileKind::Valued),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureFileKind::Indicator => "indicator",
            FeatureFileKind::Valued => "valued",
        }
    }
}

/// One node's values from a feature file, aligned with `FeatureFile::columns`
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub node_id: NodeId,
    pub values: Vec<Option<Value>>,
}

/// A parsed node feature file, not yet merged
#[derive(Debug, Clone)]
pub struct FeatureFile {
    pub path: PathBuf,
    pub kind: FeatureFileKind,
    /// Feature column names, excluding the node identifier column
    pub columns: Vec<String>,
    pub rows: Vec<FeatureRow>,
}

/// Column name for an indicator file: the file name up to its first '.'
///
/// `data/cancer_genes.v2.txt` -> `cancer_genes`
pub fn indicator_column_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    file_name
        .split('.')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Parser for node feature files
#[derive(Debug, Clone, Default)]
pub struct NodeFeatureParser;

impl NodeFeatureParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a node feature file and classify it
    ///
    /// # Arguments
    /// * `path` - Path to the feature file
    ///
    /// # Returns
    /// * `Ok(FeatureFile)` - Parsed rows with their inferred kind
    /// * `Err(DataError::FileIo)` - File missing or unreadable
    /// * `Err(DataError::Format)` - Empty file or ragged rows
    ///
    /// The file is read once; blank lines are skipped. Rows without a node
    /// identifier cannot join anything and are dropped.
    pub fn parse(&self, path: impl AsRef<Path>) -> Result<FeatureFile> {
        let path = path.as_ref();
        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(|e| DataError::from_csv(path, e))?;

        let mut records: Vec<StringRecord> = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| DataError::from_csv(path, e))?;
            if record.iter().all(|field| field.trim().is_empty()) {
                continue;
            }
            records.push(record);
        }

        let width = records.first().map(|r| r.len()).unwrap_or(0);
        let kind = FeatureFileKind::classify(width)
            .ok_or_else(|| DataError::format(path, 1, "Node feature file is empty"))?;

        debug!("Classified {:?} as {} ({} columns)", path, kind.as_str(), width);

        match kind {
            FeatureFileKind::Indicator => Ok(self.build_indicator(path, &records)),
            FeatureFileKind::Valued => self.build_valued(path, &records),
        }
    }

    fn build_indicator(&self, path: &Path, records: &[StringRecord]) -> FeatureFile {
        let rows = records
            .iter()
            .filter_map(|record| record.get(0))
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| FeatureRow {
                node_id: id.to_string(),
                values: vec![Some(Value::Bool(true))],
            })
            .collect();

        FeatureFile {
            path: path.to_path_buf(),
            kind: FeatureFileKind::Indicator,
            columns: vec![indicator_column_name(path)],
            rows,
        }
    }

    fn build_valued(&self, path: &Path, records: &[StringRecord]) -> Result<FeatureFile> {
        let (header, body) = records
            .split_first()
            .ok_or_else(|| DataError::format(path, 1, "Node feature file is empty"))?;
        let width = header.len();

        let columns: Vec<String> = header
            .iter()
            .enumerate()
            .skip(1)
            .map(|(idx, name)| {
                let name = name.trim();
                if name.is_empty() {
                    format!("Unnamed: {}", idx)
                } else {
                    name.to_string()
                }
            })
            .collect();

        let mut rows = Vec::with_capacity(body.len());
        let mut missing_ids = 0usize;

        for record in body {
            if record.len() != width {
                let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
                return Err(DataError::format(
                    path,
                    line,
                    format!("Expected {} tab-delimited fields, found {}", width, record.len()),
                ));
            }

            let node_id = record.get(0).unwrap_or_default().trim();
            if node_id.is_empty() {
                missing_ids += 1;
                continue;
            }

            rows.push(FeatureRow {
                node_id: node_id.to_string(),
                values: record.iter().skip(1).map(Value::parse).collect(),
            });
        }

        if missing_ids > 0 {
            debug!("Skipped {} rows without a node identifier in {:?}", missing_ids, path);
        }

        Ok(FeatureFile {
            path: path.to_path_buf(),
            kind: FeatureFileKind::Valued,
            columns,
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn create_test_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_classify() {
        assert_eq!(FeatureFileKind::classify(0), None);
        assert_eq!(FeatureFileKind::classify(1), Some(FeatureFileKind::Indicator));
        assert_eq!(FeatureFileKind::classify(2), Some(FeatureFileKind::Valued));
        assert_eq!(FeatureFileKind::classify(12), Some(FeatureFileKind::Valued));
    }

    #[test]
    fn test_indicator_column_name() {
        assert_eq!(indicator_column_name(Path::new("sources.txt")), "sources");
        assert_eq!(indicator_column_name(Path::new("data/cancer_genes.v2.txt")), "cancer_genes");
        assert_eq!(indicator_column_name(Path::new("targets")), "targets");
    }

    #[test]
    fn test_parse_indicator_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("receptors.txt");
        std::fs::write(&path, "EGFR\nERBB2\n\nINSR\n").unwrap();

        let parsed = NodeFeatureParser::new().parse(&path).unwrap();

        assert_eq!(parsed.kind, FeatureFileKind::Indicator);
        assert_eq!(parsed.columns, vec!["receptors"]);
        assert_eq!(parsed.rows.len(), 3);
        assert_eq!(parsed.rows[0].node_id, "EGFR");
        assert_eq!(parsed.rows[2].values, vec![Some(Value::Bool(true))]);
    }

    #[test]
    fn test_parse_valued_file() {
        let file = create_test_file(
            "NODEID\texpression\tpathway\nTP53\t4.2\tapoptosis\nMDM2\tNA\tapoptosis\n",
        );

        let parsed = NodeFeatureParser::new().parse(file.path()).unwrap();

        assert_eq!(parsed.kind, FeatureFileKind::Valued);
        assert_eq!(parsed.columns, vec!["expression", "pathway"]);
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[0].values[0], Some(Value::Float(4.2)));
        assert_eq!(parsed.rows[1].values[0], None);
        assert_eq!(parsed.rows[1].values[1], Some(Value::Text("apoptosis".to_string())));
    }

    #[test]
    fn test_first_column_is_node_id_regardless_of_name() {
        let file = create_test_file("gene\tscore\nTP53\t7\n");

        let parsed = NodeFeatureParser::new().parse(file.path()).unwrap();

        assert_eq!(parsed.columns, vec!["score"]);
        assert_eq!(parsed.rows[0].node_id, "TP53");
        assert_eq!(parsed.rows[0].values, vec![Some(Value::Int(7))]);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let file = create_test_file("NODEID\tscore\tlabel\nTP53\t7\n");

        match NodeFeatureParser::new().parse(file.path()).unwrap_err() {
            DataError::Format { line, details, .. } => {
                assert_eq!(line, 2);
                assert!(details.contains("Expected 3"));
            }
            other => panic!("Expected Format error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_file_rejected() {
        let file = create_test_file("\n\n");

        let result = NodeFeatureParser::new().parse(file.path());
        assert!(matches!(result, Err(DataError::Format { .. })));
    }

    #[test]
    fn test_missing_file() {
        let result = NodeFeatureParser::new().parse("/no/such/features.txt");
        assert!(matches!(result, Err(DataError::FileIo { .. })));
    }
}
