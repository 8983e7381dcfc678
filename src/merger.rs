// ==============================================================================
// merger.rs - Node Feature Merger
// ==============================================================================
// Description: Builds the node table from the interactome and feature files
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::InteractionTable;
use crate::node_table::NodeTable;
use crate::parsers::NodeFeatureParser;

/// Build the merged node table.
///
/// # Algorithm
/// 1. Seed one row per node in the interaction table (both interactor columns)
/// 2. For each feature file in the given order: parse, classify, left-merge
///
/// Files are merged strictly in order, so on a column name collision the
/// earlier file's column is the one kept. Any parse failure aborts the build.
///
/// # Arguments
/// * `interactome` - Loaded interaction table
/// * `node_files` - Feature file paths, relative to `data_dir` unless absolute
/// * `data_dir` - Base directory for relative paths
pub fn build_node_table(
    interactome: &InteractionTable,
    node_files: &[PathBuf],
    data_dir: &Path,
) -> Result<NodeTable> {
    let mut table = NodeTable::from_nodes(interactome.node_set());
    info!(
        "Seeded node table with {} nodes from {} interactions",
        table.len(),
        interactome.len()
    );

    let parser = NodeFeatureParser::new();

    for node_file in node_files {
        let path = data_dir.join(node_file);
        let feature_file = parser.parse(&path)?;
        let report = table.merge_left(&feature_file);

        info!(
            "Merged {} file {:?}: {} nodes matched, columns added: {:?}",
            feature_file.kind.as_str(),
            node_file,
            report.matched_rows,
            report.added_columns
        );

        if !report.dropped_columns.is_empty() {
            warn!(
                "Dropped columns from {:?} already present in node table: {:?}",
                node_file, report.dropped_columns
            );
        }
        if report.duplicate_rows > 0 {
            warn!(
                "{} repeated node rows in {:?} ignored (first occurrence kept)",
                report.duplicate_rows, node_file
            );
        }
        if report.unmatched_rows > 0 {
            debug!(
                "{} rows in {:?} name nodes outside the interactome",
                report.unmatched_rows, node_file
            );
        }
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataError;
    use crate::models::{Interaction, Value};
    use tempfile::TempDir;

    fn interactome(pairs: &[(&str, &str)]) -> InteractionTable {
        InteractionTable::new(
            pairs
                .iter()
                .map(|(a, b)| Interaction {
                    interactor1: a.to_string(),
                    interactor2: b.to_string(),
                    weight: 1.0,
                })
                .collect(),
        )
    }

    #[test]
    fn test_universe_matches_interactome() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("extra.txt"), "A\nOUTSIDER\n").unwrap();
        let edges = interactome(&[("A", "B"), ("B", "C"), ("D", "A")]);

        let table = build_node_table(&edges, &[PathBuf::from("extra.txt")], dir.path()).unwrap();

        let ids: Vec<_> = table.node_ids().iter().cloned().collect();
        let expected: Vec<_> = edges.node_set().into_iter().collect();
        assert_eq!(ids, expected);
        assert!(table.row_index("OUTSIDER").is_none());
    }

    #[test]
    fn test_indicator_inference() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("hits.txt"), "A\nB\nC\n").unwrap();
        let edges = interactome(&[("A", "B"), ("C", "D"), ("E", "F")]);

        let table = build_node_table(&edges, &[PathBuf::from("hits.txt")], dir.path()).unwrap();

        for node in ["A", "B", "C"] {
            assert_eq!(table.get(node, "hits"), Some(&Value::Bool(true)));
        }
        for node in ["D", "E", "F"] {
            assert_eq!(table.get(node, "hits"), None);
        }
    }

    #[test]
    fn test_same_indicator_twice_yields_one_column() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("hits.txt"), "A\n").unwrap();
        let edges = interactome(&[("A", "B")]);
        let files = vec![PathBuf::from("hits.txt"), PathBuf::from("hits.txt")];

        let table = build_node_table(&edges, &files, dir.path()).unwrap();

        assert_eq!(table.column_names(), vec!["NODEID", "hits"]);
        assert!(table.column_names().iter().all(|c| !c.contains("DROP")));
    }

    #[test]
    fn test_earlier_file_wins_collision() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("first.tsv"), "NODEID\tscore\nA\t1\n").unwrap();
        std::fs::write(dir.path().join("second.tsv"), "NODEID\tscore\tlabel\nA\t99\tkinase\n").unwrap();
        let edges = interactome(&[("A", "B")]);
        let files = vec![PathBuf::from("first.tsv"), PathBuf::from("second.tsv")];

        let table = build_node_table(&edges, &files, dir.path()).unwrap();

        assert_eq!(table.column_names(), vec!["NODEID", "score", "label"]);
        assert_eq!(table.get("A", "score"), Some(&Value::Int(1)));
        assert_eq!(table.get("A", "label"), Some(&Value::Text("kinase".to_string())));
        assert_eq!(table.get("B", "label"), None);
    }

    #[test]
    fn test_missing_file_aborts_build() {
        let dir = TempDir::new().unwrap();
        let edges = interactome(&[("A", "B")]);

        let result = build_node_table(&edges, &[PathBuf::from("absent.txt")], dir.path());
        assert!(matches!(result, Err(DataError::FileIo { .. })));
    }
}
