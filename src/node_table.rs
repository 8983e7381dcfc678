// ==============================================================================
// node_table.rs - Merged Node Feature Table
// ==============================================================================
// Description: Columnar table with one row per node and accumulated features
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================
// Invariants:
//   - exactly one row per node id, rows sorted by node id
//   - column names are unique; NODEID is implicit and always first
// ==============================================================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

use crate::error::{DataError, Result};
use crate::models::{NodeId, Value, NODE_ID};
use crate::parsers::{FeatureFile, FeatureFileKind};

/// A feature column and where its values came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub kind: FeatureFileKind,
    /// One entry per table row; `None` is missing data
    pub values: Vec<Option<Value>>,
}

/// Outcome of merging one feature file into the table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeReport {
    pub added_columns: Vec<String>,
    /// Incoming columns discarded because the name was already taken
    pub dropped_columns: Vec<String>,
    pub matched_rows: usize,
    /// Rows whose node id is not part of the table
    pub unmatched_rows: usize,
    /// Repeated rows for a node already merged from this file
    pub duplicate_rows: usize,
}

/// Node table keyed by node id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeTable {
    node_ids: Vec<NodeId>,
    columns: Vec<Column>,
}

impl NodeTable {
    /// Create a table with one row per distinct node and no feature columns
    pub fn from_nodes(nodes: impl IntoIterator<Item = NodeId>) -> Self {
        let unique: BTreeSet<NodeId> = nodes.into_iter().collect();
        Self {
            node_ids: unique.into_iter().collect(),
            columns: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.node_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_ids.is_empty()
    }

    pub fn node_ids(&self) -> &[NodeId] {
        &self.node_ids
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// All column names, `NODEID` first
    pub fn column_names(&self) -> Vec<String> {
        std::iter::once(NODE_ID.to_string())
            .chain(self.columns.iter().map(|c| c.name.clone()))
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        name == NODE_ID || self.column(name).is_some()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn row_index(&self, node_id: &str) -> Option<usize> {
        self.node_ids
            .binary_search_by(|probe| probe.as_str().cmp(node_id))
            .ok()
    }

    /// Value of `column` for `node_id`, or `None` when missing
    pub fn get(&self, node_id: &str, column: &str) -> Option<&Value> {
        let row = self.row_index(node_id)?;
        self.column(column)?.values.get(row)?.as_ref()
    }

    /// Left-merge a parsed feature file on node id.
    ///
    /// Every existing row is kept; nodes absent from the file get missing
    /// values. A column whose name is already present is discarded, as is a
    /// name repeated within the file after its first occurrence.
    pub fn merge_left(&mut self, file: &FeatureFile) -> MergeReport {
        let mut report = MergeReport::default();

        // (index into the incoming row values, column being built)
        let mut incoming: Vec<(usize, Column)> = Vec::new();
        for (idx, name) in file.columns.iter().enumerate() {
            let taken = self.has_column(name) || incoming.iter().any(|(_, c)| &c.name == name);
            if taken {
                report.dropped_columns.push(name.clone());
                continue;
            }
            incoming.push((
                idx,
                Column {
                    name: name.clone(),
                    kind: file.kind,
                    values: vec![None; self.len()],
                },
            ));
        }

        let mut seen = vec![false; self.len()];
        for row in &file.rows {
            let Some(row_idx) = self.row_index(&row.node_id) else {
                report.unmatched_rows += 1;
                continue;
            };

            if seen[row_idx] {
                report.duplicate_rows += 1;
                continue;
            }
            seen[row_idx] = true;
            report.matched_rows += 1;

            for (value_idx, column) in incoming.iter_mut() {
                column.values[row_idx] = row.values.get(*value_idx).cloned().flatten();
            }
        }

        for (_, column) in incoming {
            report.added_columns.push(column.name.clone());
            self.columns.push(column);
        }

        report
    }

    /// Project onto the named feature columns (NODEID is implicit).
    ///
    /// Fails with `DataError::Schema` on the first unknown name.
    pub fn project(&self, columns: &[String]) -> Result<NodeTable> {
        let mut projected = Vec::new();
        for name in columns {
            if name == NODE_ID || projected.iter().any(|c: &Column| &c.name == name) {
                continue;
            }
            let column = self.column(name).ok_or_else(|| DataError::Schema {
                column: name.clone(),
                available: self.column_names(),
            })?;
            projected.push(column.clone());
        }

        Ok(NodeTable {
            node_ids: self.node_ids.clone(),
            columns: projected,
        })
    }

    /// Keep only rows where `keep[row]` is true
    pub fn retain_rows(&self, keep: &[bool]) -> NodeTable {
        let pick = |row: usize| keep.get(row).copied().unwrap_or(false);

        NodeTable {
            node_ids: self
                .node_ids
                .iter()
                .enumerate()
                .filter(|(row, _)| pick(*row))
                .map(|(_, id)| id.clone())
                .collect(),
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    kind: c.kind,
                    values: c
                        .values
                        .iter()
                        .enumerate()
                        .filter(|(row, _)| pick(*row))
                        .map(|(_, v)| v.clone())
                        .collect(),
                })
                .collect(),
        }
    }

    /// Write the table as tab-separated text with a header; missing cells are empty
    pub fn write_tsv<W: Write>(&self, writer: W) -> std::result::Result<(), csv::Error> {
        let mut out = csv::WriterBuilder::new().delimiter(b'\t').from_writer(writer);

        out.write_record(self.column_names())?;
        for (row, node_id) in self.node_ids.iter().enumerate() {
            let mut record = vec![node_id.clone()];
            record.extend(self.columns.iter().map(|c| {
                c.values[row]
                    .as_ref()
                    .map(|v| v.to_string())
                    .unwrap_or_default()
            }));
            out.write_record(&record)?;
        }

        out.flush()?;
        Ok(())
    }

    pub fn to_tsv_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path).map_err(|e| DataError::io(path, e))?;
        self.write_tsv(file).map_err(|e| DataError::from_csv(path, e))
    }
}
