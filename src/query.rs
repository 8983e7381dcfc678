// ==============================================================================
// query.rs - Column Query Engine
// ==============================================================================
// Description: Column-subset queries over the node table with coverage checks
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{DataError, Result};
use crate::models::NODE_ID;
use crate::node_table::NodeTable;

/// Default coverage fraction at or below which a query is flagged
pub const DEFAULT_WARNING_THRESHOLD: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

/// Coverage numbers behind a query result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageMetrics {
    /// Requested columns, NODEID excluded
    pub columns: Vec<String>,
    pub rows_kept: usize,
    pub total_rows: usize,
    pub percent: f64,
}

/// Non-fatal advisory emitted alongside a query result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub metrics: CoverageMetrics,
}

/// Rows with data in at least one requested column, plus diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSelection {
    pub table: NodeTable,
    pub coverage: CoverageMetrics,
    pub diagnostics: Vec<Diagnostic>,
}

impl ColumnSelection {
    pub fn coverage_percent(&self) -> f64 {
        self.coverage.percent
    }

    pub fn has_warnings(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Warning)
    }
}

/// Answers column-subset queries against a node table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryEngine {
    /// Fraction of nodes (0.0-1.0)
    warning_threshold: f64,
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryEngine {
    pub fn new() -> Self {
        Self {
            warning_threshold: DEFAULT_WARNING_THRESHOLD,
        }
    }

    pub fn with_threshold(warning_threshold: f64) -> Self {
        Self { warning_threshold }
    }

    pub fn warning_threshold(&self) -> f64 {
        self.warning_threshold
    }

    /// Select the requested columns for every node with at least one value among them
    ///
    /// # Arguments
    /// * `table` - Node table to query
    /// * `columns` - Feature column names; NODEID is always included
    ///
    /// # Returns
    /// * `Ok(ColumnSelection)` - Filtered rows, coverage, and a warning
    ///   diagnostic when coverage is at or below the threshold
    /// * `Err(DataError::Schema)` - A requested column does not exist
    ///
    /// # Coverage
    /// coverage = 100 * rows_kept / total_rows, where total_rows counts the
    /// table before filtering. An empty table or an empty request has 0%.
    pub fn request_node_columns<S: AsRef<str>>(
        &self,
        table: &NodeTable,
        columns: &[S],
    ) -> Result<ColumnSelection> {
        let requested: Vec<String> = columns
            .iter()
            .map(|c| c.as_ref().to_string())
            .collect();

        let projected = table.project(&requested)?;

        let keep: Vec<bool> = (0..projected.len())
            .map(|row| {
                projected
                    .columns()
                    .iter()
                    .any(|c| c.values[row].is_some())
            })
            .collect();
        let filtered = projected.retain_rows(&keep);

        let total_rows = table.len();
        let rows_kept = filtered.len();
        let percent = if total_rows == 0 {
            0.0
        } else {
            100.0 * rows_kept as f64 / total_rows as f64
        };

        let coverage = CoverageMetrics {
            columns: projected.columns().iter().map(|c| c.name.clone()).collect(),
            rows_kept,
            total_rows,
            percent,
        };

        debug!(
            "Column query {:?}: {}/{} nodes ({:.2}%)",
            coverage.columns, rows_kept, total_rows, percent
        );

        let mut diagnostics = Vec::new();
        if percent <= self.warning_threshold * 100.0 {
            let mut named = coverage.columns.clone();
            named.push(NODE_ID.to_string());
            let message = format!(
                "Only {:.2}% of data had one or more of the following columns filled: {:?}",
                percent, named
            );
            warn!("{}", message);

            diagnostics.push(Diagnostic {
                severity: Severity::Warning,
                message,
                metrics: coverage.clone(),
            });
        }

        Ok(ColumnSelection {
            table: filtered,
            coverage,
            diagnostics,
        })
    }

    /// Edge feature tables are not integrated, so this always fails
    pub fn request_edge_columns<S: AsRef<str>>(&self, columns: &[S]) -> Result<NodeTable> {
        let names: Vec<&str> = columns.iter().map(|c| c.as_ref()).collect();
        Err(DataError::Unsupported(format!(
            "edge feature columns are not integrated (requested {:?})",
            names
        )))
    }
}
