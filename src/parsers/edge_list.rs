// ==============================================================================
// edge_list.rs - Ranked Edge List Parser
// ==============================================================================
// Description: Parser for edge lists consumed by the graph statistics runner
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================
// Format: Whitespace-delimited, one edge per line, '#' starts a comment
// Example:
//   # source target rank
//   TP53    MDM2    1
//   MDM2    CDKN1A  2.5
// ==============================================================================

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{DataError, Result};
use crate::models::NodeId;

/// One ranked edge
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRecord {
    pub source: NodeId,
    pub target: NodeId,
    pub rank: f64,
    /// 1-based line number in the source file
    pub line: usize,
}

/// Parser for `source target rank` edge lists
#[derive(Debug, Clone, Default)]
pub struct EdgeListParser;

impl EdgeListParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse an edge list file
    ///
    /// Lines with fewer than two tokens (after stripping comments) carry no
    /// edge and are skipped. Any other line must have exactly three tokens.
    pub fn parse(&self, path: impl AsRef<Path>) -> Result<Vec<EdgeRecord>> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| DataError::io(path, e))?;
        let reader = BufReader::new(file);

        let mut edges = Vec::new();

        for (idx, line_result) in reader.lines().enumerate() {
            let line_number = idx + 1;
            let line = line_result.map_err(|e| DataError::io(path, e))?;

            let content = match line.find('#') {
                Some(pos) => &line[..pos],
                None => line.as_str(),
            };

            let tokens: Vec<&str> = content.split_whitespace().collect();
            if tokens.len() < 2 {
                continue;
            }

            if tokens.len() != 3 {
                return Err(DataError::format(
                    path,
                    line_number,
                    format!(
                        "Expected 'source target rank', found {} fields",
                        tokens.len()
                    ),
                ));
            }

            let rank = tokens[2].parse::<f64>().map_err(|_| {
                DataError::format(path, line_number, format!("Invalid rank value: {}", tokens[2]))
            })?;

            edges.push(EdgeRecord {
                source: tokens[0].to_string(),
                target: tokens[1].to_string(),
                rank,
                line: line_number,
            });
        }

        Ok(edges)
    }
}
