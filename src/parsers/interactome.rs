// ==============================================================================
// interactome.rs - Interaction File Parser
// ==============================================================================
// Description: Parser for headerless interaction (edge) files
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================
// Format: Whitespace/tab-delimited text, no header
// Example:
//   TP53    MDM2    0.92
//   MDM2    CDKN1A  0.41
// ==============================================================================

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{DataError, Result};
use crate::models::{Interaction, InteractionTable};

/// Parser for interaction files (Interactor1, Interactor2, Weight)
#[derive(Debug, Clone, Default)]
pub struct InteractomeParser;

impl InteractomeParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse an interaction file
    ///
    /// # Arguments
    /// * `path` - Path to the interaction file
    ///
    /// # Returns
    /// * `Ok(InteractionTable)` - Records in file order
    /// * `Err(DataError::FileIo)` - File missing or unreadable
    /// * `Err(DataError::Format)` - A line has fewer than 3 fields or a non-numeric weight
    ///
    /// Blank lines are skipped. Fields past the third are ignored.
    pub fn parse(&self, path: impl AsRef<Path>) -> Result<InteractionTable> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| DataError::io(path, e))?;
        let reader = BufReader::new(file);

        let mut records = Vec::new();
        let mut extra_fields = 0usize;

        for (idx, line_result) in reader.lines().enumerate() {
            let line_number = idx + 1;
            let line = line_result.map_err(|e| DataError::io(path, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() > 3 {
                extra_fields += 1;
            }

            records.push(self.parse_fields(path, &fields, line_number)?);
        }

        if extra_fields > 0 {
            debug!("{} lines in {:?} had more than 3 fields; extras ignored", extra_fields, path);
        }

        info!("Parsed {} interactions from {:?}", records.len(), path);
        Ok(InteractionTable::new(records))
    }

    fn parse_fields(&self, path: &Path, fields: &[&str], line_number: usize) -> Result<Interaction> {
        if fields.len() < 3 {
            return Err(DataError::format(
                path,
                line_number,
                format!("Expected 3 fields (Interactor1, Interactor2, Weight), found {}", fields.len()),
            ));
        }

        let weight = fields[2]
            .parse::<f64>()
            .ok()
            .filter(|w| w.is_finite())
            .ok_or_else(|| {
                DataError::format(path, line_number, format!("Invalid weight value: {}", fields[2]))
            })?;

        Ok(Interaction {
            interactor1: fields[0].to_string(),
            interactor2: fields[1].to_string(),
            weight,
        })
    }
}
