// ==============================================================================
// lib.rs - Interactome Loader Library
// ==============================================================================
// Description: Library interface for network dataset integration modules
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

pub mod error;
pub mod models;
pub mod parsers;
pub mod node_table;
pub mod merger;
pub mod query;
pub mod dataset;
pub mod graph_stats;

pub use dataset::{Dataset, DatasetConfig};
pub use error::{DataError, Result};
pub use node_table::NodeTable;
pub use query::{ColumnSelection, Diagnostic, QueryEngine};
