// ==============================================================================
// parsers/mod.rs - File parser modules
// ==============================================================================
// Description: Parsers for interaction, node feature and edge list files
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

pub mod interactome;
pub mod node_features;
pub mod edge_list;

pub use interactome::InteractomeParser;
pub use node_features::{indicator_column_name, FeatureFile, FeatureFileKind, FeatureRow, NodeFeatureParser};
pub use edge_list::{EdgeListParser, EdgeRecord};
