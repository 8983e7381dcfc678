// ==============================================================================
// models.rs - Network Data Models
// ==============================================================================
// Description: Node identifiers, cell values and the interaction table
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Canonical node identifier, the join key across every table
pub type NodeId = String;

/// Name of the node identifier column in every node table
pub const NODE_ID: &str = "NODEID";

/// Cell tokens that are read as missing rather than as text
const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A single feature value in the node table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Infer a value from a raw cell. Returns `None` for missing-data tokens.
    ///
    /// Non-finite floats are kept as text so checkpoints stay valid JSON.
    pub fn parse(raw: &str) -> Option<Value> {
        let cell = raw.trim();
        if MISSING_TOKENS.contains(&cell) {
            return None;
        }

        match cell {
            "True" | "TRUE" | "true" => return Some(Value::Bool(true)),
            "False" | "FALSE" | "false" => return Some(Value::Bool(false)),
            _ => {}
        }

        if let Ok(int) = cell.parse::<i64>() {
            return Some(Value::Int(int));
        }

        match cell.parse::<f64>() {
            Ok(float) if float.is_finite() => Some(Value::Float(float)),
            _ => Some(Value::Text(cell.to_string())),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One row of the interaction file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub interactor1: NodeId,
    pub interactor2: NodeId,
    pub weight: f64,
}

/// Ordered interaction records, immutable once loaded
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionTable {
    records: Vec<Interaction>,
}

impl InteractionTable {
    pub fn new(records: Vec<Interaction>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Interaction] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Canonical node universe: every identifier in either interactor column
    pub fn node_set(&self) -> BTreeSet<NodeId> {
        self.records
            .iter()
            .flat_map(|r| [r.interactor1.clone(), r.interactor2.clone()])
            .collect()
    }
}
