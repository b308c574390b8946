//! Relation matrix loading and representation

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use serde_json::Value;
use thiserror::Error;

use crate::data::preprocessing::{normalize_weight, sanitize_weight};

/// Errors raised while reading a relation matrix document
#[derive(Debug, Error)]
pub enum RelationError {
    #[error("relation matrix is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("relation matrix must be a JSON object, found {0}")]
    NotAnObject(&'static str),
}

/// Weighted relations between named entities, kept in document order.
///
/// Each row maps a source entity to its targets and their weights. Weights are
/// already normalized: missing, non-numeric, non-finite and negative values
/// have been coerced to `0.0` by the time they land here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationMatrix {
    rows: Vec<(String, Vec<(String, f64)>)>,
    row_index: HashMap<String, usize>,

    /// Per-row target -> position in the row
    target_index: Vec<HashMap<String, usize>>,
}

impl RelationMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a matrix from JSON text
    pub fn from_json_str(text: &str) -> Result<Self, RelationError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// Build a matrix from an already parsed JSON document
    pub fn from_value(value: &Value) -> Result<Self, RelationError> {
        let outer = match value {
            Value::Object(map) => map,
            other => return Err(RelationError::NotAnObject(json_kind(other))),
        };

        let mut matrix = Self::new();
        for (source, targets) in outer {
            matrix.ensure_row(source);
            match targets {
                Value::Object(inner) => {
                    for (target, weight) in inner {
                        matrix.insert(source, target, sanitize_weight(weight));
                    }
                }
                other => {
                    log::warn!(
                        "Relations for '{}' are {} rather than an object; treating as empty",
                        source,
                        json_kind(other)
                    );
                }
            }
        }

        Ok(matrix)
    }

    /// Make sure `source` has a row, creating an empty one if needed
    pub fn ensure_row(&mut self, source: &str) -> usize {
        if let Some(&idx) = self.row_index.get(source) {
            return idx;
        }

        let idx = self.rows.len();
        self.row_index.insert(source.to_string(), idx);
        self.rows.push((source.to_string(), Vec::new()));
        self.target_index.push(HashMap::new());
        idx
    }

    /// Set the weight of `source -> target`, replacing any previous value
    pub fn insert(&mut self, source: &str, target: &str, weight: f64) {
        let idx = self.ensure_row(source);
        let weight = normalize_weight(weight);
        let row = &mut self.rows[idx].1;
        let targets = &mut self.target_index[idx];

        match targets.get(target) {
            Some(&slot) => row[slot].1 = weight,
            None => {
                targets.insert(target.to_string(), row.len());
                row.push((target.to_string(), weight));
            }
        }
    }

    /// Weight of `source -> target`, `0.0` when absent
    pub fn weight(&self, source: &str, target: &str) -> f64 {
        self.row_index
            .get(source)
            .and_then(|&idx| {
                self.target_index[idx]
                    .get(target)
                    .map(|&slot| self.rows[idx].1[slot].1)
            })
            .unwrap_or(0.0)
    }

    /// Iterate over rows in insertion order
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[(String, f64)])> {
        self.rows
            .iter()
            .map(|(source, targets)| (source.as_str(), targets.as_slice()))
    }

    /// Number of source rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Total number of stored entries across all rows
    pub fn entry_count(&self) -> usize {
        self.rows.iter().map(|(_, targets)| targets.len()).sum()
    }
}

/// Load a relation matrix from a JSON file on disk
pub fn load_relations(path: impl AsRef<Path>) -> anyhow::Result<RelationMatrix> {
    let path = path.as_ref();
    log::info!("Reading relation matrix: {}", path.display());

    if !path.exists() {
        return Err(anyhow::anyhow!("File not found: {}", path.display()));
    }

    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let matrix = RelationMatrix::from_json_str(&text)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    log::info!(
        "Loaded {} source entities with {} relation entries",
        matrix.len(),
        matrix.entry_count()
    );

    Ok(matrix)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
