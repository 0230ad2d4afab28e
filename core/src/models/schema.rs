//! Schema metadata snapshot
//!
//! Read-only description of existing tables, their indexes and row-count
//! estimates. Fetched once by the caller and consulted by the index advisor.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::Result;

fn default_index_type() -> String {
    "BTREE".to_string()
}

/// Existing index on a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexMetadata {
    /// Index name
    pub name: String,

    /// Indexed columns in key order
    #[serde(default)]
    pub columns: Vec<String>,

    /// Whether the index enforces uniqueness
    #[serde(default)]
    pub is_unique: bool,

    /// Access method, `BTREE` unless stated
    #[serde(rename = "type", default = "default_index_type")]
    pub index_type: String,
}

impl IndexMetadata {
    /// Create a non-unique B-tree index description
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        IndexMetadata {
            name: name.into(),
            columns,
            is_unique: false,
            index_type: default_index_type(),
        }
    }
}

/// One table of the snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableMetadata {
    /// Table name
    pub table_name: String,

    /// Estimated number of rows
    #[serde(default)]
    pub estimated_row_count: u64,

    /// Existing indexes
    #[serde(default)]
    pub indexes: Vec<IndexMetadata>,
}

impl TableMetadata {
    /// Create a table description without indexes
    pub fn new(table_name: impl Into<String>, estimated_row_count: u64) -> Self {
        TableMetadata {
            table_name: table_name.into(),
            estimated_row_count,
            indexes: Vec::new(),
        }
    }

    /// Add an index description
    pub fn with_index(mut self, index: IndexMetadata) -> Self {
        self.indexes.push(index);
        self
    }

    /// Lowercased union of every column covered by any index
    pub fn indexed_columns(&self) -> HashSet<String> {
        self.indexes
            .iter()
            .flat_map(|index| index.columns.iter())
            .map(|column| column.to_lowercase())
            .collect()
    }
}

/// Snapshot of the schema metadata for one analysis call
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    /// Tables in declaration order
    #[serde(default)]
    pub tables: Vec<TableMetadata>,
}

impl SchemaSnapshot {
    /// Create a snapshot from table descriptions
    pub fn new(tables: Vec<TableMetadata>) -> Self {
        SchemaSnapshot { tables }
    }

    /// Parse a snapshot from JSON text, either `{"tables": [...]}` or a bare array
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if value.is_array() {
            let tables: Vec<TableMetadata> = serde_json::from_value(value)?;
            return Ok(SchemaSnapshot { tables });
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Load a snapshot from a JSON file
    pub fn from_file(path: &str) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Case-insensitive table lookup
    pub fn table(&self, name: &str) -> Option<&TableMetadata> {
        self.tables
            .iter()
            .find(|t| t.table_name.eq_ignore_ascii_case(name))
    }

    /// Lowercased table name to indexed-column set
    pub fn indexed_columns_by_table(&self) -> HashMap<String, HashSet<String>> {
        let mut by_table: HashMap<String, HashSet<String>> = HashMap::new();
        for table in &self.tables {
            by_table
                .entry(table.table_name.to_lowercase())
                .or_default()
                .extend(table.indexed_columns());
        }
        by_table
    }

    /// Lowercased table name to estimated row count
    pub fn row_counts_by_table(&self) -> HashMap<String, u64> {
        self.tables
            .iter()
            .map(|t| (t.table_name.to_lowercase(), t.estimated_row_count))
            .collect()
    }
}
