//! Complexity report types

use std::fmt;

use serde::{Deserialize, Serialize};

/// Qualitative complexity level derived from the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ComplexityLevel {
    /// Score up to 25
    Low,

    /// Score up to 50
    Medium,

    /// Score up to 75
    High,

    /// Score above 75
    Critical,
}

impl ComplexityLevel {
    /// Level for a clamped score
    pub fn from_score(score: u32) -> Self {
        match score {
            0..=25 => ComplexityLevel::Low,
            26..=50 => ComplexityLevel::Medium,
            51..=75 => ComplexityLevel::High,
            _ => ComplexityLevel::Critical,
        }
    }

    /// Get string representation of the level
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplexityLevel::Low => "LOW",
            ComplexityLevel::Medium => "MEDIUM",
            ComplexityLevel::High => "HIGH",
            ComplexityLevel::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for ComplexityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One contribution to the score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityFactor {
    /// Factor name
    pub name: String,

    /// How many occurrences were counted
    pub count: usize,

    /// Points added to the score
    pub points: u32,

    /// Human-readable explanation
    pub description: String,
}

/// Result of complexity analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexityReport {
    /// Weighted score in `[10, 100]`
    pub score: u32,

    /// Level derived from the score
    pub level: ComplexityLevel,

    /// Score breakdown in evaluation order
    pub factors: Vec<ComplexityFactor>,

    /// Warnings in evaluation order
    pub warnings: Vec<String>,

    /// Number of JOIN clauses on the outermost statement
    pub join_count: usize,

    /// Deepest subquery nesting across the forest
    pub max_subquery_depth: usize,

    /// Number of function occurrences in the projection
    pub aggregate_count: usize,
}

impl ComplexityReport {
    /// Look up a factor by name
    pub fn factor(&self, name: &str) -> Option<&ComplexityFactor> {
        self.factors.iter().find(|f| f.name == name)
    }
}
