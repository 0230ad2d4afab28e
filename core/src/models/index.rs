//! Index suggestion types

use std::fmt;

use serde::{Deserialize, Serialize};

/// Shape of a suggested index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SuggestionType {
    /// Index over one column
    Single,

    /// Index spanning several columns
    Composite,
}

impl SuggestionType {
    /// Get string representation of the suggestion type
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionType::Single => "SINGLE",
            SuggestionType::Composite => "COMPOSITE",
        }
    }
}

impl fmt::Display for SuggestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expected benefit of an index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ImpactScore {
    /// Large expected benefit
    High,

    /// Moderate expected benefit
    Medium,

    /// Small expected benefit
    Low,
}

impl ImpactScore {
    /// Get string representation of the impact
    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactScore::High => "HIGH",
            ImpactScore::Medium => "MEDIUM",
            ImpactScore::Low => "LOW",
        }
    }
}

impl fmt::Display for ImpactScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A proposed index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSuggestion {
    /// Table to index (lowercased)
    pub table_name: String,

    /// Indexed columns, join columns first
    pub columns: Vec<String>,

    /// Deterministic index name
    pub index_name: String,

    /// Single or composite
    pub suggestion_type: SuggestionType,

    /// Expected benefit
    pub impact_score: ImpactScore,

    /// Why the index is proposed
    pub reasoning: String,

    /// DDL creating the index
    pub create_statement: String,
}

impl IndexSuggestion {
    /// Build a suggestion, deriving its name and DDL from table and columns
    pub fn new(
        table_name: &str,
        columns: Vec<String>,
        suggestion_type: SuggestionType,
        impact_score: ImpactScore,
        reasoning: &str,
    ) -> Self {
        let index_name = index_name(table_name, &columns);
        let create_statement = create_index_statement(&index_name, table_name, &columns);

        IndexSuggestion {
            table_name: table_name.to_string(),
            columns,
            index_name,
            suggestion_type,
            impact_score,
            reasoning: reasoning.to_string(),
            create_statement,
        }
    }
}

/// `idx_<table>_<col1>_<col2>...`
pub fn index_name(table: &str, columns: &[String]) -> String {
    format!("idx_{}_{}", table, columns.join("_"))
}

/// `CREATE INDEX <name> ON <table> (<col1>, <col2>, ...);`
pub fn create_index_statement(index_name: &str, table: &str, columns: &[String]) -> String {
    format!(
        "CREATE INDEX {} ON {} ({});",
        index_name,
        table,
        columns.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestion_derives_name_and_ddl() {
        let suggestion = IndexSuggestion::new(
            "orders",
            vec!["customer_id".into(), "status".into()],
            SuggestionType::Composite,
            ImpactScore::High,
            "Composite index for WHERE and JOIN conditions",
        );

        assert_eq!(suggestion.index_name, "idx_orders_customer_id_status");
        assert_eq!(
            suggestion.create_statement,
            "CREATE INDEX idx_orders_customer_id_status ON orders (customer_id, status);"
        );
    }

    #[test]
    fn test_serialized_field_names() {
        let suggestion = IndexSuggestion::new(
            "users",
            vec!["email".into()],
            SuggestionType::Single,
            ImpactScore::Low,
            "Used in WHERE clause",
        );
        let json = serde_json::to_value(&suggestion).unwrap();

        assert_eq!(json["tableName"], "users");
        assert_eq!(json["suggestionType"], "SINGLE");
        assert_eq!(json["impactScore"], "LOW");
        assert_eq!(json["createStatement"], "CREATE INDEX idx_users_email ON users (email);");
    }
}
