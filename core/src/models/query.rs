//! Structural query model
//!
//! A [`ParsedQuery`] is the lossy structural summary of one SQL statement or
//! subquery. Parent nodes own their subqueries, forming a tree.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of statement the model was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QueryType {
    /// SELECT query
    Select,

    /// INSERT query
    Insert,

    /// UPDATE query
    Update,

    /// DELETE query
    Delete,
}

impl QueryType {
    /// Get string representation of query type
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::Select => "SELECT",
            QueryType::Insert => "INSERT",
            QueryType::Update => "UPDATE",
            QueryType::Delete => "DELETE",
        }
    }

    /// Check if the query type is read-only
    pub fn is_read_only(&self) -> bool {
        matches!(self, QueryType::Select)
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Join flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JoinType {
    /// INNER JOIN, also used for plain `JOIN` and comma-separated FROM items
    #[default]
    Inner,

    /// LEFT [OUTER] JOIN
    Left,

    /// RIGHT [OUTER] JOIN
    Right,

    /// FULL [OUTER] JOIN
    Full,

    /// CROSS JOIN
    Cross,
}

impl JoinType {
    /// Get string representation of join type
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER",
            JoinType::Left => "LEFT",
            JoinType::Right => "RIGHT",
            JoinType::Full => "FULL",
            JoinType::Cross => "CROSS",
        }
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column reference with its qualifier (empty when unqualified)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ColumnRef {
    /// Qualifier as written (table name or alias), empty if none
    pub table: String,

    /// Column name
    pub column: String,
}

impl ColumnRef {
    /// Create a column reference
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        ColumnRef {
            table: table.into(),
            column: column.into(),
        }
    }
}

/// One JOIN clause
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinInfo {
    /// Join flavour
    #[serde(rename = "type")]
    pub join_type: JoinType,

    /// Joined table name, empty for derived tables
    pub table: String,

    /// Joined table alias, empty if none
    pub alias: String,

    /// ON-expression text, empty if none
    pub condition: String,

    /// Column names referenced by the ON-expression
    pub join_columns: Vec<String>,

    /// The same columns with their qualifiers
    pub column_refs: Vec<ColumnRef>,
}

/// Leaf predicate of a flattened WHERE clause
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhereCondition {
    /// Filtered column
    pub column: String,

    /// Column qualifier, empty when unqualified
    pub table: String,

    /// Operator token (`=`, `IN`, `BETWEEN`, `LIKE`, `IS NULL`, ...)
    pub operator: String,

    /// Right-hand side text for binary comparisons
    pub value: Option<String>,

    /// Whether the right-hand side is a placeholder
    pub is_parameterized: bool,
}

/// Alias declared for a table in FROM or JOIN position
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableAlias {
    /// Alias name
    pub alias: String,

    /// Table the alias stands for
    pub table: String,
}

/// Structural summary of a statement or subquery
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedQuery {
    /// Whether the SQL parsed
    pub valid: bool,

    /// Statement kind, absent for invalid models
    pub query_type: Option<QueryType>,

    /// Parser diagnostic, set only when invalid
    pub error_message: Option<String>,

    /// Referenced tables in FROM/JOIN order, duplicates kept
    pub tables: Vec<String>,

    /// Projected expressions (SELECT) or target columns (INSERT/UPDATE)
    pub columns: Vec<String>,

    /// JOIN clauses
    pub joins: Vec<JoinInfo>,

    /// Flattened WHERE leaves
    pub where_conditions: Vec<WhereCondition>,

    /// ORDER BY column names
    pub order_by_columns: Vec<String>,

    /// GROUP BY column names
    pub group_by_columns: Vec<String>,

    /// Nested subqueries
    pub subqueries: Vec<ParsedQuery>,

    /// Function names found in the projection, not deduplicated
    pub aggregate_functions: Vec<String>,

    /// DISTINCT modifier present
    pub has_distinct: bool,

    /// HAVING clause present
    pub has_having: bool,

    /// Nesting level, 0 at the outermost statement
    pub subquery_depth: usize,

    /// Table aliases declared in FROM and JOIN
    pub table_aliases: Vec<TableAlias>,
}

impl ParsedQuery {
    /// Build an invalid model carrying only the diagnostic
    pub fn invalid(message: impl Into<String>) -> Self {
        ParsedQuery {
            valid: false,
            error_message: Some(message.into()),
            ..Default::default()
        }
    }

    /// Build an empty valid model of the given kind and depth
    pub fn empty(query_type: QueryType, depth: usize) -> Self {
        ParsedQuery {
            valid: true,
            query_type: Some(query_type),
            subquery_depth: depth,
            ..Default::default()
        }
    }

    /// Number of subquery nodes in the whole forest below this node
    pub fn total_subqueries(&self) -> usize {
        self.subqueries
            .iter()
            .map(|sub| 1 + sub.total_subqueries())
            .sum()
    }

    /// Deepest nesting below this node, 0 when there are no subqueries
    pub fn max_subquery_depth(&self) -> usize {
        self.subqueries
            .iter()
            .map(|sub| (sub.subquery_depth + 1).max(sub.max_subquery_depth()))
            .max()
            .unwrap_or(0)
    }

    /// Whether any projected column is the bare wildcard
    pub fn selects_wildcard(&self) -> bool {
        self.columns.iter().any(|c| c == "*")
    }

    /// Resolve a qualifier to a table name through aliases and table names
    pub fn resolve_qualifier(&self, qualifier: &str) -> Option<&str> {
        if qualifier.is_empty() {
            return None;
        }
        if let Some(alias) = self
            .table_aliases
            .iter()
            .find(|a| a.alias.eq_ignore_ascii_case(qualifier))
        {
            return Some(alias.table.as_str());
        }
        self.tables
            .iter()
            .find(|t| t.eq_ignore_ascii_case(qualifier))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(depth: usize, children: Vec<ParsedQuery>) -> ParsedQuery {
        ParsedQuery {
            subqueries: children,
            ..ParsedQuery::empty(QueryType::Select, depth)
        }
    }

    #[test]
    fn test_invalid_model_is_otherwise_empty() {
        let model = ParsedQuery::invalid("Invalid SQL syntax: boom");

        assert!(!model.valid);
        assert_eq!(model.error_message.as_deref(), Some("Invalid SQL syntax: boom"));
        assert!(model.query_type.is_none());
        assert!(model.tables.is_empty());
        assert!(model.subqueries.is_empty());
        assert_eq!(model.subquery_depth, 0);
    }

    #[test]
    fn test_subquery_counters() {
        let root = sub(0, vec![sub(1, vec![sub(2, vec![])]), sub(0, vec![])]);

        assert_eq!(root.total_subqueries(), 3);
        assert_eq!(root.max_subquery_depth(), 3);
        assert_eq!(sub(0, vec![]).max_subquery_depth(), 0);
    }

    #[test]
    fn test_resolve_qualifier() {
        let model = ParsedQuery {
            tables: vec!["orders".into(), "customers".into()],
            table_aliases: vec![TableAlias {
                alias: "o".into(),
                table: "orders".into(),
            }],
            ..ParsedQuery::empty(QueryType::Select, 0)
        };

        assert_eq!(model.resolve_qualifier("O"), Some("orders"));
        assert_eq!(model.resolve_qualifier("customers"), Some("customers"));
        assert_eq!(model.resolve_qualifier("x"), None);
        assert_eq!(model.resolve_qualifier(""), None);
    }

    #[test]
    fn test_serialization_uses_external_names() {
        let join = JoinInfo {
            join_type: JoinType::Left,
            table: "customers".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&join).unwrap();

        assert_eq!(json["type"], "LEFT");
        assert!(json.get("joinColumns").is_some());
        assert_eq!(serde_json::to_value(QueryType::Delete).unwrap(), "DELETE");
    }
}
