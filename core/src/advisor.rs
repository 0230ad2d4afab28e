//! Index advisor
//!
//! Derives index suggestions from the columns a query filters, joins, sorts
//! and groups on, minus the columns an optional schema snapshot already
//! indexes. All work is in-memory set arithmetic over the model.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::models::{ImpactScore, IndexSuggestion, ParsedQuery, SchemaSnapshot, SuggestionType};

/// Row count above which a WHERE-only column is high impact
pub const HIGH_IMPACT_ROW_COUNT: u64 = 10_000;

/// Row count above which a WHERE-only column is medium impact
pub const MEDIUM_IMPACT_ROW_COUNT: u64 = 1_000;

/// Columns per table, keeping first-seen order and dropping duplicates
#[derive(Debug, Default)]
struct ColumnsByTable {
    /// Table keys in first-seen order
    order: Vec<String>,

    /// Columns per table key
    columns: HashMap<String, Vec<String>>,
}

impl ColumnsByTable {
    fn add(&mut self, table: &str, column: &str) {
        let table = table.to_lowercase();
        let column = column.to_lowercase();
        if table.is_empty() {
            return;
        }

        if !self.columns.contains_key(&table) {
            self.order.push(table.clone());
        }
        let columns = self.columns.entry(table).or_default();
        if !columns.contains(&column) {
            columns.push(column);
        }
    }

    fn get(&self, table: &str) -> &[String] {
        self.columns.get(table).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn impact(row_count: u64, in_where: bool, in_join: bool) -> ImpactScore {
    if in_join || (in_where && row_count > HIGH_IMPACT_ROW_COUNT) {
        ImpactScore::High
    } else if in_where && row_count > MEDIUM_IMPACT_ROW_COUNT {
        ImpactScore::Medium
    } else {
        ImpactScore::Low
    }
}

/// Index advisor
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexAdvisor;

impl IndexAdvisor {
    /// Create a new advisor
    pub fn new() -> Self {
        IndexAdvisor
    }

    /// Suggest indexes for a query model
    ///
    /// Tables are visited in the order the query references them, followed by
    /// any other qualifier seen in WHERE. Invalid models yield no suggestions.
    pub fn suggest(
        &self,
        query: &ParsedQuery,
        schema: Option<&SchemaSnapshot>,
    ) -> Vec<IndexSuggestion> {
        if !query.valid {
            return Vec::new();
        }

        let existing = schema
            .map(SchemaSnapshot::indexed_columns_by_table)
            .unwrap_or_default();
        let row_counts = schema
            .map(SchemaSnapshot::row_counts_by_table)
            .unwrap_or_default();

        let where_columns = self.where_columns(query);
        let join_columns = self.join_columns(query);

        let mut order_columns = ColumnsByTable::default();
        let mut group_columns = ColumnsByTable::default();
        for table in &query.tables {
            for column in &query.order_by_columns {
                order_columns.add(table, column);
            }
            for column in &query.group_by_columns {
                group_columns.add(table, column);
            }
        }

        let mut tables: Vec<String> = Vec::new();
        let candidates = query
            .tables
            .iter()
            .map(|t| t.to_lowercase())
            .chain(where_columns.order.iter().cloned())
            .chain(join_columns.order.iter().cloned())
            .chain(order_columns.order.iter().cloned())
            .chain(group_columns.order.iter().cloned());
        for table in candidates {
            if !tables.contains(&table) {
                tables.push(table);
            }
        }

        let empty = HashSet::new();
        let mut suggestions = Vec::new();

        for table in &tables {
            let indexed = existing.get(table).unwrap_or(&empty);
            let row_count = row_counts.get(table).copied().unwrap_or(0);
            let where_cols = where_columns.get(table);
            let join_cols = join_columns.get(table);

            // Join columns first, then WHERE columns
            let mut combined: Vec<String> = Vec::new();
            for column in join_cols.iter().chain(where_cols) {
                if !indexed.contains(column) && !combined.contains(column) {
                    combined.push(column.clone());
                }
            }

            match combined.as_slice() {
                [] => {}
                [column] => {
                    let in_join = join_cols.contains(column);
                    let reasoning = if in_join {
                        "Used in JOIN condition"
                    } else {
                        "Used in WHERE clause"
                    };
                    suggestions.push(IndexSuggestion::new(
                        table,
                        vec![column.clone()],
                        SuggestionType::Single,
                        impact(row_count, where_cols.contains(column), in_join),
                        reasoning,
                    ));
                }
                _ => suggestions.push(IndexSuggestion::new(
                    table,
                    combined.clone(),
                    SuggestionType::Composite,
                    impact(row_count, true, !join_cols.is_empty()),
                    "Composite index for WHERE and JOIN conditions",
                )),
            }

            let order_cols: Vec<String> = order_columns
                .get(table)
                .iter()
                .filter(|column| !indexed.contains(*column))
                .cloned()
                .collect();
            for column in &order_cols {
                if !combined.contains(column) {
                    suggestions.push(IndexSuggestion::new(
                        table,
                        vec![column.clone()],
                        SuggestionType::Single,
                        ImpactScore::Medium,
                        "Used in ORDER BY - improves sorting performance",
                    ));
                }
            }

            for column in group_columns.get(table) {
                if indexed.contains(column) || combined.contains(column) || order_cols.contains(column) {
                    continue;
                }
                suggestions.push(IndexSuggestion::new(
                    table,
                    vec![column.clone()],
                    SuggestionType::Single,
                    ImpactScore::Low,
                    "Used in GROUP BY",
                ));
            }
        }

        debug!(
            "Generated {} index suggestion(s) across {} table(s)",
            suggestions.len(),
            tables.len()
        );
        suggestions
    }

    /// WHERE columns keyed by their qualifier as written
    ///
    /// Unqualified columns belong to the sole table of a single-table query
    /// and are dropped otherwise. Alias qualifiers are not resolved, so
    /// `o.status` is keyed under `o` rather than the aliased table.
    fn where_columns(&self, query: &ParsedQuery) -> ColumnsByTable {
        let mut by_table = ColumnsByTable::default();
        for condition in &query.where_conditions {
            let table = match (condition.table.as_str(), query.tables.as_slice()) {
                ("", [only]) => only.as_str(),
                (qualifier, _) => qualifier,
            };
            by_table.add(table, &condition.column);
        }
        by_table
    }

    /// JOIN columns keyed by the table their qualifier resolves to
    ///
    /// Unqualified or unresolvable columns belong to the joined table.
    fn join_columns(&self, query: &ParsedQuery) -> ColumnsByTable {
        let mut by_table = ColumnsByTable::default();
        for join in &query.joins {
            if join.column_refs.is_empty() {
                for column in &join.join_columns {
                    by_table.add(&join.table, column);
                }
                continue;
            }
            for column in &join.column_refs {
                let table = query
                    .resolve_qualifier(&column.table)
                    .unwrap_or(join.table.as_str());
                by_table.add(table, &column.column);
            }
        }
        by_table
    }
}
