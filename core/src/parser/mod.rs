//! AST extraction for SQL statements
//!
//! This module turns SQL text into a [`ParsedQuery`]: tables, projected
//! columns, joins, flattened WHERE leaves, ORDER BY / GROUP BY columns,
//! aggregate functions and the subquery tree. Malformed SQL never fails the
//! call; it yields an invalid model carrying the parser diagnostic.

mod predicate;

pub use predicate::{collect_join_columns, column_ref, flatten_predicates, PredicateLeaf};

use log::{debug, trace, warn};
use sqlparser::ast::{
    Assignment, AssignmentTarget, Delete, Expr, FromTable, GroupByExpr, Insert, JoinConstraint,
    JoinOperator, ObjectName, Query, Select, SelectItem, SetExpr, Statement, TableFactor,
    TableWithJoins,
};
use sqlparser::parser::{Parser, ParserError};

use crate::config::AnalyzerConfig;
use crate::error::{AnalysisError, Result};
use crate::models::{JoinInfo, JoinType, ParsedQuery, QueryType, TableAlias, WhereCondition};

/// Prefix of every invalid-model diagnostic
pub const SYNTAX_ERROR_PREFIX: &str = "Invalid SQL syntax: ";

/// Stack size of the thread each parse runs on
///
/// Sized for [`MAX_PARSER_RECURSION_LIMIT`] levels of parser recursion in
/// unoptimized builds, so the recursion guards trip before the stack runs out.
///
/// [`MAX_PARSER_RECURSION_LIMIT`]: crate::config::MAX_PARSER_RECURSION_LIMIT
pub const PARSER_STACK_SIZE: usize = 64 * 1024 * 1024;

/// Last part of a possibly qualified object name
fn object_name_tail(name: &ObjectName) -> String {
    name.0.last().map(|ident| ident.value.clone()).unwrap_or_default()
}

/// Variant name of a statement, used in unsupported-statement errors
pub fn statement_kind(statement: &Statement) -> String {
    let rendered = format!("{:?}", statement);
    let kind: String = rendered
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect();
    if kind.is_empty() {
        "Unknown".to_string()
    } else {
        kind
    }
}

fn join_type(operator: &JoinOperator) -> JoinType {
    match operator {
        JoinOperator::LeftOuter(_) => JoinType::Left,
        JoinOperator::RightOuter(_) => JoinType::Right,
        JoinOperator::FullOuter(_) => JoinType::Full,
        JoinOperator::CrossJoin => JoinType::Cross,
        _ => JoinType::Inner,
    }
}

fn join_constraint(operator: &JoinOperator) -> Option<&JoinConstraint> {
    match operator {
        JoinOperator::Inner(constraint)
        | JoinOperator::LeftOuter(constraint)
        | JoinOperator::RightOuter(constraint)
        | JoinOperator::FullOuter(constraint) => Some(constraint),
        _ => None,
    }
}

/// SQL parser engine producing structural query models
#[derive(Debug, Clone, Default)]
pub struct SqlParserEngine {
    /// Analyzer configuration
    config: AnalyzerConfig,
}

impl SqlParserEngine {
    /// Create a new engine, rejecting unusable configuration
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        Ok(SqlParserEngine { config })
    }

    /// Get the engine configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Parse one SQL statement into a structural model
    ///
    /// Syntax errors, empty input and multi-statement input produce an
    /// invalid model rather than an error. Statement kinds other than
    /// SELECT/INSERT/UPDATE/DELETE fail with
    /// [`AnalysisError::UnsupportedStatement`]; input nested deeper than the
    /// configured guard fails with [`AnalysisError::QueryTooComplex`].
    ///
    /// The work runs on a dedicated thread of [`PARSER_STACK_SIZE`] bytes, so
    /// the result does not depend on the caller's stack.
    pub fn parse(&self, sql: &str) -> Result<ParsedQuery> {
        std::thread::scope(|scope| -> Result<ParsedQuery> {
            let worker = std::thread::Builder::new()
                .name("sql-parser".to_string())
                .stack_size(PARSER_STACK_SIZE)
                .spawn_scoped(scope, || self.parse_in_place(sql))?;

            match worker.join() {
                Ok(result) => result,
                Err(panic) => std::panic::resume_unwind(panic),
            }
        })
    }

    fn parse_in_place(&self, sql: &str) -> Result<ParsedQuery> {
        let dialect = self.config.dialect.parser_dialect();
        let parsed = Parser::new(&*dialect)
            .with_recursion_limit(self.config.parser_recursion_limit)
            .try_with_sql(sql)
            .and_then(|mut parser| parser.parse_statements());

        let statements = match parsed {
            Ok(statements) => statements,
            Err(ParserError::RecursionLimitExceeded) => {
                let limit = self.config.parser_recursion_limit;
                warn!("Parser recursion limit {} reached for query", limit);
                return Err(AnalysisError::QueryTooComplex {
                    depth: limit.saturating_add(1),
                    limit,
                });
            }
            Err(err) => {
                debug!("Failed to parse query: {}", err);
                return Ok(ParsedQuery::invalid(format!("{}{}", SYNTAX_ERROR_PREFIX, err)));
            }
        };

        match statements.as_slice() {
            [statement] => self.extract_statement(statement),
            [] => Ok(ParsedQuery::invalid(format!(
                "{}no statement found",
                SYNTAX_ERROR_PREFIX
            ))),
            many => Ok(ParsedQuery::invalid(format!(
                "{}expected a single statement, found {}",
                SYNTAX_ERROR_PREFIX,
                many.len()
            ))),
        }
    }

    /// Parse and re-signal an invalid model as an error
    ///
    /// Blank input fails with [`AnalysisError::EmptyQuery`] before parsing.
    pub fn parse_valid(&self, sql: &str) -> Result<ParsedQuery> {
        let sql = sql.trim();
        if sql.is_empty() {
            return Err(AnalysisError::EmptyQuery);
        }

        let model = self.parse(sql)?;
        if !model.valid {
            let message = model
                .error_message
                .unwrap_or_else(|| SYNTAX_ERROR_PREFIX.trim_end().to_string());
            return Err(AnalysisError::Syntax(message));
        }
        Ok(model)
    }

    fn extract_statement(&self, statement: &Statement) -> Result<ParsedQuery> {
        match statement {
            Statement::Query(query) => self.extract_query(query, 0, 0),
            Statement::Insert(insert) => Ok(self.extract_insert(insert)),
            Statement::Update {
                table,
                assignments,
                selection,
                ..
            } => Ok(self.extract_update(table, assignments, selection.as_ref())),
            Statement::Delete(delete) => Ok(self.extract_delete(delete)),
            other => {
                let kind = statement_kind(other);
                warn!("Rejecting unsupported statement: {}", kind);
                Err(AnalysisError::UnsupportedStatement(kind))
            }
        }
    }

    /// Walk a query at the given nesting depth
    ///
    /// `walk` counts every nested statement walk and is what the guard
    /// checks; `depth` is the value recorded on the model.
    fn extract_query(&self, query: &Query, depth: usize, walk: usize) -> Result<ParsedQuery> {
        let limit = self.config.max_nesting_depth;
        if walk > limit {
            warn!("Nesting guard tripped at depth {} (limit {})", walk, limit);
            return Err(AnalysisError::QueryTooComplex { depth: walk, limit });
        }

        let mut model = match query.body.as_ref() {
            SetExpr::Select(select) => {
                let mut model = ParsedQuery::empty(QueryType::Select, depth);
                self.extract_select(select, &mut model, depth, walk)?;
                model
            }
            // Parenthesized body; an outer ORDER BY is appended to the inner one
            SetExpr::Query(inner) => self.extract_query(inner, depth, walk)?,
            other => {
                debug!("Set operation body yields an empty model: {}", other);
                return Ok(ParsedQuery::empty(QueryType::Select, depth));
            }
        };

        if let Some(order_by) = &query.order_by {
            model.order_by_columns.extend(
                order_by
                    .exprs
                    .iter()
                    .filter_map(|item| column_ref(&item.expr))
                    .map(|c| c.column),
            );
        }

        Ok(model)
    }

    fn extract_select(
        &self,
        select: &Select,
        model: &mut ParsedQuery,
        depth: usize,
        walk: usize,
    ) -> Result<()> {
        // Projection
        for item in &select.projection {
            match item {
                SelectItem::Wildcard(_) => model.columns.push("*".to_string()),
                SelectItem::QualifiedWildcard(name, _) => {
                    model.columns.push(format!("{}.*", object_name_tail(name)))
                }
                SelectItem::UnnamedExpr(expr) | SelectItem::ExprWithAlias { expr, .. } => {
                    match expr {
                        Expr::Function(function) => {
                            model.aggregate_functions.push(function.name.to_string());
                            model.columns.push(function.to_string());
                        }
                        _ => match column_ref(expr) {
                            Some(column) => model.columns.push(column.column),
                            None => model.columns.push(item.to_string()),
                        },
                    }
                }
            }
        }

        model.has_distinct = select.distinct.is_some();

        // FROM and JOIN
        for (position, from) in select.from.iter().enumerate() {
            if position == 0 {
                self.extract_from_relation(&from.relation, model, depth, walk)?;
            } else {
                // Comma-separated FROM items behave as inner joins without a condition
                let info = self.join_info(JoinType::Inner, &from.relation, None, model);
                model.joins.push(info);
            }
            self.extract_joins(from, model);
        }

        // WHERE
        if let Some(selection) = &select.selection {
            let mut leaves = Vec::new();
            flatten_predicates(selection, &mut leaves);
            for leaf in leaves {
                model.where_conditions.extend(leaf.condition);
                if let Some(subquery) = leaf.subquery {
                    let nested = self.extract_query(subquery, depth + 1, walk + 1)?;
                    model.subqueries.push(nested);
                }
            }
        }

        // GROUP BY
        if let GroupByExpr::Expressions(exprs, _) = &select.group_by {
            model.group_by_columns = exprs
                .iter()
                .filter_map(column_ref)
                .map(|c| c.column)
                .collect();
        }

        model.has_having = select.having.is_some();

        Ok(())
    }

    fn extract_from_relation(
        &self,
        relation: &TableFactor,
        model: &mut ParsedQuery,
        depth: usize,
        walk: usize,
    ) -> Result<()> {
        match relation {
            TableFactor::Table { name, alias, .. } => {
                let table = object_name_tail(name);
                if let Some(alias) = alias {
                    model.table_aliases.push(TableAlias {
                        alias: alias.name.value.clone(),
                        table: table.clone(),
                    });
                }
                model.tables.push(table);
            }
            TableFactor::Derived { subquery, .. } => {
                // Derived tables keep the depth of the enclosing statement
                let nested = self.extract_query(subquery, depth, walk + 1)?;
                model.subqueries.push(nested);
            }
            TableFactor::NestedJoin {
                table_with_joins, ..
            } => {
                self.extract_from_relation(&table_with_joins.relation, model, depth, walk)?;
                self.extract_joins(table_with_joins, model);
            }
            other => debug!("Skipping unsupported FROM item: {}", other),
        }
        Ok(())
    }

    fn extract_joins(&self, from: &TableWithJoins, model: &mut ParsedQuery) {
        for join in &from.joins {
            let info = self.join_info(
                join_type(&join.join_operator),
                &join.relation,
                join_constraint(&join.join_operator),
                model,
            );
            model.joins.push(info);
        }
    }

    /// Build a join entry, registering the joined table and its alias
    fn join_info(
        &self,
        join_type: JoinType,
        relation: &TableFactor,
        constraint: Option<&JoinConstraint>,
        model: &mut ParsedQuery,
    ) -> JoinInfo {
        let mut info = JoinInfo {
            join_type,
            ..Default::default()
        };

        match relation {
            TableFactor::Table { name, alias, .. } => {
                info.table = object_name_tail(name);
                if let Some(alias) = alias {
                    info.alias = alias.name.value.clone();
                    model.table_aliases.push(TableAlias {
                        alias: info.alias.clone(),
                        table: info.table.clone(),
                    });
                }
                model.tables.push(info.table.clone());
            }
            other => trace!("Joined relation is not a plain table: {}", other),
        }

        if let Some(JoinConstraint::On(on)) = constraint {
            info.condition = on.to_string();
            collect_join_columns(on, &mut info.column_refs);
            info.join_columns = info.column_refs.iter().map(|c| c.column.clone()).collect();
        }

        info
    }

    fn extract_insert(&self, insert: &Insert) -> ParsedQuery {
        let mut model = ParsedQuery::empty(QueryType::Insert, 0);
        model.tables.push(object_name_tail(&insert.table_name));
        model.columns = insert.columns.iter().map(|c| c.value.clone()).collect();
        model
    }

    fn extract_update(
        &self,
        table: &TableWithJoins,
        assignments: &[Assignment],
        selection: Option<&Expr>,
    ) -> ParsedQuery {
        let mut model = ParsedQuery::empty(QueryType::Update, 0);

        if let TableFactor::Table { name, .. } = &table.relation {
            model.tables.push(object_name_tail(name));
        }

        for assignment in assignments {
            match &assignment.target {
                AssignmentTarget::ColumnName(name) => model.columns.push(object_name_tail(name)),
                AssignmentTarget::Tuple(names) => {
                    model.columns.extend(names.iter().map(object_name_tail))
                }
            }
        }

        if let Some(selection) = selection {
            model.where_conditions = self.flatten_unlinked(selection);
        }

        model
    }

    fn extract_delete(&self, delete: &Delete) -> ParsedQuery {
        let mut model = ParsedQuery::empty(QueryType::Delete, 0);

        let relations = match &delete.from {
            FromTable::WithFromKeyword(relations) | FromTable::WithoutKeyword(relations) => {
                relations
            }
        };
        if let Some(TableFactor::Table { name, .. }) = relations.first().map(|r| &r.relation) {
            model.tables.push(object_name_tail(name));
        }

        if let Some(selection) = &delete.selection {
            model.where_conditions = self.flatten_unlinked(selection);
        }

        model
    }

    /// WHERE conditions of a DML statement; its subqueries are not linked
    fn flatten_unlinked(&self, selection: &Expr) -> Vec<WhereCondition> {
        let mut leaves = Vec::new();
        flatten_predicates(selection, &mut leaves);

        let unlinked = leaves.iter().filter(|leaf| leaf.subquery.is_some()).count();
        if unlinked > 0 {
            debug!("Ignoring {} subquer(ies) in DML WHERE clause", unlinked);
        }

        leaves.into_iter().filter_map(|leaf| leaf.condition).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MAX_NESTING_DEPTH;
    use crate::models::ColumnRef;
    use rstest::rstest;

    fn engine() -> SqlParserEngine {
        SqlParserEngine::default()
    }

    fn parse(sql: &str) -> ParsedQuery {
        engine().parse(sql).unwrap()
    }

    /// SELECT with `levels` chained `IN (SELECT ...)` subqueries
    fn nested_in_subqueries(levels: usize) -> String {
        let mut sql = "SELECT id FROM t0".to_string();
        for level in 1..=levels {
            sql = format!("SELECT id FROM t{} WHERE id IN ({})", level, sql);
        }
        sql
    }

    #[test]
    fn test_select_star_with_where() {
        let model = parse("SELECT * FROM users WHERE id = 1");

        assert!(model.valid);
        assert_eq!(model.query_type, Some(QueryType::Select));
        assert_eq!(model.tables, vec!["users"]);
        assert_eq!(model.columns, vec!["*"]);
        assert_eq!(model.where_conditions.len(), 1);

        let condition = &model.where_conditions[0];
        assert_eq!(condition.column, "id");
        assert_eq!(condition.operator, "=");
        assert_eq!(condition.value.as_deref(), Some("1"));
        assert!(!condition.is_parameterized);
    }

    #[test]
    fn test_join_with_aliases() {
        let model = parse(
            "SELECT o.id, c.name FROM orders o \
             LEFT JOIN customers c ON o.customer_id = c.id",
        );

        assert_eq!(model.tables, vec!["orders", "customers"]);
        assert_eq!(model.columns, vec!["id", "name"]);
        assert_eq!(model.joins.len(), 1);

        let join = &model.joins[0];
        assert_eq!(join.join_type, JoinType::Left);
        assert_eq!(join.table, "customers");
        assert_eq!(join.alias, "c");
        assert_eq!(join.condition, "o.customer_id = c.id");
        assert_eq!(join.join_columns, vec!["customer_id", "id"]);
        assert_eq!(
            join.column_refs,
            vec![ColumnRef::new("o", "customer_id"), ColumnRef::new("c", "id")]
        );
        assert_eq!(model.resolve_qualifier("o"), Some("orders"));
        assert_eq!(model.resolve_qualifier("c"), Some("customers"));
    }

    #[test]
    fn test_join_flavours() {
        let model = parse(
            "SELECT * FROM a JOIN b ON a.id = b.a_id RIGHT JOIN c ON b.id = c.b_id \
             FULL OUTER JOIN d ON c.id = d.c_id CROSS JOIN e",
        );
        let types: Vec<JoinType> = model.joins.iter().map(|j| j.join_type).collect();

        assert_eq!(
            types,
            vec![JoinType::Inner, JoinType::Right, JoinType::Full, JoinType::Cross]
        );
        assert_eq!(model.tables, vec!["a", "b", "c", "d", "e"]);
        assert!(model.joins[3].condition.is_empty());
    }

    #[test]
    fn test_comma_join_is_inner_without_condition() {
        let model = parse("SELECT * FROM a, b WHERE a.id = b.id");

        assert_eq!(model.tables, vec!["a", "b"]);
        assert_eq!(model.joins.len(), 1);
        assert_eq!(model.joins[0].join_type, JoinType::Inner);
        assert!(model.joins[0].condition.is_empty());
    }

    #[test]
    fn test_aggregates_group_by_having() {
        let model = parse(
            "SELECT DISTINCT category, COUNT(*), AVG(price) FROM products \
             GROUP BY category HAVING COUNT(*) > 5 ORDER BY category",
        );

        assert_eq!(model.aggregate_functions, vec!["COUNT", "AVG"]);
        assert_eq!(model.columns, vec!["category", "COUNT(*)", "AVG(price)"]);
        assert_eq!(model.group_by_columns, vec!["category"]);
        assert_eq!(model.order_by_columns, vec!["category"]);
        assert!(model.has_distinct);
        assert!(model.has_having);
    }

    #[test]
    fn test_projection_other_expressions_kept_verbatim() {
        let model = parse("SELECT price * 2 AS doubled, u.* FROM users u");

        assert_eq!(model.columns, vec!["price * 2 AS doubled", "u.*"]);
        assert!(!model.selects_wildcard());
    }

    #[test]
    fn test_qualified_wildcard_keeps_table_name_only() {
        let model = parse("SELECT public.users.* FROM public.users");

        assert_eq!(model.tables, vec!["users"]);
        assert_eq!(model.columns, vec!["users.*"]);
    }

    #[test]
    fn test_order_by_keeps_column_references_only() {
        let model = parse("SELECT * FROM t ORDER BY created_at DESC, LOWER(name), t.id");
        assert_eq!(model.order_by_columns, vec!["created_at", "id"]);
    }

    #[test]
    fn test_parenthesized_query_keeps_outer_order_by() {
        let model = parse("(SELECT a FROM t) ORDER BY a");

        assert_eq!(model.tables, vec!["t"]);
        assert_eq!(model.columns, vec!["a"]);
        assert_eq!(model.order_by_columns, vec!["a"]);
    }

    #[test]
    fn test_where_subquery_depth() {
        let model = parse(
            "SELECT * FROM users WHERE id IN \
             (SELECT user_id FROM orders WHERE total > (SELECT AVG(total) FROM orders))",
        );

        assert_eq!(model.subqueries.len(), 1);
        let level_one = &model.subqueries[0];
        assert_eq!(level_one.subquery_depth, 1);
        assert_eq!(level_one.tables, vec!["orders"]);
        assert_eq!(level_one.subqueries[0].subquery_depth, 2);
        assert_eq!(model.total_subqueries(), 2);
        assert_eq!(model.max_subquery_depth(), 3);

        assert_eq!(model.where_conditions[0].operator, "IN");
        assert!(model.where_conditions[0].value.is_none());
    }

    #[test]
    fn test_from_derived_table_keeps_parent_depth() {
        let model = parse(
            "SELECT t.total FROM (SELECT SUM(total) AS total FROM orders) t \
             WHERE EXISTS (SELECT 1 FROM refunds)",
        );

        assert!(model.tables.is_empty());
        assert_eq!(model.subqueries.len(), 2);
        assert_eq!(model.subqueries[0].subquery_depth, 0);
        assert_eq!(model.subqueries[0].tables, vec!["orders"]);
        assert_eq!(model.subqueries[1].subquery_depth, 1);
        assert_eq!(model.subqueries[1].tables, vec!["refunds"]);
        assert!(model.where_conditions.is_empty());
    }

    #[test]
    fn test_placeholders_are_parameterized() {
        let model = parse("SELECT * FROM users WHERE email = $1 AND name = ?");

        assert!(model.where_conditions.iter().all(|c| c.is_parameterized));
    }

    #[test]
    fn test_insert() {
        let model = parse("INSERT INTO users (name, email) VALUES ('a', 'b')");

        assert_eq!(model.query_type, Some(QueryType::Insert));
        assert_eq!(model.tables, vec!["users"]);
        assert_eq!(model.columns, vec!["name", "email"]);
        assert!(model.where_conditions.is_empty());
    }

    #[test]
    fn test_update() {
        let model = parse("UPDATE users SET name = 'x', status = 'y' WHERE id = 7");

        assert_eq!(model.query_type, Some(QueryType::Update));
        assert_eq!(model.tables, vec!["users"]);
        assert_eq!(model.columns, vec!["name", "status"]);
        assert_eq!(model.where_conditions.len(), 1);
        assert_eq!(model.where_conditions[0].column, "id");
    }

    #[rstest]
    #[case::delete(
        "DELETE FROM sessions WHERE user_id IN (SELECT id FROM users)",
        QueryType::Delete,
        "sessions"
    )]
    #[case::update(
        "UPDATE users SET active = 1 WHERE id IN (SELECT user_id FROM bans)",
        QueryType::Update,
        "users"
    )]
    fn test_dml_where_subqueries_are_not_linked(
        #[case] sql: &str,
        #[case] query_type: QueryType,
        #[case] table: &str,
    ) {
        let model = parse(sql);

        assert_eq!(model.query_type, Some(query_type));
        assert_eq!(model.tables, vec![table]);
        assert_eq!(model.where_conditions.len(), 1);
        assert_eq!(model.where_conditions[0].operator, "IN");
        assert!(model.subqueries.is_empty());
    }

    #[test]
    fn test_union_yields_empty_select() {
        let model = parse("SELECT a FROM t1 UNION SELECT b FROM t2");

        assert!(model.valid);
        assert_eq!(model.query_type, Some(QueryType::Select));
        assert!(model.tables.is_empty());
        assert!(model.columns.is_empty());
    }

    #[test]
    fn test_truncated_sql_is_invalid_model() {
        let model = parse("SELECT * FROM");

        assert!(!model.valid);
        assert!(model.query_type.is_none());
        assert!(model
            .error_message
            .as_deref()
            .unwrap()
            .starts_with(SYNTAX_ERROR_PREFIX));
    }

    #[test]
    fn test_multiple_statements_are_invalid() {
        let model = parse("SELECT 1; SELECT 2");
        assert!(!model.valid);
    }

    #[test]
    fn test_unsupported_statement() {
        let err = engine()
            .parse("CREATE TABLE t (id INT)")
            .unwrap_err();

        match err {
            AnalysisError::UnsupportedStatement(kind) => assert_eq!(kind, "CreateTable"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_nesting_guard() {
        let config = AnalyzerConfig {
            max_nesting_depth: 2,
            ..Default::default()
        };
        let engine = SqlParserEngine::new(config).unwrap();

        let shallow = "SELECT * FROM a WHERE x IN (SELECT x FROM b WHERE y IN (SELECT y FROM c))";
        assert!(engine.parse(shallow).is_ok());

        let deep = "SELECT * FROM a WHERE x IN (SELECT x FROM b WHERE y IN \
                    (SELECT y FROM c WHERE z IN (SELECT z FROM d)))";
        assert!(matches!(
            engine.parse(deep),
            Err(AnalysisError::QueryTooComplex { depth: 3, limit: 2 })
        ));
    }

    #[rstest]
    #[case(10)]
    #[case(DEFAULT_MAX_NESTING_DEPTH)]
    fn test_default_config_accepts_moderate_nesting(#[case] levels: usize) {
        let model = parse(&nested_in_subqueries(levels));

        assert!(model.valid);
        assert_eq!(model.max_subquery_depth(), levels + 1);
    }

    #[rstest]
    #[case(DEFAULT_MAX_NESTING_DEPTH + 1)]
    #[case(25)]
    #[case(40)]
    #[case(100)]
    #[case(1_000)]
    fn test_default_config_rejects_deep_nesting(#[case] levels: usize) {
        let result = engine().parse(&nested_in_subqueries(levels));

        match result {
            Err(AnalysisError::QueryTooComplex { depth, limit }) => assert!(depth > limit),
            other => panic!("expected QueryTooComplex, got {:?}", other),
        }
    }

    #[test]
    fn test_parser_recursion_limit_trip() {
        let config = AnalyzerConfig {
            max_nesting_depth: 200,
            parser_recursion_limit: 10,
            ..Default::default()
        };
        let engine = SqlParserEngine::new(config).unwrap();

        assert!(matches!(
            engine.parse(&nested_in_subqueries(20)),
            Err(AnalysisError::QueryTooComplex { depth: 11, limit: 10 })
        ));
    }

    #[test]
    fn test_parse_valid() {
        let engine = engine();

        assert!(matches!(engine.parse_valid("   "), Err(AnalysisError::EmptyQuery)));
        assert!(matches!(
            engine.parse_valid("SELEC * FROM"),
            Err(AnalysisError::Syntax(_))
        ));
        assert!(engine.parse_valid("  SELECT 1  ").unwrap().valid);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = AnalyzerConfig {
            parser_recursion_limit: 0,
            ..Default::default()
        };
        assert!(SqlParserEngine::new(config).is_err());
    }
}
