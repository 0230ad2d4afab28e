//! WHERE-clause flattening and JOIN column extraction
//!
//! The boolean structure of a WHERE clause is discarded: AND/OR trees are
//! flattened into leaf predicates, and only leaves whose left-hand side is a
//! column reference produce a [`WhereCondition`]. Unsupported shapes are
//! dropped, never rejected.

use log::debug;
use sqlparser::ast::{BinaryOperator, Expr, Query, Value};

use crate::models::{ColumnRef, WhereCondition};

/// One leaf of a flattened predicate tree
#[derive(Debug, Clone)]
pub struct PredicateLeaf<'a> {
    /// Condition recorded for the leaf, if its left side is a column
    pub condition: Option<WhereCondition>,

    /// Subquery embedded in the leaf (comparison RHS, IN, EXISTS)
    pub subquery: Option<&'a Query>,
}

/// Column reference for bare and qualified identifiers
///
/// For `schema.table.column` the qualifier is `table`, mirroring how a table
/// name is taken from the last part of an object name.
pub fn column_ref(expr: &Expr) -> Option<ColumnRef> {
    match expr {
        Expr::Identifier(ident) => Some(ColumnRef::new("", ident.value.clone())),
        Expr::CompoundIdentifier(idents) => match idents.as_slice() {
            [] => None,
            [column] => Some(ColumnRef::new("", column.value.clone())),
            [.., table, column] => Some(ColumnRef::new(table.value.clone(), column.value.clone())),
        },
        _ => None,
    }
}

fn is_comparison(op: &BinaryOperator) -> bool {
    matches!(
        op,
        BinaryOperator::Eq
            | BinaryOperator::NotEq
            | BinaryOperator::Lt
            | BinaryOperator::LtEq
            | BinaryOperator::Gt
            | BinaryOperator::GtEq
    )
}

fn is_placeholder(expr: &Expr) -> bool {
    matches!(expr, Expr::Value(Value::Placeholder(_)))
}

fn condition_for(expr: &Expr, operator: &str) -> Option<WhereCondition> {
    column_ref(expr).map(|column| WhereCondition {
        column: column.column,
        table: column.table,
        operator: operator.to_string(),
        value: None,
        is_parameterized: false,
    })
}

fn push_leaf<'a>(
    out: &mut Vec<PredicateLeaf<'a>>,
    condition: Option<WhereCondition>,
    subquery: Option<&'a Query>,
) {
    if condition.is_some() || subquery.is_some() {
        out.push(PredicateLeaf { condition, subquery });
    }
}

/// Flatten a predicate tree into its leaves, in left-to-right order
pub fn flatten_predicates<'a>(expr: &'a Expr, out: &mut Vec<PredicateLeaf<'a>>) {
    match expr {
        Expr::BinaryOp {
            left,
            op: BinaryOperator::And | BinaryOperator::Or,
            right,
        } => {
            flatten_predicates(left, out);
            flatten_predicates(right, out);
        }
        Expr::Nested(inner) => flatten_predicates(inner, out),
        Expr::BinaryOp { left, op, right } if is_comparison(op) => {
            let condition = column_ref(left).map(|column| WhereCondition {
                column: column.column,
                table: column.table,
                operator: op.to_string(),
                value: Some(right.to_string()),
                is_parameterized: is_placeholder(right),
            });
            let subquery = match right.as_ref() {
                Expr::Subquery(query) => Some(query.as_ref()),
                _ => None,
            };
            push_leaf(out, condition, subquery);
        }
        Expr::InSubquery { expr, subquery, .. } => {
            push_leaf(out, condition_for(expr, "IN"), Some(subquery.as_ref()));
        }
        Expr::InList { expr, .. } => push_leaf(out, condition_for(expr, "IN"), None),
        Expr::Between { expr, .. } => push_leaf(out, condition_for(expr, "BETWEEN"), None),
        Expr::Like { expr, .. } | Expr::ILike { expr, .. } => {
            push_leaf(out, condition_for(expr, "LIKE"), None)
        }
        Expr::IsNull(expr) => push_leaf(out, condition_for(expr, "IS NULL"), None),
        Expr::IsNotNull(expr) => push_leaf(out, condition_for(expr, "IS NOT NULL"), None),
        Expr::Exists { subquery, .. } => push_leaf(out, None, Some(subquery.as_ref())),
        other => debug!("Dropping unsupported predicate shape: {}", other),
    }
}

/// Column references of a JOIN ON-expression
///
/// Only AND and equality nodes are descended; other operators contribute nothing.
pub fn collect_join_columns(expr: &Expr, out: &mut Vec<ColumnRef>) {
    match expr {
        Expr::Identifier(_) | Expr::CompoundIdentifier(_) => out.extend(column_ref(expr)),
        Expr::BinaryOp {
            left,
            op: BinaryOperator::Eq | BinaryOperator::And,
            right,
        } => {
            collect_join_columns(left, out);
            collect_join_columns(right, out);
        }
        Expr::Nested(inner) => collect_join_columns(inner, out),
        _ => {}
    }
}
