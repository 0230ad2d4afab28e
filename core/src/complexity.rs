//! Complexity scoring
//!
//! Weighs the structural features of a [`ParsedQuery`] into a bounded score,
//! a level, an itemised factor breakdown and a list of warnings. Analysis is
//! pure: the same model always yields the same report.

use log::trace;

use crate::models::{ComplexityFactor, ComplexityLevel, ComplexityReport, ParsedQuery};

/// Score every query starts from
pub const BASE_SCORE: u32 = 10;

/// Upper bound of the score
pub const MAX_SCORE: u32 = 100;

/// Points per JOIN clause
pub const JOIN_POINTS: u32 = 8;

/// Points per subquery node, scaled by `depth + 1`
pub const SUBQUERY_POINTS: u32 = 12;

/// Points per aggregate function occurrence
pub const AGGREGATE_POINTS: u32 = 3;

/// Flat points for DISTINCT
pub const DISTINCT_POINTS: u32 = 3;

/// Flat points when GROUP BY and HAVING are both present
pub const GROUP_BY_HAVING_POINTS: u32 = 5;

/// Points per WHERE condition past the threshold
pub const EXTRA_WHERE_CONDITION_POINTS: u32 = 2;

/// WHERE conditions allowed before extra points accrue
pub const WHERE_CONDITION_THRESHOLD: usize = 5;

/// Joins allowed before the excessive-join warning
pub const JOIN_WARNING_THRESHOLD: usize = 4;

/// Nesting depth allowed before the deep-nesting warning
pub const NESTING_WARNING_THRESHOLD: usize = 2;

/// Score above which the critical warning is raised
pub const CRITICAL_SCORE_THRESHOLD: u32 = 75;

fn to_points(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Sum of `SUBQUERY_POINTS * (depth + 1)` over every subquery node
fn subquery_points(query: &ParsedQuery) -> u32 {
    query.subqueries.iter().fold(0u32, |total, sub| {
        let own = SUBQUERY_POINTS.saturating_mul(to_points(sub.subquery_depth).saturating_add(1));
        total.saturating_add(own).saturating_add(subquery_points(sub))
    })
}

/// Literal values that do not suggest interpolated user input
fn is_benign_literal(value: &str) -> bool {
    let numeric = !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit());
    numeric
        || value.eq_ignore_ascii_case("NULL")
        || value.eq_ignore_ascii_case("TRUE")
        || value.eq_ignore_ascii_case("FALSE")
}

/// Complexity analyzer for structural query models
#[derive(Debug, Clone, Copy, Default)]
pub struct ComplexityAnalyzer;

impl ComplexityAnalyzer {
    /// Create a new analyzer
    pub fn new() -> Self {
        ComplexityAnalyzer
    }

    /// Score a query model
    pub fn analyze(&self, query: &ParsedQuery) -> ComplexityReport {
        let mut factors = Vec::new();
        let mut score = BASE_SCORE;

        // Joins
        let join_count = query.joins.len();
        if join_count > 0 {
            let points = JOIN_POINTS.saturating_mul(to_points(join_count));
            score = score.saturating_add(points);
            factors.push(ComplexityFactor {
                name: "Joins".to_string(),
                count: join_count,
                points,
                description: format!("{} JOIN operation(s) detected", join_count),
            });
        }

        // Subqueries, weighted by depth
        let points = subquery_points(query);
        if points > 0 {
            score = score.saturating_add(points);
            factors.push(ComplexityFactor {
                name: "Subqueries".to_string(),
                count: query.total_subqueries(),
                points,
                description: "Nested subqueries increase complexity exponentially".to_string(),
            });
        }

        // Aggregates
        let aggregate_count = query.aggregate_functions.len();
        if aggregate_count > 0 {
            let points = AGGREGATE_POINTS.saturating_mul(to_points(aggregate_count));
            score = score.saturating_add(points);
            factors.push(ComplexityFactor {
                name: "Aggregates".to_string(),
                count: aggregate_count,
                points,
                description: format!(
                    "Aggregate functions: {}",
                    query.aggregate_functions.join(", ")
                ),
            });
        }

        if query.has_distinct {
            score = score.saturating_add(DISTINCT_POINTS);
            factors.push(ComplexityFactor {
                name: "DISTINCT".to_string(),
                count: 1,
                points: DISTINCT_POINTS,
                description: "DISTINCT requires sorting/hashing for deduplication".to_string(),
            });
        }

        if query.has_having && !query.group_by_columns.is_empty() {
            score = score.saturating_add(GROUP_BY_HAVING_POINTS);
            factors.push(ComplexityFactor {
                name: "GROUP BY + HAVING".to_string(),
                count: 1,
                points: GROUP_BY_HAVING_POINTS,
                description: "HAVING clause filters grouped results".to_string(),
            });
        }

        // WHERE conditions past the threshold
        let where_count = query.where_conditions.len();
        if where_count > WHERE_CONDITION_THRESHOLD {
            let extra = where_count - WHERE_CONDITION_THRESHOLD;
            let points = EXTRA_WHERE_CONDITION_POINTS.saturating_mul(to_points(extra));
            score = score.saturating_add(points);
            factors.push(ComplexityFactor {
                name: "WHERE Conditions".to_string(),
                count: where_count,
                points,
                description: format!(
                    "{} conditions (>{} threshold)",
                    where_count, WHERE_CONDITION_THRESHOLD
                ),
            });
        }

        let score = score.clamp(BASE_SCORE, MAX_SCORE);
        let max_subquery_depth = query.max_subquery_depth();
        let warnings = self.warnings(query, score, max_subquery_depth);

        trace!(
            "Complexity score {} from {} factor(s), {} warning(s)",
            score,
            factors.len(),
            warnings.len()
        );

        ComplexityReport {
            score,
            level: ComplexityLevel::from_score(score),
            factors,
            warnings,
            join_count,
            max_subquery_depth,
            aggregate_count,
        }
    }

    fn warnings(&self, query: &ParsedQuery, score: u32, max_subquery_depth: usize) -> Vec<String> {
        let mut warnings = Vec::new();

        if query.selects_wildcard() {
            warnings.push(
                "SELECT * detected - specify columns explicitly for better performance".to_string(),
            );
        }

        if query.joins.len() > JOIN_WARNING_THRESHOLD {
            warnings.push(format!(
                "High number of JOINs ({}) - consider breaking into multiple queries",
                query.joins.len()
            ));
        }

        if max_subquery_depth > NESTING_WARNING_THRESHOLD {
            warnings.push(format!(
                "Deeply nested subqueries (depth: {}) - consider using CTEs or JOINs",
                max_subquery_depth
            ));
        }

        if score > CRITICAL_SCORE_THRESHOLD {
            warnings.push(
                "Query complexity is CRITICAL - review for optimization opportunities".to_string(),
            );
        }

        // Only the first suspicious literal is reported
        let suspicious = query.where_conditions.iter().any(|condition| {
            !condition.is_parameterized
                && condition
                    .value
                    .as_deref()
                    .map_or(false, |value| !is_benign_literal(value))
        });
        if suspicious {
            warnings.push(
                "Potential security issue: non-parameterized value in WHERE clause".to_string(),
            );
        }

        warnings
    }
}
