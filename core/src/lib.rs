//! # QuerySense Core
//!
//! Static analysis for SQL queries. This crate provides the three analysis
//! components of QuerySense:
//!
//! - the AST extractor ([`SqlParserEngine`]), turning SQL text into a
//!   structural [`ParsedQuery`] model;
//! - the complexity analyzer ([`ComplexityAnalyzer`]), scoring that model;
//! - the index advisor ([`IndexAdvisor`]), proposing indexes against an
//!   optional [`SchemaSnapshot`].
//!
//! All components are synchronous and side-effect free; independent calls may
//! run concurrently on separate inputs.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod advisor;
pub mod analysis;
pub mod complexity;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod models;
pub mod parser;

/// Re-export common types for ease of use
pub use advisor::IndexAdvisor;
pub use analysis::{QueryAnalysis, QueryAnalysisService};
pub use complexity::ComplexityAnalyzer;
pub use config::{AnalyzerConfig, SqlDialect};
pub use error::{AnalysisError, Result};
pub use fingerprint::query_fingerprint;
pub use models::{
    ComplexityLevel, ComplexityReport, ImpactScore, IndexSuggestion, JoinType, ParsedQuery,
    QueryType, SchemaSnapshot, SuggestionType,
};
pub use parser::SqlParserEngine;

/// Version of the core crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parse one SQL statement with the default configuration
///
/// # Arguments
///
/// * `sql` - SQL text holding a single statement
///
/// # Returns
///
/// The structural model; malformed SQL yields a model with `valid == false`
pub fn parse(sql: &str) -> Result<ParsedQuery> {
    SqlParserEngine::default().parse(sql)
}

/// Score the complexity of a parsed query
pub fn analyze_complexity(query: &ParsedQuery) -> ComplexityReport {
    ComplexityAnalyzer::new().analyze(query)
}

/// Suggest indexes for a parsed query
///
/// # Arguments
///
/// * `query` - Structural model of the query
/// * `schema` - Existing tables and indexes, if known
pub fn suggest_indexes(query: &ParsedQuery, schema: Option<&SchemaSnapshot>) -> Vec<IndexSuggestion> {
    IndexAdvisor::new().suggest(query, schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_functions_compose() {
        let model = parse("SELECT id FROM users WHERE email = $1").unwrap();
        let report = analyze_complexity(&model);
        let suggestions = suggest_indexes(&model, None);

        assert!(model.valid);
        assert_eq!(report.score, 10);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].create_statement, "CREATE INDEX idx_users_email ON users (email);");
    }

    #[test]
    fn test_malformed_sql_is_not_an_error() {
        let model = parse("SELECT 1 FROM (").unwrap();

        assert!(!model.valid);
        assert!(!model.error_message.unwrap_or_default().is_empty());
    }

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
