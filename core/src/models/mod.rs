//! Data models for query analysis
//!
//! This module provides the structural query model produced by the parser,
//! the reports produced by the analyzers, and the schema snapshot they consult.

mod complexity;
mod index;
mod query;
mod schema;

pub use complexity::{ComplexityFactor, ComplexityLevel, ComplexityReport};
pub use index::{create_index_statement, index_name, ImpactScore, IndexSuggestion, SuggestionType};
pub use query::{ColumnRef, JoinInfo, JoinType, ParsedQuery, QueryType, TableAlias, WhereCondition};
pub use schema::{IndexMetadata, SchemaSnapshot, TableMetadata};
