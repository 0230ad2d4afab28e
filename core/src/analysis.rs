//! One-shot analysis pipeline
//!
//! Runs extraction, complexity scoring and index advice over one SQL text and
//! bundles the results with the query fingerprint.

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::advisor::IndexAdvisor;
use crate::complexity::ComplexityAnalyzer;
use crate::config::AnalyzerConfig;
use crate::error::{AnalysisError, Result};
use crate::fingerprint::query_fingerprint;
use crate::models::{ComplexityReport, IndexSuggestion, ParsedQuery, QueryType, SchemaSnapshot};
use crate::parser::SqlParserEngine;

/// Result of analyzing one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryAnalysis {
    /// Unique identifier of this analysis run
    pub analysis_id: Uuid,

    /// Statement kind
    pub query_type: QueryType,

    /// Fingerprint of the normalized query text
    pub fingerprint: String,

    /// Structural model
    pub parsed: ParsedQuery,

    /// Complexity report
    pub complexity: ComplexityReport,

    /// Index suggestions in table order
    pub index_suggestions: Vec<IndexSuggestion>,

    /// Warnings, copied from the complexity report
    pub warnings: Vec<String>,

    /// When the analysis ran
    pub analyzed_at: DateTime<Utc>,
}

/// Analysis pipeline over the three analyzers
#[derive(Debug, Clone, Default)]
pub struct QueryAnalysisService {
    parser: SqlParserEngine,
    complexity: ComplexityAnalyzer,
    advisor: IndexAdvisor,
}

impl QueryAnalysisService {
    /// Create a pipeline with the given configuration
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        Ok(QueryAnalysisService {
            parser: SqlParserEngine::new(config)?,
            complexity: ComplexityAnalyzer::new(),
            advisor: IndexAdvisor::new(),
        })
    }

    /// Get the parser engine
    pub fn parser(&self) -> &SqlParserEngine {
        &self.parser
    }

    /// Analyze one SQL statement
    ///
    /// Fails on blank input and syntax errors as well as on the fatal parser
    /// conditions; complexity is never computed for an invalid model.
    pub fn analyze(&self, sql: &str, schema: Option<&SchemaSnapshot>) -> Result<QueryAnalysis> {
        let parsed = self.parser.parse_valid(sql)?;
        let query_type = parsed
            .query_type
            .ok_or_else(|| AnalysisError::Syntax("Missing statement type".to_string()))?;

        let complexity = self.complexity.analyze(&parsed);
        let index_suggestions = self.advisor.suggest(&parsed, schema);
        let warnings = complexity.warnings.clone();

        info!(
            "Analyzed {} query: complexity {} ({}), {} index suggestion(s)",
            query_type,
            complexity.level,
            complexity.score,
            index_suggestions.len()
        );

        Ok(QueryAnalysis {
            analysis_id: Uuid::new_v4(),
            query_type,
            fingerprint: query_fingerprint(sql),
            parsed,
            complexity,
            index_suggestions,
            warnings,
            analyzed_at: Utc::now(),
        })
    }
}
