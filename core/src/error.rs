//! Error types for the core crate
//!
//! Syntax errors are normally carried inside an invalid [`ParsedQuery`] value;
//! the variants here cover the fatal conditions and the convenience layer that
//! re-signals an invalid model as an error.
//!
//! [`ParsedQuery`]: crate::models::ParsedQuery

use std::io;
use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Malformed SQL, re-signalled from an invalid model
    #[error("{0}")]
    Syntax(String),

    /// Blank input handed to the convenience layer
    #[error("SQL query cannot be empty")]
    EmptyQuery,

    /// Statement kind outside SELECT/INSERT/UPDATE/DELETE
    #[error("Unsupported SQL statement type: {0}")]
    UnsupportedStatement(String),

    /// Nesting guard tripped
    #[error("Query too complex: nesting depth {depth} exceeds limit {limit}")]
    QueryTooComplex {
        /// Depth reached when the guard tripped
        depth: usize,

        /// Configured limit
        limit: usize,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnalysisError {
    /// Whether this error comes from the query itself rather than the environment
    pub fn is_query_error(&self) -> bool {
        matches!(
            self,
            AnalysisError::Syntax(_)
                | AnalysisError::EmptyQuery
                | AnalysisError::UnsupportedStatement(_)
                | AnalysisError::QueryTooComplex { .. }
        )
    }
}

/// Result type for the core crate
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Convert a displayable error into a configuration error
pub fn to_config_error<E: std::fmt::Display>(err: E) -> AnalysisError {
    AnalysisError::Config(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: AnalysisError = io_err.into();
        match err {
            AnalysisError::Io(_) => {}
            _ => panic!("Expected Io variant"),
        }

        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: AnalysisError = json_err.into();
        match err {
            AnalysisError::Json(_) => {}
            _ => panic!("Expected Json variant"),
        }

        match to_config_error("bad dialect") {
            AnalysisError::Config(msg) => assert_eq!(msg, "bad dialect"),
            _ => panic!("Expected Config variant"),
        }
    }

    #[test]
    fn test_error_display() {
        let err = AnalysisError::UnsupportedStatement("CreateTable".to_string());
        assert_eq!(err.to_string(), "Unsupported SQL statement type: CreateTable");

        let err = AnalysisError::QueryTooComplex { depth: 33, limit: 32 };
        assert_eq!(
            err.to_string(),
            "Query too complex: nesting depth 33 exceeds limit 32"
        );

        let err = AnalysisError::Syntax("Invalid SQL syntax: boom".to_string());
        assert_eq!(err.to_string(), "Invalid SQL syntax: boom");

        assert_eq!(AnalysisError::EmptyQuery.to_string(), "SQL query cannot be empty");
    }

    #[test]
    fn test_is_query_error() {
        assert!(AnalysisError::EmptyQuery.is_query_error());
        assert!(AnalysisError::Syntax("x".into()).is_query_error());
        assert!(!AnalysisError::Config("x".into()).is_query_error());
    }
}
