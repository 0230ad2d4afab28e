//! Configuration for the core crate
//!
//! This module provides configuration options for query analysis,
//! including the SQL dialect handed to the parser and the nesting guard.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlparser::dialect::{
    AnsiDialect, Dialect, GenericDialect, MsSqlDialect, MySqlDialect, PostgreSqlDialect,
    SQLiteDialect,
};

use crate::error::{AnalysisError, Result};

/// Default bound on nested statement walks
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 16;

/// Default recursion limit handed to the SQL parser
pub const DEFAULT_PARSER_RECURSION_LIMIT: usize = 50;

/// Largest parser recursion limit the parse thread's stack is sized for
pub const MAX_PARSER_RECURSION_LIMIT: usize = 256;

/// SQL dialect used to parse incoming queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
    /// Permissive dialect accepting common syntax
    #[default]
    Generic,

    /// PostgreSQL
    #[serde(alias = "postgres")]
    PostgreSql,

    /// MySQL
    MySql,

    /// SQLite
    Sqlite,

    /// Microsoft SQL Server
    MsSql,

    /// ANSI SQL
    Ansi,
}

impl SqlDialect {
    /// Build the parser dialect for this setting
    pub fn parser_dialect(&self) -> Box<dyn Dialect> {
        match self {
            SqlDialect::Generic => Box::new(GenericDialect {}),
            SqlDialect::PostgreSql => Box::new(PostgreSqlDialect {}),
            SqlDialect::MySql => Box::new(MySqlDialect {}),
            SqlDialect::Sqlite => Box::new(SQLiteDialect {}),
            SqlDialect::MsSql => Box::new(MsSqlDialect {}),
            SqlDialect::Ansi => Box::new(AnsiDialect {}),
        }
    }

    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            SqlDialect::Generic => "generic",
            SqlDialect::PostgreSql => "postgresql",
            SqlDialect::MySql => "mysql",
            SqlDialect::Sqlite => "sqlite",
            SqlDialect::MsSql => "mssql",
            SqlDialect::Ansi => "ansi",
        }
    }
}

impl fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SqlDialect {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generic" => Ok(SqlDialect::Generic),
            "postgresql" | "postgres" => Ok(SqlDialect::PostgreSql),
            "mysql" => Ok(SqlDialect::MySql),
            "sqlite" => Ok(SqlDialect::Sqlite),
            "mssql" => Ok(SqlDialect::MsSql),
            "ansi" => Ok(SqlDialect::Ansi),
            other => Err(AnalysisError::Config(format!("Unknown SQL dialect: {}", other))),
        }
    }
}

/// Analyzer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Dialect handed to the SQL parser
    pub dialect: SqlDialect,

    /// Maximum number of nested statement walks before failing fast
    pub max_nesting_depth: usize,

    /// Recursion limit for the underlying SQL parser
    pub parser_recursion_limit: usize,

    /// Log level
    pub log_level: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            dialect: SqlDialect::default(),
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            parser_recursion_limit: DEFAULT_PARSER_RECURSION_LIMIT,
            log_level: "info".to_string(),
        }
    }
}

impl AnalyzerConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: &str) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let config: AnalyzerConfig = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn to_file(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Reject settings the analyzer cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.max_nesting_depth == 0 {
            return Err(AnalysisError::Config(
                "max_nesting_depth must be at least 1".to_string(),
            ));
        }
        if self.parser_recursion_limit == 0 {
            return Err(AnalysisError::Config(
                "parser_recursion_limit must be at least 1".to_string(),
            ));
        }
        if self.parser_recursion_limit > MAX_PARSER_RECURSION_LIMIT {
            return Err(AnalysisError::Config(format!(
                "parser_recursion_limit must be at most {}",
                MAX_PARSER_RECURSION_LIMIT
            )));
        }
        Ok(())
    }

    /// Create a development configuration
    pub fn development() -> Self {
        let mut config = Self::default();
        config.log_level = "debug".to_string();
        config
    }

    /// Create a production configuration
    pub fn production() -> Self {
        let mut config = Self::default();
        config.log_level = "warn".to_string();
        config
    }

    /// Create a testing configuration
    pub fn testing() -> Self {
        let mut config = Self::default();
        config.log_level = "debug".to_string();
        config.max_nesting_depth = 8;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = AnalyzerConfig::default();

        assert_eq!(config.dialect, SqlDialect::Generic);
        assert_eq!(config.max_nesting_depth, DEFAULT_MAX_NESTING_DEPTH);
        assert_eq!(config.parser_recursion_limit, DEFAULT_PARSER_RECURSION_LIMIT);
        assert_eq!(config.log_level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        assert_eq!(AnalyzerConfig::development().log_level, "debug");
        assert_eq!(AnalyzerConfig::production().log_level, "warn");

        let testing = AnalyzerConfig::testing();
        assert_eq!(testing.max_nesting_depth, 8);
    }

    #[test]
    fn test_validate_rejects_zero_depth() {
        let config = AnalyzerConfig {
            max_nesting_depth: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(AnalysisError::Config(_))));
    }

    #[test]
    fn test_validate_caps_parser_recursion_limit() {
        let at_cap = AnalyzerConfig {
            parser_recursion_limit: MAX_PARSER_RECURSION_LIMIT,
            ..Default::default()
        };
        assert!(at_cap.validate().is_ok());

        let over_cap = AnalyzerConfig {
            parser_recursion_limit: MAX_PARSER_RECURSION_LIMIT + 1,
            ..Default::default()
        };
        assert!(matches!(over_cap.validate(), Err(AnalysisError::Config(_))));
    }

    #[test]
    fn test_dialect_from_str() {
        assert_eq!("postgres".parse::<SqlDialect>().unwrap(), SqlDialect::PostgreSql);
        assert_eq!(" MySQL ".parse::<SqlDialect>().unwrap(), SqlDialect::MySql);
        assert_eq!("generic".parse::<SqlDialect>().unwrap(), SqlDialect::Generic);
        assert!("oracle".parse::<SqlDialect>().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AnalyzerConfig =
            serde_json::from_str(r#"{"dialect": "postgresql"}"#).unwrap();

        assert_eq!(config.dialect, SqlDialect::PostgreSql);
        assert_eq!(config.max_nesting_depth, DEFAULT_MAX_NESTING_DEPTH);
    }

    #[test]
    fn test_config_file_io() {
        let config = AnalyzerConfig {
            dialect: SqlDialect::Sqlite,
            max_nesting_depth: 12,
            ..Default::default()
        };

        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_str().unwrap();

        config.to_file(path).unwrap();
        let loaded = AnalyzerConfig::from_file(path).unwrap();

        assert_eq!(loaded, config);
    }
}
