use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info};
use querysense_core::{QueryAnalysisService, SchemaSnapshot, SqlDialect};

mod report;
mod settings;

use report::TextReport;

/// Output format of the analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable report
    Text,

    /// Pretty-printed JSON
    Json,
}

#[derive(Parser, Debug)]
#[clap(author, version, about = "QuerySense static analysis for SQL queries")]
struct Args {
    /// SQL statement to analyze (read from stdin when absent)
    sql: Option<String>,

    /// Read the SQL statement from a file
    #[clap(short, long, conflicts_with = "sql")]
    file: Option<PathBuf>,

    /// Schema snapshot file (JSON) with existing tables and indexes
    #[clap(short, long, env = "QUERYSENSE_SCHEMA_FILE")]
    schema: Option<String>,

    /// Config file path
    #[clap(short, long, env = "QUERYSENSE_CONFIG_FILE")]
    config: Option<String>,

    /// SQL dialect (generic, postgresql, mysql, sqlite, mssql, ansi)
    #[clap(short, long)]
    dialect: Option<String>,

    /// Maximum subquery nesting depth before the query is rejected
    #[clap(long)]
    max_depth: Option<usize>,

    /// Output format
    #[clap(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

/// SQL text from the positional argument, a file, or stdin
fn read_sql(args: &Args) -> Result<String> {
    let sql = match (&args.sql, &args.file) {
        (Some(sql), _) => sql.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read SQL from {}", path.display()))?,
        (None, None) => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read SQL from stdin")?;
            buffer
        }
    };

    if sql.trim().is_empty() {
        bail!("No SQL statement given");
    }
    Ok(sql)
}

fn main() -> Result<()> {
    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let args = Args::parse();

    // Load configuration
    let mut config = settings::load(args.config.as_deref())
        .context("Failed to load configuration")?;

    // Override config with command-line arguments
    if let Some(dialect) = &args.dialect {
        config.dialect = dialect.parse::<SqlDialect>()?;
    }
    if let Some(max_depth) = args.max_depth {
        config.max_nesting_depth = max_depth;
    }

    // Initialize logging
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, &config.log_level),
    );
    debug!("Using configuration: {:?}", config);

    let sql = read_sql(&args)?;

    let schema = match &args.schema {
        Some(path) => {
            let schema = SchemaSnapshot::from_file(path)
                .with_context(|| format!("Failed to load schema snapshot from {}", path))?;
            info!("Loaded schema snapshot with {} table(s)", schema.tables.len());
            Some(schema)
        }
        None => None,
    };

    let service = QueryAnalysisService::new(config)?;
    let analysis = service.analyze(&sql, schema.as_ref())?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&analysis)?),
        OutputFormat::Text => print!("{}", TextReport(&analysis)),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "querysense",
            "--dialect",
            "postgresql",
            "--max-depth",
            "4",
            "--format",
            "json",
            "SELECT 1",
        ])
        .unwrap();

        assert_eq!(args.sql.as_deref(), Some("SELECT 1"));
        assert_eq!(args.dialect.as_deref(), Some("postgresql"));
        assert_eq!(args.max_depth, Some(4));
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[rstest]
    #[case::implicit(&[], OutputFormat::Text)]
    #[case::text(&["--format", "text"], OutputFormat::Text)]
    #[case::json(&["--format", "json"], OutputFormat::Json)]
    fn test_format_flag(#[case] flags: &[&str], #[case] expected: OutputFormat) {
        let mut argv = vec!["querysense"];
        argv.extend_from_slice(flags);
        argv.push("SELECT 1");

        let args = Args::try_parse_from(argv).unwrap();
        assert_eq!(args.format, expected);
    }

    #[test]
    fn test_unknown_format_rejected() {
        let result = Args::try_parse_from(["querysense", "--format", "xml", "SELECT 1"]);
        assert!(result.is_err());
    }

    #[rstest]
    #[case("generic", SqlDialect::Generic)]
    #[case("postgres", SqlDialect::PostgreSql)]
    #[case("postgresql", SqlDialect::PostgreSql)]
    #[case("MySQL", SqlDialect::MySql)]
    #[case("sqlite", SqlDialect::Sqlite)]
    #[case("mssql", SqlDialect::MsSql)]
    #[case("ansi", SqlDialect::Ansi)]
    fn test_dialect_flag(#[case] name: &str, #[case] expected: SqlDialect) {
        let args = Args::try_parse_from(["querysense", "-d", name, "SELECT 1"]).unwrap();
        let dialect = args.dialect.as_deref().unwrap().parse::<SqlDialect>().unwrap();
        assert_eq!(dialect, expected);
    }

    #[test]
    fn test_sql_and_file_conflict() {
        let result = Args::try_parse_from(["querysense", "--file", "q.sql", "SELECT 1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_read_sql_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "SELECT id FROM users").unwrap();

        let args = Args::try_parse_from([
            "querysense",
            "--file",
            file.path().to_str().unwrap(),
        ])
        .unwrap();

        assert_eq!(read_sql(&args).unwrap(), "SELECT id FROM users");
    }

    #[test]
    fn test_read_sql_rejects_blank_argument() {
        let args = Args::try_parse_from(["querysense", "   "]).unwrap();
        assert!(read_sql(&args).is_err());
    }
}
