//! Layered analyzer settings
//!
//! Sources, lowest precedence first: built-in defaults, an optional config
//! file (any format the `config` crate detects from its extension), then
//! `QUERYSENSE_*` environment variables. Command-line flags are applied on top
//! by the caller.

use config::{Config, ConfigError, Environment, File};
use querysense_core::AnalyzerConfig;

/// Prefix of environment variables read as settings
pub const ENV_PREFIX: &str = "QUERYSENSE";

/// Load analyzer settings from an optional file and the environment
pub fn load(path: Option<&str>) -> Result<AnalyzerConfig, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(File::with_name(path));
    }

    builder
        .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
        .build()?
        .try_deserialize()
}
