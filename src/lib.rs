//! QuerySense - static analysis for SQL queries
//!
//! This is the root crate of the workspace. It re-exports the analysis API of
//! the subcrates:
//! - `querysense-core`: AST extraction, complexity scoring and index advice
//! - `querysense-cli`: the `querysense` command-line front end

pub use querysense_core::*;

/// Returns the version of the package.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facade_exposes_core() {
        assert_eq!(version(), VERSION);

        let model = parse("SELECT name FROM users ORDER BY name").unwrap();
        assert_eq!(suggest_indexes(&model, None).len(), 1);
    }
}
