//! Query fingerprinting
//!
//! Queries that differ only in letter case and spacing share a fingerprint,
//! which makes it usable as a key for grouping repeated queries.

use std::sync::OnceLock;

use regex::Regex;
use sha2::{Digest, Sha256};

struct Normalizer {
    whitespace: Regex,
    comma: Regex,
    equals: Regex,
}

fn normalizer() -> &'static Normalizer {
    static NORMALIZER: OnceLock<Normalizer> = OnceLock::new();
    NORMALIZER.get_or_init(|| Normalizer {
        whitespace: Regex::new(r"\s+").unwrap(),
        comma: Regex::new(r"\s*,\s*").unwrap(),
        equals: Regex::new(r"\s*=\s*").unwrap(),
    })
}

/// Canonical text form of a query
///
/// Trims and lowercases the input, collapses whitespace runs to one space and
/// removes spacing around `,` and `=`.
pub fn normalize_sql(sql: &str) -> String {
    let normalizer = normalizer();
    let lowered = sql.trim().to_lowercase();
    let collapsed = normalizer.whitespace.replace_all(&lowered, " ");
    let commas = normalizer.comma.replace_all(&collapsed, ",");
    normalizer.equals.replace_all(&commas, "=").into_owned()
}

/// SHA-256 of the normalized query, as 64 lowercase hex characters
pub fn query_fingerprint(sql: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize_sql(sql).as_bytes());
    hex::encode(hasher.finalize())
}
