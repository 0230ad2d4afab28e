//! Human-readable analysis report

use std::fmt;

use querysense_core::QueryAnalysis;

/// Text rendering of a [`QueryAnalysis`]
pub struct TextReport<'a>(pub &'a QueryAnalysis);

fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let analysis = self.0;
        let complexity = &analysis.complexity;

        writeln!(f, "Query type:   {}", analysis.query_type)?;
        writeln!(f, "Fingerprint:  {}", analysis.fingerprint)?;
        writeln!(f, "Tables:       {}", join_or_dash(&analysis.parsed.tables))?;
        writeln!(f, "Complexity:   {} ({})", complexity.score, complexity.level)?;

        if !complexity.factors.is_empty() {
            writeln!(f)?;
            writeln!(f, "Factors:")?;
            for factor in &complexity.factors {
                writeln!(
                    f,
                    "  {:<18} +{:<3} {}",
                    factor.name, factor.points, factor.description
                )?;
            }
        }

        if !analysis.warnings.is_empty() {
            writeln!(f)?;
            writeln!(f, "Warnings:")?;
            for warning in &analysis.warnings {
                writeln!(f, "  ! {}", warning)?;
            }
        }

        writeln!(f)?;
        if analysis.index_suggestions.is_empty() {
            writeln!(f, "Index suggestions: none")?;
        } else {
            writeln!(f, "Index suggestions:")?;
            for suggestion in &analysis.index_suggestions {
                writeln!(
                    f,
                    "  [{}] {} ({})",
                    suggestion.impact_score, suggestion.create_statement, suggestion.reasoning
                )?;
            }
        }

        Ok(())
    }
}
