use super::{RefactoringCandidate, describe};
use crate::config::AnalysisThresholds;
use insight_store::{Insight, InsightCategory, Severity};
use lazy_static::lazy_static;
use regex::Regex;
use symbol_parser::ParsedFile;

lazy_static! {
    static ref BRANCH_KEYWORD: Regex =
        Regex::new(r"\b(?:if|else|for|while|case|catch)\b").unwrap();
}

/// Cyclomatic complexity approximation: 1 plus one per branch keyword,
/// `&&`, `||` and ternary `?` in `text`.
pub fn cyclomatic_complexity(text: &str) -> usize {
    1 + BRANCH_KEYWORD.find_iter(text).count()
        + text.matches("&&").count()
        + text.matches("||").count()
        + ternary_count(text)
}

/// `?` characters that are not part of `?.` or `??`.
fn ternary_count(text: &str) -> usize {
    let bytes = text.as_bytes();
    bytes
        .iter()
        .enumerate()
        .filter(|&(i, &b)| {
            b == b'?'
                && bytes.get(i + 1).is_none_or(|&next| next != b'.' && next != b'?')
                && (i == 0 || bytes[i - 1] != b'?')
        })
        .count()
}

pub fn analyze(
    file_path: &str,
    parsed: &ParsedFile,
    thresholds: &AnalysisThresholds,
) -> (Vec<Insight>, Vec<RefactoringCandidate>) {
    let mut insights = Vec::new();
    let mut candidates = Vec::new();

    for symbol in parsed.analyzable_symbols() {
        let complexity = cyclomatic_complexity(symbol.signature_text());

        if complexity > thresholds.complexity_warning {
            insights.push(Insight::new(
                file_path,
                symbol.line,
                symbol.column,
                Severity::Warning,
                InsightCategory::Complexity,
                format!(
                    "{} has high cyclomatic complexity ({})",
                    describe(symbol),
                    complexity
                ),
            ));
        }

        if complexity > thresholds.refactoring_proposal {
            candidates.push(RefactoringCandidate {
                symbol: symbol.clone(),
                complexity,
            });
        }
    }

    (insights, candidates)
}
