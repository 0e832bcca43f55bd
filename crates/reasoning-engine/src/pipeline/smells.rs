use super::describe;
use crate::config::AnalysisThresholds;
use insight_store::{Insight, InsightCategory, Severity};
use symbol_parser::{ParsedFile, Symbol};

/// Number of lines from `start_line` (1-based) through the line where the
/// brace balance returns to zero. Balance is tracked only after the first `{`.
/// Returns `None` when the braces never balance.
pub fn brace_span_lines(content: &str, start_line: usize) -> Option<usize> {
    let first_line = start_line.max(1);
    let mut depth: i64 = 0;
    let mut opened = false;

    for (index, line) in content.lines().enumerate().skip(first_line - 1) {
        for ch in line.chars() {
            match ch {
                '{' => {
                    depth += 1;
                    opened = true;
                }
                '}' if opened => depth -= 1,
                _ => {}
            }
        }
        if opened && depth <= 0 {
            return Some(index + 2 - first_line);
        }
    }

    None
}

/// Count of non-empty comma-separated segments in the first parenthesized list.
pub fn parameter_count(signature: &str) -> usize {
    let Some(open) = signature.find('(') else {
        return 0;
    };

    let mut depth = 0usize;
    let mut close = signature.len();
    for (offset, ch) in signature[open..].char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    close = open + offset;
                    break;
                }
            }
            _ => {}
        }
    }

    signature[open + 1..close]
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .count()
}

/// Deepest `{` nesting reached while scanning `text`.
pub fn max_nesting_depth(text: &str) -> usize {
    let mut depth = 0usize;
    let mut max_depth = 0usize;
    for ch in text.chars() {
        match ch {
            '{' => {
                depth += 1;
                max_depth = max_depth.max(depth);
            }
            '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    max_depth
}

pub fn analyze(
    file_path: &str,
    content: &str,
    parsed: &ParsedFile,
    thresholds: &AnalysisThresholds,
) -> Vec<Insight> {
    let mut insights = Vec::new();

    for symbol in parsed.analyzable_symbols() {
        let signature = symbol.signature_text();

        if let Some(lines) = brace_span_lines(content, symbol.line)
            .filter(|&lines| lines > thresholds.long_function_lines)
        {
            insights.push(smell(
                file_path,
                symbol,
                format!(
                    "{} is {} lines long (limit {})",
                    describe(symbol),
                    lines,
                    thresholds.long_function_lines
                ),
            ));
        }

        let parameters = parameter_count(signature);
        if parameters > thresholds.max_parameters {
            insights.push(smell(
                file_path,
                symbol,
                format!(
                    "{} has {} parameters (limit {})",
                    describe(symbol),
                    parameters,
                    thresholds.max_parameters
                ),
            ));
        }

        let depth = max_nesting_depth(signature);
        if depth > thresholds.max_nesting_depth {
            insights.push(smell(
                file_path,
                symbol,
                format!(
                    "{} has nesting depth {} (limit {})",
                    describe(symbol),
                    depth,
                    thresholds.max_nesting_depth
                ),
            ));
        }
    }

    insights
}

fn smell(file_path: &str, symbol: &Symbol, message: String) -> Insight {
    Insight::new(
        file_path,
        symbol.line,
        symbol.column,
        Severity::Info,
        InsightCategory::Smell,
        message,
    )
}
