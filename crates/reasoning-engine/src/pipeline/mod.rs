//! Analysis passes run over one file at a time.
//!
//! Every pass is a pure function of `(file_path, content, parsed symbols)` and
//! none depends on another's output:
//!
//! - **[`complexity`]**: cyclomatic complexity estimate per function/class
//! - **[`smells`]**: long functions, long parameter lists, deep nesting
//! - **[`intent`]**: lexical cues in the tail of the file hinting at what the
//!   developer is working on
//!
//! Complexity and smell findings become [`Insight`]s. Intent signals and
//! refactoring candidates are side-channel outputs that the scheduler turns
//! into events and advisor calls.

pub mod complexity;
pub mod intent;
pub mod smells;

use crate::config::AnalysisThresholds;
use event_bus::Intent;
use insight_store::Insight;
use symbol_parser::{ParsedFile, Symbol};

pub use complexity::cyclomatic_complexity;
pub use smells::{brace_span_lines, max_nesting_depth, parameter_count};

/// A symbol whose complexity crossed the refactoring-proposal threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct RefactoringCandidate {
    pub symbol: Symbol,
    pub complexity: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntentSignal {
    pub intent: Intent,
    pub confidence: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineOutput {
    pub insights: Vec<Insight>,
    pub refactoring_candidates: Vec<RefactoringCandidate>,
    pub intents: Vec<IntentSignal>,
}

#[derive(Debug, Clone, Default)]
pub struct AnalyzerPipeline {
    thresholds: AnalysisThresholds,
}

impl AnalyzerPipeline {
    pub fn new(thresholds: AnalysisThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &AnalysisThresholds {
        &self.thresholds
    }

    pub fn run(&self, file_path: &str, content: &str, parsed: &ParsedFile) -> PipelineOutput {
        let (mut insights, refactoring_candidates) =
            complexity::analyze(file_path, parsed, &self.thresholds);
        insights.extend(smells::analyze(file_path, content, parsed, &self.thresholds));
        let intents = intent::detect(content, self.thresholds.intent_window_lines);

        PipelineOutput {
            insights,
            refactoring_candidates,
            intents,
        }
    }
}

/// "Function 'name'" / "Class 'name'" for insight messages.
pub(crate) fn describe(symbol: &Symbol) -> String {
    let kind = symbol.kind.to_string();
    let mut chars = kind.chars();
    let kind = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => kind,
    };
    format!("{} '{}'", kind, symbol.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use insight_store::InsightCategory;
    use symbol_parser::{RegexSymbolParser, SymbolKind, SymbolParser};

    #[test]
    fn test_passes_are_concatenated_in_order() {
        let content = format!(
            "function busy(a, b, c, d, e, f) {{\n{}}}\n",
            "  if (a && b || c) { d ? e : f; }\n".repeat(4)
        );
        let parsed = RegexSymbolParser::new().parse("busy.ts", &content).unwrap();

        let output = AnalyzerPipeline::default().run("busy.ts", &content, &parsed);

        let categories: Vec<_> = output.insights.iter().map(|i| i.category).collect();
        assert_eq!(
            categories,
            vec![InsightCategory::Complexity, InsightCategory::Smell]
        );
        assert_eq!(output.refactoring_candidates.len(), 1);
        assert_eq!(output.refactoring_candidates[0].complexity, 17);
        assert!(output.intents.is_empty());
    }

    #[test]
    fn test_clean_file_yields_empty_output() {
        let content = "export function add(a, b) {\n  return a + b;\n}\n";
        let parsed = RegexSymbolParser::new().parse("add.ts", content).unwrap();

        let output = AnalyzerPipeline::default().run("add.ts", content, &parsed);

        assert_eq!(output, PipelineOutput::default());
    }

    #[test]
    fn test_describe_symbol() {
        let symbol = Symbol {
            kind: SymbolKind::Class,
            name: "Widget".to_string(),
            line: 1,
            column: 0,
            signature: None,
            is_exported: false,
        };
        assert_eq!(describe(&symbol), "Class 'Widget'");
    }
}
