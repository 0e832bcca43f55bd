use crate::language::Language;
use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SymbolKind {
    Function,
    Class,
    Struct,
    Interface,
    Other,
}

impl SymbolKind {
    /// Functions and classes are the units the analysis passes look at.
    pub fn is_analyzable(&self) -> bool {
        matches!(self, SymbolKind::Function | SymbolKind::Class)
    }
}

/// A symbol declared in a source file.
///
/// `line` is 1-based and `column` is a 0-based byte offset into that line.
/// `signature` holds the declaration text together with its body when the
/// parser could delimit one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub name: String,
    pub line: usize,
    pub column: usize,
    pub signature: Option<String>,
    pub is_exported: bool,
}

impl Symbol {
    pub fn signature_text(&self) -> &str {
        self.signature.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedFile {
    pub file_path: String,
    #[serde(skip)]
    pub language: Option<Language>,
    pub symbols: Vec<Symbol>,
    pub imports: Vec<String>,
}

impl ParsedFile {
    pub fn new(file_path: impl Into<String>, symbols: Vec<Symbol>) -> Self {
        Self {
            file_path: file_path.into(),
            language: None,
            symbols,
            imports: Vec::new(),
        }
    }

    pub fn analyzable_symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter().filter(|symbol| symbol.kind.is_analyzable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol(kind: SymbolKind, name: &str) -> Symbol {
        Symbol {
            kind,
            name: name.to_string(),
            line: 1,
            column: 0,
            signature: None,
            is_exported: false,
        }
    }

    #[test]
    fn test_analyzable_symbols_keeps_functions_and_classes() {
        let parsed = ParsedFile::new(
            "a.rs",
            vec![
                symbol(SymbolKind::Function, "run"),
                symbol(SymbolKind::Struct, "Config"),
                symbol(SymbolKind::Class, "Widget"),
            ],
        );

        let names: Vec<_> = parsed.analyzable_symbols().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["run", "Widget"]);
    }

    #[test]
    fn test_symbol_kind_serialization() {
        let json = serde_json::to_string(&SymbolKind::Function).unwrap();
        assert_eq!(json, "\"function\"");
        assert_eq!(SymbolKind::Class.to_string(), "class");
    }

    #[test]
    fn test_missing_signature_reads_as_empty() {
        assert_eq!(symbol(SymbolKind::Function, "f").signature_text(), "");
    }
}
