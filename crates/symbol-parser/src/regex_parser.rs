use crate::SymbolParser;
use crate::errors::{ParseError, Result};
use crate::language::Language;
use crate::symbol::{ParsedFile, Symbol, SymbolKind};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

lazy_static! {
    static ref TS_FUNCTION: Regex = Regex::new(
        r"(?m)^[ \t]*(?:export\s+)?(?:default\s+)?(?:async\s+)?function\s*\*?\s*(?P<name>\w+)"
    )
    .unwrap();
    static ref TS_ARROW_FUNCTION: Regex = Regex::new(
        r"(?m)^[ \t]*(?:export\s+)?(?:const|let|var)\s+(?P<name>\w+)\s*(?::[^=]+)?=\s*(?:async\s+)?(?:\([^)]*\)|\w+)\s*(?::[^=]+)?=>"
    )
    .unwrap();
    static ref TS_CLASS: Regex = Regex::new(
        r"(?m)^[ \t]*(?:export\s+)?(?:default\s+)?(?:abstract\s+)?class\s+(?P<name>\w+)"
    )
    .unwrap();
    static ref TS_INTERFACE: Regex =
        Regex::new(r"(?m)^[ \t]*(?:export\s+)?interface\s+(?P<name>\w+)").unwrap();
    static ref TS_IMPORT: Regex = Regex::new(r#"import\s+[^;]*?from\s+['"](.+?)['"]"#).unwrap();
    static ref PY_FUNCTION: Regex =
        Regex::new(r"(?m)^[ \t]*(?:async\s+)?def\s+(?P<name>\w+)\s*\(").unwrap();
    static ref PY_CLASS: Regex = Regex::new(r"(?m)^[ \t]*class\s+(?P<name>\w+)").unwrap();
    static ref PY_IMPORT: Regex =
        Regex::new(r"(?m)^[ \t]*(?:from\s+(\S+)\s+import\s+.+|import\s+(\S+))").unwrap();
    static ref RS_FUNCTION: Regex = Regex::new(
        r#"(?m)^[ \t]*(?:pub(?:\([^)]*\))?\s+)?(?:const\s+)?(?:async\s+)?(?:unsafe\s+)?(?:extern\s+"[^"]*"\s+)?fn\s+(?P<name>\w+)"#
    )
    .unwrap();
    static ref RS_STRUCT: Regex =
        Regex::new(r"(?m)^[ \t]*(?:pub(?:\([^)]*\))?\s+)?(?:struct|enum)\s+(?P<name>\w+)").unwrap();
    static ref RS_TRAIT: Regex =
        Regex::new(r"(?m)^[ \t]*(?:pub(?:\([^)]*\))?\s+)?trait\s+(?P<name>\w+)").unwrap();
    static ref RS_USE: Regex = Regex::new(r"(?m)^[ \t]*(?:pub\s+)?use\s+([^;]+);").unwrap();
    static ref GO_FUNCTION: Regex =
        Regex::new(r"(?m)^func\s+(?:\([^)]*\)\s*)?(?P<name>\w+)\s*[\[(]").unwrap();
    static ref GO_STRUCT: Regex = Regex::new(r"(?m)^type\s+(?P<name>\w+)\s+struct").unwrap();
    static ref GO_INTERFACE: Regex =
        Regex::new(r"(?m)^type\s+(?P<name>\w+)\s+interface").unwrap();
    static ref GO_IMPORT: Regex =
        Regex::new(r#"import\s+(?:\(([^)]+)\)|(?:\w+\s+)?"([^"]+)")"#).unwrap();
}

/// Pattern-based symbol extractor.
///
/// Declarations are located with per-language regular expressions. For brace
/// languages the signature runs from the declaration to the matching closing
/// brace; for Python it runs over the indented block below the `def`/`class`.
#[derive(Debug, Default, Clone)]
pub struct RegexSymbolParser;

impl RegexSymbolParser {
    pub fn new() -> Self {
        Self
    }

    fn patterns(language: Language) -> Vec<(&'static Regex, SymbolKind)> {
        match language {
            Language::TypeScript => vec![
                (&*TS_FUNCTION, SymbolKind::Function),
                (&*TS_ARROW_FUNCTION, SymbolKind::Function),
                (&*TS_CLASS, SymbolKind::Class),
                (&*TS_INTERFACE, SymbolKind::Interface),
            ],
            Language::Python => vec![
                (&*PY_FUNCTION, SymbolKind::Function),
                (&*PY_CLASS, SymbolKind::Class),
            ],
            Language::Rust => vec![
                (&*RS_FUNCTION, SymbolKind::Function),
                (&*RS_STRUCT, SymbolKind::Struct),
                (&*RS_TRAIT, SymbolKind::Interface),
            ],
            Language::Go => vec![
                (&*GO_FUNCTION, SymbolKind::Function),
                (&*GO_STRUCT, SymbolKind::Struct),
                (&*GO_INTERFACE, SymbolKind::Interface),
            ],
        }
    }

    fn is_exported(language: Language, declaration: &str, name: &str) -> bool {
        match language {
            Language::TypeScript => declaration.starts_with("export"),
            Language::Python => !name.starts_with('_'),
            Language::Rust => declaration.starts_with("pub"),
            Language::Go => name.chars().next().is_some_and(|c| c.is_uppercase()),
        }
    }

    fn extract_imports(language: Language, content: &str) -> Vec<String> {
        match language {
            Language::TypeScript => TS_IMPORT
                .captures_iter(content)
                .filter_map(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
                .collect(),
            Language::Python => PY_IMPORT
                .captures_iter(content)
                .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
                .map(|m| m.as_str().to_string())
                .collect(),
            Language::Rust => RS_USE
                .captures_iter(content)
                .filter_map(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string())
                .collect(),
            Language::Go => {
                let mut imports = Vec::new();
                for caps in GO_IMPORT.captures_iter(content) {
                    if let Some(block) = caps.get(1) {
                        imports.extend(
                            block
                                .as_str()
                                .lines()
                                .filter_map(|line| line.split('"').nth(1))
                                .filter(|path| !path.is_empty())
                                .map(str::to_string),
                        );
                    } else if let Some(single) = caps.get(2) {
                        imports.push(single.as_str().to_string());
                    }
                }
                imports
            }
        }
    }
}

impl SymbolParser for RegexSymbolParser {
    fn parse(&self, file_path: &str, content: &str) -> Result<ParsedFile> {
        let language = Language::detect(file_path)?;
        if content.contains('\0') {
            return Err(ParseError::Malformed {
                path: file_path.to_string(),
                reason: "binary content".to_string(),
            });
        }

        let mut symbols = Vec::new();
        for (pattern, kind) in Self::patterns(language) {
            for caps in pattern.captures_iter(content) {
                let (Some(whole), Some(name)) = (caps.get(0), caps.name("name")) else {
                    continue;
                };
                let declaration = whole.as_str().trim_start();
                let start = whole.end() - declaration.len();
                let (line, column) = line_and_column(content, start);
                let signature = if language.uses_braces() {
                    brace_delimited(content, start)
                } else {
                    indented_block(content, start)
                };

                symbols.push(Symbol {
                    kind,
                    name: name.as_str().to_string(),
                    line,
                    column,
                    signature: Some(signature.to_string()),
                    is_exported: Self::is_exported(language, declaration, name.as_str()),
                });
            }
        }
        symbols.sort_by_key(|symbol| (symbol.line, symbol.column));

        let imports = Self::extract_imports(language, content);
        debug!(
            "Parsed {} ({}): {} symbols, {} imports",
            file_path,
            language,
            symbols.len(),
            imports.len()
        );

        Ok(ParsedFile {
            file_path: file_path.to_string(),
            language: Some(language),
            symbols,
            imports,
        })
    }
}

/// 1-based line and 0-based byte column of `offset`.
fn line_and_column(content: &str, offset: usize) -> (usize, usize) {
    let before = &content[..offset];
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    (before.matches('\n').count() + 1, offset - line_start)
}

/// Declaration text up to the brace closing its body, or up to a terminating
/// `;` for body-less declarations. Unbalanced bodies run to end of input.
fn brace_delimited(content: &str, start: usize) -> &str {
    let rest = &content[start..];
    let mut grouping = 0i32;
    let mut depth = 0usize;
    let mut opened = false;

    for (offset, ch) in rest.char_indices() {
        match ch {
            '(' | '[' if !opened => grouping += 1,
            ')' | ']' if !opened => grouping -= 1,
            ';' if !opened && grouping <= 0 => return &rest[..=offset],
            '{' => {
                opened = true;
                depth += 1;
            }
            '}' if opened => {
                depth -= 1;
                if depth == 0 {
                    return &rest[..=offset];
                }
            }
            _ => {}
        }
    }

    rest
}

/// Declaration line plus every following line indented deeper than it.
fn indented_block(content: &str, start: usize) -> &str {
    let line_start = content[..start].rfind('\n').map_or(0, |i| i + 1);
    let indent = start - line_start;
    let mut end = content[start..]
        .find('\n')
        .map_or(content.len(), |i| start + i);
    let mut cursor = end;

    while cursor < content.len() {
        let line_begin = cursor + 1;
        let line_end = content[line_begin..]
            .find('\n')
            .map_or(content.len(), |i| line_begin + i);
        let line = &content[line_begin..line_end];
        cursor = line_end;

        if line.trim().is_empty() {
            continue;
        }
        if line.len() - line.trim_start().len() <= indent {
            break;
        }
        end = line_end;
    }

    &content[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(path: &str, content: &str) -> ParsedFile {
        RegexSymbolParser::new().parse(path, content).unwrap()
    }

    #[test]
    fn test_typescript_parsing() {
        let content = r#"import { api } from "./api";

export function hello(name: string) {
    if (name) {
        console.log("Hello", name);
    }
}

class MyClass {
    constructor() {}
}
"#;

        let parsed = parse("test.ts", content);

        assert_eq!(parsed.symbols.len(), 2);
        let hello = &parsed.symbols[0];
        assert_eq!(hello.name, "hello");
        assert_eq!(hello.kind, SymbolKind::Function);
        assert_eq!(hello.line, 3);
        assert_eq!(hello.column, 0);
        assert!(hello.is_exported);
        assert!(hello.signature_text().starts_with("export function hello"));
        assert!(hello.signature_text().ends_with("}\n}"));

        let class = &parsed.symbols[1];
        assert_eq!(class.name, "MyClass");
        assert_eq!(class.kind, SymbolKind::Class);
        assert!(!class.is_exported);
        assert_eq!(parsed.imports, vec!["./api".to_string()]);
    }

    #[test]
    fn test_typescript_arrow_functions() {
        let content = "export const add = (a: number, b: number): number => {\n  return a + b;\n};\nconst twice = async x => x * 2;\n";

        let parsed = parse("math.ts", content);

        let names: Vec<_> = parsed.symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["add", "twice"]);
        assert_eq!(parsed.symbols[0].signature_text().lines().count(), 3);
        assert_eq!(
            parsed.symbols[1].signature_text(),
            "const twice = async x => x * 2;"
        );
    }

    #[test]
    fn test_python_parsing() {
        let content = r#"
import os
from typing import List

def my_function(a, b):
    if a:
        return b

    return a

class MyClass:
    def method(self):
        pass

def _private():
    pass
"#;

        let parsed = parse("test.py", content);

        let names: Vec<_> = parsed.symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["my_function", "MyClass", "method", "_private"]);
        assert_eq!(parsed.symbols[0].line, 5);
        assert_eq!(parsed.symbols[0].signature_text().lines().count(), 5);
        assert!(parsed.symbols[1].signature_text().contains("def method"));
        assert_eq!(parsed.symbols[2].column, 4);
        assert!(!parsed.symbols[3].is_exported);
        assert_eq!(parsed.imports, vec!["os".to_string(), "typing".to_string()]);
    }

    #[test]
    fn test_rust_parsing() {
        let content = r#"use std::collections::HashMap;

pub struct Config {
    values: HashMap<String, String>,
}

pub trait Source {
    fn read(&self) -> String;
}

pub(crate) async fn load(path: &str, buf: [u8; 4]) -> Config {
    todo!()
}
"#;

        let parsed = parse("lib.rs", content);

        let kinds: Vec<_> = parsed
            .symbols
            .iter()
            .map(|s| (s.name.as_str(), s.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("Config", SymbolKind::Struct),
                ("Source", SymbolKind::Interface),
                ("read", SymbolKind::Function),
                ("load", SymbolKind::Function),
            ]
        );
        assert_eq!(parsed.symbols[2].signature_text(), "fn read(&self) -> String;");
        assert!(parsed.symbols[3].signature_text().ends_with("todo!()\n}"));
        assert!(parsed.symbols[3].is_exported);
        assert_eq!(
            parsed.imports,
            vec!["std::collections::HashMap".to_string()]
        );
    }

    #[test]
    fn test_go_parsing() {
        let content = r#"package main

import (
    "fmt"
    "net/http"
)

type Server struct {
    addr string
}

func (s *Server) Start() error {
    return nil
}

func helper(x int) int {
    return x
}
"#;

        let parsed = parse("main.go", content);

        let names: Vec<_> = parsed.symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Server", "Start", "helper"]);
        assert!(parsed.symbols[1].is_exported);
        assert!(!parsed.symbols[2].is_exported);
        assert_eq!(
            parsed.imports,
            vec!["fmt".to_string(), "net/http".to_string()]
        );
    }

    #[test]
    fn test_unbalanced_body_runs_to_end() {
        let content = "function broken() {\n  if (x) {\n";

        let parsed = parse("broken.js", content);

        assert_eq!(parsed.symbols[0].signature_text(), content);
    }

    #[test]
    fn test_unsupported_and_binary_inputs_fail() {
        let parser = RegexSymbolParser::new();

        assert!(matches!(
            parser.parse("README.md", "# title"),
            Err(ParseError::UnsupportedLanguage { .. })
        ));
        assert!(matches!(
            parser.parse("blob.ts", "abc\0def"),
            Err(ParseError::Malformed { .. })
        ));
    }

    #[test]
    fn test_line_and_column() {
        let content = "a\nbc\n  def";
        assert_eq!(line_and_column(content, 0), (1, 0));
        assert_eq!(line_and_column(content, 3), (2, 1));
        assert_eq!(line_and_column(content, 7), (3, 2));
    }
}
