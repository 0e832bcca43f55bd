use crate::errors::{ParseError, Result};
use std::path::Path;
use strum::{Display, EnumIter, IntoEnumIterator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    TypeScript,
    Python,
    Rust,
    Go,
}

impl Language {
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Language::TypeScript => &["ts", "tsx", "js", "jsx", "mjs", "cjs"],
            Language::Python => &["py"],
            Language::Rust => &["rs"],
            Language::Go => &["go"],
        }
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        Language::iter().find(|language| language.extensions().contains(&extension))
    }

    /// Detects the language of a file from its extension.
    pub fn detect(file_path: &str) -> Result<Self> {
        let extension = Path::new(file_path)
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| ParseError::MissingExtension {
                path: file_path.to_string(),
            })?;

        Self::from_extension(extension).ok_or_else(|| ParseError::UnsupportedLanguage {
            extension: extension.to_string(),
        })
    }

    pub fn is_supported(file_path: &str) -> bool {
        Self::detect(file_path).is_ok()
    }

    pub fn uses_braces(&self) -> bool {
        !matches!(self, Language::Python)
    }
}
