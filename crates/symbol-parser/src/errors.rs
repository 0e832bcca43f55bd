use thiserror::Error;

pub type Result<T> = std::result::Result<T, ParseError>;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("No file extension: {path}")]
    MissingExtension { path: String },

    #[error("Unsupported extension: {extension}")]
    UnsupportedLanguage { extension: String },

    #[error("Malformed source in {path}: {reason}")]
    Malformed { path: String, reason: String },
}
