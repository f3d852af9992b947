// ⚠️ Parse Errors - file-level failures a caller has to branch on
// Line-level problems never end up here: they are collected as SkippedLine diagnostics.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not valid GBK text")]
    Encoding { path: PathBuf },

    /// A header line the layout depends on is missing or unreadable
    #[error("header line {line}: {message}")]
    Header { line: usize, message: String },

    /// Strict numeric coercion hit a value that is not a number
    #[error("column `{column}` row {row}: `{value}` is not a number")]
    Numeric {
        column: String,
        row: usize,
        value: String,
    },

    /// Strict date coercion hit a value that does not match the format
    #[error("column `{column}` row {row}: `{value}` does not match date format {format}")]
    Date {
        column: String,
        row: usize,
        value: String,
        format: String,
    },

    #[error("unknown column `{0}`")]
    UnknownColumn(String),
}

pub type ParseResult<T> = std::result::Result<T, ParseError>;
