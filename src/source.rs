// 📂 Source Files - GBK report text + filesystem metadata
// Reports are small enough to hold in memory; each file is read once.

use crate::error::{ParseError, ParseResult};
use chrono::{DateTime, Local, NaiveDateTime};
use encoding_rs::GBK;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// SourceFile - decoded lines plus the timestamps every row is stamped with
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    /// File name without extension
    pub file_name: String,
    pub creation_time: NaiveDateTime,
    pub last_modified_time: NaiveDateTime,
    pub lines: Vec<String>,
}

impl SourceFile {
    /// Read and decode a report file
    pub fn open(path: &Path) -> ParseResult<Self> {
        let io_err = |source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        };

        let bytes = fs::read(path).map_err(io_err)?;
        let meta = fs::metadata(path).map_err(io_err)?;

        let modified = meta.modified().map_err(io_err)?;
        let created = meta.created().unwrap_or(modified);

        let text = decode_gbk(&bytes).ok_or_else(|| ParseError::Encoding {
            path: path.to_path_buf(),
        })?;

        Ok(SourceFile {
            path: path.to_path_buf(),
            file_name: file_stem(path),
            creation_time: local_naive(created),
            last_modified_time: local_naive(modified),
            lines: split_lines(&text),
        })
    }

    /// Build from in-memory text (tests, already-decoded input)
    pub fn from_text(
        file_name: impl Into<String>,
        text: &str,
        creation_time: NaiveDateTime,
        last_modified_time: NaiveDateTime,
    ) -> Self {
        let file_name = file_name.into();
        SourceFile {
            path: PathBuf::from(&file_name),
            file_name,
            creation_time,
            last_modified_time,
            lines: split_lines(text),
        }
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }
}

/// Strict GBK decode; `None` on malformed input
pub fn decode_gbk(bytes: &[u8]) -> Option<String> {
    GBK.decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

fn split_lines(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let mut lines: Vec<String> = text
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
        .collect();
    // trailing newline does not start another line
    if text.ends_with('\n') {
        lines.pop();
    }
    lines
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string()
}

fn local_naive(time: SystemTime) -> NaiveDateTime {
    DateTime::<Local>::from(time).naive_local()
}
