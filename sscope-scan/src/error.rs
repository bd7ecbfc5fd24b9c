//! Error types for sscope-scan
//!
//! `ScanError` follows the scan file error taxonomy. Non-fatal kinds are
//! logged and absorbed by the reader; fatal kinds halt the pass and are
//! surfaced through the reader's validity flag and message.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while decoding one JSON fragment
#[derive(Debug, Error)]
pub enum FragmentError {
    /// Fragment is not well-formed JSON
    #[error("Invalid JSON syntax: {0}")]
    Syntax(#[from] serde_json::Error),

    /// Fragment parsed but lacks a required member or shape
    #[error("Invalid JSON schema: {0}")]
    Schema(String),
}

/// Scan file errors
#[derive(Debug, Error)]
pub enum ScanError {
    /// Input path cannot be opened
    #[error("Cannot open {}: {}", .path.display(), .source)]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input stream failed mid-read
    #[error("Read failed at line {line}: {source}")]
    Read {
        line: u64,
        #[source]
        source: std::io::Error,
    },

    /// Line has fewer than two tab separators
    #[error("Invalid line {line}: fewer than two tab separators")]
    LineFormat { line: u64 },

    /// Non-comment line is not valid UTF-8
    #[error("Invalid line {line}: not valid UTF-8")]
    LineEncoding { line: u64 },

    /// Forensic path offset was already read from an earlier line
    #[error("Invalid line {line}, path already read: offset {offset}")]
    DuplicateOffset { line: u64, offset: u64 },

    /// JSON fragment fails to parse
    #[error("Invalid JSON syntax at line {line}: {source}")]
    JsonSyntax {
        line: u64,
        #[source]
        source: serde_json::Error,
    },

    /// JSON fragment lacks a required member or shape
    #[error("Invalid JSON schema at line {line}: {detail}")]
    JsonSchema { line: u64, detail: String },
}

impl ScanError {
    /// Attach the line number to a fragment decoding failure
    pub fn from_fragment(line: u64, err: FragmentError) -> Self {
        match err {
            FragmentError::Syntax(source) => ScanError::JsonSyntax { line, source },
            FragmentError::Schema(detail) => ScanError::JsonSchema { line, detail },
        }
    }

    /// Whether this error halts the scan
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            ScanError::LineFormat { .. }
                | ScanError::LineEncoding { .. }
                | ScanError::DuplicateOffset { .. }
        )
    }

    /// 1-based line number the error refers to, if any
    pub fn line(&self) -> Option<u64> {
        match self {
            ScanError::FileOpen { .. } => None,
            ScanError::Read { line, .. }
            | ScanError::LineFormat { line }
            | ScanError::LineEncoding { line }
            | ScanError::DuplicateOffset { line, .. }
            | ScanError::JsonSyntax { line, .. }
            | ScanError::JsonSchema { line, .. } => Some(*line),
        }
    }
}
