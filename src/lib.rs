//! m.life Processor Library
//!
//! A Rust library for consolidating heterogeneous m.life ICU export records
//! into one normalized long-format table, with optional de-identification
//! of text fields.
//!
//! This library provides tools for:
//! - Parsing sectioned m.life export files with per-section record layouts
//! - Validating raw records against typed per-source contracts
//! - Normalizing source-specific timestamp and aggregation conventions
//! - Consolidating all sources into a single time-ordered table with
//!   annotated cross-source duplicates
//! - De-identifying text values via entity recognition and fuzzy
//!   blacklist matching
//! - Writing the five-column long-format output table

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod consolidator;
        pub mod deidentifier;
        pub mod export_parser;
        pub mod normalizer;
        pub mod table_writer;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{Diagnostic, DiagnosticKind, LongRow, SourceType, ValueKind};
pub use config::Config;

/// Result type alias for the m.life processor
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for m.life processing operations
///
/// Record-level validation and normalization failures are deliberately NOT
/// represented here; they are collected as [`Diagnostic`] values and the
/// batch continues. This enum covers run-level failures only.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Structural error in the export file (not a single bad record)
    #[error("Export format error at line {line}: {message}")]
    ExportFormat { line: usize, message: String },

    /// Configuration error (invalid options, unreadable blacklist, bad CLI input)
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Language model artifact missing or corrupt; fatal at pipeline start
    #[error("Language model error ({path}): {message}")]
    LanguageModel { path: String, message: String },

    /// Output table writing error
    #[error("Table writing error: {message}")]
    TableWriting {
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Internal invariant violation; a programming defect, not a runtime condition
    #[error("Internal invariant violation: {message}")]
    Internal { message: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create an export format error
    pub fn export_format(line: usize, message: impl Into<String>) -> Self {
        Self::ExportFormat {
            line,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a language model error
    pub fn language_model(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::LanguageModel {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a table writing error
    pub fn table_writing(message: impl Into<String>, source: Option<csv::Error>) -> Self {
        Self::TableWriting {
            message: message.into(),
            source,
        }
    }

    /// Create an internal invariant violation error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::TableWriting {
            message: "CSV output writing failed".to_string(),
            source: Some(error),
        }
    }
}
