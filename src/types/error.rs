//! Fatal error types for the reporting engine
//!
//! This module defines the structural failures that abort an operation:
//! unreadable files, broken configuration, malformed lines, unknown workflow
//! orders. Per-record data problems are deliberately *not* here — they are
//! represented as [`ErrorRecord`](crate::types::ErrorRecord) values and never
//! abort an ingestion.
//!
//! # Error Categories
//!
//! - **File I/O Errors**: file not found, permission denied, disk errors
//! - **Configuration Errors**: unreadable or invalid filer configuration
//! - **Codec Errors**: lines shorter than their layout's width
//! - **Workflow Errors**: submission status orders outside the known range
//! - **Report Errors**: failures writing the audit report or summary

use crate::layout::RecordKind;
use thiserror::Error;

/// Main error type for the reporting engine
///
/// Every fatal failure surfaces as one of these variants. Each carries
/// enough context to be printed as a single actionable CLI message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReportError {
    /// File not found at the specified path
    ///
    /// This is a fatal error that prevents processing from starting.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },

    /// A line is shorter than its layout's total width
    ///
    /// Fatal only to the single line: the caller records it as an
    /// invalid-format error record and continues with the next line.
    #[error("Malformed {kind} line{}: expected at least {expected} characters, found {found}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    MalformedLine {
        /// Record kind the line was decoded as
        kind: RecordKind,
        /// Line number within the input file (if available)
        line: Option<u64>,
        /// The layout's total width
        expected: usize,
        /// Characters actually present
        found: usize,
    },

    /// Filer configuration could not be read or is invalid
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong, including the offending path or field
        message: String,
    },

    /// Submission status order outside the known range
    ///
    /// The workflow defines orders 1 through 13; anything else is a
    /// caller error.
    #[error("Unknown submission status order: {order}")]
    UnknownStatusOrder {
        /// The rejected order value
        order: u8,
    },

    /// Failure writing the audit report or ingestion summary
    #[error("Report write error: {message}")]
    ReportWrite {
        /// Description of the failure
        message: String,
    },

    /// Async runtime construction or worker failure
    #[error("Runtime error: {message}")]
    Runtime {
        /// Description of the failure
        message: String,
    },
}

// Conversion from io::Error to ReportError
impl From<std::io::Error> for ReportError {
    fn from(error: std::io::Error) -> Self {
        ReportError::Io {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to ReportError (audit report output)
impl From<csv::Error> for ReportError {
    fn from(error: csv::Error) -> Self {
        ReportError::ReportWrite {
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl ReportError {
    /// Create a FileNotFound error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        ReportError::FileNotFound { path: path.into() }
    }

    /// Create an Io error with a contextual message
    pub fn io(message: impl Into<String>) -> Self {
        ReportError::Io {
            message: message.into(),
        }
    }

    /// Create a MalformedLine error
    pub fn malformed_line(kind: RecordKind, line: Option<u64>, expected: usize, found: usize) -> Self {
        ReportError::MalformedLine {
            kind,
            line,
            expected,
            found,
        }
    }

    /// Create a Config error
    pub fn config(message: impl Into<String>) -> Self {
        ReportError::Config {
            message: message.into(),
        }
    }

    /// Create an UnknownStatusOrder error
    pub fn unknown_status_order(order: u8) -> Self {
        ReportError::UnknownStatusOrder { order }
    }

    /// Create a ReportWrite error
    pub fn report_write(message: impl Into<String>) -> Self {
        ReportError::ReportWrite {
            message: message.into(),
        }
    }

    /// Create a Runtime error
    pub fn runtime(message: impl Into<String>) -> Self {
        ReportError::Runtime {
            message: message.into(),
        }
    }
}
