//! Per-record error classification
//!
//! A record that fails validation is not an engine failure: it becomes an
//! [`ErrorRecord`] carrying the raw input row and one or more classified
//! [`ErrorCause`] entries, and ingestion continues. The severity of a record
//! is the maximum severity among its causes — a record is a warning only if
//! *every* cause is a warning.

use crate::layout::RecordKind;
use serde::Serialize;
use std::fmt;

/// Severity of a single cause or of a whole error record.
///
/// `Error` outranks `Warning`. Errors block production of the resolved
/// entity; warnings never do, but are always surfaced for audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    /// Numeric rank used for aggregation: Error (2) > Warning (1).
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Warning => 1,
            Severity::Error => 2,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "WARNING"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// Classified cause codes, stable across the audit boundary.
///
/// The `WRNx`/`ERRx` tokens cross into the audit report unchanged; external
/// consumers key on them, so they are never renamed or renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorTypeCode {
    /// WRN1: the line could not be decoded against its layout.
    InvalidFormat,
    /// WRN2: a date field is present but not a valid ddMMyyyy date.
    InvalidDateFormat,
    /// WRN3: a mandatory field is empty (or carries the no-date sentinel).
    MandatoryDataIsMissing,
    /// WRN4: a field holds a value outside its domain, or was truncated
    /// to fit its output column.
    InvalidValue,
    /// ERR1: a transaction references a merchant absent from the index.
    ForeignKeyError,
    /// ERR2: a transaction repeats the identity of an earlier one.
    DuplicateTransaction,
    /// ERR3: a merchant identifier occurs more than once in the master file.
    DuplicateMerchant,
}

impl ErrorTypeCode {
    /// The wire token written to audit output.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorTypeCode::InvalidFormat => "WRN1",
            ErrorTypeCode::InvalidDateFormat => "WRN2",
            ErrorTypeCode::MandatoryDataIsMissing => "WRN3",
            ErrorTypeCode::InvalidValue => "WRN4",
            ErrorTypeCode::ForeignKeyError => "ERR1",
            ErrorTypeCode::DuplicateTransaction => "ERR2",
            ErrorTypeCode::DuplicateMerchant => "ERR3",
        }
    }

    /// Severity implied by the code.
    pub fn severity(&self) -> Severity {
        match self {
            ErrorTypeCode::InvalidFormat
            | ErrorTypeCode::InvalidDateFormat
            | ErrorTypeCode::MandatoryDataIsMissing
            | ErrorTypeCode::InvalidValue => Severity::Warning,
            ErrorTypeCode::ForeignKeyError
            | ErrorTypeCode::DuplicateTransaction
            | ErrorTypeCode::DuplicateMerchant => Severity::Error,
        }
    }
}

impl fmt::Display for ErrorTypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One classified problem found in a record.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorCause {
    pub code: ErrorTypeCode,
    /// Human-readable detail naming the offending field or value.
    pub message: String,
}

impl ErrorCause {
    pub fn new(code: ErrorTypeCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }
}

impl fmt::Display for ErrorCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A rejected or flagged input row together with everything wrong with it.
///
/// The raw row is preserved verbatim so the audit trail can reproduce the
/// exact input. Causes accumulate — validation never stops at the first
/// problem. `causes` is non-empty by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorRecord {
    /// Which record kind the row was read as.
    pub kind: RecordKind,
    /// Line number within the source file; `None` for problems raised
    /// while encoding output rather than reading input.
    pub line: Option<u64>,
    /// The offending row, exactly as read (or as rendered, for output
    /// problems).
    pub raw_row: String,
    pub causes: Vec<ErrorCause>,
}

impl ErrorRecord {
    pub fn new(
        kind: RecordKind,
        line: Option<u64>,
        raw_row: impl Into<String>,
        causes: Vec<ErrorCause>,
    ) -> Self {
        Self {
            kind,
            line,
            raw_row: raw_row.into(),
            causes,
        }
    }

    /// Append another cause, keeping the record's identity.
    pub fn push_cause(&mut self, cause: ErrorCause) {
        self.causes.push(cause);
    }

    /// Maximum severity across all causes.
    pub fn severity(&self) -> Severity {
        self.causes
            .iter()
            .map(ErrorCause::severity)
            .max()
            .unwrap_or(Severity::Warning)
    }

    /// True iff every cause is warning-level.
    pub fn is_warning(&self) -> bool {
        self.causes.iter().all(|c| c.severity() == Severity::Warning)
    }

    /// The cause codes as wire tokens, in accumulation order.
    pub fn codes(&self) -> Vec<&'static str> {
        self.causes.iter().map(|c| c.code.code()).collect()
    }
}
