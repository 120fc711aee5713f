//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `record`: raw fixed-width record types and the `FixedRecord` trait
//! - `cause`: per-record error classification (codes, severity, records)
//! - `status`: ingestion and submission status models
//! - `resolved`: the resolved transaction and payment channel
//! - `error`: fatal error types for the reporting engine

pub mod cause;
pub mod error;
pub mod record;
pub mod resolved;
pub mod status;

pub use cause::{ErrorCause, ErrorRecord, ErrorTypeCode, Severity};
pub use error::ReportError;
pub use record::{
    AccountingDataRecord, FixedRecord, IdChangeRecord, LinkageRecord, MerchantRecord,
    RelationshipRecord, Sourced, SubjectRecord, TransactionRecord,
};
pub use resolved::{PaymentChannel, ResolvedTransaction};
pub use status::{IngestionStatus, SubmissionStatus};
