//! AML Reporting Engine Library
//! # Overview
//!
//! This library ingests the fixed-width master and transaction files a
//! financial institution reports to its tax authority, resolves POS
//! transactions against merchant master data, and renders the authority's
//! fixed-width submission file. Both a sync and an async ingestion
//! strategy are provided.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`layout`] - Fixed-width column tables for every record kind
//! - [`codec`] - Decoding raw lines into records and encoding them back
//! - [`types`] - Core data types (records, error causes, statuses)
//! - [`config`] - Filer identity configuration
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::resolver`] - Merchant lookup and per-transaction validation
//!   - [`core::batch`] - Sequential fan-in, duplicate detection, run reporting
//! - [`io`] - Line readers, submission rendering, audit report writing
//! - [`strategy`] - Pluggable sync/async ingestion pipelines
//!
//! # Record Kinds
//!
//! Seven fixed-width record kinds flow through the engine:
//!
//! - **Subject**: Registry data of a reported person or entity
//! - **Relationship**: A reportable account or relationship
//! - **Linkage**: Joins subjects to relationships with a role
//! - **AccountingData**: Yearly balances and totals per relationship
//! - **IdChange**: Subject identifier migrations
//! - **Transaction**: Aggregated POS activity, resolved against merchants
//! - **Merchant**: Merchant master data (reference only, never re-emitted)
//!
//! # Run Outcome
//!
//! Every run produces an [`core::IngestionReport`]:
//! - `batch`: records that landed, grouped per kind in input order
//! - `failed`: rejected and flagged rows, each carrying its causes
//! - `status`: `SUCCESS`, `FAILED`, or `UNKNOWN` for an empty run

// Module declarations
pub mod cli;
pub mod codec;
pub mod config;
pub mod core;
pub mod io;
pub mod layout;
pub mod strategy;
pub mod types;

pub use core::{BatchCollector, IngestionReport, MerchantIndex, ResolutionOutcome};
pub use io::{render_submission, write_error_report, LineEnding, Submission};
pub use types::{
    ErrorCause, ErrorRecord, ErrorTypeCode, IngestionStatus, ReportError, ResolvedTransaction,
    Severity, SubmissionStatus,
};
