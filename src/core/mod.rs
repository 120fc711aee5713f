//! Core business logic module
//!
//! This module contains the core ingestion components:
//! - `resolver` - Merchant lookup and per-transaction validation
//! - `batch` - Sequential fan-in, duplicate detection, and run reporting

pub mod batch;
pub mod resolver;

pub use batch::{
    BatchCollector, IngestionReport, IngestionSummary, ProcessedFailedRecordBatch,
    ProcessedRecordBatch, TransactionKey,
};
pub use resolver::{resolve, MerchantIndex, ResolutionOutcome};
