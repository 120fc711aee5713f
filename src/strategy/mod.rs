//! Ingestion strategy module
//!
//! This module defines the Strategy pattern for complete ingestion
//! pipelines: reading the fixed-width input files, decoding and resolving
//! their records, and collecting them into an [`IngestionReport`]. It
//! allows different implementations (synchronous, asynchronous batch) to
//! be selected at runtime.

use crate::cli::StrategyType;
use crate::core::IngestionReport;
use crate::types::ReportError;
use std::path::PathBuf;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncIngestionStrategy, BatchConfig};
pub use sync::SyncIngestionStrategy;

/// The set of input files for one ingestion run.
///
/// Every entry is optional: a run may carry only master data, only
/// transactions, or any mix. Transactions are resolved against whatever
/// merchant file is present; with no merchant file every transaction fails
/// its merchant lookup.
#[derive(Debug, Clone, Default)]
pub struct InputSet {
    pub subjects: Option<PathBuf>,
    pub relationships: Option<PathBuf>,
    pub linkages: Option<PathBuf>,
    pub accounting: Option<PathBuf>,
    pub id_changes: Option<PathBuf>,
    pub merchants: Option<PathBuf>,
    pub transactions: Option<PathBuf>,
}

/// Ingestion strategy trait for complete ingestion pipelines
///
/// Each strategy must read every present input file, decode its records,
/// resolve transactions against the merchant master data, and assemble the
/// full ingestion report.
pub trait IngestionStrategy: Send + Sync {
    /// Ingest every file in `inputs` and report the outcome.
    ///
    /// # Errors
    ///
    /// Returns an error only for fatal problems: a named file that cannot
    /// be opened or read, or a runtime that cannot be created. Per-record
    /// problems never abort the run; they come back inside the report as
    /// failed rows.
    fn ingest(&self, inputs: &InputSet) -> Result<IngestionReport, ReportError>;
}

/// Create an ingestion strategy based on the specified strategy type
///
/// Factory selecting the implementation at runtime. The optional batch
/// configuration applies to the async strategy and is ignored by the
/// synchronous one.
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
) -> Box<dyn IngestionStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncIngestionStrategy),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncIngestionStrategy::new(config))
        }
    }
}
