//! Asynchronous batch ingestion strategy
//!
//! This module provides an asynchronous, multi-threaded implementation of
//! the IngestionStrategy trait. Transaction lines are read in batches and
//! decoded/resolved in parallel; everything else stays sequential.
//!
//! # Architecture
//!
//! ```text
//! AsyncIngestionStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncLineReader (batched line reading)
//!     ├── MerchantIndex (built sequentially, shared via Arc)
//!     └── DashMap<u64, LineResolution> (per-line outcomes, keyed by line number)
//! ```
//!
//! # Ordering
//!
//! Decoding and resolution are pure, so chunks may run in any order. Each
//! outcome is keyed by its line number in a shared DashMap; after every
//! batch has completed, outcomes are drained in ascending line order into
//! the BatchCollector. Order-sensitive rules (duplicate detection, body
//! line sequence) therefore see records exactly as the file presents them,
//! no matter how the scheduler interleaved the work.

use crate::codec::decode_sourced;
use crate::core::{resolve, BatchCollector, IngestionReport, MerchantIndex, ResolutionOutcome};
use crate::io::async_reader::AsyncLineReader;
use crate::strategy::{IngestionStrategy, InputSet};
use crate::types::{ErrorRecord, FixedRecord, MerchantRecord, ReportError, TransactionRecord};
use dashmap::DashMap;
use futures::future::join_all;
use std::path::Path;
use std::sync::Arc;

/// Configuration for batch ingestion
///
/// Controls how many lines are read per batch and how many chunks of a
/// batch may be resolved concurrently.
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Number of lines per batch
    pub batch_size: usize,
    /// Maximum number of chunks resolving concurrently
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig, falling back to defaults for zero values.
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            log::warn!(
                "invalid batch_size (0), using default ({})",
                default.batch_size
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            log::warn!(
                "invalid max_concurrent_batches (0), using default ({})",
                default.max_concurrent_batches
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Per-line outcome of the parallel decode/resolve phase.
enum LineResolution {
    Landed {
        raw: String,
        outcome: ResolutionOutcome,
    },
    Malformed(ErrorRecord),
}

/// Asynchronous batch ingestion strategy
///
/// Master files are ingested sequentially (they are small and
/// order-defining); the transaction file — the bulky one — is fanned out
/// chunk by chunk across a tokio multi-threaded runtime.
#[derive(Debug, Clone)]
pub struct AsyncIngestionStrategy {
    config: BatchConfig,
}

impl AsyncIngestionStrategy {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }
}

impl IngestionStrategy for AsyncIngestionStrategy {
    fn ingest(&self, inputs: &InputSet) -> Result<IngestionReport, ReportError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .build()
            .map_err(|e| ReportError::runtime(format!("failed to create tokio runtime: {}", e)))?;

        runtime.block_on(async {
            let mut collector = BatchCollector::new();
            let batch_size = self.config.batch_size;

            ingest_master(
                inputs.subjects.as_deref(),
                batch_size,
                &mut collector,
                BatchCollector::add_subject,
            )
            .await?;
            ingest_master(
                inputs.relationships.as_deref(),
                batch_size,
                &mut collector,
                BatchCollector::add_relationship,
            )
            .await?;
            ingest_master(
                inputs.linkages.as_deref(),
                batch_size,
                &mut collector,
                BatchCollector::add_linkage,
            )
            .await?;
            ingest_master(
                inputs.accounting.as_deref(),
                batch_size,
                &mut collector,
                BatchCollector::add_accounting,
            )
            .await?;
            ingest_master(
                inputs.id_changes.as_deref(),
                batch_size,
                &mut collector,
                BatchCollector::add_id_change,
            )
            .await?;

            let index = Arc::new(
                ingest_merchants(inputs.merchants.as_deref(), batch_size, &mut collector).await?,
            );
            ingest_transactions(
                inputs.transactions.as_deref(),
                &self.config,
                &mut collector,
                index,
            )
            .await?;

            Ok(collector.finish())
        })
    }
}

/// Batched sequential ingestion of one master file.
async fn ingest_master<R, F>(
    path: Option<&Path>,
    batch_size: usize,
    collector: &mut BatchCollector,
    mut land: F,
) -> Result<(), ReportError>
where
    R: FixedRecord,
    F: FnMut(&mut BatchCollector, R),
{
    let Some(path) = path else {
        return Ok(());
    };
    let mut reader = AsyncLineReader::open(path).await?;
    let mut landed = 0u64;
    loop {
        let batch = reader.read_batch(batch_size).await?;
        if batch.is_empty() {
            break;
        }
        for line in batch {
            match decode_sourced::<R>(line.number, line.text) {
                Ok(sourced) => {
                    land(collector, sourced.record);
                    landed += 1;
                }
                Err(err) => collector.add_error(err),
            }
        }
    }
    log::info!(
        "{}: ingested {} {} record(s)",
        path.display(),
        landed,
        R::layout().record_kind
    );
    Ok(())
}

/// Batched sequential ingestion of the merchant master file into a lookup
/// index. Sequential on purpose: first-occurrence-wins needs input order.
async fn ingest_merchants(
    path: Option<&Path>,
    batch_size: usize,
    collector: &mut BatchCollector,
) -> Result<MerchantIndex, ReportError> {
    let mut index = MerchantIndex::new();
    let Some(path) = path else {
        return Ok(index);
    };
    let mut reader = AsyncLineReader::open(path).await?;
    loop {
        let batch = reader.read_batch(batch_size).await?;
        if batch.is_empty() {
            break;
        }
        for line in batch {
            match decode_sourced::<MerchantRecord>(line.number, line.text) {
                Ok(sourced) => match index.insert(sourced) {
                    Ok(stored) => collector.add_merchant(stored),
                    Err(err) => collector.add_error(err),
                },
                Err(err) => collector.add_error(err),
            }
        }
    }
    log::info!("{}: indexed {} merchant(s)", path.display(), index.len());
    Ok(index)
}

/// Parallel ingestion of the transaction file.
///
/// Each batch of lines is split into up to `max_concurrent_batches`
/// chunks; a task per chunk decodes and resolves its lines and records the
/// outcomes keyed by line number. Once every batch is done, outcomes are
/// drained in line order into the collector.
async fn ingest_transactions(
    path: Option<&Path>,
    config: &BatchConfig,
    collector: &mut BatchCollector,
    index: Arc<MerchantIndex>,
) -> Result<(), ReportError> {
    let Some(path) = path else {
        return Ok(());
    };
    let mut reader = AsyncLineReader::open(path).await?;
    let outcomes: Arc<DashMap<u64, LineResolution>> = Arc::new(DashMap::new());

    loop {
        let mut batch = reader.read_batch(config.batch_size).await?;
        if batch.is_empty() {
            break;
        }

        let chunk_size = batch.len().div_ceil(config.max_concurrent_batches).max(1);
        let mut handles = Vec::with_capacity(config.max_concurrent_batches);

        while !batch.is_empty() {
            let take = chunk_size.min(batch.len());
            let rest = batch.split_off(take);
            let chunk = std::mem::replace(&mut batch, rest);

            let index = Arc::clone(&index);
            let outcomes = Arc::clone(&outcomes);
            handles.push(tokio::spawn(async move {
                for line in chunk {
                    let number = line.number;
                    let resolution =
                        match decode_sourced::<TransactionRecord>(line.number, line.text) {
                            Ok(sourced) => LineResolution::Landed {
                                outcome: resolve(&sourced, &index),
                                raw: sourced.raw,
                            },
                            Err(err) => LineResolution::Malformed(err),
                        };
                    outcomes.insert(number, resolution);
                }
            }));
        }

        for handle in join_all(handles).await {
            handle.map_err(|e| ReportError::runtime(format!("resolver task failed: {}", e)))?;
        }
    }

    // All tasks have joined, so this Arc is the last one standing.
    let outcomes = Arc::try_unwrap(outcomes)
        .map_err(|_| ReportError::runtime("resolution outcomes still shared after join"))?;
    let mut resolutions: Vec<(u64, LineResolution)> = outcomes.into_iter().collect();
    resolutions.sort_unstable_by_key(|(number, _)| *number);
    log::info!(
        "{}: processed {} transaction line(s)",
        path.display(),
        resolutions.len()
    );

    for (number, resolution) in resolutions {
        match resolution {
            LineResolution::Landed { raw, outcome } => {
                collector.collect_transaction(number, raw, outcome)
            }
            LineResolution::Malformed(err) => collector.add_error(err),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode_record;
    use crate::types::{IngestionStatus, SubjectRecord};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_fixture(lines: &[String]) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        for line in lines {
            writeln!(file, "{}", line).expect("Failed to write to temp file");
        }
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn merchant_line(id: &str, name: &str) -> String {
        encode_record(&MerchantRecord {
            record_type: "07".to_string(),
            merchant_id: id.to_string(),
            company_name: name.to_string(),
            ..Default::default()
        })
    }

    fn transaction_line(merchant_id: &str, pos_id: &str, date: &str) -> String {
        encode_record(&TransactionRecord {
            record_type: "06".to_string(),
            operation_type: "AC".to_string(),
            operation_date: date.to_string(),
            currency: "EUR".to_string(),
            payment_type_code: "00".to_string(),
            total_operations: "1".to_string(),
            total_amount: "9900".to_string(),
            pos_id: pos_id.to_string(),
            merchant_id: merchant_id.to_string(),
            intermediary_id: "05584".to_string(),
        })
    }

    #[test]
    fn test_async_strategy_resolves_transactions() {
        let merchants = write_fixture(&[merchant_line("317", "ACME SRL")]);
        let transactions = write_fixture(&[
            transaction_line("317", "POS-1", "15032024"),
            transaction_line("317", "POS-2", "15032024"),
        ]);

        let inputs = InputSet {
            merchants: Some(merchants.path().to_path_buf()),
            transactions: Some(transactions.path().to_path_buf()),
            ..Default::default()
        };

        let strategy = AsyncIngestionStrategy::new(BatchConfig::default());
        let report = strategy.ingest(&inputs).unwrap();

        assert_eq!(report.status, IngestionStatus::Success);
        assert_eq!(report.batch.transactions.len(), 2);
        assert!(report.failed.is_empty());
    }

    #[test]
    fn test_async_strategy_keeps_input_order_across_chunks() {
        let merchants = write_fixture(&[merchant_line("317", "ACME SRL")]);
        let transactions = write_fixture(&[
            transaction_line("317", "POS-A", "01032024"),
            transaction_line("317", "POS-B", "01032024"),
            transaction_line("317", "POS-C", "01032024"),
            transaction_line("317", "POS-D", "01032024"),
            transaction_line("317", "POS-E", "01032024"),
        ]);

        let inputs = InputSet {
            merchants: Some(merchants.path().to_path_buf()),
            transactions: Some(transactions.path().to_path_buf()),
            ..Default::default()
        };

        // Tiny batches force several read/spawn rounds
        let strategy = AsyncIngestionStrategy::new(BatchConfig::new(2, 4));
        let report = strategy.ingest(&inputs).unwrap();

        let pos_ids: Vec<_> = report
            .batch
            .transactions
            .iter()
            .map(|tx| tx.pos_id.as_str())
            .collect();
        assert_eq!(pos_ids, vec!["POS-A", "POS-B", "POS-C", "POS-D", "POS-E"]);
    }

    #[test]
    fn test_async_strategy_duplicate_detection_is_deterministic() {
        let merchants = write_fixture(&[merchant_line("317", "ACME SRL")]);
        // Lines 1 and 5 carry the same transaction; the first must win no
        // matter how chunks are scheduled.
        let transactions = write_fixture(&[
            transaction_line("317", "POS-1", "15032024"),
            transaction_line("317", "POS-2", "15032024"),
            transaction_line("317", "POS-3", "15032024"),
            transaction_line("317", "POS-4", "15032024"),
            transaction_line("317", "POS-1", "15032024"),
        ]);

        let inputs = InputSet {
            merchants: Some(merchants.path().to_path_buf()),
            transactions: Some(transactions.path().to_path_buf()),
            ..Default::default()
        };

        let strategy = AsyncIngestionStrategy::new(BatchConfig::new(2, 4));
        let report = strategy.ingest(&inputs).unwrap();

        assert_eq!(report.batch.transactions.len(), 4);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed.records[0].codes(), vec!["ERR2"]);
        assert_eq!(report.failed.records[0].line, Some(5));
    }

    #[test]
    fn test_async_strategy_ingests_master_files() {
        let subjects = write_fixture(&[encode_record(&SubjectRecord {
            record_type: "01".to_string(),
            subject_id: "1".to_string(),
            surname_or_name: "ROSSI".to_string(),
            ..Default::default()
        })]);

        let inputs = InputSet {
            subjects: Some(subjects.path().to_path_buf()),
            ..Default::default()
        };

        let strategy = AsyncIngestionStrategy::new(BatchConfig::default());
        let report = strategy.ingest(&inputs).unwrap();
        assert_eq!(report.batch.subjects.len(), 1);
        assert_eq!(report.batch.subjects[0].surname_or_name, "ROSSI");
    }

    #[test]
    fn test_async_strategy_flags_malformed_lines() {
        let transactions = write_fixture(&["short".to_string()]);

        let inputs = InputSet {
            transactions: Some(transactions.path().to_path_buf()),
            ..Default::default()
        };

        let strategy = AsyncIngestionStrategy::new(BatchConfig::default());
        let report = strategy.ingest(&inputs).unwrap();
        assert_eq!(report.failed.records[0].codes(), vec!["WRN1"]);
    }

    #[test]
    fn test_async_strategy_missing_file_is_fatal() {
        let inputs = InputSet {
            merchants: Some(Path::new("nonexistent.txt").to_path_buf()),
            ..Default::default()
        };

        let strategy = AsyncIngestionStrategy::new(BatchConfig::default());
        let result = strategy.ingest(&inputs);
        assert!(matches!(result, Err(ReportError::FileNotFound { .. })));
    }

    #[test]
    fn test_batch_config_zero_values_fall_back_to_defaults() {
        let config = BatchConfig::new(0, 0);
        assert_eq!(config.batch_size, 1000);
        assert_eq!(config.max_concurrent_batches, num_cpus::get());
    }

    #[test]
    fn test_batch_config_keeps_explicit_values() {
        let config = BatchConfig::new(250, 3);
        assert_eq!(config.batch_size, 250);
        assert_eq!(config.max_concurrent_batches, 3);
    }
}
