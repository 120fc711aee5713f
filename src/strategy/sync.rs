//! Synchronous ingestion strategy
//!
//! This module provides a synchronous, single-threaded implementation of
//! the IngestionStrategy trait. It orchestrates the run by coordinating
//! between the LineReader (for fixed-width input), the codec (decoding),
//! the resolver (merchant join and validation), and the BatchCollector
//! (fan-in and duplicate detection).
//!
//! # Design
//!
//! Files are ingested in dependency order: the five master files first,
//! then merchants (building the lookup index), then transactions resolved
//! against that index. Within every file, records are processed strictly
//! in line order.
//!
//! # Memory Efficiency
//!
//! Input is streamed one line at a time; memory is bounded by the size of
//! the collected batch, not by the input files.

use crate::codec::decode_sourced;
use crate::core::{resolve, BatchCollector, IngestionReport, MerchantIndex};
use crate::io::sync_reader::LineReader;
use crate::strategy::{IngestionStrategy, InputSet};
use crate::types::{FixedRecord, MerchantRecord, ReportError, TransactionRecord};
use std::path::Path;

/// Synchronous ingestion strategy
///
/// Implements the IngestionStrategy trait using single-threaded streaming.
/// The natural choice for modest inputs and for debugging: behavior is
/// byte-for-byte deterministic with no runtime in play.
#[derive(Debug, Clone, Copy)]
pub struct SyncIngestionStrategy;

impl IngestionStrategy for SyncIngestionStrategy {
    fn ingest(&self, inputs: &InputSet) -> Result<IngestionReport, ReportError> {
        let mut collector = BatchCollector::new();

        ingest_master(
            inputs.subjects.as_deref(),
            &mut collector,
            BatchCollector::add_subject,
        )?;
        ingest_master(
            inputs.relationships.as_deref(),
            &mut collector,
            BatchCollector::add_relationship,
        )?;
        ingest_master(
            inputs.linkages.as_deref(),
            &mut collector,
            BatchCollector::add_linkage,
        )?;
        ingest_master(
            inputs.accounting.as_deref(),
            &mut collector,
            BatchCollector::add_accounting,
        )?;
        ingest_master(
            inputs.id_changes.as_deref(),
            &mut collector,
            BatchCollector::add_id_change,
        )?;

        let index = ingest_merchants(inputs.merchants.as_deref(), &mut collector)?;
        ingest_transactions(inputs.transactions.as_deref(), &mut collector, &index)?;

        Ok(collector.finish())
    }
}

/// Stream one master file, landing decoded records through `land` and
/// malformed lines as failed rows.
fn ingest_master<R, F>(
    path: Option<&Path>,
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
    let mut landed = 0u64;
    for line in LineReader::open(path)? {
        let line = line?;
        match decode_sourced::<R>(line.number, line.text) {
            Ok(sourced) => {
                land(collector, sourced.record);
                landed += 1;
            }
            Err(err) => collector.add_error(err),
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

/// Stream the merchant master file into a lookup index. Duplicate
/// identifiers keep their first occurrence; later ones become failed rows.
fn ingest_merchants(
    path: Option<&Path>,
    collector: &mut BatchCollector,
) -> Result<MerchantIndex, ReportError> {
    let mut index = MerchantIndex::new();
    let Some(path) = path else {
        return Ok(index);
    };
    for line in LineReader::open(path)? {
        let line = line?;
        match decode_sourced::<MerchantRecord>(line.number, line.text) {
            Ok(sourced) => match index.insert(sourced) {
                Ok(stored) => collector.add_merchant(stored),
                Err(err) => collector.add_error(err),
            },
            Err(err) => collector.add_error(err),
        }
    }
    log::info!("{}: indexed {} merchant(s)", path.display(), index.len());
    Ok(index)
}

/// Stream the transaction file, resolving each record against the index.
fn ingest_transactions(
    path: Option<&Path>,
    collector: &mut BatchCollector,
    index: &MerchantIndex,
) -> Result<(), ReportError> {
    let Some(path) = path else {
        return Ok(());
    };
    let mut processed = 0u64;
    for line in LineReader::open(path)? {
        let line = line?;
        processed += 1;
        match decode_sourced::<TransactionRecord>(line.number, line.text) {
            Ok(sourced) => {
                let outcome = resolve(&sourced, index);
                collector.collect_transaction(sourced.line, sourced.raw, outcome);
            }
            Err(err) => collector.add_error(err),
        }
    }
    log::info!("{}: processed {} transaction line(s)", path.display(), processed);
    Ok(())
}
