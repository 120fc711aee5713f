//! Batch collection and ingestion reporting
//!
//! The [`BatchCollector`] is the single-threaded fan-in point of an
//! ingestion run: master records, resolved transactions, and failed rows
//! all land here in input order. Because every record passes through one
//! collector, cross-record rules (duplicate-transaction detection) live
//! here rather than in the per-record resolver.

use crate::core::resolver::ResolutionOutcome;
use crate::layout::RecordKind;
use crate::types::{
    AccountingDataRecord, ErrorCause, ErrorRecord, ErrorTypeCode, IdChangeRecord, IngestionStatus,
    LinkageRecord, MerchantRecord, RelationshipRecord, ResolvedTransaction, SubjectRecord,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;

/// Identity of a transaction for duplicate detection.
///
/// Two rows reporting the same merchant, terminal, operation type, date,
/// payment type and currency are the same declaration: the first one wins
/// and later ones are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransactionKey {
    merchant_id: String,
    pos_id: String,
    operation_type: String,
    operation_date: Option<NaiveDate>,
    payment_type_code: String,
    currency: String,
}

impl TransactionKey {
    pub fn of(tx: &ResolvedTransaction) -> Self {
        Self {
            merchant_id: tx.merchant.merchant_id.clone(),
            pos_id: tx.pos_id.clone(),
            operation_type: tx.operation_type.clone(),
            operation_date: tx.operation_date,
            payment_type_code: tx.payment_type_code.clone(),
            currency: tx.currency.clone(),
        }
    }
}

/// Records that survived ingestion, grouped per record family and kept in
/// input order within each family.
#[derive(Debug, Default)]
pub struct ProcessedRecordBatch {
    pub subjects: Vec<SubjectRecord>,
    pub relationships: Vec<RelationshipRecord>,
    pub linkages: Vec<LinkageRecord>,
    pub accounting_data: Vec<AccountingDataRecord>,
    pub id_changes: Vec<IdChangeRecord>,
    pub merchants: Vec<MerchantRecord>,
    pub transactions: Vec<ResolvedTransaction>,
}

impl ProcessedRecordBatch {
    pub fn record_count(&self) -> usize {
        self.subjects.len()
            + self.relationships.len()
            + self.linkages.len()
            + self.accounting_data.len()
            + self.id_changes.len()
            + self.merchants.len()
            + self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }
}

/// Rows that were rejected or flagged, in the order they were seen.
#[derive(Debug, Default)]
pub struct ProcessedFailedRecordBatch {
    pub records: Vec<ErrorRecord>,
}

impl ProcessedFailedRecordBatch {
    pub fn warning_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_warning()).count()
    }

    pub fn error_count(&self) -> usize {
        self.records.iter().filter(|r| !r.is_warning()).count()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Full result of one ingestion run.
#[derive(Debug)]
pub struct IngestionReport {
    pub batch: ProcessedRecordBatch,
    pub failed: ProcessedFailedRecordBatch,
    pub status: IngestionStatus,
}

impl IngestionReport {
    pub fn summary(&self) -> IngestionSummary {
        IngestionSummary {
            status: self.status,
            subjects: self.batch.subjects.len(),
            relationships: self.batch.relationships.len(),
            linkages: self.batch.linkages.len(),
            accounting_data: self.batch.accounting_data.len(),
            id_changes: self.batch.id_changes.len(),
            merchants: self.batch.merchants.len(),
            transactions: self.batch.transactions.len(),
            warnings: self.failed.warning_count(),
            errors: self.failed.error_count(),
        }
    }
}

/// Counts for operators and downstream tooling, serialized as JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestionSummary {
    pub status: IngestionStatus,
    pub subjects: usize,
    pub relationships: usize,
    pub linkages: usize,
    pub accounting_data: usize,
    pub id_changes: usize,
    pub merchants: usize,
    pub transactions: usize,
    pub warnings: usize,
    pub errors: usize,
}

/// Sequential fan-in point for one ingestion run.
#[derive(Debug, Default)]
pub struct BatchCollector {
    batch: ProcessedRecordBatch,
    failed: Vec<ErrorRecord>,
    seen: HashSet<TransactionKey>,
}

impl BatchCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_subject(&mut self, record: SubjectRecord) {
        self.batch.subjects.push(record);
    }

    pub fn add_relationship(&mut self, record: RelationshipRecord) {
        self.batch.relationships.push(record);
    }

    pub fn add_linkage(&mut self, record: LinkageRecord) {
        self.batch.linkages.push(record);
    }

    pub fn add_accounting(&mut self, record: AccountingDataRecord) {
        self.batch.accounting_data.push(record);
    }

    pub fn add_id_change(&mut self, record: IdChangeRecord) {
        self.batch.id_changes.push(record);
    }

    pub fn add_merchant(&mut self, record: MerchantRecord) {
        self.batch.merchants.push(record);
    }

    pub fn add_error(&mut self, record: ErrorRecord) {
        self.failed.push(record);
    }

    /// Land one resolution outcome, enforcing transaction uniqueness.
    ///
    /// A duplicate of an already collected transaction turns the whole row
    /// into a rejection; when the row already carried warnings the
    /// duplicate cause is appended to them so the audit report keeps one
    /// entry per row.
    pub fn collect_transaction(&mut self, line: u64, raw: String, outcome: ResolutionOutcome) {
        match outcome {
            ResolutionOutcome::Resolved(tx) => {
                if let Some(cause) = self.duplicate_of(&tx) {
                    self.failed.push(ErrorRecord::new(
                        RecordKind::Transaction,
                        Some(line),
                        raw,
                        vec![cause],
                    ));
                } else {
                    self.batch.transactions.push(tx);
                }
            }
            ResolutionOutcome::ResolvedWithWarnings(tx, mut flagged) => {
                if let Some(cause) = self.duplicate_of(&tx) {
                    flagged.push_cause(cause);
                    self.failed.push(flagged);
                } else {
                    self.batch.transactions.push(tx);
                    self.failed.push(flagged);
                }
            }
            ResolutionOutcome::Rejected(err) => self.failed.push(err),
        }
    }

    fn duplicate_of(&mut self, tx: &ResolvedTransaction) -> Option<ErrorCause> {
        let key = TransactionKey::of(tx);
        if self.seen.insert(key) {
            return None;
        }
        Some(ErrorCause::new(
            ErrorTypeCode::DuplicateTransaction,
            format!(
                "transaction for merchant '{}' at POS '{}' on {} was already reported",
                tx.merchant.merchant_id,
                tx.pos_id,
                tx.operation_date
                    .map(|d| d.format("%d/%m/%Y").to_string())
                    .unwrap_or_else(|| "unknown date".to_string()),
            ),
        ))
    }

    /// Seal the run: every landed record contributes a success, every
    /// failed row contributes according to its severity, and an empty run
    /// stays unknown.
    pub fn finish(self) -> IngestionReport {
        let landed = std::iter::repeat(IngestionStatus::Success).take(self.batch.record_count());
        let failures = self.failed.iter().map(|record| {
            if record.is_warning() {
                IngestionStatus::Success
            } else {
                IngestionStatus::Failed
            }
        });
        let status = IngestionStatus::aggregate(landed.chain(failures));

        IngestionReport {
            batch: self.batch,
            failed: ProcessedFailedRecordBatch { records: self.failed },
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaymentChannel;
    use rust_decimal::Decimal;

    fn resolved(merchant_id: &str, pos_id: &str) -> ResolvedTransaction {
        ResolvedTransaction {
            operation_type: "AC".to_string(),
            operation_date: NaiveDate::from_ymd_opt(2024, 3, 15),
            currency: "EUR".to_string(),
            payment_type_code: "00".to_string(),
            channel: PaymentChannel::ECommerce,
            total_operations: 3,
            total_amount: Decimal::new(12500, 2),
            pos_id: pos_id.to_string(),
            intermediary_id: "05584".to_string(),
            merchant: MerchantRecord {
                merchant_id: merchant_id.to_string(),
                company_name: "ACME SRL".to_string(),
                ..Default::default()
            },
        }
    }

    fn warning_record(line: u64) -> ErrorRecord {
        ErrorRecord::new(
            RecordKind::Transaction,
            Some(line),
            "flagged row".to_string(),
            vec![ErrorCause::new(
                ErrorTypeCode::MandatoryDataIsMissing,
                "currency is missing",
            )],
        )
    }

    #[test]
    fn test_empty_run_reports_unknown() {
        let report = BatchCollector::new().finish();
        assert_eq!(report.status, IngestionStatus::Unknown);
        assert!(report.batch.is_empty());
        assert!(report.failed.is_empty());
    }

    #[test]
    fn test_clean_run_reports_success() {
        let mut collector = BatchCollector::new();
        collector.add_subject(SubjectRecord::default());
        collector.add_merchant(MerchantRecord::default());
        collector.collect_transaction(
            5,
            "row".to_string(),
            ResolutionOutcome::Resolved(resolved("M1", "POS-1")),
        );

        let report = collector.finish();
        assert_eq!(report.status, IngestionStatus::Success);
        assert_eq!(report.batch.record_count(), 3);
        assert_eq!(report.batch.transactions.len(), 1);
    }

    #[test]
    fn test_warnings_do_not_fail_the_run() {
        let mut collector = BatchCollector::new();
        collector.collect_transaction(
            5,
            "row".to_string(),
            ResolutionOutcome::ResolvedWithWarnings(resolved("M1", "POS-1"), warning_record(5)),
        );

        let report = collector.finish();
        assert_eq!(report.status, IngestionStatus::Success);
        assert_eq!(report.batch.transactions.len(), 1);
        assert_eq!(report.failed.warning_count(), 1);
        assert_eq!(report.failed.error_count(), 0);
    }

    #[test]
    fn test_any_rejection_fails_the_run() {
        let mut collector = BatchCollector::new();
        collector.add_subject(SubjectRecord::default());
        collector.collect_transaction(
            7,
            "bad row".to_string(),
            ResolutionOutcome::Rejected(ErrorRecord::new(
                RecordKind::Transaction,
                Some(7),
                "bad row".to_string(),
                vec![ErrorCause::new(
                    ErrorTypeCode::ForeignKeyError,
                    "merchant 'M9' not found in the merchant master file",
                )],
            )),
        );

        let report = collector.finish();
        assert_eq!(report.status, IngestionStatus::Failed);
        assert_eq!(report.failed.error_count(), 1);
    }

    #[test]
    fn test_duplicate_transaction_is_rejected_first_wins() {
        let mut collector = BatchCollector::new();
        collector.collect_transaction(
            1,
            "first".to_string(),
            ResolutionOutcome::Resolved(resolved("M1", "POS-1")),
        );
        collector.collect_transaction(
            2,
            "second".to_string(),
            ResolutionOutcome::Resolved(resolved("M1", "POS-1")),
        );

        let report = collector.finish();
        assert_eq!(report.batch.transactions.len(), 1);
        assert_eq!(report.failed.len(), 1);
        let rejection = &report.failed.records[0];
        assert_eq!(rejection.codes(), vec!["ERR2"]);
        assert_eq!(rejection.line, Some(2));
        assert_eq!(rejection.raw_row, "second");
        assert_eq!(report.status, IngestionStatus::Failed);
    }

    #[test]
    fn test_key_distinguishes_terminals() {
        let mut collector = BatchCollector::new();
        collector.collect_transaction(
            1,
            "first".to_string(),
            ResolutionOutcome::Resolved(resolved("M1", "POS-1")),
        );
        collector.collect_transaction(
            2,
            "second".to_string(),
            ResolutionOutcome::Resolved(resolved("M1", "POS-2")),
        );

        let report = collector.finish();
        assert_eq!(report.batch.transactions.len(), 2);
        assert!(report.failed.is_empty());
    }

    #[test]
    fn test_duplicate_of_flagged_row_appends_to_its_record() {
        let mut collector = BatchCollector::new();
        collector.collect_transaction(
            1,
            "first".to_string(),
            ResolutionOutcome::Resolved(resolved("M1", "POS-1")),
        );
        collector.collect_transaction(
            2,
            "second".to_string(),
            ResolutionOutcome::ResolvedWithWarnings(resolved("M1", "POS-1"), warning_record(2)),
        );

        let report = collector.finish();
        assert_eq!(report.batch.transactions.len(), 1);
        assert_eq!(report.failed.len(), 1);
        let rejection = &report.failed.records[0];
        assert_eq!(rejection.codes(), vec!["WRN3", "ERR2"]);
        assert!(!rejection.is_warning());
        assert_eq!(report.status, IngestionStatus::Failed);
    }

    #[test]
    fn test_summary_counts() {
        let mut collector = BatchCollector::new();
        collector.add_subject(SubjectRecord::default());
        collector.add_subject(SubjectRecord::default());
        collector.add_relationship(RelationshipRecord::default());
        collector.add_merchant(MerchantRecord::default());
        collector.add_error(warning_record(3));
        collector.collect_transaction(
            4,
            "row".to_string(),
            ResolutionOutcome::Resolved(resolved("M1", "POS-1")),
        );

        let summary = collector.finish().summary();
        assert_eq!(summary.subjects, 2);
        assert_eq!(summary.relationships, 1);
        assert_eq!(summary.linkages, 0);
        assert_eq!(summary.merchants, 1);
        assert_eq!(summary.transactions, 1);
        assert_eq!(summary.warnings, 1);
        assert_eq!(summary.errors, 0);
        assert_eq!(summary.status, IngestionStatus::Success);
    }

    #[test]
    fn test_summary_serializes_to_json() {
        let mut collector = BatchCollector::new();
        collector.add_subject(SubjectRecord::default());
        let summary = collector.finish().summary();

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["status"], "SUCCESS");
        assert_eq!(json["subjects"], 1);
        assert_eq!(json["errors"], 0);
    }
}
