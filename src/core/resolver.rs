//! Transaction resolution
//!
//! Joins raw transaction records against the merchant master data and
//! validates their typed fields. Resolution is a pure function over an
//! immutable [`MerchantIndex`]: the index is built once, sequentially,
//! before any transaction is looked at, and is shared read-only afterwards,
//! so callers may resolve records from any number of threads.
//!
//! # Validation model
//!
//! All problems found in a record accumulate — there is no short-circuit.
//! A missing merchant is an error-severity cause and blocks production of
//! the resolved transaction. Data-quality causes (missing or malformed
//! dates, amounts, currency) are warnings: the resolved transaction is
//! still produced, with the warning record surfaced alongside for audit.

use crate::codec::{DATE_FORMAT, DATE_SENTINEL};
use crate::layout::RecordKind;
use crate::types::{
    ErrorCause, ErrorRecord, ErrorTypeCode, MerchantRecord, PaymentChannel, ResolvedTransaction,
    Sourced, TransactionRecord,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Read-only lookup from merchant identifier to merchant master record.
///
/// Keys are the identifiers exactly as decoded, leading zeros included:
/// `0000000000000317` and `317` are different merchants as far as the
/// authority's files are concerned.
#[derive(Debug, Default)]
pub struct MerchantIndex {
    merchants: HashMap<String, MerchantRecord>,
}

impl MerchantIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a merchant, keeping the first occurrence of each identifier.
    ///
    /// Returns the stored record for batch bookkeeping. A repeated
    /// identifier is rejected as a duplicate-merchant error record carrying
    /// the later row.
    pub fn insert(
        &mut self,
        merchant: Sourced<MerchantRecord>,
    ) -> Result<MerchantRecord, ErrorRecord> {
        let id = merchant.record.merchant_id.clone();
        if self.merchants.contains_key(&id) {
            return Err(ErrorRecord::new(
                RecordKind::Merchant,
                Some(merchant.line),
                merchant.raw,
                vec![ErrorCause::new(
                    ErrorTypeCode::DuplicateMerchant,
                    format!("merchant '{}' occurs more than once; first occurrence kept", id),
                )],
            ));
        }
        self.merchants.insert(id, merchant.record.clone());
        Ok(merchant.record)
    }

    pub fn get(&self, merchant_id: &str) -> Option<&MerchantRecord> {
        self.merchants.get(merchant_id)
    }

    pub fn len(&self) -> usize {
        self.merchants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.merchants.is_empty()
    }
}

/// Outcome of resolving one transaction record.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionOutcome {
    /// Clean join, all fields valid.
    Resolved(ResolvedTransaction),
    /// The transaction is produced, but warning-level problems were found
    /// and must be surfaced for audit.
    ResolvedWithWarnings(ResolvedTransaction, ErrorRecord),
    /// At least one error-severity cause: no transaction is produced.
    Rejected(ErrorRecord),
}

/// Resolve one transaction against the merchant index.
///
/// The merchant lookup and every field validation run unconditionally so
/// the returned record lists everything wrong with the row, not just the
/// first problem.
pub fn resolve(tx: &Sourced<TransactionRecord>, index: &MerchantIndex) -> ResolutionOutcome {
    let record = &tx.record;
    let mut causes = Vec::new();

    let merchant = index.get(&record.merchant_id);
    if merchant.is_none() {
        causes.push(ErrorCause::new(
            ErrorTypeCode::ForeignKeyError,
            format!(
                "merchant '{}' not found in the merchant master file",
                record.merchant_id
            ),
        ));
    }

    let operation_date = parse_operation_date(&record.operation_date, &mut causes);
    let total_amount = parse_amount(&record.total_amount, &mut causes);
    let total_operations = parse_operation_count(&record.total_operations, &mut causes);
    if record.currency.is_empty() {
        causes.push(ErrorCause::new(
            ErrorTypeCode::MandatoryDataIsMissing,
            "currency is missing",
        ));
    }

    let merchant = match merchant {
        Some(found) => found.clone(),
        None => return ResolutionOutcome::Rejected(error_record(tx, causes)),
    };

    let resolved = ResolvedTransaction {
        operation_type: record.operation_type.clone(),
        operation_date,
        currency: record.currency.clone(),
        payment_type_code: record.payment_type_code.clone(),
        channel: PaymentChannel::classify(Some(&record.payment_type_code)),
        total_operations,
        total_amount,
        pos_id: record.pos_id.clone(),
        intermediary_id: record.intermediary_id.clone(),
        merchant,
    };

    if causes.is_empty() {
        ResolutionOutcome::Resolved(resolved)
    } else {
        let flagged = error_record(tx, causes);
        if flagged.is_warning() {
            ResolutionOutcome::ResolvedWithWarnings(resolved, flagged)
        } else {
            ResolutionOutcome::Rejected(flagged)
        }
    }
}

fn error_record(tx: &Sourced<TransactionRecord>, causes: Vec<ErrorCause>) -> ErrorRecord {
    ErrorRecord::new(RecordKind::Transaction, Some(tx.line), tx.raw.clone(), causes)
}

/// Parse the operation date, recording a cause when it is missing or
/// malformed. The codec already maps the sentinel to empty; the check here
/// keeps records built directly through the API honest as well.
fn parse_operation_date(raw: &str, causes: &mut Vec<ErrorCause>) -> Option<NaiveDate> {
    if raw.is_empty() || raw == DATE_SENTINEL {
        causes.push(ErrorCause::new(
            ErrorTypeCode::MandatoryDataIsMissing,
            "operation date is missing",
        ));
        return None;
    }
    match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            causes.push(ErrorCause::new(
                ErrorTypeCode::InvalidDateFormat,
                format!("operation date '{}' is not a valid ddMMyyyy date", raw),
            ));
            None
        }
    }
}

/// Parse the amount from minor units (two implied decimals).
fn parse_amount(raw: &str, causes: &mut Vec<ErrorCause>) -> Decimal {
    if raw.is_empty() {
        causes.push(ErrorCause::new(
            ErrorTypeCode::MandatoryDataIsMissing,
            "total amount is missing",
        ));
        return Decimal::ZERO;
    }
    match raw.parse::<i64>() {
        Ok(minor_units) => Decimal::new(minor_units, 2),
        Err(_) => {
            causes.push(ErrorCause::new(
                ErrorTypeCode::InvalidValue,
                format!("total amount '{}' is not numeric", raw),
            ));
            Decimal::ZERO
        }
    }
}

/// Parse the operation count. The count is optional; only a present,
/// non-numeric value is flagged.
fn parse_operation_count(raw: &str, causes: &mut Vec<ErrorCause>) -> u64 {
    if raw.is_empty() {
        return 0;
    }
    match raw.parse::<u64>() {
        Ok(count) => count,
        Err(_) => {
            causes.push(ErrorCause::new(
                ErrorTypeCode::InvalidValue,
                format!("total operations '{}' is not numeric", raw),
            ));
            0
        }
    }
}
