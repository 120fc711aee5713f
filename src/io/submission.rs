//! Submission file rendering
//!
//! Turns a [`ProcessedRecordBatch`] into the authority's fixed-width
//! submission format: one header line, one body line per landed record,
//! one footer line with per-kind counts. Every line is exactly
//! [`SUBMISSION_LINE_WIDTH`] characters plus the terminator.
//!
//! Rendering is all-or-nothing: the caller receives the complete content
//! string and writes it in one shot, so a failed run never leaves a
//! partial submission file behind.
//!
//! # Line plan
//!
//! ```text
//! 0 AML01 01 <filer fields>                      ... A   header
//! 1 <subject columns>                            ... A   body
//! 2 <relationship columns>                       ... A
//! 3 <linkage columns>                            ... A
//! 4 <accounting columns>                         ... A
//! 5 <ID-change columns>                          ... A
//! 6 <resolved transaction + merchant columns>    ... A
//! 9 <seven 9-digit counts>                       ... A   footer
//! ```
//!
//! Merchant master records are reference data: they shape transaction body
//! lines but are never emitted on their own.

use crate::codec::{LineBuilder, DATE_SENTINEL};
use crate::config::FilerConfig;
use crate::core::ProcessedRecordBatch;
use crate::layout::{FieldKind, RecordKind};
use crate::types::{ErrorCause, ErrorRecord, ErrorTypeCode, FixedRecord, ResolvedTransaction};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Width of every submission line, control character included.
pub const SUBMISSION_LINE_WIDTH: usize = 398;

const SUPPLY_CODE: &str = "AML01";
const COMMUNICATION_TYPE: &str = "01";
const CONTROL_CHAR: &str = "A";
const COUNT_WIDTH: usize = 9;

/// Line terminator convention for the submission file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    Crlf,
}

impl LineEnding {
    /// The convention of the platform the report is produced on.
    pub fn platform() -> Self {
        if cfg!(windows) {
            LineEnding::Crlf
        } else {
            LineEnding::Lf
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Crlf => "\r\n",
        }
    }
}

/// A rendered submission: the full file content plus any truncation
/// warnings raised while encoding.
#[derive(Debug)]
pub struct Submission {
    pub content: String,
    pub warnings: Vec<ErrorRecord>,
}

impl Submission {
    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }
}

/// Render the complete submission file.
///
/// Body lines are grouped by record kind in marker order, keeping input
/// order within each kind. Fields that exceed their column are truncated
/// and reported as warning records rather than silently losing characters.
pub fn render_submission(
    batch: &ProcessedRecordBatch,
    filer: &FilerConfig,
    line_ending: LineEnding,
) -> Submission {
    let mut warnings = Vec::new();
    let mut lines = Vec::with_capacity(batch.record_count() + 2);

    lines.push(header_line(filer));
    for record in &batch.subjects {
        lines.push(master_line("1", record, &mut warnings));
    }
    for record in &batch.relationships {
        lines.push(master_line("2", record, &mut warnings));
    }
    for record in &batch.linkages {
        lines.push(master_line("3", record, &mut warnings));
    }
    for record in &batch.accounting_data {
        lines.push(master_line("4", record, &mut warnings));
    }
    for record in &batch.id_changes {
        lines.push(master_line("5", record, &mut warnings));
    }
    for tx in &batch.transactions {
        lines.push(transaction_line(tx, &mut warnings));
    }
    lines.push(footer_line(batch));

    let mut content = lines.join(line_ending.as_str());
    content.push_str(line_ending.as_str());

    Submission { content, warnings }
}

/// Header: marker, supply code, communication type, filer identity.
///
/// [`FilerConfig::validate`] caps every filer field at its column width,
/// so the builder's truncation list is always empty here.
fn header_line(filer: &FilerConfig) -> String {
    let mut builder = LineBuilder::new();
    builder
        .literal("0")
        .literal(SUPPLY_CODE)
        .literal(COMMUNICATION_TYPE)
        .text("filer_tax_code", &filer.tax_code, 16)
        .filler(80)
        .text("filer_name", &filer.name, 70)
        .text("filer_city", &filer.city, 40)
        .text("filer_province", &filer.province, 2)
        .pad_to(SUBMISSION_LINE_WIDTH - 1)
        .literal(CONTROL_CHAR);
    let (line, _) = builder.finish();
    line
}

/// Body line for a master record: marker digit, then the record's own
/// column plan minus the inbound record-type and filler slices.
fn master_line<R: FixedRecord>(
    marker: &str,
    record: &R,
    warnings: &mut Vec<ErrorRecord>,
) -> String {
    let layout = R::layout();
    let mut builder = LineBuilder::new();
    builder.literal(marker);

    for (slice, value) in layout.fields.iter().zip(record.to_fields()) {
        if slice.name == "record_type" || slice.name == "filler" {
            continue;
        }
        match slice.kind {
            FieldKind::Text => builder.text(slice.name, &value, slice.width()),
            FieldKind::Numeric => builder.numeric(slice.name, &value, slice.width()),
            FieldKind::Date if value.is_empty() => builder.literal(DATE_SENTINEL),
            FieldKind::Date => builder.numeric(slice.name, &value, slice.width()),
        };
    }

    builder.pad_to(SUBMISSION_LINE_WIDTH - 1).literal(CONTROL_CHAR);
    let (line, truncated) = builder.finish();
    note_truncations(layout.record_kind, &line, truncated, warnings);
    line
}

/// Body line for a resolved transaction, with the joined merchant's
/// identity appended after the transaction's own columns.
fn transaction_line(tx: &ResolvedTransaction, warnings: &mut Vec<ErrorRecord>) -> String {
    let mut builder = LineBuilder::new();
    builder
        .literal("6")
        .text("operation_type", &tx.operation_type, 2)
        .date(tx.operation_date)
        .text("currency", &tx.currency, 3)
        .text("payment_type_code", &tx.payment_type_code, 2)
        .numeric("total_operations", &tx.total_operations.to_string(), 9)
        .numeric("total_amount", &minor_units(tx.total_amount), 15)
        .text("pos_id", &tx.pos_id, 20)
        .numeric("merchant_id", &tx.merchant.merchant_id, 16)
        .text("intermediary_id", &tx.intermediary_id, 11)
        .text("merchant_tax_code", &tx.merchant.tax_code, 16)
        .text("merchant_vat_number", &tx.merchant.vat_number, 11)
        .text("merchant_company_name", &tx.merchant.company_name, 70)
        .pad_to(SUBMISSION_LINE_WIDTH - 1)
        .literal(CONTROL_CHAR);
    let (line, truncated) = builder.finish();
    note_truncations(RecordKind::Transaction, &line, truncated, warnings);
    line
}

/// Footer: seven nine-digit counts. The seventh slot is reserved by the
/// format and always zero.
fn footer_line(batch: &ProcessedRecordBatch) -> String {
    let mut builder = LineBuilder::new();
    builder
        .literal("9")
        .count("subject_count", batch.subjects.len(), COUNT_WIDTH)
        .count("relationship_count", batch.relationships.len(), COUNT_WIDTH)
        .count("linkage_count", batch.linkages.len(), COUNT_WIDTH)
        .count("accounting_count", batch.accounting_data.len(), COUNT_WIDTH)
        .count("id_change_count", batch.id_changes.len(), COUNT_WIDTH)
        .count("transaction_count", batch.transactions.len(), COUNT_WIDTH)
        .numeric("reserved", "0", COUNT_WIDTH)
        .pad_to(SUBMISSION_LINE_WIDTH - 1)
        .literal(CONTROL_CHAR);
    let (line, truncated) = builder.finish();
    if !truncated.is_empty() {
        log::warn!(
            "footer counts exceeded {} digits: {}",
            COUNT_WIDTH,
            truncated.join(", ")
        );
    }
    line
}

/// Amount in minor units (two implied decimals), ready for zero-padding.
fn minor_units(amount: Decimal) -> String {
    let cents = (amount * Decimal::ONE_HUNDRED).trunc();
    cents.to_i64().map(|v| v.to_string()).unwrap_or_default()
}

fn note_truncations(
    kind: RecordKind,
    line: &str,
    truncated: Vec<String>,
    warnings: &mut Vec<ErrorRecord>,
) {
    if truncated.is_empty() {
        return;
    }
    let causes = truncated
        .into_iter()
        .map(|field| {
            ErrorCause::new(
                ErrorTypeCode::InvalidValue,
                format!("value for '{}' exceeds its column and was truncated", field),
            )
        })
        .collect();
    warnings.push(ErrorRecord::new(kind, None, line.to_string(), causes));
}
