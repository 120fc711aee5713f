//! Error report writing
//!
//! Serializes the failed-record batch to CSV for audit. One row per
//! [`ErrorRecord`]; a row carries every cause found on its source line,
//! so auditors see the complete diagnosis in one place.

use crate::types::{ErrorRecord, ReportError};
use std::io::Write;

const HEADERS: [&str; 6] = ["line", "record_kind", "severity", "codes", "causes", "raw_row"];

/// Write the audit CSV to any writer.
///
/// Codes are pipe-separated, cause messages semicolon-separated. The raw
/// row is reproduced verbatim; the csv writer quotes it as needed.
pub fn write_error_report<W: Write>(records: &[ErrorRecord], writer: W) -> Result<(), ReportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(HEADERS)?;

    for record in records {
        csv_writer.write_record(&[
            record.line.map(|n| n.to_string()).unwrap_or_default(),
            record.kind.name().to_string(),
            record.severity().to_string(),
            record.codes().join("|"),
            record
                .causes
                .iter()
                .map(|cause| cause.to_string())
                .collect::<Vec<_>>()
                .join("; "),
            record.raw_row.clone(),
        ])?;
    }

    csv_writer
        .flush()
        .map_err(|e| ReportError::report_write(e.to_string()))
}
