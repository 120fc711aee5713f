//! Fixed-width record codec
//!
//! Interprets [`SliceLayout`](crate::layout::SliceLayout) tables to decode
//! raw lines into typed records and encode records back into padded lines.
//!
//! # Decode rules
//!
//! - A line shorter than the layout's `total_width` is malformed; characters
//!   beyond the width are ignored, so stray terminators are tolerated.
//! - Text fields lose trailing spaces; numeric and date fields lose
//!   surrounding spaces but keep leading zeros.
//! - A date field holding the sentinel `01010001` decodes to the empty
//!   string ("no date").
//!
//! # Encode rules
//!
//! - Text is right-padded with spaces, numerics are left-padded with `'0'`.
//! - Absent text encodes as all spaces, absent numerics as all zeros, and
//!   absent dates as the sentinel, so missing dates round-trip as missing
//!   instead of resurfacing as a real day in year one.
//! - Values wider than their slice are cut to the leading `width`
//!   characters. [`encode_record`] does this silently (round-trip encoding
//!   of already-decoded records never truncates); the submission formatter
//!   uses [`LineBuilder`], which reports every truncated field so the loss
//!   can be surfaced as a warning.

use crate::layout::FieldKind;
use crate::types::{ErrorCause, ErrorRecord, ErrorTypeCode, FixedRecord, ReportError, Sourced};
use chrono::NaiveDate;

/// Encoded form of an absent date. Decodes back to "no date".
pub const DATE_SENTINEL: &str = "01010001";

/// Date format used across all record kinds: day, month, four-digit year.
pub const DATE_FORMAT: &str = "%d%m%Y";

/// Decode one raw line into a typed record.
///
/// # Errors
///
/// Returns [`ReportError::MalformedLine`] when the line holds fewer
/// characters than the record's layout requires.
pub fn decode_record<R: FixedRecord>(line: &str) -> Result<R, ReportError> {
    let layout = R::layout();
    let chars: Vec<char> = line.chars().collect();
    if chars.len() < layout.total_width {
        return Err(ReportError::malformed_line(
            layout.record_kind,
            None,
            layout.total_width,
            chars.len(),
        ));
    }

    let mut fields = Vec::with_capacity(layout.fields.len());
    for slice in layout.fields {
        let raw: String = chars[slice.start..slice.end].iter().collect();
        let value = match slice.kind {
            FieldKind::Text => raw.trim_end().to_string(),
            FieldKind::Numeric => raw.trim().to_string(),
            FieldKind::Date => {
                let trimmed = raw.trim();
                if trimmed == DATE_SENTINEL {
                    String::new()
                } else {
                    trimmed.to_string()
                }
            }
        };
        fields.push(value);
    }

    Ok(R::from_fields(fields))
}

/// Decode a numbered source line, capturing provenance.
///
/// A malformed line is not a processing failure: it comes back as an
/// invalid-format [`ErrorRecord`] preserving the raw row, and ingestion
/// moves on to the next line.
pub fn decode_sourced<R: FixedRecord>(number: u64, text: String) -> Result<Sourced<R>, ErrorRecord> {
    match decode_record::<R>(&text) {
        Ok(record) => Ok(Sourced {
            line: number,
            raw: text,
            record,
        }),
        Err(err) => Err(ErrorRecord::new(
            R::layout().record_kind,
            Some(number),
            text,
            vec![ErrorCause::new(ErrorTypeCode::InvalidFormat, err.to_string())],
        )),
    }
}

/// Encode a typed record into its fixed-width line.
///
/// The output is exactly `total_width` characters. Oversized values are
/// truncated to their slice width; decoding the result recovers the
/// truncated value, not the original.
pub fn encode_record<R: FixedRecord>(record: &R) -> String {
    let layout = R::layout();
    let values = record.to_fields();
    let mut line = String::with_capacity(layout.total_width);
    for (slice, value) in layout.fields.iter().zip(values) {
        let (padded, _) = pad_value(&value, slice.kind, slice.width());
        line.push_str(&padded);
    }
    line
}

/// Pad or truncate one value to `width` characters per its field kind.
///
/// Returns the padded text and whether characters were lost.
fn pad_value(value: &str, kind: FieldKind, width: usize) -> (String, bool) {
    match kind {
        FieldKind::Date if value.is_empty() => (DATE_SENTINEL.to_string(), false),
        FieldKind::Numeric | FieldKind::Date => pad_left(value, '0', width),
        FieldKind::Text => pad_right(value, ' ', width),
    }
}

fn pad_right(value: &str, pad: char, width: usize) -> (String, bool) {
    let len = value.chars().count();
    if len > width {
        (value.chars().take(width).collect(), true)
    } else {
        let mut out = String::with_capacity(width);
        out.push_str(value);
        out.extend(std::iter::repeat(pad).take(width - len));
        (out, false)
    }
}

fn pad_left(value: &str, pad: char, width: usize) -> (String, bool) {
    let len = value.chars().count();
    if len > width {
        (value.chars().take(width).collect(), true)
    } else {
        let mut out = String::with_capacity(width);
        out.extend(std::iter::repeat(pad).take(width - len));
        out.push_str(value);
        (out, false)
    }
}

/// Incremental builder for submission output lines.
///
/// Pushes fields left to right, tracking the character position and the
/// names of any fields that had to be truncated. The formatter turns the
/// truncation list into warning-severity error records rather than losing
/// data silently.
#[derive(Debug, Default)]
pub struct LineBuilder {
    buf: String,
    len: usize,
    truncated: Vec<String>,
}

impl LineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a constant (marker digit, control character). Never padded
    /// or truncated.
    pub fn literal(&mut self, value: &str) -> &mut Self {
        self.len += value.chars().count();
        self.buf.push_str(value);
        self
    }

    /// Append a right-padded text field.
    pub fn text(&mut self, name: &str, value: &str, width: usize) -> &mut Self {
        let (padded, cut) = pad_right(value, ' ', width);
        if cut {
            self.truncated.push(name.to_string());
        }
        self.len += width;
        self.buf.push_str(&padded);
        self
    }

    /// Append a zero-padded numeric field.
    pub fn numeric(&mut self, name: &str, value: &str, width: usize) -> &mut Self {
        if value.is_empty() {
            return self.filler_with('0', width);
        }
        let (padded, cut) = pad_left(value, '0', width);
        if cut {
            self.truncated.push(name.to_string());
        }
        self.len += width;
        self.buf.push_str(&padded);
        self
    }

    /// Append a record count as a zero-padded numeric field.
    pub fn count(&mut self, name: &str, value: usize, width: usize) -> &mut Self {
        self.numeric(name, &value.to_string(), width)
    }

    /// Append an eight-character date, or the sentinel when absent.
    pub fn date(&mut self, value: Option<NaiveDate>) -> &mut Self {
        match value {
            Some(date) => self.literal(&date.format(DATE_FORMAT).to_string()),
            None => self.literal(DATE_SENTINEL),
        }
    }

    /// Append `width` spaces.
    pub fn filler(&mut self, width: usize) -> &mut Self {
        self.filler_with(' ', width)
    }

    /// Pad with spaces up to an absolute character position.
    pub fn pad_to(&mut self, position: usize) -> &mut Self {
        if position > self.len {
            let gap = position - self.len;
            self.filler(gap)
        } else {
            self
        }
    }

    fn filler_with(&mut self, pad: char, width: usize) -> &mut Self {
        self.len += width;
        self.buf.extend(std::iter::repeat(pad).take(width));
        self
    }

    /// Characters written so far.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The finished line and the names of fields that lost characters.
    pub fn finish(self) -> (String, Vec<String>) {
        (self.buf, self.truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MerchantRecord, TransactionRecord};
    use rstest::rstest;

    fn transaction_line() -> String {
        let mut line = String::new();
        line.push_str("06"); // record_type
        line.push_str("AC"); // operation_type
        line.push_str("15032024"); // operation_date
        line.push_str("EUR"); // currency
        line.push_str("00"); // payment_type_code
        line.push_str("000000012"); // total_operations
        line.push_str("000000000150050"); // total_amount
        line.push_str("POS-0042            "); // pos_id, width 20
        line.push_str("0000000000000317"); // merchant_id
        line.push_str("05584      "); // intermediary_id, width 11
        line.push_str(&" ".repeat(32)); // filler
        line
    }

    #[test]
    fn test_decode_extracts_and_trims_fields() {
        let record: TransactionRecord = decode_record(&transaction_line()).unwrap();
        assert_eq!(record.record_type, "06");
        assert_eq!(record.operation_type, "AC");
        assert_eq!(record.operation_date, "15032024");
        assert_eq!(record.currency, "EUR");
        assert_eq!(record.payment_type_code, "00");
        // Numeric fields keep their leading zeros
        assert_eq!(record.total_operations, "000000012");
        assert_eq!(record.total_amount, "000000000150050");
        // Text fields lose trailing spaces only
        assert_eq!(record.pos_id, "POS-0042");
        assert_eq!(record.merchant_id, "0000000000000317");
        assert_eq!(record.intermediary_id, "05584");
    }

    #[test]
    fn test_decode_ignores_excess_trailing_characters() {
        let mut line = transaction_line();
        line.push_str("GARBAGE AFTER THE RECORD");
        let record: TransactionRecord = decode_record(&line).unwrap();
        assert_eq!(record.merchant_id, "0000000000000317");
    }

    #[rstest]
    #[case::empty(0)]
    #[case::one_short(119)]
    fn test_decode_rejects_short_lines(#[case] len: usize) {
        let line = "X".repeat(len);
        let err = decode_record::<TransactionRecord>(&line).unwrap_err();
        assert_eq!(
            err,
            ReportError::MalformedLine {
                kind: crate::layout::RecordKind::Transaction,
                line: None,
                expected: 120,
                found: len,
            }
        );
    }

    #[test]
    fn test_decode_maps_date_sentinel_to_no_date() {
        let mut line = transaction_line();
        line.replace_range(4..12, DATE_SENTINEL);
        let record: TransactionRecord = decode_record(&line).unwrap();
        assert_eq!(record.operation_date, "");
    }

    #[test]
    fn test_encode_round_trips_decoded_record() {
        let line = transaction_line();
        let record: TransactionRecord = decode_record(&line).unwrap();
        let encoded = encode_record(&record);
        assert_eq!(encoded, line);
        let again: TransactionRecord = decode_record(&encoded).unwrap();
        assert_eq!(again, record);
    }

    #[test]
    fn test_encode_pads_absent_values_by_kind() {
        let record = MerchantRecord {
            record_type: "07".to_string(),
            merchant_id: "317".to_string(),
            ..Default::default()
        };
        let encoded = encode_record(&record);
        assert_eq!(encoded.chars().count(), 150);
        // Numeric: zero-padded to the left
        assert_eq!(&encoded[2..18], "0000000000000317");
        // Absent text: all spaces
        assert_eq!(&encoded[56..126], " ".repeat(70));
    }

    #[test]
    fn test_encode_emits_sentinel_for_absent_date() {
        let record = TransactionRecord {
            record_type: "06".to_string(),
            ..Default::default()
        };
        let encoded = encode_record(&record);
        assert_eq!(&encoded[4..12], DATE_SENTINEL);

        // And the sentinel decodes straight back to "no date".
        let decoded: TransactionRecord = decode_record(&encoded).unwrap();
        assert_eq!(decoded.operation_date, "");
    }

    #[test]
    fn test_encode_truncates_oversized_values() {
        let record = MerchantRecord {
            record_type: "07".to_string(),
            merchant_id: "1".to_string(),
            company_name: "X".repeat(80),
            ..Default::default()
        };
        let encoded = encode_record(&record);
        assert_eq!(encoded.chars().count(), 150);

        let decoded: MerchantRecord = decode_record(&encoded).unwrap();
        assert_eq!(decoded.company_name, "X".repeat(70));
    }

    #[test]
    fn test_decode_sourced_preserves_provenance() {
        let sourced = decode_sourced::<TransactionRecord>(7, transaction_line()).unwrap();
        assert_eq!(sourced.line, 7);
        assert_eq!(sourced.raw, transaction_line());
        assert_eq!(sourced.record.currency, "EUR");
    }

    #[test]
    fn test_decode_sourced_wraps_malformed_line_as_error_record() {
        let err = decode_sourced::<TransactionRecord>(3, "too short".to_string()).unwrap_err();
        assert_eq!(err.line, Some(3));
        assert_eq!(err.raw_row, "too short");
        assert_eq!(err.codes(), vec!["WRN1"]);
        assert!(err.is_warning());
        assert!(err.causes[0].message.contains("expected at least 120"));
    }

    #[test]
    fn test_line_builder_positions_and_padding() {
        let mut builder = LineBuilder::new();
        builder
            .literal("0")
            .text("name", "ACME", 10)
            .numeric("id", "42", 6)
            .date(NaiveDate::from_ymd_opt(2024, 3, 15))
            .date(None)
            .pad_to(40)
            .literal("A");

        let (line, truncated) = builder.finish();
        assert_eq!(
            line,
            "0ACME      0000421503202401010001".to_owned() + &" ".repeat(7) + "A"
        );
        assert_eq!(line.chars().count(), 41);
        assert!(truncated.is_empty());
    }

    #[test]
    fn test_line_builder_reports_truncated_fields() {
        let mut builder = LineBuilder::new();
        builder
            .text("company_name", "A COMPANY NAME THAT DOES NOT FIT", 10)
            .numeric("total", "123456", 3);
        let (line, truncated) = builder.finish();
        assert_eq!(line, "A COMPANY 123");
        assert_eq!(truncated, vec!["company_name", "total"]);
    }

    #[test]
    fn test_line_builder_empty_numeric_encodes_as_zeros() {
        let mut builder = LineBuilder::new();
        builder.numeric("amount", "", 5).count("rows", 12, 9);
        let (line, truncated) = builder.finish();
        assert_eq!(line, "00000000000012");
        assert!(truncated.is_empty());
    }
}
