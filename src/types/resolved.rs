//! Resolved transaction model
//!
//! A [`ResolvedTransaction`] is the product of joining a raw transaction
//! record against the merchant index and parsing its typed fields. It is
//! immutable after construction: warnings found during resolution travel
//! separately as error records, never as mutable state on the transaction.

use crate::types::MerchantRecord;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// Classification of the payment type code.
///
/// Only the literal code `"00"` means e-commerce. Every other *present*
/// code — recognized or not — classifies as point-of-sale; only an absent
/// or blank code yields `Unknown`. Downstream consumers rely on this exact
/// asymmetry, so unrecognized codes must never drift into `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentChannel {
    ECommerce,
    Pos,
    Unknown,
}

impl PaymentChannel {
    /// Classify a raw payment type code.
    pub fn classify(code: Option<&str>) -> PaymentChannel {
        match code.map(str::trim) {
            None | Some("") => PaymentChannel::Unknown,
            Some("00") => PaymentChannel::ECommerce,
            Some(_) => PaymentChannel::Pos,
        }
    }
}

/// A transaction successfully joined to its merchant.
///
/// Amounts are expressed with two implied decimals: the raw 15-digit
/// minor-unit field `000000000150050` becomes `1500.50`. A missing or
/// unparseable operation date leaves `operation_date` empty — the warning
/// that flagged it is reported alongside, not stored here.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTransaction {
    pub operation_type: String,
    pub operation_date: Option<NaiveDate>,
    pub currency: String,
    /// Raw code as read, re-emitted verbatim in the submission file.
    pub payment_type_code: String,
    /// Classification derived from `payment_type_code`.
    pub channel: PaymentChannel,
    pub total_operations: u64,
    pub total_amount: Decimal,
    pub pos_id: String,
    pub intermediary_id: String,
    /// The matched merchant master record, owned by this transaction.
    pub merchant: MerchantRecord,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::ecommerce(Some("00"), PaymentChannel::ECommerce)]
    #[case::ecommerce_padded(Some(" 00 "), PaymentChannel::ECommerce)]
    #[case::pos_known(Some("01"), PaymentChannel::Pos)]
    #[case::pos_unrecognized(Some("zz"), PaymentChannel::Pos)]
    #[case::pos_single_digit(Some("7"), PaymentChannel::Pos)]
    #[case::absent(None, PaymentChannel::Unknown)]
    #[case::blank(Some("  "), PaymentChannel::Unknown)]
    fn test_payment_channel_classification(
        #[case] code: Option<&str>,
        #[case] expected: PaymentChannel,
    ) {
        assert_eq!(PaymentChannel::classify(code), expected);
    }

    #[test]
    fn test_unrecognized_codes_never_classify_as_unknown() {
        for code in ["99", "XX", "0", "000"] {
            assert_eq!(PaymentChannel::classify(Some(code)), PaymentChannel::Pos);
        }
    }
}
