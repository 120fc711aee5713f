//! Raw record types, one per fixed-width file kind
//!
//! These are plain data carriers produced by decoding one input line. Every
//! field is kept as the trimmed string the codec extracted — no domain
//! parsing happens here. Date fields hold either a `ddMMyyyy` string or the
//! empty string for "no date" (the codec maps the `01010001` sentinel to
//! empty on decode and back on encode). Filler columns are not carried.

use crate::layout::{self, SliceLayout};

/// A record type backed by a [`SliceLayout`].
///
/// Implementations supply their layout and convert to and from the decoded
/// field values *in layout order*, including a placeholder for the trailing
/// filler column. The codec owns all trimming and padding.
pub trait FixedRecord: Sized {
    /// The slice layout describing this record's line format.
    fn layout() -> &'static SliceLayout;

    /// Build the record from decoded field values, given in layout order.
    fn from_fields(fields: Vec<String>) -> Self;

    /// The record's field values in layout order, for encoding.
    fn to_fields(&self) -> Vec<String>;
}

/// A decoded record together with its source provenance.
///
/// The raw line is kept verbatim so any later rejection can preserve the
/// exact input row in the audit trail.
#[derive(Debug, Clone, PartialEq)]
pub struct Sourced<T> {
    /// 1-based line number within the originating file.
    pub line: u64,
    /// The raw line exactly as read.
    pub raw: String,
    pub record: T,
}

/// Subject master record: the reported party.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubjectRecord {
    pub record_type: String,
    pub subject_id: String,
    pub tax_code: String,
    pub surname_or_name: String,
    pub first_name: String,
    pub gender: String,
    pub birth_date: String,
    pub birth_city: String,
    pub birth_province: String,
    pub country_code: String,
    pub residence_city: String,
    pub residence_province: String,
    pub residence_address: String,
    pub postal_code: String,
    pub vat_number: String,
    pub subject_type: String,
    pub start_date: String,
    pub end_date: String,
}

impl FixedRecord for SubjectRecord {
    fn layout() -> &'static SliceLayout {
        &layout::SUBJECT_LAYOUT
    }

    fn from_fields(fields: Vec<String>) -> Self {
        let mut fields = fields.into_iter();
        let mut next = move || fields.next().unwrap_or_default();
        Self {
            record_type: next(),
            subject_id: next(),
            tax_code: next(),
            surname_or_name: next(),
            first_name: next(),
            gender: next(),
            birth_date: next(),
            birth_city: next(),
            birth_province: next(),
            country_code: next(),
            residence_city: next(),
            residence_province: next(),
            residence_address: next(),
            postal_code: next(),
            vat_number: next(),
            subject_type: next(),
            start_date: next(),
            end_date: next(),
        }
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.record_type.clone(),
            self.subject_id.clone(),
            self.tax_code.clone(),
            self.surname_or_name.clone(),
            self.first_name.clone(),
            self.gender.clone(),
            self.birth_date.clone(),
            self.birth_city.clone(),
            self.birth_province.clone(),
            self.country_code.clone(),
            self.residence_city.clone(),
            self.residence_province.clone(),
            self.residence_address.clone(),
            self.postal_code.clone(),
            self.vat_number.clone(),
            self.subject_type.clone(),
            self.start_date.clone(),
            self.end_date.clone(),
            String::new(), // filler
        ]
    }
}

/// Relationship master record: an account relationship held by a subject.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationshipRecord {
    pub record_type: String,
    pub relationship_id: String,
    pub subject_id: String,
    pub relationship_type: String,
    pub role_code: String,
    pub start_date: String,
    pub end_date: String,
    pub intermediary_code: String,
    pub branch_code: String,
    pub account_number: String,
    pub currency: String,
    pub iban: String,
    pub notes: String,
}

impl FixedRecord for RelationshipRecord {
    fn layout() -> &'static SliceLayout {
        &layout::RELATIONSHIP_LAYOUT
    }

    fn from_fields(fields: Vec<String>) -> Self {
        let mut fields = fields.into_iter();
        let mut next = move || fields.next().unwrap_or_default();
        Self {
            record_type: next(),
            relationship_id: next(),
            subject_id: next(),
            relationship_type: next(),
            role_code: next(),
            start_date: next(),
            end_date: next(),
            intermediary_code: next(),
            branch_code: next(),
            account_number: next(),
            currency: next(),
            iban: next(),
            notes: next(),
        }
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.record_type.clone(),
            self.relationship_id.clone(),
            self.subject_id.clone(),
            self.relationship_type.clone(),
            self.role_code.clone(),
            self.start_date.clone(),
            self.end_date.clone(),
            self.intermediary_code.clone(),
            self.branch_code.clone(),
            self.account_number.clone(),
            self.currency.clone(),
            self.iban.clone(),
            self.notes.clone(),
            String::new(), // filler
        ]
    }
}

/// Linkage master record: ties a secondary subject to a relationship.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkageRecord {
    pub record_type: String,
    pub linkage_id: String,
    pub relationship_id: String,
    pub subject_id: String,
    pub linkage_type: String,
    pub start_date: String,
    pub end_date: String,
}

impl FixedRecord for LinkageRecord {
    fn layout() -> &'static SliceLayout {
        &layout::LINKAGE_LAYOUT
    }

    fn from_fields(fields: Vec<String>) -> Self {
        let mut fields = fields.into_iter();
        let mut next = move || fields.next().unwrap_or_default();
        Self {
            record_type: next(),
            linkage_id: next(),
            relationship_id: next(),
            subject_id: next(),
            linkage_type: next(),
            start_date: next(),
            end_date: next(),
        }
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.record_type.clone(),
            self.linkage_id.clone(),
            self.relationship_id.clone(),
            self.subject_id.clone(),
            self.linkage_type.clone(),
            self.start_date.clone(),
            self.end_date.clone(),
            String::new(), // filler
        ]
    }
}

/// Accounting data record: yearly balances for one relationship.
///
/// Balance fields stay as zero-padded minor-unit strings; the engine
/// re-emits them without interpreting the amounts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountingDataRecord {
    pub record_type: String,
    pub relationship_id: String,
    pub reference_year: String,
    pub currency: String,
    pub opening_balance: String,
    pub closing_balance: String,
    pub total_debits: String,
    pub total_credits: String,
    pub interest_accrued: String,
    pub stock_average: String,
    pub movement_reference: String,
}

impl FixedRecord for AccountingDataRecord {
    fn layout() -> &'static SliceLayout {
        &layout::ACCOUNTING_DATA_LAYOUT
    }

    fn from_fields(fields: Vec<String>) -> Self {
        let mut fields = fields.into_iter();
        let mut next = move || fields.next().unwrap_or_default();
        Self {
            record_type: next(),
            relationship_id: next(),
            reference_year: next(),
            currency: next(),
            opening_balance: next(),
            closing_balance: next(),
            total_debits: next(),
            total_credits: next(),
            interest_accrued: next(),
            stock_average: next(),
            movement_reference: next(),
        }
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.record_type.clone(),
            self.relationship_id.clone(),
            self.reference_year.clone(),
            self.currency.clone(),
            self.opening_balance.clone(),
            self.closing_balance.clone(),
            self.total_debits.clone(),
            self.total_credits.clone(),
            self.interest_accrued.clone(),
            self.stock_average.clone(),
            self.movement_reference.clone(),
            String::new(), // filler
        ]
    }
}

/// ID-change record: a subject identifier reassignment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdChangeRecord {
    pub record_type: String,
    pub old_subject_id: String,
    pub new_subject_id: String,
    pub change_date: String,
    pub reason_code: String,
}

impl FixedRecord for IdChangeRecord {
    fn layout() -> &'static SliceLayout {
        &layout::ID_CHANGE_LAYOUT
    }

    fn from_fields(fields: Vec<String>) -> Self {
        let mut fields = fields.into_iter();
        let mut next = move || fields.next().unwrap_or_default();
        Self {
            record_type: next(),
            old_subject_id: next(),
            new_subject_id: next(),
            change_date: next(),
            reason_code: next(),
        }
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.record_type.clone(),
            self.old_subject_id.clone(),
            self.new_subject_id.clone(),
            self.change_date.clone(),
            self.reason_code.clone(),
            String::new(), // filler
        ]
    }
}

/// Point-of-sale transaction record, prior to resolution.
///
/// `merchant_id` is the foreign key into the merchant master file; the
/// resolution engine joins on it exactly as read, leading zeros included.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionRecord {
    pub record_type: String,
    pub operation_type: String,
    pub operation_date: String,
    pub currency: String,
    pub payment_type_code: String,
    pub total_operations: String,
    pub total_amount: String,
    pub pos_id: String,
    pub merchant_id: String,
    pub intermediary_id: String,
}

impl FixedRecord for TransactionRecord {
    fn layout() -> &'static SliceLayout {
        &layout::TRANSACTION_LAYOUT
    }

    fn from_fields(fields: Vec<String>) -> Self {
        let mut fields = fields.into_iter();
        let mut next = move || fields.next().unwrap_or_default();
        Self {
            record_type: next(),
            operation_type: next(),
            operation_date: next(),
            currency: next(),
            payment_type_code: next(),
            total_operations: next(),
            total_amount: next(),
            pos_id: next(),
            merchant_id: next(),
            intermediary_id: next(),
        }
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.record_type.clone(),
            self.operation_type.clone(),
            self.operation_date.clone(),
            self.currency.clone(),
            self.payment_type_code.clone(),
            self.total_operations.clone(),
            self.total_amount.clone(),
            self.pos_id.clone(),
            self.merchant_id.clone(),
            self.intermediary_id.clone(),
            String::new(), // filler
        ]
    }
}

/// Merchant master record: the join target for transaction resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MerchantRecord {
    pub record_type: String,
    pub merchant_id: String,
    pub intermediary_id: String,
    pub tax_code: String,
    pub vat_number: String,
    pub company_name: String,
    pub movement_reference: String,
}

impl FixedRecord for MerchantRecord {
    fn layout() -> &'static SliceLayout {
        &layout::MERCHANT_LAYOUT
    }

    fn from_fields(fields: Vec<String>) -> Self {
        let mut fields = fields.into_iter();
        let mut next = move || fields.next().unwrap_or_default();
        Self {
            record_type: next(),
            merchant_id: next(),
            intermediary_id: next(),
            tax_code: next(),
            vat_number: next(),
            company_name: next(),
            movement_reference: next(),
        }
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.record_type.clone(),
            self.merchant_id.clone(),
            self.intermediary_id.clone(),
            self.tax_code.clone(),
            self.vat_number.clone(),
            self.company_name.clone(),
            self.movement_reference.clone(),
            String::new(), // filler
        ]
    }
}
