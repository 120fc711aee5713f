//! Ingestion and submission status models
//!
//! Two orthogonal state machines live here. [`IngestionStatus`] grades the
//! outcome of one ingestion pass and aggregates by maximum priority, so a
//! single failed constituent marks the whole batch failed. [`SubmissionStatus`]
//! is the externally driven submission workflow; the engine never advances
//! it, it only answers whether the current state permits output generation.

use crate::types::ReportError;
use serde::Serialize;
use std::fmt;

/// Outcome grade of an ingestion, ordered by priority.
///
/// Priorities: Failed (3) > Processing (2) > Success (1) > Unknown (0).
/// Aggregating any collection of statuses yields the highest-priority one;
/// an empty collection stays `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IngestionStatus {
    Unknown,
    Success,
    Processing,
    Failed,
}

impl IngestionStatus {
    /// Numeric priority used for max-aggregation.
    pub fn priority(&self) -> u8 {
        match self {
            IngestionStatus::Unknown => 0,
            IngestionStatus::Success => 1,
            IngestionStatus::Processing => 2,
            IngestionStatus::Failed => 3,
        }
    }

    /// The higher-priority of two statuses.
    pub fn combine(self, other: IngestionStatus) -> IngestionStatus {
        if other.priority() > self.priority() {
            other
        } else {
            self
        }
    }

    /// Aggregate an arbitrary collection of statuses.
    ///
    /// The reduction is associative and order-independent, so callers may
    /// fold partial results computed in parallel.
    pub fn aggregate<I>(statuses: I) -> IngestionStatus
    where
        I: IntoIterator<Item = IngestionStatus>,
    {
        statuses
            .into_iter()
            .fold(IngestionStatus::Unknown, IngestionStatus::combine)
    }
}

impl fmt::Display for IngestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IngestionStatus::Unknown => "UNKNOWN",
            IngestionStatus::Success => "SUCCESS",
            IngestionStatus::Processing => "PROCESSING",
            IngestionStatus::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

/// The submission workflow states, in their canonical order.
///
/// Transitions are driven by the surrounding product, not by this crate.
/// The one question the engine answers is [`is_output_required`]: the
/// submission file may only be generated while the workflow sits at
/// `NexisApproval` (order 4).
///
/// [`is_output_required`]: SubmissionStatus::is_output_required
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubmissionStatus {
    IngestionFinished,
    DataValidation,
    ValidationCompleted,
    NexisApproval,
    Processing,
    DeloitteReview,
    ClientReview,
    PendingSubmission,
    Submitted,
    Completed,
    Cancelled,
    Rejected,
    Error,
}

impl SubmissionStatus {
    /// Every state, ordered by `order()`.
    pub const ALL: [SubmissionStatus; 13] = [
        SubmissionStatus::IngestionFinished,
        SubmissionStatus::DataValidation,
        SubmissionStatus::ValidationCompleted,
        SubmissionStatus::NexisApproval,
        SubmissionStatus::Processing,
        SubmissionStatus::DeloitteReview,
        SubmissionStatus::ClientReview,
        SubmissionStatus::PendingSubmission,
        SubmissionStatus::Submitted,
        SubmissionStatus::Completed,
        SubmissionStatus::Cancelled,
        SubmissionStatus::Rejected,
        SubmissionStatus::Error,
    ];

    /// Stable numeric order, 1 through 13.
    pub fn order(&self) -> u8 {
        match self {
            SubmissionStatus::IngestionFinished => 1,
            SubmissionStatus::DataValidation => 2,
            SubmissionStatus::ValidationCompleted => 3,
            SubmissionStatus::NexisApproval => 4,
            SubmissionStatus::Processing => 5,
            SubmissionStatus::DeloitteReview => 6,
            SubmissionStatus::ClientReview => 7,
            SubmissionStatus::PendingSubmission => 8,
            SubmissionStatus::Submitted => 9,
            SubmissionStatus::Completed => 10,
            SubmissionStatus::Cancelled => 11,
            SubmissionStatus::Rejected => 12,
            SubmissionStatus::Error => 13,
        }
    }

    /// Look a state up by its numeric order.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::UnknownStatusOrder`] for orders outside 1..=13.
    pub fn from_order(order: u8) -> Result<SubmissionStatus, ReportError> {
        SubmissionStatus::ALL
            .iter()
            .find(|s| s.order() == order)
            .copied()
            .ok_or(ReportError::UnknownStatusOrder { order })
    }

    /// Canonical persisted name.
    pub fn name(&self) -> &'static str {
        match self {
            SubmissionStatus::IngestionFinished => "INGESTION_FINISHED",
            SubmissionStatus::DataValidation => "DATA_VALIDATION",
            SubmissionStatus::ValidationCompleted => "VALIDATION_COMPLETED",
            SubmissionStatus::NexisApproval => "NEXIS_APPROVAL",
            SubmissionStatus::Processing => "PROCESSING",
            SubmissionStatus::DeloitteReview => "DELOITTE_REVIEW",
            SubmissionStatus::ClientReview => "CLIENT_REVIEW",
            SubmissionStatus::PendingSubmission => "PENDING_SUBMISSION",
            SubmissionStatus::Submitted => "SUBMITTED",
            SubmissionStatus::Completed => "COMPLETED",
            SubmissionStatus::Cancelled => "CANCELLED",
            SubmissionStatus::Rejected => "REJECTED",
            SubmissionStatus::Error => "ERROR",
        }
    }

    /// Whether the submission file must be generated in this state.
    pub fn is_output_required(&self) -> bool {
        matches!(self, SubmissionStatus::NexisApproval)
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
