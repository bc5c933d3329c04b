//! Status, variant, audit action and timeline step enums for xfer.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`
//! and expose `as_str()` for SQL storage. `RequestStatus` also carries the
//! static per-stage tables (titles, descriptions, responsible party, average
//! stage duration) used by the timeline engine.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// RequestStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a transfer request.
///
/// ```text
/// draft → submitted → pending_dta_review → pending_sme_review
///       → pending_issm_approval → [pending_dao_authorization] → approved
///       → media_issued → transfer_in_progress → transfer_verified
///       → completed → disposed
///
/// any non-terminal stage → rejected | cancelled
/// ```
///
/// `Unknown` is never written by the writer. It is what a stored status
/// string that no longer parses reads back as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Draft,
    Submitted,
    PendingDtaReview,
    PendingSmeReview,
    PendingIssmApproval,
    PendingDaoAuthorization,
    Approved,
    MediaIssued,
    TransferInProgress,
    TransferVerified,
    Completed,
    Disposed,
    Rejected,
    Cancelled,
    Unknown,
}

impl RequestStatus {
    /// Every status, in declaration order.
    pub const ALL: [Self; 15] = [
        Self::Draft,
        Self::Submitted,
        Self::PendingDtaReview,
        Self::PendingSmeReview,
        Self::PendingIssmApproval,
        Self::PendingDaoAuthorization,
        Self::Approved,
        Self::MediaIssued,
        Self::TransferInProgress,
        Self::TransferVerified,
        Self::Completed,
        Self::Disposed,
        Self::Rejected,
        Self::Cancelled,
        Self::Unknown,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::PendingDtaReview => "pending_dta_review",
            Self::PendingSmeReview => "pending_sme_review",
            Self::PendingIssmApproval => "pending_issm_approval",
            Self::PendingDaoAuthorization => "pending_dao_authorization",
            Self::Approved => "approved",
            Self::MediaIssued => "media_issued",
            Self::TransferInProgress => "transfer_in_progress",
            Self::TransferVerified => "transfer_verified",
            Self::Completed => "completed",
            Self::Disposed => "disposed",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
        }
    }

    /// Statuses from which no further nominal progress occurs.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Disposed | Self::Rejected | Self::Cancelled
        )
    }

    /// Terminal statuses that truncate the nominal flow instead of completing it.
    #[must_use]
    pub const fn is_terminal_deviation(self) -> bool {
        matches!(self, Self::Rejected | Self::Cancelled)
    }

    /// Human label shown on a timeline step.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Submitted => "Submitted",
            Self::PendingDtaReview => "Transfer Agent Review",
            Self::PendingSmeReview => "Subject Matter Review",
            Self::PendingIssmApproval => "Security Manager Approval",
            Self::PendingDaoAuthorization => "Authorizing Official Review",
            Self::Approved => "Approved",
            Self::MediaIssued => "Media Issued",
            Self::TransferInProgress => "Transfer In Progress",
            Self::TransferVerified => "Transfer Verified",
            Self::Completed => "Completed",
            Self::Disposed => "Media Disposed",
            Self::Rejected => "Rejected",
            Self::Cancelled => "Cancelled",
            Self::Unknown => "Unknown Status",
        }
    }

    /// One-sentence purpose of the stage.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Draft => "The requestor is preparing the transfer request.",
            Self::Submitted => "The request has been submitted for review.",
            Self::PendingDtaReview => {
                "A data transfer agent is checking the request for completeness."
            }
            Self::PendingSmeReview => {
                "A subject matter expert is reviewing the content to be transferred."
            }
            Self::PendingIssmApproval => {
                "The security manager is evaluating the request for approval."
            }
            Self::PendingDaoAuthorization => {
                "The authorizing official must sign off on the elevated transfer."
            }
            Self::Approved => "The request is approved and awaiting media.",
            Self::MediaIssued => "Transfer media has been issued to the transfer agent.",
            Self::TransferInProgress => "The data is being moved between systems.",
            Self::TransferVerified => "The transferred data has been verified at the destination.",
            Self::Completed => "The transfer is complete.",
            Self::Disposed => "The transfer media has been sanitized or destroyed.",
            Self::Rejected => "The request was rejected during review.",
            Self::Cancelled => "The request was cancelled before completion.",
            Self::Unknown => "The stored status is not recognised.",
        }
    }

    /// Party responsible for a stage when the log names nobody.
    #[must_use]
    #[allow(clippy::match_same_arms)]
    pub const fn default_party(self) -> &'static str {
        match self {
            Self::Draft | Self::Submitted | Self::Cancelled => "Requestor",
            Self::PendingDtaReview | Self::TransferInProgress | Self::TransferVerified => {
                "Transfer Agent"
            }
            Self::PendingSmeReview => "Subject Matter Expert",
            Self::PendingIssmApproval | Self::Rejected => "Security Team",
            Self::PendingDaoAuthorization => "Authorizing Official",
            Self::MediaIssued | Self::Disposed => "Media Custodian",
            Self::Approved | Self::Completed | Self::Unknown => "System",
        }
    }

    /// Average hours a request spends in this stage.
    #[must_use]
    #[allow(clippy::match_same_arms)]
    pub const fn average_hours(self) -> u32 {
        match self {
            Self::Draft | Self::Disposed | Self::Rejected | Self::Cancelled | Self::Unknown => 0,
            Self::Submitted => 2,
            Self::PendingDtaReview | Self::PendingSmeReview | Self::Completed => 24,
            Self::PendingIssmApproval => 48,
            Self::PendingDaoAuthorization => 72,
            Self::Approved => 1,
            Self::MediaIssued => 8,
            Self::TransferInProgress | Self::TransferVerified => 4,
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::InvalidStatus(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// TransferVariant
// ---------------------------------------------------------------------------

/// Classification of a request that selects its status flow template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransferVariant {
    #[default]
    Standard,
    LowToHigh,
    HighToLow,
}

impl TransferVariant {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::LowToHigh => "low_to_high",
            Self::HighToLow => "high_to_low",
        }
    }

    /// Parse a stored variant, reading anything unrecognised as `Standard`.
    #[must_use]
    pub fn parse_lenient(s: &str) -> Self {
        match s {
            "low_to_high" => Self::LowToHigh,
            "high_to_low" => Self::HighToLow,
            _ => Self::Standard,
        }
    }
}

impl fmt::Display for TransferVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuditAction
// ---------------------------------------------------------------------------

/// Type of action recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    StatusChanged,
    Updated,
    Assigned,
    Commented,
    SignatureCaptured,
    ScanRecorded,
    MediaIssued,
    MediaReturned,
}

impl AuditAction {
    pub const ALL: [Self; 9] = [
        Self::Created,
        Self::StatusChanged,
        Self::Updated,
        Self::Assigned,
        Self::Commented,
        Self::SignatureCaptured,
        Self::ScanRecorded,
        Self::MediaIssued,
        Self::MediaReturned,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::StatusChanged => "status_changed",
            Self::Updated => "updated",
            Self::Assigned => "assigned",
            Self::Commented => "commented",
            Self::SignatureCaptured => "signature_captured",
            Self::ScanRecorded => "scan_recorded",
            Self::MediaIssued => "media_issued",
            Self::MediaReturned => "media_returned",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("unknown audit action '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// StepState
// ---------------------------------------------------------------------------

/// Classification of one stage on a reconstructed timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    Completed,
    Current,
    Pending,
    Skipped,
    Error,
}

impl StepState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Current => "current",
            Self::Pending => "pending",
            Self::Skipped => "skipped",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for StepState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
