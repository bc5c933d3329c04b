use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{RequestStatus, TransferVariant};
use crate::progress::{Progress, compute_progress};

/// A transfer request moving through the approval pipeline.
///
/// Only the audit entry writer in `xfer-db` changes `status`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Request {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub requestor_id: i64,
    pub assignee_id: Option<i64>,
    pub variant: TransferVariant,
    pub status: RequestStatus,
    /// Status held right before entering `rejected` or `cancelled`.
    pub deviated_from: Option<RequestStatus>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub authorized_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Request {
    /// Progress derived from the current status alone.
    #[must_use]
    pub fn progress(&self) -> Progress {
        compute_progress(self.variant, self.status, self.deviated_from)
    }
}
