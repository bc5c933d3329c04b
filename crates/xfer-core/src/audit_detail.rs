//! Typed audit change payloads.
//!
//! Each audit entry can carry a structured `changes` JSON blob. These types
//! give the most common shapes a schema.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::RequestStatus;

/// Payload for `AuditAction::StatusChanged`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StatusChangedDetail {
    pub from: RequestStatus,
    pub to: RequestStatus,
    pub reason: Option<String>,
}

/// Payload for `AuditAction::Assigned`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AssignedDetail {
    pub from: Option<i64>,
    pub to: i64,
}

/// Payload for `AuditAction::MediaIssued` and `AuditAction::MediaReturned`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MediaDetail {
    pub media_id: String,
    pub media_type: String,
}

/// Payload for `AuditAction::ScanRecorded`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ScanRecordedDetail {
    pub scanner: String,
    pub files_scanned: u32,
    pub clean: bool,
}
