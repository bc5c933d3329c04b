use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{AuditAction, RequestStatus};
use crate::errors::CoreError;

/// What an audit entry records.
///
/// The log doubles as the status ledger and the activity trail; the event
/// tag says which role an entry plays.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditEvent {
    /// Origin of the request's history.
    Created { status: RequestStatus },
    /// A status transition.
    StatusChanged {
        from: Option<RequestStatus>,
        to: RequestStatus,
    },
    /// Anything else: scans, media issuance, comments.
    Activity,
}

impl AuditEvent {
    /// Derive the event for an entry from its action and status columns.
    #[must_use]
    pub fn derive(
        action: AuditAction,
        old_status: Option<RequestStatus>,
        new_status: Option<RequestStatus>,
    ) -> Self {
        match (action, new_status) {
            (AuditAction::Created, status) => Self::Created {
                status: status.unwrap_or(RequestStatus::Draft),
            },
            (_, Some(to)) => Self::StatusChanged {
                from: old_status,
                to,
            },
            (_, None) => Self::Activity,
        }
    }

    /// Rebuild an event from its stored `kind`, `old_status`, `new_status` columns.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for an unknown kind or a
    /// `status_changed` row without a new status.
    pub fn from_columns(
        kind: &str,
        old_status: Option<RequestStatus>,
        new_status: Option<RequestStatus>,
    ) -> Result<Self, CoreError> {
        match kind {
            "created" => Ok(Self::Created {
                status: new_status.unwrap_or(RequestStatus::Draft),
            }),
            "status_changed" => new_status
                .map(|to| Self::StatusChanged {
                    from: old_status,
                    to,
                })
                .ok_or_else(|| {
                    CoreError::Validation("status_changed entry without new status".into())
                }),
            "activity" => Ok(Self::Activity),
            other => Err(CoreError::Validation(format!("unknown audit kind '{other}'"))),
        }
    }

    #[must_use]
    pub const fn kind(self) -> &'static str {
        match self {
            Self::Created { .. } => "created",
            Self::StatusChanged { .. } => "status_changed",
            Self::Activity => "activity",
        }
    }

    #[must_use]
    pub const fn old_status(self) -> Option<RequestStatus> {
        match self {
            Self::StatusChanged { from, .. } => from,
            Self::Created { .. } | Self::Activity => None,
        }
    }

    #[must_use]
    pub const fn new_status(self) -> Option<RequestStatus> {
        match self {
            Self::Created { status } => Some(status),
            Self::StatusChanged { to, .. } => Some(to),
            Self::Activity => None,
        }
    }

    #[must_use]
    pub const fn is_transition(self) -> bool {
        matches!(self, Self::StatusChanged { .. })
    }
}

/// An append-only audit trail entry for one request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AuditEntry {
    pub id: i64,
    pub request_id: i64,
    pub actor_id: i64,
    /// Resolved from the actor directory on read; never stored.
    pub actor_name: Option<String>,
    pub action: AuditAction,
    pub event: AuditEvent,
    pub changes: Option<serde_json::Value>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_created_defaults_to_draft() {
        let event = AuditEvent::derive(AuditAction::Created, None, None);
        assert_eq!(
            event,
            AuditEvent::Created {
                status: RequestStatus::Draft
            }
        );
    }

    #[test]
    fn derive_transition_needs_new_status() {
        let event = AuditEvent::derive(
            AuditAction::StatusChanged,
            Some(RequestStatus::Draft),
            Some(RequestStatus::Submitted),
        );
        assert!(event.is_transition());
        assert_eq!(event.old_status(), Some(RequestStatus::Draft));
        assert_eq!(event.new_status(), Some(RequestStatus::Submitted));

        let activity = AuditEvent::derive(AuditAction::StatusChanged, Some(RequestStatus::Draft), None);
        assert_eq!(activity, AuditEvent::Activity);
    }

    #[test]
    fn derive_activity_with_status_is_transition() {
        let event = AuditEvent::derive(AuditAction::ScanRecorded, None, Some(RequestStatus::Approved));
        assert!(event.is_transition());
    }

    #[test]
    fn from_columns_roundtrips_kind() {
        for event in [
            AuditEvent::Created {
                status: RequestStatus::Draft,
            },
            AuditEvent::StatusChanged {
                from: Some(RequestStatus::Submitted),
                to: RequestStatus::PendingDtaReview,
            },
            AuditEvent::Activity,
        ] {
            let rebuilt =
                AuditEvent::from_columns(event.kind(), event.old_status(), event.new_status())
                    .unwrap();
            assert_eq!(rebuilt, event);
        }
    }

    #[test]
    fn from_columns_rejects_bad_rows() {
        assert!(AuditEvent::from_columns("status_changed", None, None).is_err());
        assert!(AuditEvent::from_columns("deleted", None, None).is_err());
    }

    #[test]
    fn event_serializes_with_kind_tag() {
        let json = serde_json::to_value(AuditEvent::StatusChanged {
            from: None,
            to: RequestStatus::Rejected,
        })
        .unwrap();
        assert_eq!(json["kind"], "status_changed");
        assert_eq!(json["to"], "rejected");
    }
}
