//! Status transitions.
//!
//! A transition is a compare-and-swap on `requests.status` plus the
//! `status_changed` audit entry that records it, committed together. Two
//! writers racing from the same status cannot both win; the loser gets
//! [`TransitionError::Conflict`].

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use xfer_core::audit_detail::StatusChangedDetail;
use xfer_core::entities::AuditEntry;
use xfer_core::enums::{AuditAction, RequestStatus};

use crate::error::{DatabaseError, TransitionError};
use crate::helpers::{format_datetime, parse_status_lenient, rollback_logged};
use crate::repos::audit::{NewActivity, insert_audit};
use crate::service::XferService;

/// A requested move to a new status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRequest {
    pub to: RequestStatus,
    /// Status the caller believes the request is in. `None` skips the check
    /// against the caller's view; the write is still compare-and-swap.
    pub expected: Option<RequestStatus>,
    pub notes: Option<String>,
}

impl TransitionRequest {
    #[must_use]
    pub const fn to(status: RequestStatus) -> Self {
        Self {
            to: status,
            expected: None,
            notes: None,
        }
    }

    #[must_use]
    pub const fn expecting(mut self, status: RequestStatus) -> Self {
        self.expected = Some(status);
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Outcome of a transition that did not fail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Transition {
    Applied {
        from: RequestStatus,
        to: RequestStatus,
        entry: AuditEntry,
    },
    /// The request was already in the target status; nothing was written.
    Unchanged { status: RequestStatus },
}

impl Transition {
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

async fn read_status(
    conn: &libsql::Connection,
    request_id: i64,
) -> Result<Option<RequestStatus>, DatabaseError> {
    let mut rows = conn
        .query("SELECT status FROM requests WHERE id = ?1", [request_id])
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(parse_status_lenient(&row.get::<String>(0)?))),
        None => Ok(None),
    }
}

async fn swap_status(
    conn: &libsql::Connection,
    request_id: i64,
    actor_id: i64,
    from: RequestStatus,
    req: &TransitionRequest,
    now: DateTime<Utc>,
) -> Result<AuditEntry, TransitionError> {
    let deviated_from = req.to.is_terminal_deviation().then_some(from);
    let swapped = conn
        .execute(
            "UPDATE requests SET
                status = ?1,
                updated_at = ?2,
                authorized_at = CASE WHEN ?1 = 'approved' AND authorized_at IS NULL
                                     THEN ?2 ELSE authorized_at END,
                completed_at = CASE WHEN ?1 = 'completed' AND completed_at IS NULL
                                    THEN ?2 ELSE completed_at END,
                deviated_from = ?3
             WHERE id = ?4 AND status = ?5",
            libsql::params![
                req.to.as_str(),
                format_datetime(now),
                deviated_from.map(RequestStatus::as_str),
                request_id,
                from.as_str()
            ],
        )
        .await?;

    if swapped == 0 {
        let actual = read_status(conn, request_id)
            .await?
            .ok_or(TransitionError::NotFound(request_id))?;
        return Err(TransitionError::Conflict {
            request_id,
            expected: from,
            actual,
        });
    }

    let detail = StatusChangedDetail {
        from,
        to: req.to,
        reason: req.notes.clone(),
    };
    let mut activity = NewActivity::new(request_id, actor_id, AuditAction::StatusChanged)
        .with_statuses(Some(from), Some(req.to))
        .with_changes(serde_json::to_value(&detail).map_err(|e| DatabaseError::Other(e.into()))?);
    activity.notes.clone_from(&req.notes);

    Ok(insert_audit(conn, &activity, now).await?)
}

impl XferService {
    /// Move a request to `req.to`, recording the transition in the audit log.
    ///
    /// The status update and its audit entry commit together or not at all.
    ///
    /// # Errors
    ///
    /// - `TransitionError::InvalidStatus` when the target is `unknown`;
    /// - `TransitionError::NotFound` for an unknown request;
    /// - `TransitionError::Conflict` when the stored status differs from
    ///   `req.expected`, or changed between the read and the write;
    /// - `TransitionError::Storage` when the store fails.
    pub async fn try_transition_status(
        &self,
        request_id: i64,
        actor_id: i64,
        req: &TransitionRequest,
    ) -> Result<Transition, TransitionError> {
        if req.to == RequestStatus::Unknown {
            return Err(TransitionError::InvalidStatus(req.to));
        }

        let current = read_status(self.db().conn(), request_id)
            .await?
            .ok_or(TransitionError::NotFound(request_id))?;

        if let Some(expected) = req.expected {
            if expected != current {
                return Err(TransitionError::Conflict {
                    request_id,
                    expected,
                    actual: current,
                });
            }
        }
        if req.to == current {
            return Ok(Transition::Unchanged { status: current });
        }

        let now = self.now();
        let tx = self.db().conn().transaction().await?;
        match swap_status(&tx, request_id, actor_id, current, req, now).await {
            Ok(entry) => {
                tx.commit().await?;
                tracing::info!(request_id, from = %current, to = %req.to, "status changed");
                Ok(Transition::Applied {
                    from: current,
                    to: req.to,
                    entry,
                })
            }
            Err(error) => {
                rollback_logged(tx).await;
                Err(error)
            }
        }
    }

    /// Boolean form of [`Self::try_transition_status`].
    ///
    /// Returns `true` only when a transition was written. Failures are
    /// logged, not returned.
    pub async fn transition_status(
        &self,
        request_id: i64,
        actor_id: i64,
        to: RequestStatus,
        notes: Option<&str>,
    ) -> bool {
        let expected = match read_status(self.db().conn(), request_id).await {
            Ok(status) => status,
            Err(error) => {
                tracing::error!(request_id, %error, "failed to read request status");
                return false;
            }
        };

        let req = TransitionRequest {
            to,
            expected,
            notes: notes.map(str::to_string),
        };
        match self.try_transition_status(request_id, actor_id, &req).await {
            Ok(Transition::Applied { .. }) => true,
            Ok(Transition::Unchanged { status }) => {
                tracing::debug!(request_id, %status, "transition to current status ignored");
                false
            }
            Err(error) => {
                tracing::error!(request_id, to = %to, %error, "status transition failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use xfer_core::entities::AuditEvent;
    use xfer_core::enums::TransferVariant;
    use xfer_core::flow::template;

    use super::*;
    use crate::test_support::helpers::{
        create_test_request, reject_audit_inserts, test_service, walk,
    };

    #[tokio::test]
    async fn failed_audit_insert_rolls_back_status_and_keeps_error() {
        let (svc, _) = test_service().await;
        let req = create_test_request(&svc, TransferVariant::Standard).await;
        reject_audit_inserts(&svc).await;

        let result = svc
            .try_transition_status(req.id, 1, &TransitionRequest::to(RequestStatus::Submitted))
            .await;
        assert!(
            matches!(result, Err(TransitionError::Storage(DatabaseError::LibSql(_)))),
            "got {result:?}"
        );

        let stored = svc.get_request(req.id).await.unwrap().unwrap();
        assert_eq!(stored.status, RequestStatus::Draft);
        assert_eq!(svc.list_audit_for_request(req.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn applied_transition_writes_entry() {
        let (svc, clock) = test_service().await;
        let req = create_test_request(&svc, TransferVariant::Standard).await;
        clock.advance(chrono::Duration::hours(2));

        let outcome = svc
            .try_transition_status(
                req.id,
                3,
                &TransitionRequest::to(RequestStatus::Submitted)
                    .expecting(RequestStatus::Draft)
                    .with_notes("ready"),
            )
            .await
            .unwrap();

        let Transition::Applied { from, to, entry } = outcome else {
            panic!("expected an applied transition");
        };
        assert_eq!(from, RequestStatus::Draft);
        assert_eq!(to, RequestStatus::Submitted);
        assert_eq!(
            entry.event,
            AuditEvent::StatusChanged {
                from: Some(RequestStatus::Draft),
                to: RequestStatus::Submitted,
            }
        );
        assert_eq!(entry.notes.as_deref(), Some("ready"));
        assert_eq!(
            entry.changes,
            Some(serde_json::json!({"from": "draft", "to": "submitted", "reason": "ready"}))
        );

        let stored = svc.get_request(req.id).await.unwrap().unwrap();
        assert_eq!(stored.status, RequestStatus::Submitted);
        assert_eq!(stored.updated_at, svc.now());
    }

    #[tokio::test]
    async fn same_status_is_unchanged() {
        let (svc, _) = test_service().await;
        let req = create_test_request(&svc, TransferVariant::Standard).await;

        let outcome = svc
            .try_transition_status(req.id, 1, &TransitionRequest::to(RequestStatus::Draft))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            Transition::Unchanged {
                status: RequestStatus::Draft
            }
        );
        assert!(!svc.transition_status(req.id, 1, RequestStatus::Draft, None).await);
        assert_eq!(svc.list_audit_for_request(req.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn stale_expectation_conflicts() {
        let (svc, clock) = test_service().await;
        let req = create_test_request(&svc, TransferVariant::Standard).await;
        walk(&svc, &clock, req.id, &[RequestStatus::Submitted]).await;

        let result = svc
            .try_transition_status(
                req.id,
                1,
                &TransitionRequest::to(RequestStatus::Cancelled).expecting(RequestStatus::Draft),
            )
            .await;
        assert!(matches!(
            result,
            Err(TransitionError::Conflict {
                expected: RequestStatus::Draft,
                actual: RequestStatus::Submitted,
                ..
            })
        ));
        let stored = svc.get_request(req.id).await.unwrap().unwrap();
        assert_eq!(stored.status, RequestStatus::Submitted);
        assert_eq!(svc.list_audit_for_request(req.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn missing_request() {
        let (svc, _) = test_service().await;
        let result = svc
            .try_transition_status(999_999, 1, &TransitionRequest::to(RequestStatus::Submitted))
            .await;
        assert!(matches!(result, Err(TransitionError::NotFound(999_999))));
        assert!(!svc.transition_status(999_999, 1, RequestStatus::Submitted, None).await);
    }

    #[tokio::test]
    async fn unknown_target_is_invalid() {
        let (svc, _) = test_service().await;
        let req = create_test_request(&svc, TransferVariant::Standard).await;
        let result = svc
            .try_transition_status(req.id, 1, &TransitionRequest::to(RequestStatus::Unknown))
            .await;
        assert!(matches!(
            result,
            Err(TransitionError::InvalidStatus(RequestStatus::Unknown))
        ));
    }

    #[tokio::test]
    async fn milestones_are_stamped_once() {
        let (svc, clock) = test_service().await;
        let req = create_test_request(&svc, TransferVariant::Standard).await;
        walk(
            &svc,
            &clock,
            req.id,
            &[
                RequestStatus::Submitted,
                RequestStatus::PendingDtaReview,
                RequestStatus::PendingSmeReview,
                RequestStatus::PendingIssmApproval,
                RequestStatus::Approved,
            ],
        )
        .await;
        let approved_at = svc.now();

        walk(
            &svc,
            &clock,
            req.id,
            &[RequestStatus::PendingIssmApproval, RequestStatus::Approved],
        )
        .await;

        let stored = svc.get_request(req.id).await.unwrap().unwrap();
        assert_eq!(stored.authorized_at, Some(approved_at));
        assert_eq!(stored.completed_at, None);
    }

    #[tokio::test]
    async fn deviation_records_its_origin() {
        let (svc, clock) = test_service().await;
        let req = create_test_request(&svc, TransferVariant::Standard).await;
        walk(
            &svc,
            &clock,
            req.id,
            &[RequestStatus::Submitted, RequestStatus::Rejected],
        )
        .await;

        let stored = svc.get_request(req.id).await.unwrap().unwrap();
        assert_eq!(stored.deviated_from, Some(RequestStatus::Submitted));

        walk(&svc, &clock, req.id, &[RequestStatus::Draft]).await;
        let reopened = svc.get_request(req.id).await.unwrap().unwrap();
        assert_eq!(reopened.deviated_from, None);
    }

    #[rstest]
    #[case(TransferVariant::Standard)]
    #[case(TransferVariant::HighToLow)]
    #[tokio::test]
    async fn progress_is_monotonic_through_transitions(#[case] variant: TransferVariant) {
        let (svc, clock) = test_service().await;
        let req = create_test_request(&svc, variant).await;

        let mut last = svc.get_request(req.id).await.unwrap().unwrap().progress();
        for &status in &template(variant)[1..] {
            walk(&svc, &clock, req.id, &[status]).await;
            let progress = svc.get_request(req.id).await.unwrap().unwrap().progress();
            assert!(progress.percent > last.percent, "{status}: progress went backwards");
            assert_eq!(progress.percent == 100, status == RequestStatus::Disposed);
            last = progress;
        }

        let stored = svc.get_request(req.id).await.unwrap().unwrap();
        assert!(stored.completed_at.is_some());
    }
}
