//! Audit log repository.
//!
//! Append-only entries recording every mutation of a request. The table is
//! protected by triggers; this module only ever inserts and reads.

use chrono::{DateTime, Utc};
use xfer_core::entities::{AuditEntry, AuditEvent};
use xfer_core::enums::{AuditAction, RequestStatus};

use crate::error::DatabaseError;
use crate::helpers::{
    format_datetime, get_opt_string, parse_datetime, parse_opt_status, parse_optional_json,
    rollback_logged,
};
use crate::service::XferService;

const SELECT_COLS: &str =
    "id, request_id, actor_id, action, kind, old_status, new_status, changes, notes, created_at";

/// An activity to append to a request's audit log.
#[derive(Debug, Clone, PartialEq)]
pub struct NewActivity {
    pub request_id: i64,
    pub actor_id: i64,
    pub action: AuditAction,
    pub old_status: Option<RequestStatus>,
    pub new_status: Option<RequestStatus>,
    pub changes: Option<serde_json::Value>,
    pub notes: Option<String>,
}

impl NewActivity {
    #[must_use]
    pub const fn new(request_id: i64, actor_id: i64, action: AuditAction) -> Self {
        Self {
            request_id,
            actor_id,
            action,
            old_status: None,
            new_status: None,
            changes: None,
            notes: None,
        }
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    #[must_use]
    pub fn with_changes(mut self, changes: serde_json::Value) -> Self {
        self.changes = Some(changes);
        self
    }

    #[must_use]
    pub const fn with_statuses(
        mut self,
        old_status: Option<RequestStatus>,
        new_status: Option<RequestStatus>,
    ) -> Self {
        self.old_status = old_status;
        self.new_status = new_status;
        self
    }
}

/// Filter criteria for audit queries.
#[derive(Debug, Default)]
pub struct AuditFilter {
    pub request_id: Option<i64>,
    pub actor_id: Option<i64>,
    pub action: Option<AuditAction>,
    pub limit: Option<u32>,
}

fn row_to_entry(row: &libsql::Row) -> Result<AuditEntry, DatabaseError> {
    let kind: String = row.get(4)?;
    let old_status = parse_opt_status(get_opt_string(row, 5)?.as_deref());
    let new_status = parse_opt_status(get_opt_string(row, 6)?.as_deref());

    Ok(AuditEntry {
        id: row.get(0)?,
        request_id: row.get(1)?,
        actor_id: row.get(2)?,
        actor_name: None,
        action: row.get::<String>(3)?.parse()?,
        event: AuditEvent::from_columns(&kind, old_status, new_status)?,
        changes: parse_optional_json(get_opt_string(row, 7)?.as_deref())?,
        notes: get_opt_string(row, 8)?,
        created_at: parse_datetime(&row.get::<String>(9)?)?,
    })
}

/// Insert one entry on `conn`, which may be an open transaction.
pub(crate) async fn insert_audit(
    conn: &libsql::Connection,
    activity: &NewActivity,
    now: DateTime<Utc>,
) -> Result<AuditEntry, DatabaseError> {
    let event = AuditEvent::derive(activity.action, activity.old_status, activity.new_status);
    let changes = activity
        .changes
        .as_ref()
        .map(serde_json::Value::to_string);

    conn.execute(
        "INSERT INTO audit_log
            (request_id, actor_id, action, kind, old_status, new_status, changes, notes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        libsql::params![
            activity.request_id,
            activity.actor_id,
            activity.action.as_str(),
            event.kind(),
            event.old_status().map(RequestStatus::as_str),
            event.new_status().map(RequestStatus::as_str),
            changes,
            activity.notes.as_deref(),
            format_datetime(now)
        ],
    )
    .await?;

    Ok(AuditEntry {
        id: conn.last_insert_rowid(),
        request_id: activity.request_id,
        actor_id: activity.actor_id,
        actor_name: None,
        action: activity.action,
        event,
        changes: activity.changes.clone(),
        notes: activity.notes.clone(),
        created_at: now,
    })
}

async fn record_activity(
    conn: &libsql::Connection,
    activity: &NewActivity,
    now: DateTime<Utc>,
) -> Result<AuditEntry, DatabaseError> {
    let touched = conn
        .execute(
            "UPDATE requests SET updated_at = ?1 WHERE id = ?2",
            libsql::params![format_datetime(now), activity.request_id],
        )
        .await?;
    if touched == 0 {
        return Err(DatabaseError::NotFound {
            entity: "request",
            id: activity.request_id,
        });
    }
    insert_audit(conn, activity, now).await
}

impl XferService {
    /// Append an activity to a request's log and bump its `updated_at`.
    ///
    /// Never changes the request's status; use
    /// [`Self::try_transition_status`] for that.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` for an unknown request, or
    /// `DatabaseError` if the write fails.
    pub async fn append_activity(
        &self,
        activity: &NewActivity,
    ) -> Result<AuditEntry, DatabaseError> {
        let now = self.now();
        let tx = self.db().conn().transaction().await?;

        match record_activity(&tx, activity, now).await {
            Ok(entry) => {
                tx.commit().await?;
                tracing::debug!(
                    request_id = activity.request_id,
                    action = %activity.action,
                    "activity appended"
                );
                Ok(entry)
            }
            Err(error) => {
                rollback_logged(tx).await;
                Err(error)
            }
        }
    }

    /// All entries for a request in replay order: `created_at`, then `id`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a row cannot be decoded.
    pub async fn list_audit_for_request(
        &self,
        request_id: i64,
    ) -> Result<Vec<AuditEntry>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM audit_log
                     WHERE request_id = ?1 ORDER BY created_at, id"
                ),
                [request_id],
            )
            .await?;

        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_entry(&row)?);
        }
        Ok(entries)
    }

    /// Query audit entries with optional filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn query_audit(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(request_id) = filter.request_id {
            params.push(libsql::Value::Integer(request_id));
            conditions.push(format!("request_id = ?{}", params.len()));
        }
        if let Some(actor_id) = filter.actor_id {
            params.push(libsql::Value::Integer(actor_id));
            conditions.push(format!("actor_id = ?{}", params.len()));
        }
        if let Some(action) = filter.action {
            params.push(libsql::Value::Text(action.as_str().to_string()));
            conditions.push(format!("action = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let limit = filter.limit.unwrap_or_else(|| self.default_limit());
        let sql = format!(
            "SELECT {SELECT_COLS} FROM audit_log {where_clause}
             ORDER BY created_at DESC, id DESC LIMIT {limit}"
        );

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;

        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_entry(&row)?);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use xfer_core::audit_detail::ScanRecordedDetail;
    use xfer_core::enums::TransferVariant;

    use super::*;
    use crate::test_support::helpers::{create_test_request, reject_audit_inserts, test_service};

    #[tokio::test]
    async fn append_activity_keeps_status() {
        let (svc, clock) = test_service().await;
        let req = create_test_request(&svc, TransferVariant::Standard).await;
        clock.advance(chrono::Duration::minutes(30));

        let detail = ScanRecordedDetail {
            scanner: "av-1".into(),
            files_scanned: 4,
            clean: true,
        };
        let entry = svc
            .append_activity(
                &NewActivity::new(req.id, 2, AuditAction::ScanRecorded)
                    .with_changes(serde_json::to_value(&detail).unwrap())
                    .with_notes("clean scan"),
            )
            .await
            .unwrap();

        assert_eq!(entry.event, AuditEvent::Activity);
        assert_eq!(entry.created_at, svc.now());

        let stored = svc.get_request(req.id).await.unwrap().unwrap();
        assert_eq!(stored.status, RequestStatus::Draft);
        assert_eq!(stored.updated_at, svc.now());

        let entries = svc.list_audit_for_request(req.id).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1], entry);
    }

    #[tokio::test]
    async fn append_activity_unknown_request() {
        let (svc, _) = test_service().await;
        let result = svc
            .append_activity(&NewActivity::new(404, 1, AuditAction::Commented))
            .await;
        assert!(matches!(
            result,
            Err(DatabaseError::NotFound { entity: "request", id: 404 })
        ));
    }

    #[tokio::test]
    async fn failed_audit_insert_rolls_back_and_keeps_error() {
        let (svc, clock) = test_service().await;
        let req = create_test_request(&svc, TransferVariant::Standard).await;
        reject_audit_inserts(&svc).await;
        clock.advance(chrono::Duration::hours(1));

        let result = svc
            .append_activity(&NewActivity::new(req.id, 1, AuditAction::Commented))
            .await;
        assert!(matches!(result, Err(DatabaseError::LibSql(_))), "got {result:?}");

        let stored = svc.get_request(req.id).await.unwrap().unwrap();
        assert_eq!(stored.updated_at, req.updated_at);
        assert_eq!(svc.list_audit_for_request(req.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn activity_with_new_status_is_recorded_as_transition_event() {
        let (svc, _) = test_service().await;
        let req = create_test_request(&svc, TransferVariant::Standard).await;

        let entry = svc
            .append_activity(
                &NewActivity::new(req.id, 1, AuditAction::Updated)
                    .with_statuses(Some(RequestStatus::Draft), Some(RequestStatus::Submitted)),
            )
            .await
            .unwrap();
        assert!(entry.event.is_transition());

        let stored = svc.list_audit_for_request(req.id).await.unwrap();
        assert_eq!(stored[1].event, entry.event);
    }

    #[tokio::test]
    async fn same_instant_entries_replay_by_id() {
        let (svc, _) = test_service().await;
        let req = create_test_request(&svc, TransferVariant::Standard).await;

        for action in [AuditAction::Commented, AuditAction::MediaIssued, AuditAction::MediaReturned] {
            svc.append_activity(&NewActivity::new(req.id, 1, action))
                .await
                .unwrap();
        }

        let entries = svc.list_audit_for_request(req.id).await.unwrap();
        let ids: Vec<i64> = entries.iter().map(|e| e.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
        assert_eq!(entries[0].action, AuditAction::Created);
    }

    #[tokio::test]
    async fn query_audit_filters() {
        let (svc, clock) = test_service().await;
        let req = create_test_request(&svc, TransferVariant::Standard).await;

        clock.advance(chrono::Duration::minutes(5));
        svc.append_activity(&NewActivity::new(req.id, 7, AuditAction::Commented))
            .await
            .unwrap();
        clock.advance(chrono::Duration::minutes(5));
        svc.append_activity(&NewActivity::new(req.id, 8, AuditAction::Commented))
            .await
            .unwrap();

        let by_actor = svc
            .query_audit(&AuditFilter {
                actor_id: Some(7),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_actor.len(), 1);

        let comments = svc
            .query_audit(&AuditFilter {
                request_id: Some(req.id),
                action: Some(AuditAction::Commented),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].actor_id, 8, "newest first");

        let limited = svc
            .query_audit(&AuditFilter {
                limit: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(limited.len(), 1);
    }
}
