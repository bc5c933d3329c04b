//! Request repository: creation, lookup, assignment and list views.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use xfer_core::audit_detail::AssignedDetail;
use xfer_core::entities::{AuditEntry, Request};
use xfer_core::enums::{AuditAction, RequestStatus, TransferVariant};
use xfer_core::errors::CoreError;
use xfer_core::progress::Progress;

use crate::error::DatabaseError;
use crate::helpers::{
    format_datetime, get_opt_i64, get_opt_string, parse_datetime, parse_opt_status,
    parse_optional_datetime, parse_status_lenient, rollback_logged,
};
use crate::repos::audit::{NewActivity, insert_audit};
use crate::service::XferService;

pub(crate) const SELECT_COLS: &str = "id, title, description, requestor_id, assignee_id, variant, \
     status, deviated_from, created_at, updated_at, authorized_at, completed_at";

pub(crate) fn row_to_request(row: &libsql::Row) -> Result<Request, DatabaseError> {
    Ok(Request {
        id: row.get(0)?,
        title: row.get(1)?,
        description: get_opt_string(row, 2)?,
        requestor_id: row.get(3)?,
        assignee_id: get_opt_i64(row, 4)?,
        variant: TransferVariant::parse_lenient(&row.get::<String>(5)?),
        status: parse_status_lenient(&row.get::<String>(6)?),
        deviated_from: parse_opt_status(get_opt_string(row, 7)?.as_deref()),
        created_at: parse_datetime(&row.get::<String>(8)?)?,
        updated_at: parse_datetime(&row.get::<String>(9)?)?,
        authorized_at: parse_optional_datetime(get_opt_string(row, 10)?.as_deref())?,
        completed_at: parse_optional_datetime(get_opt_string(row, 11)?.as_deref())?,
    })
}

/// Fields for a new request. It always starts in `draft`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRequest {
    pub title: String,
    pub description: Option<String>,
    pub requestor_id: i64,
    pub assignee_id: Option<i64>,
    pub variant: TransferVariant,
}

impl NewRequest {
    #[must_use]
    pub fn new(title: impl Into<String>, requestor_id: i64) -> Self {
        Self {
            title: title.into(),
            description: None,
            requestor_id,
            assignee_id: None,
            variant: TransferVariant::default(),
        }
    }
}

/// Filter criteria for list views. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct RequestFilter {
    pub status: Option<RequestStatus>,
    pub requestor_id: Option<i64>,
    pub assignee_id: Option<i64>,
    pub variant: Option<TransferVariant>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// A list row: the request and its progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RequestSummary {
    #[serde(flatten)]
    pub request: Request,
    pub progress: Progress,
}

async fn insert_request(
    conn: &libsql::Connection,
    new: &NewRequest,
    now: DateTime<Utc>,
) -> Result<Request, DatabaseError> {
    let ts = format_datetime(now);
    conn.execute(
        "INSERT INTO requests
            (title, description, requestor_id, assignee_id, variant, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        libsql::params![
            new.title.as_str(),
            new.description.as_deref(),
            new.requestor_id,
            new.assignee_id,
            new.variant.as_str(),
            RequestStatus::Draft.as_str(),
            ts.as_str(),
            ts.as_str()
        ],
    )
    .await?;
    let id = conn.last_insert_rowid();

    insert_audit(
        conn,
        &NewActivity::new(id, new.requestor_id, AuditAction::Created)
            .with_statuses(None, Some(RequestStatus::Draft))
            .with_changes(serde_json::json!({
                "title": new.title,
                "variant": new.variant.as_str(),
            })),
        now,
    )
    .await?;

    Ok(Request {
        id,
        title: new.title.clone(),
        description: new.description.clone(),
        requestor_id: new.requestor_id,
        assignee_id: new.assignee_id,
        variant: new.variant,
        status: RequestStatus::Draft,
        deviated_from: None,
        created_at: now,
        updated_at: now,
        authorized_at: None,
        completed_at: None,
    })
}

async fn reassign(
    conn: &libsql::Connection,
    request_id: i64,
    actor_id: i64,
    assignee_id: i64,
    now: DateTime<Utc>,
) -> Result<AuditEntry, DatabaseError> {
    let mut rows = conn
        .query("SELECT assignee_id FROM requests WHERE id = ?1", [request_id])
        .await?;
    let previous = match rows.next().await? {
        Some(row) => get_opt_i64(&row, 0)?,
        None => {
            return Err(DatabaseError::NotFound {
                entity: "request",
                id: request_id,
            });
        }
    };

    conn.execute(
        "UPDATE requests SET assignee_id = ?1, updated_at = ?2 WHERE id = ?3",
        libsql::params![assignee_id, format_datetime(now), request_id],
    )
    .await?;

    let detail = AssignedDetail {
        from: previous,
        to: assignee_id,
    };
    insert_audit(
        conn,
        &NewActivity::new(request_id, actor_id, AuditAction::Assigned)
            .with_changes(serde_json::to_value(&detail).map_err(|e| DatabaseError::Other(e.into()))?),
        now,
    )
    .await
}

impl XferService {
    /// Create a request in `draft` together with its `created` audit entry.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Core` for a blank title, or `DatabaseError`
    /// if the write fails.
    pub async fn create_request(&self, new: &NewRequest) -> Result<Request, DatabaseError> {
        if new.title.trim().is_empty() {
            return Err(CoreError::Validation("request title must not be empty".into()).into());
        }

        let now = self.now();
        let tx = self.db().conn().transaction().await?;
        match insert_request(&tx, new, now).await {
            Ok(request) => {
                tx.commit().await?;
                tracing::info!(request_id = request.id, variant = %request.variant, "request created");
                Ok(request)
            }
            Err(error) => {
                rollback_logged(tx).await;
                Err(error)
            }
        }
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or the row cannot be decoded.
    pub async fn get_request(&self, id: i64) -> Result<Option<Request>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM requests WHERE id = ?1"),
                [id],
            )
            .await?;

        rows.next().await?.map(|row| row_to_request(&row)).transpose()
    }

    /// Requests matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_requests(&self, filter: &RequestFilter) -> Result<Vec<Request>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(status) = filter.status {
            params.push(libsql::Value::Text(status.as_str().to_string()));
            conditions.push(format!("status = ?{}", params.len()));
        }
        if let Some(requestor_id) = filter.requestor_id {
            params.push(libsql::Value::Integer(requestor_id));
            conditions.push(format!("requestor_id = ?{}", params.len()));
        }
        if let Some(assignee_id) = filter.assignee_id {
            params.push(libsql::Value::Integer(assignee_id));
            conditions.push(format!("assignee_id = ?{}", params.len()));
        }
        if let Some(variant) = filter.variant {
            params.push(libsql::Value::Text(variant.as_str().to_string()));
            conditions.push(format!("variant = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let limit = filter.limit.unwrap_or_else(|| self.default_limit());
        let offset = filter.offset.unwrap_or(0);
        let sql = format!(
            "SELECT {SELECT_COLS} FROM requests {where_clause}
             ORDER BY created_at DESC, id DESC LIMIT {limit} OFFSET {offset}"
        );

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;

        let mut requests = Vec::new();
        while let Some(row) = rows.next().await? {
            requests.push(row_to_request(&row)?);
        }
        Ok(requests)
    }

    /// Requests matching `filter`, each with its progress.
    ///
    /// Progress is derived from the stored status alone, so this never
    /// reads the audit log.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_with_progress(
        &self,
        filter: &RequestFilter,
    ) -> Result<Vec<RequestSummary>, DatabaseError> {
        let requests = self.list_requests(filter).await?;
        Ok(requests
            .into_iter()
            .map(|request| {
                let progress = request.progress();
                if !progress.is_resolved() {
                    tracing::warn!(
                        request_id = request.id,
                        status = %request.status,
                        variant = %request.variant,
                        "status not in flow; progress reported as zero"
                    );
                }
                RequestSummary { request, progress }
            })
            .collect())
    }

    /// Assign a request and record an `assigned` activity.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` for an unknown request, or
    /// `DatabaseError` if the write fails.
    pub async fn assign_request(
        &self,
        request_id: i64,
        actor_id: i64,
        assignee_id: i64,
    ) -> Result<AuditEntry, DatabaseError> {
        let now = self.now();
        let tx = self.db().conn().transaction().await?;
        match reassign(&tx, request_id, actor_id, assignee_id, now).await {
            Ok(entry) => {
                tx.commit().await?;
                tracing::debug!(request_id, assignee_id, "request assigned");
                Ok(entry)
            }
            Err(error) => {
                rollback_logged(tx).await;
                Err(error)
            }
        }
    }
}
