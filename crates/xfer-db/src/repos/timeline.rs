//! Timeline loading.
//!
//! Gathers a request, its audit log and the names of everyone in it, then
//! hands them to the pure replay in `xfer_core::timeline`.

use std::collections::BTreeSet;

use xfer_core::timeline::{TimelineResult, reconstruct};

use crate::error::DatabaseError;
use crate::service::XferService;

impl XferService {
    /// Reconstruct the timeline of a request.
    ///
    /// Returns `Ok(None)` when the request does not exist. Reads only.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a query fails or a row cannot be decoded.
    pub async fn get_timeline(
        &self,
        request_id: i64,
    ) -> Result<Option<TimelineResult>, DatabaseError> {
        let Some(request) = self.get_request(request_id).await? else {
            return Ok(None);
        };

        let entries = self.list_audit_for_request(request_id).await?;
        let actor_ids: Vec<i64> = entries
            .iter()
            .map(|e| e.actor_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let names = self.actor_names(&actor_ids).await?;

        let timeline = reconstruct(&request, entries, &names, self.now());
        if !timeline.progress.is_resolved() {
            tracing::warn!(
                request_id,
                status = %request.status,
                variant = %request.variant,
                "status not in flow; timeline shows every stage pending"
            );
        }
        Ok(Some(timeline))
    }
}
