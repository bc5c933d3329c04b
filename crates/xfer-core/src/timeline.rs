//! Timeline reconstruction engine.
//!
//! Replays a request's audit history against its resolved status flow and
//! classifies every stage. The replay is a pure function of the request, its
//! entries, the actor directory and `now`; loading lives in `xfer-db`.
//!
//! Mapping rules:
//! - the `Created` entry (or, for logs that predate it, the first entry)
//!   represents the flow's origin stage;
//! - every later `StatusChanged` entry represents its target stage, and a
//!   stage reached twice keeps the later entry.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::directory::ActorDirectory;
use crate::entities::{AuditEntry, AuditEvent, Request};
use crate::enums::{RequestStatus, StepState, TransferVariant};
use crate::flow::{deviation_point, resolve_flow, skipped_tail, template};
use crate::progress::{Progress, compute_progress};

/// One stage on a reconstructed timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TimelineStep {
    pub status: RequestStatus,
    pub title: String,
    pub description: String,
    pub state: StepState,
    /// When the stage was (last) reached.
    pub timestamp: Option<DateTime<Utc>>,
    pub assigned_to: String,
    pub notes: Option<String>,
    pub duration_hours: Option<f64>,
}

/// Full timeline for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TimelineResult {
    pub request_id: i64,
    pub variant: TransferVariant,
    pub current_status: RequestStatus,
    pub progress: Progress,
    pub steps: Vec<TimelineStep>,
    pub audit_entries: Vec<AuditEntry>,
    pub estimated_completion: Option<DateTime<Utc>>,
    pub actual_completion: Option<DateTime<Utc>>,
}

impl TimelineResult {
    /// The step for `status`, if it is on the timeline.
    #[must_use]
    pub fn step(&self, status: RequestStatus) -> Option<&TimelineStep> {
        self.steps.iter().find(|s| s.status == status)
    }
}

/// Rebuild the timeline of `request` from its audit `entries`.
///
/// Entries are replayed in `(created_at, id)` order whatever order they
/// arrive in.
#[must_use]
pub fn reconstruct(
    request: &Request,
    mut entries: Vec<AuditEntry>,
    directory: &dyn ActorDirectory,
    now: DateTime<Utc>,
) -> TimelineResult {
    entries.sort_by_key(|e| (e.created_at, e.id));
    for entry in &mut entries {
        if entry.actor_name.is_none() {
            entry.actor_name = directory.display_name(entry.actor_id);
        }
    }

    let status = request.status;
    let deviated_from = request
        .deviated_from
        .or_else(|| deviation_source(&entries, status));

    let flow = resolve_flow(request.variant, status, deviated_from);
    let current_index = flow.position(status);
    let representatives = map_representatives(&entries, request);

    let mut stages: Vec<RequestStatus> = flow.iter().collect();
    if let Some(point) = deviation_point(request.variant, status, deviated_from) {
        stages.extend_from_slice(skipped_tail(request.variant, point));
    }

    let steps = stages
        .iter()
        .enumerate()
        .map(|(i, &stage)| {
            let entry = representatives.get(&stage).map(|&idx| (idx, &entries[idx]));
            TimelineStep {
                status: stage,
                title: stage.title().to_string(),
                description: stage.description().to_string(),
                state: classify(i, stage, current_index, status),
                timestamp: entry.map(|(_, e)| e.created_at),
                assigned_to: entry
                    .and_then(|(_, e)| e.actor_name.clone())
                    .unwrap_or_else(|| stage.default_party().to_string()),
                notes: entry.and_then(|(_, e)| e.notes.clone()),
                duration_hours: entry
                    .and_then(|(idx, _)| stage_duration(&entries, idx, stage, status, now)),
            }
        })
        .collect();

    let estimated_completion = match current_index {
        Some(index) => {
            let hours: u32 = flow.as_slice()[index..]
                .iter()
                .map(|s| s.average_hours())
                .sum();
            Some(now + Duration::hours(i64::from(hours)))
        }
        None => None,
    };

    TimelineResult {
        request_id: request.id,
        variant: request.variant,
        current_status: status,
        progress: compute_progress(request.variant, status, deviated_from),
        steps,
        audit_entries: entries,
        estimated_completion,
        actual_completion: request.completed_at,
    }
}

/// Map each stage to the index of the entry that represents it.
fn map_representatives(entries: &[AuditEntry], request: &Request) -> HashMap<RequestStatus, usize> {
    let mut map = HashMap::new();

    let origin = entries
        .iter()
        .position(|e| matches!(e.event, AuditEvent::Created { .. }))
        .or_else(|| (!entries.is_empty()).then_some(0));

    if let (Some(idx), Some(&origin_status)) = (origin, template(request.variant).first()) {
        map.insert(origin_status, idx);
    }

    for (idx, entry) in entries.iter().enumerate() {
        if Some(idx) == origin {
            continue;
        }
        if let AuditEvent::StatusChanged { to, .. } = entry.event {
            map.insert(to, idx);
        }
    }
    map
}

/// The status a request left when it entered `status`, per the log.
fn deviation_source(entries: &[AuditEntry], status: RequestStatus) -> Option<RequestStatus> {
    if !status.is_terminal_deviation() {
        return None;
    }
    entries.iter().rev().find_map(|e| match e.event {
        AuditEvent::StatusChanged { from, to } if to == status => from,
        _ => None,
    })
}

fn classify(
    index: usize,
    stage: RequestStatus,
    current_index: Option<usize>,
    status: RequestStatus,
) -> StepState {
    let position = current_index.map(|current| index.cmp(&current));

    if status.is_terminal_deviation() {
        if stage == status {
            return StepState::Error;
        }
        if position == Some(Ordering::Greater) {
            return StepState::Skipped;
        }
    }

    match position {
        Some(Ordering::Less) => StepState::Completed,
        Some(Ordering::Equal) => StepState::Current,
        Some(Ordering::Greater) | None => StepState::Pending,
    }
}

/// Hours spent in `stage`, measured from its representative entry.
///
/// Runs to the next transition anywhere in the log; the current stage,
/// terminal or not, runs to `now`.
fn stage_duration(
    entries: &[AuditEntry],
    idx: usize,
    stage: RequestStatus,
    status: RequestStatus,
    now: DateTime<Utc>,
) -> Option<f64> {
    let start = entries[idx].created_at;
    let next = entries[idx + 1..]
        .iter()
        .find(|e| e.event.is_transition())
        .map(|e| e.created_at);

    match next {
        Some(end) => Some(hours_between(start, end)),
        None if stage == status => Some(hours_between(start, now)),
        None => None,
    }
}

#[allow(clippy::cast_precision_loss)]
fn hours_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_milliseconds() as f64 / 3_600_000.0
}
