//! Progress calculator.
//!
//! Derives step counts and percent complete from a request's current status,
//! without touching history. Cheap enough to run for every row of a list.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{RequestStatus, TransferVariant};
use crate::flow::resolve_flow;

/// Position of a request in its resolved flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Progress {
    /// 1-based step of the current status; 0 when the status is not in the flow.
    pub current_step: u32,
    pub total_steps: u32,
    /// Rounded percentage, 0 to 100.
    pub percent: u32,
    pub is_terminal: bool,
}

impl Progress {
    /// Whether the current status was located in its flow.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.current_step > 0
    }
}

/// Compute progress for a request from its variant and status.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss, clippy::cast_sign_loss)]
pub fn compute_progress(
    variant: TransferVariant,
    status: RequestStatus,
    deviated_from: Option<RequestStatus>,
) -> Progress {
    let flow = resolve_flow(variant, status, deviated_from);
    let total_steps = flow.len() as u32;
    let current_step = flow.position(status).map_or(0, |index| index as u32 + 1);

    let percent = if current_step == 0 || total_steps == 0 {
        0
    } else {
        (f64::from(current_step) / f64::from(total_steps) * 100.0).round() as u32
    };

    Progress {
        current_step,
        total_steps,
        percent,
        is_terminal: status.is_terminal(),
    }
}
