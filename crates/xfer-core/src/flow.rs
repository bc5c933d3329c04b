//! Status flow registry.
//!
//! Maps a request variant to its canonical ordered stages and resolves the
//! flow a request is actually on, truncating it when the request left the
//! pipeline through a terminal deviation (`rejected`, `cancelled`).
//!
//! ```text
//! standard / low_to_high   draft → submitted → dta → sme → issm → approved → media
//!                          → in_progress → verified → completed → disposed      (11)
//! high_to_low              same, with dao authorization after issm              (12)
//! ```

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{RequestStatus, TransferVariant};

use crate::enums::RequestStatus::{
    Approved, Completed, Disposed, Draft, MediaIssued, PendingDaoAuthorization,
    PendingDtaReview, PendingIssmApproval, PendingSmeReview, Submitted, TransferInProgress,
    TransferVerified,
};

const STANDARD_FLOW: &[RequestStatus] = &[
    Draft,
    Submitted,
    PendingDtaReview,
    PendingSmeReview,
    PendingIssmApproval,
    Approved,
    MediaIssued,
    TransferInProgress,
    TransferVerified,
    Completed,
    Disposed,
];

const ELEVATED_FLOW: &[RequestStatus] = &[
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
];

/// Position a deviation takes when nothing says where it happened: right
/// after the origin, so no review stage is claimed as reached.
const DEFAULT_DEVIATION_POINT: usize = 1;

/// The nominal template for a variant.
#[must_use]
pub const fn template(variant: TransferVariant) -> &'static [RequestStatus] {
    match variant {
        TransferVariant::Standard | TransferVariant::LowToHigh => STANDARD_FLOW,
        TransferVariant::HighToLow => ELEVATED_FLOW,
    }
}

/// An ordered, duplicate-free sequence of statuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct StatusFlow(Vec<RequestStatus>);

impl StatusFlow {
    #[must_use]
    pub fn position(&self, status: RequestStatus) -> Option<usize> {
        self.0.iter().position(|s| *s == status)
    }

    #[must_use]
    pub fn contains(&self, status: RequestStatus) -> bool {
        self.0.contains(&status)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[RequestStatus] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = RequestStatus> + '_ {
        self.0.iter().copied()
    }

    /// The first status of the flow, where every request starts.
    #[must_use]
    pub fn origin(&self) -> Option<RequestStatus> {
        self.0.first().copied()
    }
}

/// Locate where in the variant's template a terminal deviation happened.
///
/// Lookup order:
/// 1. `deviated_from`, when it is a stage of the template;
/// 2. the deviation's own position in the elevated template, then in the
///    variant's template (deviations are normally in neither);
/// 3. [`DEFAULT_DEVIATION_POINT`].
///
/// The returned index is the stage the deviation replaces. Returns `None`
/// when `status` is not a terminal deviation.
#[must_use]
pub fn deviation_point(
    variant: TransferVariant,
    status: RequestStatus,
    deviated_from: Option<RequestStatus>,
) -> Option<usize> {
    if !status.is_terminal_deviation() {
        return None;
    }
    let nominal = template(variant);

    let recorded = deviated_from.and_then(|from| nominal.iter().position(|s| *s == from));
    let listed = || {
        ELEVATED_FLOW
            .iter()
            .position(|s| *s == status)
            .or_else(|| nominal.iter().position(|s| *s == status))
    };

    let point = recorded
        .or_else(listed)
        .unwrap_or(DEFAULT_DEVIATION_POINT);
    Some(point.min(nominal.len().saturating_sub(1)))
}

/// Resolve the flow a request with `status` is on.
///
/// - A status on the variant's template yields the whole template.
/// - A terminal deviation yields the template stages strictly before the
///   deviation point, followed by the deviation itself.
/// - Anything else yields the whole template; callers see the status as
///   not found in it.
#[must_use]
pub fn resolve_flow(
    variant: TransferVariant,
    status: RequestStatus,
    deviated_from: Option<RequestStatus>,
) -> StatusFlow {
    let nominal = template(variant);
    if nominal.contains(&status) {
        return StatusFlow(nominal.to_vec());
    }

    match deviation_point(variant, status, deviated_from) {
        Some(point) => {
            let mut statuses = nominal[..point].to_vec();
            statuses.push(status);
            StatusFlow(statuses)
        }
        None => StatusFlow(nominal.to_vec()),
    }
}

/// Template stages after a deviation point. The timeline lists them as skipped.
#[must_use]
pub fn skipped_tail(variant: TransferVariant, point: usize) -> &'static [RequestStatus] {
    let nominal = template(variant);
    nominal.get(point + 1..).unwrap_or(&[])
}
