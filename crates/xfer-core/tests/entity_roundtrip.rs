//! Serde roundtrip and JsonSchema validation tests for entity and result types.

use chrono::{DateTime, Utc};
use schemars::schema_for;
use xfer_core::audit_detail::{AssignedDetail, MediaDetail, ScanRecordedDetail, StatusChangedDetail};
use xfer_core::directory::NoDirectory;
use xfer_core::entities::*;
use xfer_core::enums::*;
use xfer_core::progress::{Progress, compute_progress};
use xfer_core::timeline::{TimelineResult, reconstruct};

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

fn ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

fn sample_request() -> Request {
    Request {
        id: 42,
        title: "Quarterly sensor logs".into(),
        description: Some("Move the Q1 logs to the analysis enclave".into()),
        requestor_id: 3,
        assignee_id: Some(5),
        variant: TransferVariant::HighToLow,
        status: RequestStatus::PendingSmeReview,
        deviated_from: None,
        created_at: ts("2026-01-05T10:00:00Z"),
        updated_at: ts("2026-01-06T12:30:00Z"),
        authorized_at: None,
        completed_at: None,
    }
}

fn sample_entries() -> Vec<AuditEntry> {
    vec![
        AuditEntry {
            id: 1,
            request_id: 42,
            actor_id: 3,
            actor_name: Some("Requestor Three".into()),
            action: AuditAction::Created,
            event: AuditEvent::Created {
                status: RequestStatus::Draft,
            },
            changes: None,
            notes: None,
            created_at: ts("2026-01-05T10:00:00Z"),
        },
        AuditEntry {
            id: 2,
            request_id: 42,
            actor_id: 3,
            actor_name: None,
            action: AuditAction::StatusChanged,
            event: AuditEvent::StatusChanged {
                from: Some(RequestStatus::Draft),
                to: RequestStatus::Submitted,
            },
            changes: Some(serde_json::json!({"from": "draft", "to": "submitted", "reason": null})),
            notes: Some("Ready for review".into()),
            created_at: ts("2026-01-05T11:00:00Z"),
        },
        AuditEntry {
            id: 3,
            request_id: 42,
            actor_id: 5,
            actor_name: None,
            action: AuditAction::ScanRecorded,
            event: AuditEvent::Activity,
            changes: Some(serde_json::json!({"scanner": "av-1", "files_scanned": 12, "clean": true})),
            notes: None,
            created_at: ts("2026-01-05T12:00:00Z"),
        },
    ]
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            // Serde roundtrip
            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            // Schema validation
            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

roundtrip_and_validate!(request_roundtrip, Request, sample_request());

roundtrip_and_validate!(
    rejected_request_roundtrip,
    Request,
    Request {
        status: RequestStatus::Rejected,
        deviated_from: Some(RequestStatus::PendingSmeReview),
        ..sample_request()
    }
);

roundtrip_and_validate!(
    actor_roundtrip,
    Actor,
    Actor {
        id: 5,
        display_name: "Dana Whitfield".into(),
        role: Some("transfer_agent".into()),
        created_at: ts("2025-12-01T00:00:00Z"),
    }
);

roundtrip_and_validate!(
    audit_entries_roundtrip,
    Vec<AuditEntry>,
    sample_entries()
);

roundtrip_and_validate!(
    progress_roundtrip,
    Progress,
    compute_progress(TransferVariant::Standard, RequestStatus::Approved, None)
);

roundtrip_and_validate!(
    timeline_roundtrip,
    TimelineResult,
    reconstruct(
        &sample_request(),
        sample_entries(),
        &NoDirectory,
        ts("2026-01-06T12:30:00Z"),
    )
);

roundtrip_and_validate!(
    status_changed_detail_roundtrip,
    StatusChangedDetail,
    StatusChangedDetail {
        from: RequestStatus::PendingIssmApproval,
        to: RequestStatus::Rejected,
        reason: Some("Missing classification review".into()),
    }
);

roundtrip_and_validate!(
    assigned_detail_roundtrip,
    AssignedDetail,
    AssignedDetail { from: None, to: 5 }
);

roundtrip_and_validate!(
    media_detail_roundtrip,
    MediaDetail,
    MediaDetail {
        media_id: "DVD-0192".into(),
        media_type: "dvd_r".into(),
    }
);

roundtrip_and_validate!(
    scan_detail_roundtrip,
    ScanRecordedDetail,
    ScanRecordedDetail {
        scanner: "av-1".into(),
        files_scanned: 12,
        clean: true,
    }
);
