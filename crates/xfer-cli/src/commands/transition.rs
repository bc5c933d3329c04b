use xfer_core::enums::RequestStatus;
use xfer_db::repos::transition::TransitionRequest;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::TransitionArgs;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `xfer transition`.
pub async fn handle(
    args: &TransitionArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let req = TransitionRequest {
        to: parse_enum::<RequestStatus>(&args.status, "status")?,
        expected: args
            .expected
            .as_deref()
            .map(|s| parse_enum::<RequestStatus>(s, "expected status"))
            .transpose()?,
        notes: args.notes.clone(),
    };

    let outcome = ctx
        .service
        .try_transition_status(args.id, args.actor, &req)
        .await?;
    output(&outcome, flags.format)
}
