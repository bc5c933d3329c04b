use crate::cli::GlobalFlags;
use crate::cli::root_commands::AssignArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `xfer assign`.
pub async fn handle(args: &AssignArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let entry = ctx
        .service
        .assign_request(args.id, args.actor, args.assignee)
        .await?;
    output(&entry, flags.format)
}
