use crate::cli::GlobalFlags;
use crate::cli::root_commands::TimelineArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `xfer timeline`.
pub async fn handle(
    args: &TimelineArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let Some(timeline) = ctx.service.get_timeline(args.id).await? else {
        anyhow::bail!("request {} not found", args.id);
    };
    output(&timeline, flags.format)
}
