use xfer_core::enums::{RequestStatus, TransferVariant};
use xfer_db::repos::request::RequestFilter;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ListArgs;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `xfer list`.
pub async fn handle(args: &ListArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let filter = request_filter(args, flags)?;
    let rows = ctx.service.list_with_progress(&filter).await?;
    output(&rows, flags.format)
}

/// Without `--limit` the service falls back to `general.default_limit`.
fn request_filter(args: &ListArgs, flags: &GlobalFlags) -> anyhow::Result<RequestFilter> {
    Ok(RequestFilter {
        status: args
            .status
            .as_deref()
            .map(|s| parse_enum::<RequestStatus>(s, "status"))
            .transpose()?,
        requestor_id: args.requestor,
        assignee_id: args.assignee,
        variant: args
            .variant
            .as_deref()
            .map(|v| parse_enum::<TransferVariant>(v, "variant"))
            .transpose()?,
        limit: flags.limit,
        offset: args.offset,
    })
}
