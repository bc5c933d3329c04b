use xfer_core::enums::AuditAction;
use xfer_db::repos::audit::AuditFilter;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AuditArgs;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `xfer audit`.
pub async fn handle(args: &AuditArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let filter = AuditFilter {
        request_id: args.request,
        actor_id: args.actor,
        action: args
            .action
            .as_deref()
            .map(|a| parse_enum::<AuditAction>(a, "action"))
            .transpose()?,
        limit: flags.limit,
    };

    let entries = ctx.service.query_audit(&filter).await?;
    output(&entries, flags.format)
}
