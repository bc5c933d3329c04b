use xfer_core::enums::TransferVariant;
use xfer_db::repos::request::NewRequest;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::CreateArgs;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `xfer create`.
pub async fn handle(args: &CreateArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let new = NewRequest {
        title: args.title.clone(),
        description: args.description.clone(),
        requestor_id: args.requestor,
        assignee_id: args.assignee,
        variant: parse_enum::<TransferVariant>(&args.variant, "variant")?,
    };

    let request = ctx.service.create_request(&new).await?;
    output(&request, flags.format)
}
