use xfer_core::enums::AuditAction;
use xfer_db::repos::audit::NewActivity;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ActivityArgs;
use crate::commands::shared::parse::{parse_enum, parse_json};
use crate::context::AppContext;
use crate::output::output;

/// Handle `xfer activity`.
pub async fn handle(
    args: &ActivityArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let action = parse_enum::<AuditAction>(&args.action, "action")?;
    if matches!(action, AuditAction::Created | AuditAction::StatusChanged) {
        anyhow::bail!("'{action}' entries are written by create and transition, not activity");
    }

    let activity = NewActivity {
        changes: parse_json(args.changes.as_deref(), "changes")?,
        notes: args.notes.clone(),
        ..NewActivity::new(args.id, args.actor, action)
    };

    let entry = ctx.service.append_activity(&activity).await?;
    output(&entry, flags.format)
}
