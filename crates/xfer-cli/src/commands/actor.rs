use crate::cli::GlobalFlags;
use crate::cli::subcommands::ActorCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `xfer actor`.
pub async fn handle(
    action: &ActorCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ActorCommands::Add { name, role } => {
            let actor = ctx.service.register_actor(name, role.as_deref()).await?;
            output(&actor, flags.format)
        }
        ActorCommands::Get { id } => {
            let Some(actor) = ctx.service.get_actor(*id).await? else {
                anyhow::bail!("actor {id} not found");
            };
            output(&actor, flags.format)
        }
    }
}
