use clap::Subcommand;

/// Actor directory commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ActorCommands {
    /// Register an actor.
    Add {
        /// Display name shown on timelines.
        name: String,
        #[arg(long)]
        role: Option<String>,
    },
    /// Get an actor by ID.
    Get { id: i64 },
}
