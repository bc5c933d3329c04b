use clap::{Args, Subcommand};

use crate::cli::subcommands::ActorCommands;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Create a transfer request in draft.
    Create(CreateArgs),
    /// Show the reconstructed timeline of a request.
    Timeline(TimelineArgs),
    /// List requests with progress, newest first.
    List(ListArgs),
    /// Move a request to a new status.
    Transition(TransitionArgs),
    /// Record an activity on a request.
    Activity(ActivityArgs),
    /// Assign a request.
    Assign(AssignArgs),
    /// Query the audit log.
    Audit(AuditArgs),
    /// Actor directory.
    Actor {
        #[command(subcommand)]
        action: ActorCommands,
    },
}

#[derive(Clone, Debug, Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub description: Option<String>,
    /// Actor ID of the requestor.
    #[arg(long)]
    pub requestor: i64,
    #[arg(long)]
    pub assignee: Option<i64>,
    /// standard, low_to_high, high_to_low
    #[arg(long, default_value = "standard")]
    pub variant: String,
}

#[derive(Clone, Debug, Args)]
pub struct TimelineArgs {
    pub id: i64,
}

#[derive(Clone, Debug, Args)]
pub struct ListArgs {
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub requestor: Option<i64>,
    #[arg(long)]
    pub assignee: Option<i64>,
    #[arg(long)]
    pub variant: Option<String>,
    #[arg(long)]
    pub offset: Option<u32>,
}

#[derive(Clone, Debug, Args)]
pub struct TransitionArgs {
    pub id: i64,
    /// Target status.
    pub status: String,
    /// Actor performing the transition.
    #[arg(long)]
    pub actor: i64,
    /// Status the request must currently be in.
    #[arg(long)]
    pub expected: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct ActivityArgs {
    pub id: i64,
    /// Audit action, e.g. commented, scan_recorded.
    pub action: String,
    #[arg(long)]
    pub actor: i64,
    #[arg(long)]
    pub notes: Option<String>,
    /// JSON change payload.
    #[arg(long)]
    pub changes: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct AssignArgs {
    pub id: i64,
    pub assignee: i64,
    #[arg(long)]
    pub actor: i64,
}

#[derive(Clone, Debug, Args)]
pub struct AuditArgs {
    #[arg(long)]
    pub request: Option<i64>,
    #[arg(long)]
    pub actor: Option<i64>,
    #[arg(long)]
    pub action: Option<String>,
}
