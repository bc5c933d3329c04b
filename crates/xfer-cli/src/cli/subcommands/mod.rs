mod actor;

pub use actor::ActorCommands;
