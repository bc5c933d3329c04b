//! Actor display-name lookup.
//!
//! Used opportunistically by the timeline engine; a missing name falls back
//! to the stage's default party and is never an error.

use std::collections::HashMap;

/// Resolves actor ids to display names.
pub trait ActorDirectory {
    fn display_name(&self, actor_id: i64) -> Option<String>;
}

impl ActorDirectory for HashMap<i64, String> {
    fn display_name(&self, actor_id: i64) -> Option<String> {
        self.get(&actor_id).cloned()
    }
}

/// A directory that knows nobody.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDirectory;

impl ActorDirectory for NoDirectory {
    fn display_name(&self, _actor_id: i64) -> Option<String> {
        None
    }
}
