//! Repository modules for requests, the audit log and the actor directory.
//!
//! Each module adds methods to `XferService` via `impl XferService` blocks.

pub mod actor;
pub mod audit;
pub mod request;
pub mod timeline;
pub mod transition;
