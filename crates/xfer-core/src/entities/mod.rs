//! Entity structs for the xfer domain.
//!
//! Each entity maps to a table in the libSQL database (see
//! `xfer-db/migrations/001_initial.sql`). All structs derive `Serialize`,
//! `Deserialize`, and `JsonSchema` for JSON output and schema validation.

mod actor;
mod audit;
mod request;

pub use actor::Actor;
pub use audit::{AuditEntry, AuditEvent};
pub use request::Request;
