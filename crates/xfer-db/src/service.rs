//! Service layer orchestrating request mutations with the audit log.
//!
//! `XferService` wraps `XferDb` (raw database access) and the clock every
//! write and every timeline read is stamped with. All repo methods are
//! implemented as `impl XferService`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use xfer_config::XferConfig;
use xfer_core::clock::{Clock, SystemClock};

use crate::XferDb;
use crate::error::DatabaseError;

/// Orchestrates request mutations and their audit entries.
///
/// Every mutation method follows this protocol:
/// 1. Begin transaction
/// 2. Execute SQL
/// 3. Append audit entry (inside transaction)
/// 4. Commit transaction
pub struct XferService {
    db: XferDb,
    clock: Arc<dyn Clock>,
    default_limit: u32,
}

/// Page size used when neither the caller nor config sets one.
const DEFAULT_LIMIT: u32 = 20;

impl XferService {
    /// Create a new service wrapping a local database, stamped by the system clock.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the libSQL database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = XferDb::open_local(db_path).await?;
        Ok(Self::from_db(db, Arc::new(SystemClock)))
    }

    /// Create a service from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the configured database cannot be opened.
    pub async fn from_config(config: &XferConfig) -> Result<Self, DatabaseError> {
        let db = XferDb::open(&config.database).await?;
        Ok(Self::from_db(db, Arc::new(SystemClock)).with_default_limit(config.general.default_limit))
    }

    /// Create from an existing `XferDb` and clock (for testing).
    #[must_use]
    pub fn from_db(db: XferDb, clock: Arc<dyn Clock>) -> Self {
        Self {
            db,
            clock,
            default_limit: DEFAULT_LIMIT,
        }
    }

    /// Override the page size used by list queries without an explicit limit.
    #[must_use]
    pub const fn with_default_limit(mut self, limit: u32) -> Self {
        self.default_limit = limit;
        self
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &XferDb {
        &self.db
    }

    /// Current time according to the injected clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    #[must_use]
    pub const fn default_limit(&self) -> u32 {
        self.default_limit
    }
}
