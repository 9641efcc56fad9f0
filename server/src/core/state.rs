//! Server state
//!
//! [`ServerState`] holds the shared handles every request needs. It is a
//! cheap `Clone` (everything inside is a shallow reference).

use dashmap::DashMap;
use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::core::Config;
use crate::db::{DbService, seed};

/// Keyed async leases closing the check-then-insert race.
///
/// Allocation acquires the lease for a candidate room (and staff member)
/// before re-checking overlaps and inserting, so two concurrent requests
/// for the same slot serialize instead of both passing the snapshot check.
#[derive(Debug, Default)]
pub struct LeaseRegistry {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl LeaseRegistry {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Acquire the lease for a key, waiting if another request holds it
    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = self.locks.entry(key.to_string()).or_default().clone();
        lock.lock_owned().await
    }
}

/// Shared server state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
    /// Room/staff allocation leases
    pub leases: Arc<LeaseRegistry>,
}

impl ServerState {
    pub fn new(config: Config, db: Surreal<Db>) -> Self {
        Self {
            config,
            db,
            leases: Arc::new(LeaseRegistry::new()),
        }
    }

    /// Initialize server state: open the database and seed the default
    /// venue configuration
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        let db_service = DbService::new(&config.database_dir()).await?;
        let state = Self::new(config.clone(), db_service.db);

        seed::seed_defaults(&state.db)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to seed defaults: {e}"))?;

        Ok(state)
    }

    /// Database handle
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }
}
