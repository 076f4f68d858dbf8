//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers via
//! the `State` extractor.
//!
//! The in-memory stores are the serving copy. When a database pool is
//! configured, writes go through to PostgreSQL and the stores are hydrated
//! from it at startup; without a pool the service runs in-memory only.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use sqlx::PgPool;
use upkeep_core::{Asset, Clock, Notification, SystemClock, Violation};
use uuid::Uuid;

// -- Generic In-Memory Store --------------------------------------------------

/// Thread-safe, cloneable in-memory key-value store.
///
/// All operations are synchronous (the RwLock is `parking_lot`, not
/// `tokio::sync`) because the lock is never held across `.await` points.
/// `parking_lot::RwLock` is non-poisonable — a panicking writer does not
/// permanently corrupt the store.
#[derive(Debug)]
pub struct Store<T: Clone + Send + Sync> {
    data: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Clone + Send + Sync> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<T: Clone + Send + Sync> Store<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a record, returning the previous value if the key existed.
    pub fn insert(&self, id: Uuid, value: T) -> Option<T> {
        self.data.write().insert(id, value)
    }

    /// Retrieve a record by ID.
    pub fn get(&self, id: &Uuid) -> Option<T> {
        self.data.read().get(id).cloned()
    }

    /// List all records (unordered).
    pub fn list(&self) -> Vec<T> {
        self.data.read().values().cloned().collect()
    }

    /// Remove a record by ID.
    pub fn remove(&self, id: &Uuid) -> Option<T> {
        self.data.write().remove(id)
    }

    /// Check if a record exists.
    #[allow(dead_code)]
    pub fn contains(&self, id: &Uuid) -> bool {
        self.data.read().contains_key(id)
    }

    /// Return the number of records.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store is empty.
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + Send + Sync> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

// -- Application State --------------------------------------------------------

/// Application configuration, read from the environment in `main`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

/// Shared application state accessible to all route handlers.
///
/// Clone-friendly via `Arc` internals in each `Store`. The clock is an
/// injected capability so tests can pin and advance time.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Assets under upkeep tracking.
    pub assets: Store<Asset>,
    /// Notifications recorded by check runs.
    pub notifications: Store<Notification>,
    /// Violations recorded by check runs.
    pub violations: Store<Violation>,

    /// Time source for request handling and check runs.
    pub clock: Arc<dyn Clock>,

    /// Serializes `run_checks` invocations: the whole
    /// read-evaluate-stage-commit sequence runs under this lock, so two
    /// concurrent runs cannot both pass the dedup check for the same key.
    /// `tokio::sync::Mutex` because the guard is held across the commit
    /// `.await`.
    pub check_lock: Arc<tokio::sync::Mutex<()>>,

    /// PostgreSQL connection pool for durable persistence.
    /// `None` means in-memory-only mode.
    pub db_pool: Option<PgPool>,

    /// Application configuration.
    pub config: AppConfig,
}

impl AppState {
    /// Create a new application state with default configuration, the
    /// system clock, and no database pool.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default(), None)
    }

    /// Create a new application state with the given configuration and
    /// optional database pool.
    pub fn with_config(config: AppConfig, db_pool: Option<PgPool>) -> Self {
        Self::with_clock_and_config(Arc::new(SystemClock), config, db_pool)
    }

    /// Create a new application state with an injected clock. Used by tests
    /// that need deterministic time.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::with_clock_and_config(clock, AppConfig::default(), None)
    }

    /// Fully explicit constructor.
    pub fn with_clock_and_config(
        clock: Arc<dyn Clock>,
        config: AppConfig,
        db_pool: Option<PgPool>,
    ) -> Self {
        Self {
            assets: Store::new(),
            notifications: Store::new(),
            violations: Store::new(),
            clock,
            check_lock: Arc::new(tokio::sync::Mutex::new(())),
            db_pool,
            config,
        }
    }

    /// Look up an asset by name. Names are unique across live assets, so at
    /// most one record can match.
    ///
    /// Linear scan over the in-memory snapshot — fine at the intended scale,
    /// same boundary as the full-table scan in the check run.
    pub fn asset_by_name(&self, name: &str) -> Option<Asset> {
        self.assets
            .list()
            .into_iter()
            .find(|a| a.name.as_str() == name)
    }

    /// Hydrate in-memory stores from the database.
    ///
    /// Called once on startup when a database pool is available, so that
    /// read operations stay fast and synchronous afterwards.
    pub async fn hydrate_from_db(&self) -> Result<(), String> {
        let pool = match &self.db_pool {
            Some(pool) => pool,
            None => return Ok(()),
        };

        let assets = crate::db::assets::load_all(pool)
            .await
            .map_err(|e| format!("failed to load assets: {e}"))?;
        let asset_count = assets.len();
        for record in assets {
            self.assets.insert(record.id, record);
        }

        let notifications = crate::db::notifications::load_all(pool)
            .await
            .map_err(|e| format!("failed to load notifications: {e}"))?;
        let notification_count = notifications.len();
        for record in notifications {
            self.notifications.insert(record.id, record);
        }

        let violations = crate::db::violations::load_all(pool)
            .await
            .map_err(|e| format!("failed to load violations: {e}"))?;
        let violation_count = violations.len();
        for record in violations {
            self.violations.insert(record.id, record);
        }

        tracing::info!(
            assets = asset_count,
            notifications = notification_count,
            violations = violation_count,
            "Hydrated in-memory stores from database"
        );

        Ok(())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
