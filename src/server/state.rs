//! Application state shared across all request handlers.
//!
//! This module defines the `AppState` struct which holds the process-wide resources
//! constructed at startup: the immutable configuration and the datastore connection
//! pool. The state is handed explicitly to the router composer and, through
//! `Router<AppState>`, to every feature router.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::server::{config::Config, fault::TaskSupervisor};

/// Application state containing shared resources and dependencies.
///
/// All fields use cheap-to-clone types:
/// - `DatabaseConnection` is a connection pool (clones share the pool)
/// - `Arc<Config>` is a reference-counted pointer to the immutable configuration
/// - `TaskSupervisor` wraps a channel sender
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool for accessing persistent storage.
    ///
    /// Shared read/write by all concurrent requests with no application-level locking;
    /// consistency of concurrent writes is left to the store.
    pub db: DatabaseConnection,

    /// Configuration resolved once at startup.
    pub config: Arc<Config>,

    /// Spawner for background work that nobody awaits.
    ///
    /// Feature routers must use this instead of `tokio::spawn` so that a failed
    /// background operation is reported and terminates the process.
    pub supervisor: TaskSupervisor,
}

impl AppState {
    /// Creates a new application state with the provided dependencies.
    ///
    /// # Arguments
    /// - `db` - Database connection pool
    /// - `config` - Validated process configuration
    /// - `supervisor` - Background task supervisor
    ///
    /// # Returns
    /// - `AppState` - Initialized application state ready for use
    pub fn new(db: DatabaseConnection, config: Config, supervisor: TaskSupervisor) -> Self {
        Self {
            db,
            config: Arc::new(config),
            supervisor,
        }
    }
}
