use std::net::SocketAddr;

use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use time::Duration;
use tokio::net::TcpListener;
use tower_sessions::{
    cookie::SameSite, service::SignedCookie, session_store::ExpiredDeletion, Expiry,
    SessionManagerLayer,
};
use tower_sessions_sqlx_store::SqliteStore;
use tracing_subscriber::EnvFilter;

use crate::server::{
    config::Config, data::session_activity::SessionActivityRepository, error::AppError,
    fault::TaskSupervisor,
};

/// Session layer used by the pipeline: SQLite-backed records behind a signed cookie.
pub type SessionLayer = SessionManagerLayer<SqliteStore, SignedCookie>;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE_NAME: &str = "dialdesk.sid";

/// How often expired session records are purged from the store.
const EXPIRED_SESSION_SWEEP: std::time::Duration = std::time::Duration::from_secs(60 * 60);

/// Default log filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info,sqlx=warn";

/// Initialises the global tracing subscriber.
///
/// Log lines carry a timestamp, level, target, message and structured fields. The filter
/// comes from `RUST_LOG`, falling back to `info`.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Connects to the Sqlite database and runs pending migrations.
///
/// Establishes a connection pool to the Sqlite database using the connection string from
/// configuration, then automatically runs all pending SeaORM migrations to ensure the database
/// schema is up-to-date. This function must complete successfully before the listener is bound.
///
/// # Arguments
/// - `config` - Application configuration containing the database URL
///
/// # Returns
/// - `Ok(DatabaseConnection)` - Connected database with migrations applied
/// - `Err(AppError::DbErr(_))` - Failed to connect to database or run migrations
pub async fn connect_to_database(config: &Config) -> Result<DatabaseConnection, AppError> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    tracing::info!("Database connected successfully");

    Ok(db)
}

/// Creates the session store on the shared pool and the session layer wrapping it.
///
/// The session table lives in the same database as the application tables. Cookies are
/// signed with a key derived from the session secret, are `HttpOnly`, and expire after the
/// configured period of inactivity.
///
/// # Arguments
/// - `db` - Connected database whose pool the session store shares
/// - `config` - Application configuration with the session secret and expiry
///
/// # Returns
/// - `Ok((SessionLayer, SqliteStore))` - Layer for the pipeline and the store for housekeeping
/// - `Err(AppError)` - Failed to migrate the session table or derive the signing key
pub async fn connect_to_session(
    db: &DatabaseConnection,
    config: &Config,
) -> Result<(SessionLayer, SqliteStore), AppError> {
    let pool = db.get_sqlite_connection_pool();
    let store = SqliteStore::new(pool.clone());

    store.migrate().await?;

    let layer = session_layer(store.clone(), config)?;

    Ok((layer, store))
}

/// Builds the session layer around an already migrated store.
pub fn session_layer(store: SqliteStore, config: &Config) -> Result<SessionLayer, AppError> {
    let key = config.session_key()?;

    Ok(SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_secure(config.secure_cookies)
        .with_expiry(Expiry::OnInactivity(Duration::days(
            config.session_inactivity_days,
        )))
        .with_signed(key))
}

/// Starts the supervised task that purges expired sessions and their counter rows.
///
/// Expiration itself is owned by the session store; this only reclaims space. Counter rows
/// go with their session, or once they have been inactive for the configured period. A
/// failure of the sweep is reported to the supervisor and takes the process down.
///
/// # Arguments
/// - `supervisor` - Supervisor the sweep task is spawned on
/// - `store` - Session store to purge
/// - `db` - Connection holding the `session_activity` table
/// - `config` - Supplies the inactivity period
pub fn spawn_expired_session_sweep(
    supervisor: &TaskSupervisor,
    store: SqliteStore,
    db: DatabaseConnection,
    config: &Config,
) {
    let inactivity = chrono::Duration::days(config.session_inactivity_days);

    supervisor.spawn("expired-session-sweep", async move {
        let mut interval = tokio::time::interval_at(
            tokio::time::Instant::now() + EXPIRED_SESSION_SWEEP,
            EXPIRED_SESSION_SWEEP,
        );

        loop {
            interval.tick().await;
            sweep_expired_sessions(&store, &db, Utc::now() - inactivity).await?;
        }
    });
}

/// Runs one sweep: expired session records first, then counter rows left without one.
///
/// # Returns
/// - `Ok(u64)` - Number of counter rows deleted
/// - `Err(AppError)` - Session store or database failure
pub async fn sweep_expired_sessions(
    store: &SqliteStore,
    db: &DatabaseConnection,
    inactive_since: DateTime<Utc>,
) -> Result<u64, AppError> {
    store.delete_expired().await?;

    let purged = SessionActivityRepository::new(db)
        .purge_expired(inactive_since)
        .await?;

    tracing::debug!(purged, "Expired session sweep finished");

    Ok(purged)
}

/// Binds the listening socket on all interfaces at the configured port.
///
/// # Returns
/// - `Ok(TcpListener)` - Bound listener
/// - `Err(AppError::IoErr(_))` - Port unavailable or permission denied
pub async fn bind_listener(config: &Config) -> Result<TcpListener, AppError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server running at http://localhost:{}", config.port);

    Ok(listener)
}
