use sea_orm::{sea_query::TableCreateStatement, ConnectionTrait, Database, DatabaseConnection};
use std::sync::Arc;
use time::Duration;
use tower_sessions::{Expiry, Session};
use tower_sessions_sqlx_store::SqliteStore;

use crate::error::TestError;

/// Test context containing database connection, session store and test session.
///
/// Provides an in-memory SQLite database connection, a migrated session store on the same
/// pool, and a standalone session for isolated unit and integration testing. Each piece is
/// created lazily on first access and persists for the lifetime of the test context.
pub struct TestContext {
    /// Optional database connection to in-memory SQLite instance.
    ///
    /// Initialized lazily when `database()` is first called.
    pub db: Option<DatabaseConnection>,

    /// Optional session store sharing the database connection pool.
    ///
    /// Initialized lazily when `session_store()` is first called.
    pub store: Option<SqliteStore>,

    /// Optional session instance for session handling.
    ///
    /// Initialized lazily when `session()` is first called. Backed by `store`.
    pub session: Option<Session>,
}

impl TestContext {
    /// Creates a new empty test context.
    ///
    /// # Returns
    /// - New `TestContext` instance with no database connection
    pub fn new() -> Self {
        Self {
            db: None,
            store: None,
            session: None,
        }
    }

    /// Gets or creates the in-memory SQLite database connection.
    ///
    /// # Returns
    /// - `Ok(&DatabaseConnection)` - Reference to the database connection
    /// - `Err(TestError::Database)` - Failed to connect to in-memory SQLite database
    pub async fn database(&mut self) -> Result<&DatabaseConnection, TestError> {
        match self.db {
            Some(ref db) => Ok(db),
            None => {
                let db = Database::connect("sqlite::memory:").await?;

                let db_ref = self.db.insert(db);

                Ok(&*db_ref) // Re-borrow as immutable
            }
        }
    }

    /// Creates database tables from the provided CREATE TABLE statements.
    ///
    /// Executes each CREATE TABLE statement in sequence. Typically called internally by
    /// `TestBuilder::build()` rather than directly.
    ///
    /// # Arguments
    /// - `stmts` - Vector of CREATE TABLE statements to execute
    ///
    /// # Returns
    /// - `Ok(())` - All tables created successfully
    /// - `Err(TestError::Database)` - Failed to create one or more tables
    pub async fn with_tables(&mut self, stmts: Vec<TableCreateStatement>) -> Result<(), TestError> {
        let db = self.database().await?;

        for stmt in stmts {
            db.execute(&stmt).await?;
        }

        Ok(())
    }

    /// Gets or creates the session store backed by the in-memory database.
    ///
    /// On first call the database connection is initialized if needed and the session
    /// table is migrated. The returned store is a cheap clone sharing the same pool, ready
    /// to be wrapped in a `SessionManagerLayer`.
    ///
    /// # Returns
    /// - `Ok(SqliteStore)` - Migrated session store
    /// - `Err(TestError)` - Failed to initialize the database or migrate the session table
    pub async fn session_store(&mut self) -> Result<SqliteStore, TestError> {
        if let Some(ref store) = self.store {
            return Ok(store.clone());
        }

        let db = self.database().await?;

        let pool = db.get_sqlite_connection_pool();
        let store = SqliteStore::new(pool.clone());

        store
            .migrate()
            .await
            .map_err(|e| TestError::SessionStore(e.to_string()))?;

        Ok(self.store.insert(store).clone())
    }

    /// Gets or creates the test session instance.
    ///
    /// Returns the existing session if one exists, otherwise creates a new session backed
    /// by the test session store with a seven day inactivity expiry.
    ///
    /// # Returns
    /// - `Ok(&Session)` - Reference to the session instance
    /// - `Err(TestError)` - Failed to initialize database connection or session table
    ///
    /// # Example
    /// ```rust,ignore
    /// let mut test = TestContext::new();
    /// let session = test.session().await?;
    ///
    /// session.insert("views", 1).await?;
    /// ```
    pub async fn session(&mut self) -> Result<&Session, TestError> {
        if self.session.is_none() {
            let store = self.session_store().await?;

            // Session::new requires: id (None for new), store (Arc), expiry
            let session = Session::new(
                None,
                Arc::new(store),
                Some(Expiry::OnInactivity(Duration::days(7))),
            );

            self.session = Some(session);
        }

        match self.session {
            Some(ref session) => Ok(session),
            None => unreachable!("session initialized above"),
        }
    }

    /// Gets or creates both database and session references.
    ///
    /// Convenience method for tests that need both database and session access. This
    /// avoids borrow checker issues when calling `database()` and `session()` separately.
    ///
    /// # Returns
    /// - `Ok((&DatabaseConnection, &Session))` - References to both database and session
    /// - `Err(TestError)` - Failed to initialize database or session
    pub async fn db_and_session(&mut self) -> Result<(&DatabaseConnection, &Session), TestError> {
        // Initialize both (these methods are idempotent)
        self.database().await?;
        self.session().await?;

        match (self.db.as_ref(), self.session.as_ref()) {
            (Some(db), Some(session)) => Ok((db, session)),
            _ => unreachable!("database and session initialized above"),
        }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
