//! Session activity factory for creating counter rows.

use crate::factory::helpers::next_id;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating session activity rows with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::session_activity::SessionActivityFactory;
///
/// let row = SessionActivityFactory::new(&db)
///     .views(4)
///     .user_id("agent-7")
///     .build()
///     .await?;
/// ```
pub struct SessionActivityFactory<'a> {
    db: &'a DatabaseConnection,
    session_id: String,
    views: i64,
    user_id: Option<String>,
    last_seen_at: Option<DateTime<Utc>>,
}

impl<'a> SessionActivityFactory<'a> {
    /// Creates a new SessionActivityFactory with default values.
    ///
    /// Defaults:
    /// - session_id: `"session_{id}"` where id is auto-incremented
    /// - views: `1`
    /// - user_id: `None`
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            session_id: format!("session_{}", next_id()),
            views: 1,
            user_id: None,
            last_seen_at: None,
        }
    }

    /// Sets the session id the row is keyed by.
    pub fn session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }

    /// Sets the stored view count.
    pub fn views(mut self, views: i64) -> Self {
        self.views = views;
        self
    }

    /// Sets the authenticated user id recorded on the row.
    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Sets when the session was last seen; defaults to now.
    pub fn last_seen_at(mut self, last_seen_at: DateTime<Utc>) -> Self {
        self.last_seen_at = Some(last_seen_at);
        self
    }

    /// Builds and inserts the session activity row into the database.
    ///
    /// # Returns
    /// - `Ok(entity::session_activity::Model)` - Created row
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::session_activity::Model, DbErr> {
        let now = Utc::now();
        entity::session_activity::ActiveModel {
            session_id: ActiveValue::Set(self.session_id),
            views: ActiveValue::Set(self.views),
            user_id: ActiveValue::Set(self.user_id),
            created_at: ActiveValue::Set(self.last_seen_at.unwrap_or(now)),
            last_seen_at: ActiveValue::Set(self.last_seen_at.unwrap_or(now)),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a session activity row with default values.
///
/// Shorthand for `SessionActivityFactory::new(db).build().await`.
pub async fn create_session_activity(
    db: &DatabaseConnection,
) -> Result<entity::session_activity::Model, DbErr> {
    SessionActivityFactory::new(db).build().await
}
