//! Session activity data repository.
//!
//! This module provides the `SessionActivityRepository` for the per-session visit counter.
//! The counter is incremented by the store in a single statement so concurrent requests
//! carrying the same session token never lose an update. Rows live only as long as their
//! session: `purge_expired` removes them together with the session store's own sweep.

use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::{Expr, OnConflict},
    ActiveValue, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
};

use crate::server::model::session::SessionActivity;

/// Default table of the SQLite session store.
const SESSION_TABLE: &str = "tower_sessions";

/// Repository providing database operations for session activity counters.
pub struct SessionActivityRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SessionActivityRepository<'a> {
    /// Creates a new SessionActivityRepository instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    ///
    /// # Returns
    /// - `SessionActivityRepository` - New repository instance
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records one request for a session and returns the updated counter.
    ///
    /// Inserts a row with `views = initial_views` when the session has no row yet, otherwise
    /// increments the stored count by one in the same statement
    /// (`INSERT .. ON CONFLICT DO UPDATE SET views = views + 1 .. RETURNING`). The user id and
    /// last-seen timestamp are overwritten on every call.
    ///
    /// # Arguments
    /// - `session_id` - Id of the session the request belongs to
    /// - `initial_views` - Count to store if this is the first row for the session
    /// - `user_id` - Authenticated user id, `None` if unauthenticated
    ///
    /// # Returns
    /// - `Ok(SessionActivity)` - The row after the insert or increment
    /// - `Err(DbErr)` - Database error during the upsert
    pub async fn record_visit(
        &self,
        session_id: &str,
        initial_views: i64,
        user_id: Option<String>,
    ) -> Result<SessionActivity, DbErr> {
        let now = Utc::now();

        let entity = entity::prelude::SessionActivity::insert(entity::session_activity::ActiveModel {
            session_id: ActiveValue::Set(session_id.to_string()),
            views: ActiveValue::Set(initial_views),
            user_id: ActiveValue::Set(user_id),
            created_at: ActiveValue::Set(now),
            last_seen_at: ActiveValue::Set(now),
        })
        .on_conflict(
            OnConflict::column(entity::session_activity::Column::SessionId)
                .value(
                    entity::session_activity::Column::Views,
                    Expr::cust("views + 1"),
                )
                .update_columns([
                    entity::session_activity::Column::UserId,
                    entity::session_activity::Column::LastSeenAt,
                ])
                .to_owned(),
        )
        .exec_with_returning(self.db)
        .await?;

        Ok(SessionActivity::from_entity(entity))
    }

    /// Finds the activity row for a session.
    ///
    /// # Arguments
    /// - `session_id` - Id of the session
    ///
    /// # Returns
    /// - `Ok(Some(SessionActivity))` - Row found
    /// - `Ok(None)` - The session has never been recorded
    /// - `Err(DbErr)` - Database error during query
    pub async fn find_by_session_id(
        &self,
        session_id: &str,
    ) -> Result<Option<SessionActivity>, DbErr> {
        let entity = entity::prelude::SessionActivity::find_by_id(session_id.to_string())
            .one(self.db)
            .await?;

        Ok(entity.map(SessionActivity::from_entity))
    }

    /// Deletes counter rows whose session is gone or inactive.
    ///
    /// A row is removed when its session id no longer exists in the session store (expired,
    /// deleted, or replaced by an id cycle at login) or when it was last seen before
    /// `inactive_since`.
    ///
    /// # Arguments
    /// - `inactive_since` - Rows last seen before this instant are removed
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of rows deleted
    /// - `Err(DbErr)` - Database error during delete
    pub async fn purge_expired(&self, inactive_since: DateTime<Utc>) -> Result<u64, DbErr> {
        let result = entity::prelude::SessionActivity::delete_many()
            .filter(
                Condition::any()
                    .add(Expr::cust(format!(
                        "session_id NOT IN (SELECT id FROM {})",
                        SESSION_TABLE
                    )))
                    .add(entity::session_activity::Column::LastSeenAt.lt(inactive_since)),
            )
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
