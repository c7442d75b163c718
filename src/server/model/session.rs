//! Session domain models.
//!
//! Provides the durable activity counter row and the per-request snapshot of session state
//! handed to downstream stages and views.

use chrono::{DateTime, Utc};

/// Marker logged in place of a user id for sessions without a signed-in user.
pub const UNAUTHENTICATED: &str = "(unauthenticated)";

/// Durable per-session visit counter.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionActivity {
    /// Id of the session the counter belongs to
    pub session_id: String,
    /// Number of requests seen for the session
    pub views: i64,
    /// User id recorded on the most recent request, if any
    pub user_id: Option<String>,
    /// When the first request of the session was recorded
    pub created_at: DateTime<Utc>,
    /// When the most recent request of the session was recorded
    pub last_seen_at: DateTime<Utc>,
}

impl SessionActivity {
    /// Converts an entity model to a session activity domain model at the repository boundary.
    ///
    /// # Arguments
    /// - `entity` - The entity model from the database
    ///
    /// # Returns
    /// - `SessionActivity` - The converted domain model
    pub fn from_entity(entity: entity::session_activity::Model) -> Self {
        Self {
            session_id: entity.session_id,
            views: entity.views,
            user_id: entity.user_id,
            created_at: entity.created_at,
            last_seen_at: entity.last_seen_at,
        }
    }
}

/// Snapshot of session state taken by the activity stage for the current request.
///
/// Inserted into request extensions so feature routers and the landing view observe the
/// same `views` and `user_id` the activity log recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    /// View count after this request was counted
    pub views: i64,
    /// Authenticated user id, `None` if unauthenticated
    pub user_id: Option<String>,
}

impl SessionView {
    /// Returns whether a user is signed in on this session.
    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    /// User id for log lines, or the unauthenticated marker.
    pub fn user_label(&self) -> &str {
        self.user_id.as_deref().unwrap_or(UNAUTHENTICATED)
    }
}
