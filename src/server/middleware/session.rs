//! Type-safe session management wrappers.
//!
//! This module provides type-safe interfaces for managing different aspects of user sessions,
//! organized by concern. Each struct handles a specific domain of session data, preventing
//! typos, ensuring type consistency, and centralizing session-related logic.
//!
//! # Architecture
//!
//! Session management is split into focused concerns:
//! - `AuthSession` - User authentication state (user ID)
//! - `ActivitySession` - Request counter mirrored from the activity store
//!
//! Each struct wraps the same underlying `Session` but exposes only the methods
//! relevant to its concern.

use tower_sessions::Session;

use crate::server::error::AppError;

// Session key constants
const SESSION_AUTH_USER_ID: &str = "userId";
const SESSION_ACTIVITY_VIEWS: &str = "views";

/// Authentication session management.
///
/// Feature routers use this to bind a user to the session at login and to clear it at
/// logout. The pipeline itself only reads the user id for the activity log.
pub struct AuthSession<'a> {
    /// The underlying tower-sessions Session instance.
    session: &'a Session,
}

impl<'a> AuthSession<'a> {
    /// Creates a new AuthSession wrapper.
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Stores the user's id in the session.
    ///
    /// The session id is cycled first so a token issued before login cannot be reused to
    /// ride the authenticated session.
    ///
    /// # Arguments
    /// - `user_id` - The authenticated user's id
    ///
    /// # Returns
    /// - `Ok(())` - User ID successfully stored
    /// - `Err(AppError::SessionErr(_))` - Failed to store in session
    pub async fn set_user_id(&self, user_id: &str) -> Result<(), AppError> {
        self.session.cycle_id().await?;
        self.session
            .insert(SESSION_AUTH_USER_ID, user_id.to_string())
            .await?;
        Ok(())
    }

    /// Retrieves the user's id from the session.
    ///
    /// # Returns
    /// - `Ok(Some(user_id))` - User is logged in
    /// - `Ok(None)` - No user in session (not logged in)
    /// - `Err(AppError::SessionErr(_))` - Failed to access session
    pub async fn get_user_id(&self) -> Result<Option<String>, AppError> {
        let user_id = self.session.get::<String>(SESSION_AUTH_USER_ID).await?;
        Ok(user_id)
    }

    /// Checks if a user is currently logged in.
    pub async fn is_authenticated(&self) -> Result<bool, AppError> {
        Ok(self.get_user_id().await?.is_some())
    }

    /// Removes the user from the session, keeping its activity count.
    ///
    /// # Returns
    /// - `Ok(Some(user_id))` - The user that was signed out
    /// - `Ok(None)` - Nobody was signed in
    /// - `Err(AppError::SessionErr(_))` - Failed to access session
    pub async fn sign_out(&self) -> Result<Option<String>, AppError> {
        let user_id = self.session.remove(SESSION_AUTH_USER_ID).await?;
        Ok(user_id)
    }
}

/// Request counter stored in the session record.
///
/// The authoritative count lives in the `session_activity` table; the copy in the session
/// record marks the session as initialised and lets views read it without a query.
pub struct ActivitySession<'a> {
    /// The underlying tower-sessions Session instance.
    session: &'a Session,
}

impl<'a> ActivitySession<'a> {
    /// Creates a new ActivitySession wrapper.
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Retrieves the view count.
    ///
    /// # Returns
    /// - `Ok(Some(views))` - The session has been seen before
    /// - `Ok(None)` - First request of the session
    /// - `Err(AppError::SessionErr(_))` - Failed to access session
    pub async fn get_views(&self) -> Result<Option<i64>, AppError> {
        let views = self.session.get::<i64>(SESSION_ACTIVITY_VIEWS).await?;
        Ok(views)
    }

    /// Stores the view count.
    pub async fn set_views(&self, views: i64) -> Result<(), AppError> {
        self.session.insert(SESSION_ACTIVITY_VIEWS, views).await?;
        Ok(())
    }
}

/// Returns the session id, persisting the session first if it has none yet.
///
/// A new session only receives its id when it is first written to the store.
///
/// # Returns
/// - `Ok(String)` - The session id
/// - `Err(AppError)` - Failed to save the session
pub async fn ensure_session_id(session: &Session) -> Result<String, AppError> {
    if let Some(id) = session.id() {
        return Ok(id.to_string());
    }

    session.save().await?;

    session
        .id()
        .map(|id| id.to_string())
        .ok_or_else(|| AppError::InternalError("Session has no id after save".to_string()))
}
