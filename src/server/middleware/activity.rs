//! Session activity stage.
//!
//! Runs after the session layer has resolved the session and before any feature router.
//! Counts the request against the session, logs a creation or access event, and publishes
//! a `SessionView` snapshot in the request extensions.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chrono::{SecondsFormat, Utc};
use tower_sessions::Session;

use crate::server::{
    data::session_activity::SessionActivityRepository,
    error::AppError,
    middleware::session::{ensure_session_id, ActivitySession, AuthSession},
    model::session::SessionView,
    state::AppState,
};

/// Tracks session activity for every request passing through the pipeline.
///
/// - First request of a session: `views = 1`, logs `Session created at: <ts>`.
/// - Later requests: the store increments the counter atomically, the new value is copied
///   into the session, and `Session accessed again at: <ts>, Views: <n>, User ID: <id>` is
///   logged, with `(unauthenticated)` when no user is signed in.
///
/// Any store failure fails this request through the per-request error channel.
pub async fn track_session_activity(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let view = record_activity(&state, &session).await?;

    request.extensions_mut().insert(view);

    Ok(next.run(request).await)
}

/// Counts one request against the session and returns the resulting snapshot.
///
/// # Returns
/// - `Ok(SessionView)` - Views after this request and the signed-in user, if any
/// - `Err(AppError)` - Session or activity store failure
pub async fn record_activity(state: &AppState, session: &Session) -> Result<SessionView, AppError> {
    let activity = ActivitySession::new(session);
    let user_id = AuthSession::new(session).get_user_id().await?;
    let repo = SessionActivityRepository::new(&state.db);
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    let view = match activity.get_views().await? {
        None => {
            activity.set_views(1).await?;
            let session_id = ensure_session_id(session).await?;
            let recorded = repo.record_visit(&session_id, 1, user_id.clone()).await?;

            let view = SessionView {
                views: recorded.views,
                user_id,
            };

            tracing::info!(views = view.views, "{}", created_message(&timestamp));

            view
        }
        Some(previous) => {
            let session_id = ensure_session_id(session).await?;
            // The id may have been cycled since the row was written; seed from the session.
            let recorded = repo
                .record_visit(&session_id, previous + 1, user_id.clone())
                .await?;
            activity.set_views(recorded.views).await?;

            let view = SessionView {
                views: recorded.views,
                user_id,
            };

            tracing::info!(
                views = view.views,
                user_id = view.user_label(),
                "{}",
                accessed_message(&timestamp, &view)
            );

            view
        }
    };

    Ok(view)
}

fn created_message(timestamp: &str) -> String {
    format!("Session created at: {}", timestamp)
}

fn accessed_message(timestamp: &str, view: &SessionView) -> String {
    format!(
        "Session accessed again at: {}, Views: {}, User ID: {}",
        timestamp,
        view.views,
        view.user_label()
    )
}
