use chrono::{Duration, Utc};
use entity::prelude::SessionActivity;
use sea_orm::{EntityTrait, PaginatorTrait};
use tower_sessions::Session;

use crate::server::{middleware::session::AuthSession, startup::sweep_expired_sessions};

use super::*;

/// Tests the first request from a client without a session.
///
/// Verifies that a session is created, its cookie is sent, and the creation event is
/// logged with a view count of one.
///
/// Expected: 200 landing page, Set-Cookie present, "Session created at" logged
#[tokio::test]
async fn first_request_creates_session() -> Result<(), TestError> {
    let app = TestApp::new(FeatureRouters::default()).await?;
    let (logs, _guard) = LogCapture::install();

    let response = app.call(Method::GET, "/", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Visits this session: 1"));
    assert!(response.cookie.is_some());

    let logs = logs.contents();
    assert!(logs.contains("Session created at: "));
    assert!(logs.contains("views=1"));
    assert!(!logs.contains("Session accessed again"));

    Ok(())
}

/// Tests a returning client presenting its session cookie.
///
/// Expected: views = 2, access event logged as unauthenticated
#[tokio::test]
async fn returning_client_increments_views() -> Result<(), TestError> {
    let app = TestApp::new(FeatureRouters::default()).await?;

    let first = app.call(Method::GET, "/", None).await;
    let cookie = first.cookie.expect("session cookie");

    let (logs, _guard) = LogCapture::install();
    let second = app.call(Method::GET, "/", Some(&cookie)).await;

    assert_eq!(second.status, StatusCode::OK);
    assert!(second.body.contains("Visits this session: 2"));

    let logs = logs.contents();
    assert!(logs.contains("Session accessed again at: "));
    assert!(logs.contains("Views: 2, User ID: (unauthenticated)"));

    Ok(())
}

/// Tests that a session survives requests that end in 404.
///
/// Expected: not-found requests still count as views
#[tokio::test]
async fn not_found_requests_count_as_views() -> Result<(), TestError> {
    let app = TestApp::new(FeatureRouters::default()).await?;

    let first = app.call(Method::GET, "/missing", None).await;
    assert_eq!(first.status, StatusCode::NOT_FOUND);
    let cookie = first.cookie.expect("session cookie");

    let second = app.call(Method::GET, "/", Some(&cookie)).await;

    assert!(second.body.contains("Visits this session: 2"));

    Ok(())
}

/// Tests that a tampered cookie is not trusted.
///
/// Expected: a fresh session starting at one view
#[tokio::test]
async fn tampered_cookie_starts_new_session() -> Result<(), TestError> {
    let app = TestApp::new(FeatureRouters::default()).await?;

    app.call(Method::GET, "/", None).await;
    let response = app
        .call(Method::GET, "/", Some("dialdesk.sid=forged-value"))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Visits this session: 1"));

    Ok(())
}

/// Tests that sessions of different clients are counted independently.
///
/// Expected: each client sees its own view count
#[tokio::test]
async fn sessions_are_independent() -> Result<(), TestError> {
    let app = TestApp::new(FeatureRouters::default()).await?;

    let alice = app.call(Method::GET, "/", None).await.cookie.unwrap();
    let bob = app.call(Method::GET, "/", None).await.cookie.unwrap();

    app.call(Method::GET, "/", Some(&alice)).await;
    let alice_third = app.call(Method::GET, "/", Some(&alice)).await;
    let bob_second = app.call(Method::GET, "/", Some(&bob)).await;

    assert!(alice_third.body.contains("Visits this session: 3"));
    assert!(bob_second.body.contains("Visits this session: 2"));

    Ok(())
}

/// Tests that signing in does not leave the pre-login counter row behind.
///
/// Signing in cycles the session id, so the next request counts under a new row. The
/// sweep removes the row of the replaced id and keeps the live one.
///
/// Expected: views continue at 3 and one row remains after the sweep
#[tokio::test]
async fn sweep_removes_row_of_cycled_session() -> Result<(), TestError> {
    let features = FeatureRouters {
        auth: Router::new().route(
            "/login",
            post(|session: Session| async move {
                AuthSession::new(&session).set_user_id("agent-7").await
            }),
        ),
        ..FeatureRouters::default()
    };
    let app = TestApp::new(features).await?;

    let first = app.call(Method::GET, "/", None).await;
    let anonymous = first.cookie.expect("session cookie");
    let login = app.call(Method::POST, "/login", Some(&anonymous)).await;
    assert_eq!(login.status, StatusCode::OK);
    let signed_in = login.cookie.expect("cycled session cookie");

    let landing = app.call(Method::GET, "/", Some(&signed_in)).await;
    assert!(landing.body.contains("Visits this session: 3"));
    assert_eq!(SessionActivity::find().count(&app.state.db).await?, 2);

    let purged =
        sweep_expired_sessions(&app.store, &app.state.db, Utc::now() - Duration::days(7))
            .await
            .unwrap();

    assert_eq!(purged, 1);
    assert_eq!(SessionActivity::find().count(&app.state.db).await?, 1);

    Ok(())
}
