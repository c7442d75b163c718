//! Shared helpers for server tests.
//!
//! `TestApp` drives the complete request pipeline in-process: the same router, session
//! layer and activity stage as production, over an in-memory SQLite database and a
//! temporary public directory.

use std::{
    collections::HashMap,
    io,
    sync::{Arc, Mutex},
};

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use tempfile::TempDir;
use test_utils::{builder::TestBuilder, context::TestContext, error::TestError};
use tower::ServiceExt;
use tower_sessions_sqlx_store::SqliteStore;
use tracing::subscriber::DefaultGuard;

use crate::server::{
    config::Config,
    fault::{FailureReceiver, TaskSupervisor},
    feature::FeatureRouters,
    router, startup,
    state::AppState,
};


/// Configuration with only the mandatory settings filled in.
pub fn test_config() -> Config {
    let vars = HashMap::from([
        ("DATABASE_URL", "sqlite::memory:"),
        ("SESSION_SECRET", "test-session-secret"),
    ]);

    Config::from_lookup(|name| vars.get(name).map(|value| value.to_string()))
        .expect("test configuration is valid")
}

/// In-process instance of the full pipeline.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub failures: FailureReceiver,
    pub public_dir: TempDir,
    pub store: SqliteStore,
    /// Keeps the in-memory database alive for the lifetime of the app.
    _context: TestContext,
}

/// Status, body and session cookie of a pipeline response.
pub struct TestResponse {
    pub status: StatusCode,
    pub body: String,
    /// `name=value` part of the `Set-Cookie` header, if one was sent
    pub cookie: Option<String>,
}

impl TestApp {
    /// Builds the pipeline with the given feature routers.
    pub async fn new(features: FeatureRouters) -> Result<Self, TestError> {
        Self::with_config(features, test_config()).await
    }

    pub async fn with_config(features: FeatureRouters, mut config: Config) -> Result<Self, TestError> {
        let public_dir = tempfile::tempdir().expect("create public dir");
        config.public_dir = public_dir.path().to_path_buf();

        let mut context = TestBuilder::new().with_session_tables().build().await?;
        let store = context.session_store().await?;
        let db = context.database().await?.clone();

        let session_layer =
            startup::session_layer(store.clone(), &config).expect("session layer");
        let (supervisor, failures) = TaskSupervisor::new();
        let state = AppState::new(db, config, supervisor);
        let router = router::router(state.clone(), features, session_layer);

        Ok(Self {
            router,
            state,
            failures,
            public_dir,
            store,
            _context: context,
        })
    }

    /// Sends a request through the pipeline and collects the response.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(str::to_string);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            body: String::from_utf8_lossy(&bytes).into_owned(),
            cookie,
        }
    }

    /// Sends a body-less request, optionally carrying a session cookie.
    pub async fn call(&self, method: Method, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.send(request(method, uri, cookie, None)).await
    }
}

/// Builds a request with an optional cookie and an optional `(content type, body)` pair.
pub fn request(
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    body: Option<(&str, &str)>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    match body {
        Some((content_type, body)) => builder
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Captures formatted log output for the current thread.
///
/// `#[tokio::test]` runs on a current-thread runtime, so everything the pipeline logs
/// during the test lands here.
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Installs the capture as the thread's default subscriber until the guard drops.
    pub fn install() -> (Self, DefaultGuard) {
        let capture = Self::default();
        let writer = capture.clone();

        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || writer.clone())
            .finish();

        let guard = tracing::subscriber::set_default(subscriber);

        (capture, guard)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
