//! Fault barrier: per-request failure containment and process-level fatal handlers.
//!
//! Three channels, each handled exactly once:
//!
//! - **Per-request**: errors returned by handlers are turned into the generic 500 body by
//!   `AppError::into_response`; panics inside request handling are caught by
//!   `CatchPanicLayer` with [`handle_request_panic`]. The process keeps serving.
//! - **Uncaught synchronous**: the hook from [`install_panic_hook`] logs every panic with its
//!   location and backtrace. A panic that happens outside a request scope (see
//!   [`request_scope`]) exits the process with status 1.
//! - **Uncaught asynchronous**: background work is spawned through [`TaskSupervisor`]. A task
//!   that fails is logged with its reason and reported to [`FailureReceiver`], after which
//!   `main` exits with a non-zero status.
//!
//! Responses that leave the session layer as a bodiless 500 (the session could not be
//! written back to the store) get the generic body from [`fill_empty_server_error`].
//!
//! The request scope ends when the handler chain has produced a response. Response bodies
//! are polled after that, so a panic while a body is streaming is not attributed to the
//! request: it goes through the uncaught synchronous channel and terminates the process.
//!
//! Restarting after a fatal exit is left to the external process manager.

use std::{any::Any, backtrace::Backtrace, future::Future};

use axum::{
    body::{Body, HttpBody},
    extract::Request,
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE},
        HeaderValue, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::mpsc;

use crate::server::error::{AppError, ErrorChain, SERVER_ERROR_BODY};

tokio::task_local! {
    static REQUEST_SCOPE: ();
}

/// Exit status used for every fatal fault.
pub const FATAL_EXIT_CODE: i32 = 1;

/// Returns whether the current task is handling a request.
pub fn in_request_scope() -> bool {
    REQUEST_SCOPE.try_with(|_| ()).is_ok()
}

/// Outermost pipeline stage: marks the rest of the request as request-scoped.
///
/// Panics raised while the inner stages run are attributed to the request rather than to
/// the process. Work spawned onto other tasks does not inherit the scope.
pub async fn request_scope(request: Request, next: Next) -> Response {
    REQUEST_SCOPE.scope((), next.run(request)).await
}

/// Installs the process-wide panic hook.
///
/// Must be called once from `main`, after logging is initialised.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let backtrace = Backtrace::force_capture();
        let message = panic_message(info.payload());
        let location = info
            .location()
            .map(|location| location.to_string())
            .unwrap_or_else(|| "<unknown>".to_string());

        if in_request_scope() {
            tracing::error!(
                %location,
                %backtrace,
                "Panic while handling request: {}",
                message
            );
            return;
        }

        tracing::error!(%location, %backtrace, "Uncaught exception: {}", message);
        std::process::exit(FATAL_EXIT_CODE);
    }));
}

/// Response for a panic caught inside request handling.
///
/// The panic has already been logged with its backtrace by the panic hook.
pub fn handle_request_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!(
        "Unhandled application error: request handler panicked: {}",
        panic_message(err.as_ref())
    );

    (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR_BODY).into_response()
}

/// Gives a bodiless 500 the generic server error body.
///
/// The session layer answers a failed end-of-request save with an empty 500; the failure
/// itself is already logged by the session layer.
pub async fn fill_empty_server_error(response: Response) -> Response {
    if response.status() != StatusCode::INTERNAL_SERVER_ERROR
        || response.body().size_hint().exact() != Some(0)
    {
        return response;
    }

    tracing::error!("Unhandled application error: session could not be saved");

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(CONTENT_LENGTH);
    parts.headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );

    Response::from_parts(parts, Body::from(SERVER_ERROR_BODY))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}

/// A supervised background task that finished with an error.
#[derive(Debug, Clone)]
pub struct TaskFailure {
    /// Name given to the task when it was spawned
    pub task: &'static str,
    /// The error and its source chain
    pub reason: String,
}

/// Spawns background work whose failures are fatal to the process.
///
/// Cheap to clone; every clone reports to the same [`FailureReceiver`].
#[derive(Clone)]
pub struct TaskSupervisor {
    failures: mpsc::UnboundedSender<TaskFailure>,
}

/// Receiving half of the supervisor, owned by `main`.
pub struct FailureReceiver {
    failures: mpsc::UnboundedReceiver<TaskFailure>,
}

impl TaskSupervisor {
    /// Creates a supervisor and the receiver its failures are reported to.
    pub fn new() -> (Self, FailureReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();

        (Self { failures: tx }, FailureReceiver { failures: rx })
    }

    /// Spawns a task onto the runtime.
    ///
    /// Nobody awaits the task; if it returns `Err`, the failure is logged with its reason
    /// and reported so the process can terminate.
    ///
    /// # Arguments
    /// - `name` - Short task name used in logs
    /// - `task` - The future to run
    pub fn spawn<F>(&self, name: &'static str, task: F)
    where
        F: Future<Output = Result<(), AppError>> + Send + 'static,
    {
        let failures = self.failures.clone();

        tokio::spawn(async move {
            if let Err(err) = task.await {
                let reason = ErrorChain(&err).to_string();

                tracing::error!(
                    task = name,
                    reason = %reason,
                    "Unhandled rejection in background task"
                );

                // The receiver only goes away while the process is already shutting down.
                let _ = failures.send(TaskFailure { task: name, reason });
            }
        });
    }
}

impl FailureReceiver {
    /// Waits for the first supervised task failure.
    ///
    /// Never resolves if every supervisor handle has been dropped without a failure.
    pub async fn wait_for_failure(&mut self) -> TaskFailure {
        match self.failures.recv().await {
            Some(failure) => failure,
            None => std::future::pending().await,
        }
    }
}
