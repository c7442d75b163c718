//! Error types and HTTP response handling.
//!
//! This module provides the application's error hierarchy and conversion logic for
//! transforming errors into HTTP responses. The `AppError` enum serves as the top-level
//! error type for both startup (where any error is fatal) and request handling (where
//! an error fails only the current request).
//!
//! Client-facing bodies are fixed plain-text strings. Diagnostic detail, including the
//! full source chain, goes to the log and never into a response.

pub mod config;

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::config::ConfigError;

/// Body returned for every request that fails inside the pipeline.
pub const SERVER_ERROR_BODY: &str = "There was an error serving your request.";

/// Body returned by the terminal not-found stage.
pub const NOT_FOUND_BODY: &str = "Page not found.";

/// Top-level application error type.
///
/// Aggregates all possible error types that can occur in the application and provides
/// automatic conversion to HTTP responses. Most variants use `#[from]` for automatic
/// error conversion.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    ///
    /// Only produced before the listener is bound, so it terminates the process.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Database operation error from SeaORM.
    ///
    /// Results in 500 Internal Server Error with error details logged server-side.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// SQLx database driver error, raised while migrating the session table.
    #[error(transparent)]
    SqlxErr(#[from] sea_orm::SqlxError),

    /// Session operation error (load, insert, save).
    ///
    /// Results in 500 Internal Server Error as session failures prevent
    /// authentication and activity tracking.
    #[error(transparent)]
    SessionErr(#[from] tower_sessions::session::Error),

    /// Session store error from the expired session deletion task.
    #[error(transparent)]
    SessionStoreErr(#[from] tower_sessions::session_store::Error),

    /// I/O error, typically binding the listening socket.
    #[error(transparent)]
    IoErr(#[from] std::io::Error),

    /// Internal server error with custom message.
    ///
    /// Results in 500 Internal Server Error. The provided message is logged
    /// but a generic message is returned to the client.
    #[error("{0}")]
    InternalError(String),
}

/// Converts application errors into HTTP responses.
///
/// Every variant is an unexpected failure from the client's point of view, so each one
/// is logged with its source chain and answered with the generic 500 body.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        InternalServerError(self).into_response()
    }
}

/// Wrapper type for converting any error into a 500 Internal Server Error response.
///
/// Logs the error and its full source chain, then returns the fixed server error body to
/// the client to avoid leaking implementation details.
pub struct InternalServerError<E>(pub E);

impl<E: std::error::Error + 'static> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!(
            error = %ErrorChain(&self.0),
            "Unhandled application error"
        );

        (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR_BODY).into_response()
    }
}

/// Displays an error followed by every error in its `source()` chain.
///
/// Errors carry no stack trace, so the chain is the diagnostic detail written to the log
/// whenever an error is reported.
pub struct ErrorChain<'a>(pub &'a (dyn std::error::Error + 'static));

impl fmt::Display for ErrorChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)?;

        let mut source = self.0.source();
        while let Some(err) = source {
            write!(f, ": {}", err)?;
            source = err.source();
        }

        Ok(())
    }
}
