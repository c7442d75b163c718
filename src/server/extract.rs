//! Structured body parsing for feature routers.
//!
//! `Payload<T>` accepts JSON and URL-encoded form bodies and deserializes either into `T`.
//! Malformed, oversized or unsupported bodies are rejected with a 4xx plain-text response;
//! they never reach the handler and never fail the process.

use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection},
        FromRequest, Request,
    },
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Body returned for malformed or oversized request bodies.
pub const INVALID_BODY: &str = "Invalid request body.";

/// Body returned when the content type is neither JSON nor a URL-encoded form.
pub const UNSUPPORTED_BODY: &str = "Unsupported request body.";

const JSON_MIME: &str = "application/json";
const FORM_MIME: &str = "application/x-www-form-urlencoded";

/// Request body deserialized from JSON or a URL-encoded form.
#[derive(Debug, Clone)]
pub struct Payload<T>(pub T);

/// Why a request body could not be turned into a `Payload`.
#[derive(Error, Debug)]
pub enum PayloadRejection {
    #[error(transparent)]
    Json(#[from] JsonRejection),

    #[error(transparent)]
    Form(#[from] FormRejection),

    #[error("Unsupported content type: {0:?}")]
    UnsupportedMediaType(Option<String>),
}

impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = PayloadRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match media_type(&req).as_deref() {
            Some(JSON_MIME) => {
                let Json(value) = Json::<T>::from_request(req, state).await?;
                Ok(Self(value))
            }
            Some(FORM_MIME) => {
                let Form(value) = Form::<T>::from_request(req, state).await?;
                Ok(Self(value))
            }
            other => Err(PayloadRejection::UnsupportedMediaType(
                other.map(str::to_string),
            )),
        }
    }
}

/// Lower-cased media type of the request without parameters such as `charset`.
fn media_type(req: &Request) -> Option<String> {
    let value = req.headers().get(CONTENT_TYPE)?.to_str().ok()?;
    let essence = value.split(';').next().unwrap_or(value).trim();

    Some(essence.to_ascii_lowercase())
}

impl PayloadRejection {
    /// Status code for the rejection, always in the 4xx range.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Json(rejection) => rejection.status(),
            Self::Form(rejection) => rejection.status(),
            Self::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        }
    }
}

impl IntoResponse for PayloadRejection {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::debug!(%status, error = %self, "Rejected request body");

        let body = match self {
            Self::UnsupportedMediaType(_) => UNSUPPORTED_BODY,
            _ => INVALID_BODY,
        };

        (status, body).into_response()
    }
}
