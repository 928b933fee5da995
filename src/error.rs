use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

/// Internal gate failure surfaced on the request path.
///
/// Expected outcomes (no identity, wrong role) never take this form; they
/// become redirects. This is reserved for collaborator faults such as the
/// signing backend refusing to produce a token during sign-in.
#[derive(Debug)]
pub struct GateError {
    pub status: StatusCode,
    pub error: Error,
}

impl GateError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn signing<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        error!(status = %self.status, error = %self.error, "gate failure");

        let body = Json(json!({
            "error": self.error.to_string()
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for GateError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        GateError::internal(err)
    }
}
