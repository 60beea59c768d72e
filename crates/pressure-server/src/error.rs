use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pressure_core::error::SimError;

// ---------------------------------------------------------------------------
// Upstream failure sentinel
// ---------------------------------------------------------------------------

/// Carries an explicit 502 through the `anyhow::Error` chain when a call to
/// an external service (chat endpoints, instance discovery) fails.
#[derive(Debug)]
struct UpstreamError(String);

impl std::fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for UpstreamError {}

/// Explicit 404 for things that are not simulation entities.
#[derive(Debug)]
struct NotFoundError(String);

impl std::fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for NotFoundError {}

/// Explicit 400 for malformed request values.
#[derive(Debug)]
struct BadRequestError(String);

impl std::fmt::Display for BadRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BadRequestError {}

// ---------------------------------------------------------------------------
// AppError
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    pub fn unauthorized() -> Self {
        Self(SimError::Unauthorized.into())
    }

    pub fn bad_gateway(msg: impl Into<String>) -> Self {
        Self(UpstreamError(msg.into()).into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self(NotFoundError(msg.into()).into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(BadRequestError(msg.into()).into())
    }

    pub fn status(&self) -> StatusCode {
        if self.0.downcast_ref::<BadRequestError>().is_some() {
            return StatusCode::BAD_REQUEST;
        }
        if self.0.downcast_ref::<UpstreamError>().is_some() {
            return StatusCode::BAD_GATEWAY;
        }
        if self.0.downcast_ref::<NotFoundError>().is_some() {
            return StatusCode::NOT_FOUND;
        }
        match self.0.downcast_ref::<SimError>() {
            Some(SimError::Unauthorized) => StatusCode::UNAUTHORIZED,
            Some(SimError::TeamNotFound(_) | SimError::CrisisNotFound(_)) => StatusCode::NOT_FOUND,
            Some(
                SimError::DuplicateCrisis(_)
                | SimError::DuplicateNewsEntry(_)
                | SimError::EmptyTimeline
                | SimError::UnknownTrigger { .. }
                | SimError::InvalidConfig(_),
            ) => StatusCode::BAD_REQUEST,
            Some(SimError::Io(_) | SimError::Yaml(_) | SimError::Json(_)) | None => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
