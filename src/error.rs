use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Failures surfaced by the document and UI endpoints.
///
/// Three kinds: a scan failure is fatal to the document request, a cache
/// failure is only fatal on the explicit invalidation path (reads fail open),
/// a render failure is fatal to the UI-page request.
#[derive(Error, Debug)]
pub enum Error {
    /// annotation source unreachable or malformed
    #[error("annotation scan failed: {0}")]
    Scan(String),
    /// cache backend unreachable
    #[error("cache backend unavailable: {0}")]
    CacheUnavailable(String),
    /// template missing or invalid
    #[error("page rendering failed: {0}")]
    Render(String),
}

impl From<handlebars::TemplateError> for Error {
    fn from(err: handlebars::TemplateError) -> Self {
        Error::Render(err.to_string())
    }
}

impl From<handlebars::RenderError> for Error {
    fn from(err: handlebars::RenderError) -> Self {
        Error::Render(err.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self {
            Error::Scan(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::CacheUnavailable(_) => StatusCode::BAD_GATEWAY,
            Error::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}
