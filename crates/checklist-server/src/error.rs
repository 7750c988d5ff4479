use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use checklist_store::StoreError;

/// Failures that abort a request with a 5xx response.
///
/// Validation and missing-list errors never reach here; handlers turn those
/// into a re-rendered form or a redirect with a flash message.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("session store error: {0}")]
    Store(#[from] StoreError),

    #[error("template error: {0}")]
    Render(#[from] minijinja::Error),
}

/// Failures while bringing the server up.
#[derive(Debug, thiserror::Error)]
pub enum StartError {
    #[error("failed to bind listener: {0}")]
    Bind(#[from] std::io::Error),

    #[error("failed to compile templates: {0}")]
    Templates(#[from] minijinja::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Store(StoreError::CapacityExceeded { .. }) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::error!(error = %self, status = status.as_u16(), "request failed");
        (status, status.canonical_reason().unwrap_or("error")).into_response()
    }
}
