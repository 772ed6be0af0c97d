use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use beach_core::error::BeachError;

// ---------------------------------------------------------------------------
// AppError, the unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
///
/// Handlers attach a route-level message with `anyhow::Context`. Not-found and
/// bad-request errors are reported with their own message; anything else
/// becomes a 500 that shows only the route-level message and logs the chain.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 400 Bad Request error with the given message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(BeachError::BadRequest(msg.into()).into())
    }
}

fn classify(err: &BeachError) -> Option<(StatusCode, String)> {
    match err {
        BeachError::BeachNotFound(_) => Some((StatusCode::NOT_FOUND, "Beach not found".into())),
        BeachError::EmptyStore => Some((
            StatusCode::NOT_FOUND,
            "No beaches found in database".into(),
        )),
        BeachError::BadRequest(detail) => Some((
            StatusCode::BAD_REQUEST,
            format!("Invalid request data: {detail}"),
        )),
        BeachError::Store(_)
        | BeachError::Config(_)
        | BeachError::Http(_)
        | BeachError::Io(_)
        | BeachError::Yaml(_)
        | BeachError::Json(_) => None,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some((status, message)) = self.0.downcast_ref::<BeachError>().and_then(classify) {
            let body = serde_json::json!({ "message": message });
            return (status, axum::Json(body)).into_response();
        }

        tracing::error!("{:#}", self.0);
        // Outermost context only: the route's generic message.
        let body = serde_json::json!({ "message": self.0.to_string() });
        (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
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
