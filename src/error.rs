use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub const MSG_EMPTY_CREDENTIALS: &str = "Email or password is empty";
pub const MSG_INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const MSG_NOT_AVAILABLE: &str = "Data is not available";
pub const MSG_NOT_REGISTERED: &str = "User ID is not registered";
pub const MSG_INVALID_ID: &str = "User ID must be a positive integer";
pub const MSG_FAILED: &str = "Failed";

/// Every failure a handler can answer with.
///
/// All variants answer 400: the service makes no 401/404/409 distinction, and
/// dependency faults share the status with client errors. Panics are the only
/// path to a 500 (see `app::build_app`).
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body could not be parsed at all; carries the raw parser message.
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// Body parsed but failed field rules.
    #[error("invalid payload: {0:?}")]
    Invalid(Vec<String>),

    #[error("invalid user id: {0}")]
    InvalidId(String),

    #[error("{0}")]
    Rejected(&'static str),

    /// Store, hasher or signer failed. The cause is logged where it happens
    /// and never sent to the client.
    #[error("dependency failure")]
    Failed,
}

impl ApiError {
    /// Logs a dependency failure with its full cause chain and collapses it to
    /// [`ApiError::Failed`].
    pub fn dependency(what: &'static str, e: anyhow::Error) -> Self {
        tracing::error!(error = %format!("{:#}", e), "{} failed", what);
        ApiError::Failed
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self {
            ApiError::Malformed(msg) => json!({ "error": msg }),
            ApiError::Invalid(messages) => json!({ "error": messages }),
            ApiError::InvalidId(detail) => json!({
                "status": false,
                "message": MSG_INVALID_ID,
                "error": detail,
            }),
            ApiError::Rejected(message) => json!({ "status": false, "message": message }),
            ApiError::Failed => json!({ "status": false, "message": MSG_FAILED }),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}
