//! Mapping from the auth error taxonomy to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::auth::AuthError;

use super::types::ErrorResponse;

/// Status codes: credential/lockout/OTP/token failures are all 401, missing
/// users 404, duplicate registration 409, infrastructure faults a generic
/// 500. Bodies never expose internal state.
pub(crate) fn error_response(err: &AuthError) -> Response {
    let status = match err {
        AuthError::InvalidCredentials
        | AuthError::AccountLocked { .. }
        | AuthError::OtpInvalid
        | AuthError::OtpExpired
        | AuthError::TokenInvalid => StatusCode::UNAUTHORIZED,
        AuthError::UserNotFound => StatusCode::NOT_FOUND,
        AuthError::UserAlreadyExists => StatusCode::CONFLICT,
        AuthError::Internal(inner) => {
            error!("auth internal error: {inner:#}");
            let body = ErrorResponse {
                error: "Internal".to_string(),
                message: "Internal server error".to_string(),
                retry_after_minutes: None,
            };
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
        }
    };

    let retry_after_minutes = match err {
        AuthError::AccountLocked {
            retry_after_minutes,
        } => Some(*retry_after_minutes),
        _ => None,
    };

    let body = ErrorResponse {
        error: kind(err).to_string(),
        message: err.to_string(),
        retry_after_minutes,
    };
    (status, Json(body)).into_response()
}

const fn kind(err: &AuthError) -> &'static str {
    match err {
        AuthError::InvalidCredentials => "InvalidCredentials",
        AuthError::AccountLocked { .. } => "AccountLocked",
        AuthError::OtpInvalid => "OtpInvalid",
        AuthError::OtpExpired => "OtpExpired",
        AuthError::TokenInvalid => "TokenInvalid",
        AuthError::UserNotFound => "UserNotFound",
        AuthError::UserAlreadyExists => "UserAlreadyExists",
        AuthError::Internal(_) => "Internal",
    }
}

/// 400 with a plain message for request validation failures. These never
/// touch the lockout counter.
pub(crate) fn bad_request(message: &str) -> Response {
    let body = ErrorResponse {
        error: "BadRequest".to_string(),
        message: message.to_string(),
        retry_after_minutes: None,
    };
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}
