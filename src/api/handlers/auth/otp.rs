//! Passwordless login via one-time passwords.

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use std::sync::Arc;
use tracing::debug;

use crate::auth::service::{normalize_email, valid_email};

use super::error::{bad_request, error_response};
use super::state::AuthState;
use super::types::{
    ErrorResponse, MessageResponse, OtpRequest, OtpVerifyRequest, SessionResponse,
};

#[utoipa::path(
    post,
    path = "/auth/otp/request",
    request_body = OtpRequest,
    responses(
        (status = 200, description = "Generic acknowledgement, sent whether or not the email exists", body = MessageResponse),
        (status = 400, description = "Malformed email", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn request_otp(
    state: Extension<Arc<AuthState>>,
    payload: Option<Json<OtpRequest>>,
) -> impl IntoResponse {
    let Some(Json(request)) = payload else {
        return bad_request("Missing payload");
    };
    let email = normalize_email(&request.email);
    if !valid_email(&email) {
        return bad_request("Invalid email");
    }

    match state.service().request_otp(&email).await {
        Ok(message) => {
            let body = MessageResponse {
                message: message.to_string(),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(err) => error_response(&err),
    }
}

#[utoipa::path(
    post,
    path = "/auth/otp/resend",
    request_body = OtpRequest,
    responses(
        (status = 200, description = "Generic acknowledgement; any previous code is replaced", body = MessageResponse),
        (status = 400, description = "Malformed email", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn resend_otp(
    state: Extension<Arc<AuthState>>,
    payload: Option<Json<OtpRequest>>,
) -> impl IntoResponse {
    let Some(Json(request)) = payload else {
        return bad_request("Missing payload");
    };
    let email = normalize_email(&request.email);
    if !valid_email(&email) {
        return bad_request("Invalid email");
    }

    match state.service().resend_otp(&email).await {
        Ok(message) => {
            let body = MessageResponse {
                message: message.to_string(),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(err) => error_response(&err),
    }
}

#[utoipa::path(
    post,
    path = "/auth/otp/verify",
    request_body = OtpVerifyRequest,
    responses(
        (status = 200, description = "OTP accepted, session issued", body = SessionResponse),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 401, description = "Invalid, expired, or replayed OTP, or account locked", body = ErrorResponse),
        (status = 404, description = "No account for a consumed code", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn verify_otp(
    state: Extension<Arc<AuthState>>,
    payload: Option<Json<OtpVerifyRequest>>,
) -> impl IntoResponse {
    let Some(Json(request)) = payload else {
        return bad_request("Missing payload");
    };
    let email = normalize_email(&request.email);
    if !valid_email(&email) {
        return bad_request("Invalid email");
    }
    if request.otp.is_empty() {
        return bad_request("Missing OTP");
    }

    match state.service().verify_otp(&email, &request.otp).await {
        Ok(session) => {
            debug!(email = %email, "otp login successful");
            let body = SessionResponse {
                access_token: session.access_token,
                refresh_token: session.refresh_token,
                user: session.user,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(err) => error_response(&err),
    }
}
