//! Password login.

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use std::sync::Arc;
use tracing::debug;

use crate::auth::service::{normalize_email, valid_email};

use super::error::{bad_request, error_response};
use super::state::AuthState;
use super::types::{ErrorResponse, LoginRequest, SessionResponse};

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = SessionResponse),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 401, description = "Invalid credentials or account locked", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    state: Extension<Arc<AuthState>>,
    payload: Option<Json<LoginRequest>>,
) -> impl IntoResponse {
    let Some(Json(request)) = payload else {
        return bad_request("Missing payload");
    };

    // Format errors never count as failed attempts.
    let email = normalize_email(&request.email);
    if !valid_email(&email) {
        return bad_request("Invalid email");
    }
    if request.password.is_empty() {
        return bad_request("Missing password");
    }

    match state.service().login(&email, &request.password).await {
        Ok(session) => {
            debug!(email = %email, "login successful");
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
