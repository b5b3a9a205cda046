//! Account registration.

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use std::sync::Arc;
use tracing::debug;

use crate::auth::service::{normalize_email, valid_email, valid_password};

use super::error::{bad_request, error_response};
use super::state::AuthState;
use super::types::{ErrorResponse, RegisterRequest, SessionResponse};

#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created, session issued", body = SessionResponse),
        (status = 400, description = "Invalid email or password", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register(
    state: Extension<Arc<AuthState>>,
    payload: Option<Json<RegisterRequest>>,
) -> impl IntoResponse {
    let Some(Json(request)) = payload else {
        return bad_request("Missing payload");
    };

    let email = normalize_email(&request.email);
    if !valid_email(&email) {
        return bad_request("Invalid email");
    }
    if !valid_password(&request.password) {
        return bad_request("Password too short");
    }

    match state
        .service()
        .register(&request.name, &request.phone, &email, &request.password)
        .await
    {
        Ok(session) => {
            debug!(email = %email, role = ?session.user.role, "account registered");
            let body = SessionResponse {
                access_token: session.access_token,
                refresh_token: session.refresh_token,
                user: session.user,
            };
            (StatusCode::CREATED, Json(body)).into_response()
        }
        Err(err) => error_response(&err),
    }
}
