//! Refresh rotation and logout.

use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::debug;

use super::error::{bad_request, error_response};
use super::principal::require_auth;
use super::state::AuthState;
use super::types::{ErrorResponse, MessageResponse, RefreshRequest, TokenPairResponse};

#[utoipa::path(
    post,
    path = "/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Rotated token pair", body = TokenPairResponse),
        (status = 400, description = "Missing refresh token", body = ErrorResponse),
        (status = 401, description = "Invalid, expired, or superseded refresh token", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn refresh(
    state: Extension<Arc<AuthState>>,
    payload: Option<Json<RefreshRequest>>,
) -> impl IntoResponse {
    let Some(Json(request)) = payload else {
        return bad_request("Missing payload");
    };
    if request.refresh_token.is_empty() {
        return bad_request("Missing refresh token");
    }

    match state.service().refresh_session(&request.refresh_token).await {
        Ok(pair) => {
            let body = TokenPairResponse {
                access_token: pair.access_token,
                refresh_token: pair.refresh_token,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(err) => error_response(&err),
    }
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Session revoked", body = MessageResponse),
        (status = 401, description = "Missing or invalid access token", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn logout(state: Extension<Arc<AuthState>>, headers: HeaderMap) -> impl IntoResponse {
    let principal = match require_auth(&headers, &state) {
        Ok(principal) => principal,
        Err(status) => return status.into_response(),
    };

    match state.service().logout(principal.account_id).await {
        Ok(()) => {
            debug!(account_id = %principal.account_id, "session revoked");
            let body = MessageResponse {
                message: "Logged out".to_string(),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(err) => error_response(&err),
    }
}
