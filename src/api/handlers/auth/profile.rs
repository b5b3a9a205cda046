//! Profile lookup for the authenticated account.

use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;

use crate::accounts::Profile;

use super::error::error_response;
use super::principal::require_auth;
use super::state::AuthState;
use super::types::ErrorResponse;

#[utoipa::path(
    get,
    path = "/auth/profile",
    responses(
        (status = 200, description = "Sanitized profile of the caller", body = Profile),
        (status = 401, description = "Missing or invalid access token", body = ErrorResponse),
        (status = 404, description = "Account no longer exists", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn profile(state: Extension<Arc<AuthState>>, headers: HeaderMap) -> impl IntoResponse {
    let principal = match require_auth(&headers, &state) {
        Ok(principal) => principal,
        Err(status) => return status.into_response(),
    };

    match state.service().profile(principal.account_id).await {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(err) => error_response(&err),
    }
}
