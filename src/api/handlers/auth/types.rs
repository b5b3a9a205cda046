//! Request/response types for auth endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::accounts::{Profile, UserRole};

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    /// Accepted for wire compatibility; the effective role is derived from
    /// the configured owner email, never from this field.
    #[serde(default)]
    pub role: Option<UserRole>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct OtpRequest {
    pub email: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct OtpVerifyRequest {
    pub email: String,
    pub otp: String,
}

/// Token pair plus sanitized user, returned by register/login/otp-verify.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: Profile,
}

/// Rotated token pair, returned by refresh.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message: String,
}

/// Uniform error body. `retry_after_minutes` is present only for lockouts.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_minutes: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};

    #[test]
    fn register_request_round_trips() -> Result<()> {
        let value = serde_json::json!({
            "name": "Alice",
            "phone": "+15550100",
            "email": "alice@example.com",
            "password": "pw123456"
        });
        let decoded: RegisterRequest = serde_json::from_value(value)?;
        assert_eq!(decoded.email, "alice@example.com");
        assert_eq!(decoded.role, None);
        Ok(())
    }

    #[test]
    fn session_response_uses_camel_case() -> Result<()> {
        let response = SessionResponse {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            user: Profile {
                id: uuid::Uuid::nil(),
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                role: UserRole::Client,
                is_active: true,
            },
        };
        let value = serde_json::to_value(&response)?;
        value.get("accessToken").context("missing accessToken")?;
        value.get("refreshToken").context("missing refreshToken")?;
        let active = value
            .pointer("/user/isActive")
            .and_then(serde_json::Value::as_bool);
        assert_eq!(active, Some(true));
        Ok(())
    }

    #[test]
    fn error_response_omits_absent_retry_hint() -> Result<()> {
        let response = ErrorResponse {
            error: "TokenInvalid".to_string(),
            message: "Invalid or expired token".to_string(),
            retry_after_minutes: None,
        };
        let value = serde_json::to_value(&response)?;
        assert!(value.get("retryAfterMinutes").is_none());
        Ok(())
    }
}
