//! Error taxonomy surfaced by the auth core.

use thiserror::Error;

/// Every user-visible failure mode of the auth core.
///
/// Messages are intentionally vague where account enumeration is a concern:
/// a missing account, a wrong password, and an inactive account all read the
/// same, and all token verification failures fold into `TokenInvalid`.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account locked. Try again in {retry_after_minutes} minutes")]
    AccountLocked { retry_after_minutes: i64 },

    #[error("Invalid or expired OTP")]
    OtpInvalid,

    #[error("OTP has expired")]
    OtpExpired,

    #[error("Invalid or expired token")]
    TokenInvalid,

    #[error("User not found")]
    UserNotFound,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locked_message_carries_minutes() {
        let err = AuthError::AccountLocked {
            retry_after_minutes: 15,
        };
        assert_eq!(err.to_string(), "Account locked. Try again in 15 minutes");
    }

    #[test]
    fn credential_message_does_not_distinguish_causes() {
        // Missing account, wrong password, and inactive account share this.
        assert_eq!(AuthError::InvalidCredentials.to_string(), "Invalid credentials");
    }
}
