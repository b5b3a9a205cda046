//! Facade orchestrating the auth core.
//!
//! The HTTP layer talks only to [`AuthService`]; the service wires the
//! credential validator, lockout tracker, OTP manager, and token issuer
//! together and owns the ordering invariants: lockout check before the
//! credential comparison, failure recording only on secret mismatches, and
//! counter reset on every success.

use std::sync::Arc;

use regex::Regex;
use uuid::Uuid;

use crate::accounts::{AccountRepository, CreateOutcome, NewAccount, Profile, UserRole};
use crate::api::email::EmailSender;

use super::config::AuthConfig;
use super::credentials::{CredentialValidator, hash_password};
use super::error::AuthError;
use super::lockout::{LockoutRecord, LockoutTracker};
use super::otp::{OtpManager, OtpRecord};
use super::store::StateStore;
use super::tokens::{Claims, IssuedSession, JwtSigner, TokenIssuer, TokenPair};

pub struct AuthService {
    repo: Arc<dyn AccountRepository>,
    validator: CredentialValidator,
    lockout: Arc<LockoutTracker>,
    otp: OtpManager,
    issuer: TokenIssuer,
    owner_email: String,
}

impl AuthService {
    /// Assemble the service. The lockout and OTP stores are injected so
    /// deployments (and tests) choose the backing implementation.
    pub fn new(
        config: &AuthConfig,
        repo: Arc<dyn AccountRepository>,
        mailer: Arc<dyn EmailSender>,
        lockout_store: Arc<dyn StateStore<LockoutRecord>>,
        otp_store: Arc<dyn StateStore<OtpRecord>>,
    ) -> Self {
        let lockout = Arc::new(
            LockoutTracker::new(lockout_store)
                .with_max_failures(config.max_failures())
                .with_lockout_window(config.lockout_window()),
        );
        let otp = OtpManager::new(
            otp_store,
            lockout.clone(),
            repo.clone(),
            mailer,
            config.otp_ttl(),
        );
        let issuer = TokenIssuer::new(
            JwtSigner::new(config.access_secret().clone(), config.access_ttl_seconds()),
            JwtSigner::new(config.refresh_secret().clone(), config.refresh_ttl_seconds()),
            repo.clone(),
        );
        Self {
            repo: repo.clone(),
            validator: CredentialValidator::new(repo),
            lockout,
            otp,
            issuer,
            owner_email: config.owner_email().to_lowercase(),
        }
    }

    /// Create an account and immediately issue a session.
    ///
    /// The role is derived, not taken from the caller: the configured owner
    /// email (case-insensitive) becomes `Admin`, everyone else `Client`.
    ///
    /// # Errors
    /// `UserAlreadyExists` when the email is taken.
    pub async fn register(
        &self,
        name: &str,
        phone: &str,
        email: &str,
        password: &str,
    ) -> Result<IssuedSession, AuthError> {
        let email = normalize_email(email);
        let role = if email == self.owner_email {
            UserRole::Admin
        } else {
            UserRole::Client
        };

        let password_hash = hash_password(password)?;
        let outcome = self
            .repo
            .create(NewAccount {
                name: name.to_string(),
                phone: phone.to_string(),
                email,
                password_hash,
                role,
            })
            .await?;

        match outcome {
            CreateOutcome::Created(account) => self.issuer.issue(&account).await,
            CreateOutcome::Conflict => Err(AuthError::UserAlreadyExists),
        }
    }

    /// Password login: lockout gate, credential check, counter bookkeeping,
    /// session issue.
    ///
    /// # Errors
    /// `AccountLocked` while locked, `InvalidCredentials` on mismatch.
    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedSession, AuthError> {
        let email = normalize_email(email);

        // Locked identities short-circuit before the bcrypt comparison.
        self.lockout.check(&email)?;

        let profile = match self.validator.validate(&email, password).await {
            Ok(profile) => profile,
            Err(AuthError::InvalidCredentials) => {
                self.lockout.record_failure(&email)?;
                return Err(AuthError::InvalidCredentials);
            }
            Err(err) => return Err(err),
        };

        self.lockout.clear(&email)?;

        let Some(account) = self.repo.find_by_id(profile.id).await? else {
            return Err(AuthError::InvalidCredentials);
        };
        self.issuer.issue(&account).await
    }

    /// # Errors
    /// `Internal` on repository faults only; unknown emails still succeed.
    pub async fn request_otp(&self, email: &str) -> Result<&'static str, AuthError> {
        self.otp.request(&normalize_email(email)).await
    }

    /// # Errors
    /// Same as [`Self::request_otp`].
    pub async fn resend_otp(&self, email: &str) -> Result<&'static str, AuthError> {
        self.otp.resend(&normalize_email(email)).await
    }

    /// OTP login: verify (single use, shared lockout), then issue a session.
    ///
    /// # Errors
    /// `AccountLocked`, `OtpInvalid`, `OtpExpired`, or `UserNotFound`.
    pub async fn verify_otp(&self, email: &str, code: &str) -> Result<IssuedSession, AuthError> {
        let account = self.otp.verify(&normalize_email(email), code).await?;
        self.issuer.issue(&account).await
    }

    /// Exchange a refresh token for a rotated pair.
    ///
    /// # Errors
    /// `TokenInvalid` on any verification or replay failure.
    pub async fn refresh_session(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        self.issuer.refresh(refresh_token).await
    }

    /// # Errors
    /// `Internal` on persistence faults.
    pub async fn logout(&self, account_id: Uuid) -> Result<(), AuthError> {
        self.issuer.logout(account_id).await
    }

    /// Read-only profile lookup.
    ///
    /// # Errors
    /// `UserNotFound` when the account does not exist.
    pub async fn profile(&self, account_id: Uuid) -> Result<Profile, AuthError> {
        let Some(account) = self.repo.find_by_id(account_id).await? else {
            return Err(AuthError::UserNotFound);
        };
        Ok(Profile::from(&account))
    }

    /// Verify a bearer access token for protected endpoints.
    ///
    /// # Errors
    /// `TokenInvalid` on any verification failure.
    pub fn verify_access(&self, token: &str) -> Result<Claims, AuthError> {
        self.issuer.verify_access(token)
    }
}

/// Normalize an email for lookup and as the lockout/OTP identity key.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic email format check on already-normalized input.
#[must_use]
pub fn valid_email(email_normalized: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email_normalized))
}

/// Minimum accepted password length on registration.
pub const MIN_PASSWORD_LEN: usize = 8;

#[must_use]
pub fn valid_password(password: &str) -> bool {
    password.len() >= MIN_PASSWORD_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email(" Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn valid_email_accepts_basic_format() {
        assert!(valid_email("a@example.com"));
        assert!(valid_email("name.surname@example.co"));
    }

    #[test]
    fn valid_email_rejects_missing_parts() {
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("missing-at.example.com"));
        assert!(!valid_email("missing-domain@"));
    }

    #[test]
    fn valid_password_enforces_minimum_length() {
        assert!(valid_password("pw123456"));
        assert!(!valid_password("short"));
    }
}
