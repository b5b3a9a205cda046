//! Auth core configuration.

use secrecy::SecretString;
use std::time::Duration;

use super::lockout::{DEFAULT_LOCKOUT_MINUTES, DEFAULT_MAX_FAILURES};

const DEFAULT_ACCESS_TTL_SECONDS: i64 = 15 * 60;
const DEFAULT_REFRESH_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;
const DEFAULT_OTP_TTL_SECONDS: u64 = 10 * 60;

/// Runtime configuration for the auth core.
///
/// The two token secrets are independent by design: conflating them would let
/// a leaked access token be replayed as a refresh token.
#[derive(Clone)]
pub struct AuthConfig {
    owner_email: String,
    access_secret: SecretString,
    refresh_secret: SecretString,
    access_ttl_seconds: i64,
    refresh_ttl_seconds: i64,
    otp_ttl: Duration,
    max_failures: u32,
    lockout_window: Duration,
    frontend_base_url: String,
}

impl AuthConfig {
    #[must_use]
    pub fn new(
        owner_email: String,
        access_secret: SecretString,
        refresh_secret: SecretString,
    ) -> Self {
        Self {
            owner_email,
            access_secret,
            refresh_secret,
            access_ttl_seconds: DEFAULT_ACCESS_TTL_SECONDS,
            refresh_ttl_seconds: DEFAULT_REFRESH_TTL_SECONDS,
            otp_ttl: Duration::from_secs(DEFAULT_OTP_TTL_SECONDS),
            max_failures: DEFAULT_MAX_FAILURES,
            lockout_window: Duration::from_secs(DEFAULT_LOCKOUT_MINUTES * 60),
            frontend_base_url: "http://localhost:3000".to_string(),
        }
    }

    #[must_use]
    pub fn with_access_ttl_seconds(mut self, seconds: i64) -> Self {
        self.access_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_refresh_ttl_seconds(mut self, seconds: i64) -> Self {
        self.refresh_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_otp_ttl_seconds(mut self, seconds: u64) -> Self {
        self.otp_ttl = Duration::from_secs(seconds);
        self
    }

    #[must_use]
    pub fn with_max_failures(mut self, max_failures: u32) -> Self {
        self.max_failures = max_failures.max(1);
        self
    }

    #[must_use]
    pub fn with_lockout_window_seconds(mut self, seconds: u64) -> Self {
        self.lockout_window = Duration::from_secs(seconds);
        self
    }

    #[must_use]
    pub fn with_frontend_base_url(mut self, url: String) -> Self {
        self.frontend_base_url = url;
        self
    }

    #[must_use]
    pub fn owner_email(&self) -> &str {
        &self.owner_email
    }

    #[must_use]
    pub fn access_secret(&self) -> &SecretString {
        &self.access_secret
    }

    #[must_use]
    pub fn refresh_secret(&self) -> &SecretString {
        &self.refresh_secret
    }

    #[must_use]
    pub fn access_ttl_seconds(&self) -> i64 {
        self.access_ttl_seconds
    }

    #[must_use]
    pub fn refresh_ttl_seconds(&self) -> i64 {
        self.refresh_ttl_seconds
    }

    #[must_use]
    pub fn otp_ttl(&self) -> Duration {
        self.otp_ttl
    }

    #[must_use]
    pub fn max_failures(&self) -> u32 {
        self.max_failures
    }

    #[must_use]
    pub fn lockout_window(&self) -> Duration {
        self.lockout_window
    }

    #[must_use]
    pub fn frontend_base_url(&self) -> &str {
        &self.frontend_base_url
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("owner_email", &self.owner_email)
            .field("access_secret", &"***")
            .field("refresh_secret", &"***")
            .field("access_ttl_seconds", &self.access_ttl_seconds)
            .field("refresh_ttl_seconds", &self.refresh_ttl_seconds)
            .field("otp_ttl", &self.otp_ttl)
            .field("max_failures", &self.max_failures)
            .field("lockout_window", &self.lockout_window)
            .field("frontend_base_url", &self.frontend_base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AuthConfig {
        AuthConfig::new(
            "owner@example.com".to_string(),
            SecretString::from("access".to_string()),
            SecretString::from("refresh".to_string()),
        )
    }

    #[test]
    fn defaults_and_overrides() {
        let config = config();
        assert_eq!(config.access_ttl_seconds(), 900);
        assert_eq!(config.refresh_ttl_seconds(), 604_800);
        assert_eq!(config.otp_ttl(), Duration::from_secs(600));
        assert_eq!(config.max_failures(), 5);
        assert_eq!(config.lockout_window(), Duration::from_secs(900));

        let config = config
            .with_access_ttl_seconds(60)
            .with_refresh_ttl_seconds(3600)
            .with_otp_ttl_seconds(30)
            .with_max_failures(3)
            .with_lockout_window_seconds(120)
            .with_frontend_base_url("https://app.example.com".to_string());

        assert_eq!(config.access_ttl_seconds(), 60);
        assert_eq!(config.refresh_ttl_seconds(), 3600);
        assert_eq!(config.otp_ttl(), Duration::from_secs(30));
        assert_eq!(config.max_failures(), 3);
        assert_eq!(config.lockout_window(), Duration::from_secs(120));
        assert_eq!(config.frontend_base_url(), "https://app.example.com");
    }

    #[test]
    fn debug_redacts_secrets() {
        let rendered = format!("{:?}", config());
        assert!(!rendered.contains("access\""));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn zero_max_failures_is_clamped() {
        assert_eq!(config().with_max_failures(0).max_failures(), 1);
    }
}
