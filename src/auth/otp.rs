//! One-time-password issuance and verification.
//!
//! At most one live OTP per email: request and resend overwrite any prior
//! record. Verification is single-use and feeds the shared lockout counter on
//! mismatch. Responses to request/resend never reveal whether the email
//! exists.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;
use rand::rngs::OsRng;
use tracing::{info, warn};

use crate::accounts::{Account, AccountRepository};
use crate::api::email::{EmailMessage, EmailSender};

use super::error::AuthError;
use super::lockout::LockoutTracker;
use super::store::StateStore;

/// Generic response for request/resend, identical whether or not the email
/// exists.
pub const OTP_SENT_MESSAGE: &str =
    "If the email exists, a one-time password has been sent";

/// A live OTP for one email.
#[derive(Clone, Debug)]
pub struct OtpRecord {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

pub struct OtpManager {
    store: Arc<dyn StateStore<OtpRecord>>,
    lockout: Arc<LockoutTracker>,
    repo: Arc<dyn AccountRepository>,
    mailer: Arc<dyn EmailSender>,
    ttl: Duration,
    // Serializes verify's read-then-delete so a code can only be consumed
    // once under concurrent verification attempts. Never held across the
    // account lookup or email dispatch.
    guard: Mutex<()>,
}

impl OtpManager {
    pub fn new(
        store: Arc<dyn StateStore<OtpRecord>>,
        lockout: Arc<LockoutTracker>,
        repo: Arc<dyn AccountRepository>,
        mailer: Arc<dyn EmailSender>,
        ttl: Duration,
    ) -> Self {
        Self {
            store,
            lockout,
            repo,
            mailer,
            ttl,
            guard: Mutex::new(()),
        }
    }

    /// Generate and dispatch a fresh OTP for the email, overwriting any prior
    /// record. Unknown emails get the same generic message and no record.
    ///
    /// Delivery is best-effort: a failed send logs the code instead and the
    /// request still succeeds.
    ///
    /// # Errors
    /// `Internal` on repository faults only.
    pub async fn request(&self, email: &str) -> Result<&'static str, AuthError> {
        let Some(account) = self.repo.find_by_email(email).await? else {
            return Ok(OTP_SENT_MESSAGE);
        };

        let code = generate_code();
        let record = OtpRecord {
            code: code.clone(),
            expires_at: Utc::now() + ttl_delta(self.ttl),
        };
        self.store.set(email, record, self.ttl);

        self.dispatch(&account, &code);
        Ok(OTP_SENT_MESSAGE)
    }

    /// Regenerate and re-send. Same generation and storage as [`Self::request`]:
    /// the previous record is overwritten.
    ///
    /// # Errors
    /// `Internal` on repository faults only.
    pub async fn resend(&self, email: &str) -> Result<&'static str, AuthError> {
        self.request(email).await
    }

    /// Verify a code. Consumes the record on success (single use); a mismatch
    /// counts toward the shared lockout.
    ///
    /// # Errors
    /// `AccountLocked` while the identity is locked, `OtpInvalid` for a
    /// missing record or mismatch, `OtpExpired` past the TTL, `UserNotFound`
    /// if the account vanished after the record was created.
    pub async fn verify(&self, email: &str, code: &str) -> Result<Account, AuthError> {
        self.lockout.check(email)?;

        self.consume(email, code)?;

        self.lockout.clear(email)?;

        let Some(account) = self.repo.find_by_email(email).await? else {
            return Err(AuthError::UserNotFound);
        };
        Ok(account)
    }

    /// The state transition of `verify`: read the record, compare, and delete
    /// on match, all under the guard.
    fn consume(&self, email: &str, code: &str) -> Result<(), AuthError> {
        let _lock = self.guard.lock().map_err(poisoned)?;

        let Some(record) = self.store.get(email) else {
            return Err(AuthError::OtpInvalid);
        };

        if Utc::now() > record.expires_at {
            self.store.remove(email);
            return Err(AuthError::OtpExpired);
        }

        if record.code != code {
            self.lockout.record_failure(email)?;
            return Err(AuthError::OtpInvalid);
        }

        self.store.remove(email);
        Ok(())
    }

    fn dispatch(&self, account: &Account, code: &str) {
        let message = EmailMessage {
            to: account.email.clone(),
            subject: "Your one-time login code".to_string(),
            html: format!(
                "<p>Your login code is <strong>{code}</strong>. \
                 It expires in {} minutes.</p>",
                self.ttl.as_secs() / 60
            ),
        };
        if let Err(err) = self.mailer.send(&message) {
            warn!(email = %account.email, "OTP email delivery failed: {err:#}");
            // Fallback path so the code is still reachable by an operator.
            info!(email = %account.email, code = %code, "OTP delivery fallback");
        }
    }
}

/// 6-digit code from the OS entropy source.
fn generate_code() -> String {
    let value: u32 = OsRng.gen_range(0..1_000_000);
    format!("{value:06}")
}

fn ttl_delta(ttl: Duration) -> TimeDelta {
    TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX)
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> AuthError {
    AuthError::Internal(anyhow::anyhow!("otp manager mutex poisoned"))
}
