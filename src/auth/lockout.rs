//! Per-identity brute-force lockout tracking.
//!
//! State machine per identity: `Open` (no record, or a record with no
//! `locked_until`) and `Locked` (`locked_until` in the future). Failed
//! password and OTP attempts feed the same counter, so five failures in any
//! combination lock the identity.

use chrono::{DateTime, TimeDelta, Utc};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::error::AuthError;
use super::store::StateStore;

pub const DEFAULT_MAX_FAILURES: u32 = 5;
pub const DEFAULT_LOCKOUT_MINUTES: u64 = 15;

/// Failure state for one identity. Created lazily on the first failure and
/// deleted on success or when the lock expires.
#[derive(Clone, Debug)]
pub struct LockoutRecord {
    pub failure_count: u32,
    pub locked_until: Option<DateTime<Utc>>,
}

pub struct LockoutTracker {
    store: Arc<dyn StateStore<LockoutRecord>>,
    max_failures: u32,
    lockout_window: Duration,
    // Serializes read-modify-write sequences so two concurrent failures for
    // the same identity cannot under-count. Held only for the state
    // transition, never across hashing or I/O.
    guard: Mutex<()>,
}

impl LockoutTracker {
    pub fn new(store: Arc<dyn StateStore<LockoutRecord>>) -> Self {
        Self {
            store,
            max_failures: DEFAULT_MAX_FAILURES,
            lockout_window: Duration::from_secs(DEFAULT_LOCKOUT_MINUTES * 60),
            guard: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn with_max_failures(mut self, max_failures: u32) -> Self {
        self.max_failures = max_failures.max(1);
        self
    }

    #[must_use]
    pub fn with_lockout_window(mut self, window: Duration) -> Self {
        self.lockout_window = window;
        self
    }

    /// Gate an authentication attempt. Must run before any credential
    /// comparison so a locked identity never reaches the password hasher.
    ///
    /// # Errors
    /// Fails with `AccountLocked` while the lock is active.
    pub fn check(&self, identity: &str) -> Result<(), AuthError> {
        let _lock = self.guard.lock().map_err(poisoned)?;
        let Some(record) = self.store.get(identity) else {
            return Ok(());
        };
        let Some(locked_until) = record.locked_until else {
            return Ok(());
        };

        let now = Utc::now();
        if locked_until <= now {
            // Lock elapsed: the identity transitions back to Open.
            self.store.remove(identity);
            return Ok(());
        }

        Err(AuthError::AccountLocked {
            retry_after_minutes: minutes_ceil(locked_until - now),
        })
    }

    /// Count one failed credential or OTP check. Callers invoke this exactly
    /// once per failed secret comparison, never for validation-layer errors.
    pub fn record_failure(&self, identity: &str) -> Result<(), AuthError> {
        let _lock = self.guard.lock().map_err(poisoned)?;
        let mut record = self.store.get(identity).unwrap_or(LockoutRecord {
            failure_count: 0,
            locked_until: None,
        });
        record.failure_count += 1;
        if record.failure_count >= self.max_failures {
            record.locked_until = Some(Utc::now() + lockout_delta(self.lockout_window));
        }
        // Unlocked counters carry the window as a rolling TTL so abandoned
        // identities age out of the store.
        self.store.set(identity, record, self.lockout_window);
        Ok(())
    }

    /// Reset the counter after any successful authentication.
    pub fn clear(&self, identity: &str) -> Result<(), AuthError> {
        let _lock = self.guard.lock().map_err(poisoned)?;
        self.store.remove(identity);
        Ok(())
    }
}

fn lockout_delta(window: Duration) -> TimeDelta {
    TimeDelta::from_std(window).unwrap_or(TimeDelta::MAX)
}

/// Ceiling of the remaining lock time in whole minutes.
fn minutes_ceil(remaining: TimeDelta) -> i64 {
    let millis = remaining.num_milliseconds().max(0);
    (millis + 59_999) / 60_000
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> AuthError {
    AuthError::Internal(anyhow::anyhow!("lockout tracker mutex poisoned"))
}
