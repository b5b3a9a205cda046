//! Email/password credential validation.

use std::sync::Arc;

use anyhow::Context;

use crate::accounts::{AccountRepository, Profile};

use super::error::AuthError;

/// bcrypt cost factor used when hashing new passwords.
const BCRYPT_COST: u32 = 10;

/// Stateless check of an email/password pair against the stored hash.
/// Failure counting is the caller's responsibility.
pub struct CredentialValidator {
    repo: Arc<dyn AccountRepository>,
}

impl CredentialValidator {
    pub fn new(repo: Arc<dyn AccountRepository>) -> Self {
        Self { repo }
    }

    /// Validate a credential pair and return the sanitized profile.
    ///
    /// A missing account, a hash mismatch, and an inactive account all fail
    /// with `InvalidCredentials` so the response never reveals which it was.
    ///
    /// # Errors
    /// `InvalidCredentials` on any mismatch; `Internal` on repository or
    /// hasher faults.
    pub async fn validate(&self, email: &str, password: &str) -> Result<Profile, AuthError> {
        let Some(account) = self.repo.find_by_email(email).await? else {
            return Err(AuthError::InvalidCredentials);
        };

        let matches = bcrypt::verify(password, &account.password_hash)
            .context("password hash comparison failed")?;
        if !matches || !account.is_active {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(Profile::from(&account))
    }
}

/// Hash a password for storage.
///
/// # Errors
/// `Internal` if the hasher fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    Ok(bcrypt::hash(password, BCRYPT_COST).context("password hashing failed")?)
}
