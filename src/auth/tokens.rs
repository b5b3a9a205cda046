//! JWT issuance, verification, and refresh-token rotation.
//!
//! Two [`JwtSigner`]s with distinct secrets and TTLs sign the access and
//! refresh tokens. The refresh token is also persisted on the account record;
//! only the most recently stored value is honored on refresh, which is what
//! revokes a replayed (already rotated) token.

use std::sync::Arc;

use anyhow::Context;
use chrono::{TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::accounts::{Account, AccountRepository, Profile, UserRole};

use super::error::AuthError;

/// Claims carried by both token kinds.
///
/// `jti` makes every minted token unique even within the same second, so a
/// rotated refresh token never collides with the one it replaces.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: UserRole,
    pub jti: Uuid,
    pub iat: i64,
    pub exp: i64,
}

/// One HS256 signer with its own secret and TTL.
pub struct JwtSigner {
    secret: SecretString,
    ttl_seconds: i64,
}

impl JwtSigner {
    #[must_use]
    pub fn new(secret: SecretString, ttl_seconds: i64) -> Self {
        Self {
            secret,
            ttl_seconds,
        }
    }

    /// Sign a token for the account.
    ///
    /// # Errors
    /// `Internal` if encoding fails.
    pub fn sign(&self, account: &Account) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: account.id,
            email: account.email.clone(),
            role: account.role,
            jti: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: (now + TimeDelta::seconds(self.ttl_seconds)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.expose_secret().as_bytes()),
        )
        .context("failed to encode token")?;
        Ok(token)
    }

    /// Verify signature and expiry, returning the claims.
    ///
    /// Bad signature, expiry, and malformed tokens all fold into
    /// `TokenInvalid`; no cryptographic detail leaks to the caller.
    ///
    /// # Errors
    /// `TokenInvalid` on any verification failure.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let key = DecodingKey::from_secret(self.secret.expose_secret().as_bytes());
        let mut validation = Validation::default();
        validation.validate_exp = true;
        decode::<Claims>(token, &key, &validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::TokenInvalid)
    }
}

/// A freshly minted token pair.
#[derive(Clone, Debug)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Token pair plus the sanitized user view, returned on login/register/OTP.
#[derive(Clone, Debug)]
pub struct IssuedSession {
    pub access_token: String,
    pub refresh_token: String,
    pub user: Profile,
}

pub struct TokenIssuer {
    access: JwtSigner,
    refresh: JwtSigner,
    repo: Arc<dyn AccountRepository>,
}

impl TokenIssuer {
    pub fn new(access: JwtSigner, refresh: JwtSigner, repo: Arc<dyn AccountRepository>) -> Self {
        Self {
            access,
            refresh,
            repo,
        }
    }

    /// Mint a token pair and persist the refresh token on the account,
    /// overwriting any prior value. This is the rotation point: whatever
    /// refresh token existed before this call is now dead.
    ///
    /// # Errors
    /// `Internal` on signing or persistence faults.
    pub async fn issue(&self, account: &Account) -> Result<IssuedSession, AuthError> {
        let access_token = self.access.sign(account)?;
        let refresh_token = self.refresh.sign(account)?;

        self.repo
            .update_refresh_token(account.id, Some(&refresh_token))
            .await?;

        Ok(IssuedSession {
            access_token,
            refresh_token,
            user: Profile::from(account),
        })
    }

    /// Exchange a refresh token for a fresh pair.
    ///
    /// The presented token must verify against the refresh secret, resolve to
    /// an existing account, and match the stored token by exact string
    /// equality. A replayed older token fails the equality check and is
    /// rejected.
    ///
    /// # Errors
    /// `TokenInvalid` on any verification, lookup, or equality failure.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self.refresh.verify(refresh_token)?;

        let Some(account) = self.repo.find_by_id(claims.sub).await? else {
            return Err(AuthError::TokenInvalid);
        };

        if account.refresh_token.as_deref() != Some(refresh_token) {
            return Err(AuthError::TokenInvalid);
        }

        let session = self.issue(&account).await?;
        Ok(TokenPair {
            access_token: session.access_token,
            refresh_token: session.refresh_token,
        })
    }

    /// Revoke the stored refresh token, ending the active session.
    ///
    /// # Errors
    /// `Internal` on persistence faults.
    pub async fn logout(&self, account_id: Uuid) -> Result<(), AuthError> {
        self.repo.update_refresh_token(account_id, None).await?;
        Ok(())
    }

    /// Verify an access token (bearer auth for protected endpoints).
    ///
    /// # Errors
    /// `TokenInvalid` on any verification failure.
    pub fn verify_access(&self, token: &str) -> Result<Claims, AuthError> {
        self.access.verify(token)
    }
}
