//! Account model and repository contract.
//!
//! The auth core treats account persistence as an external collaborator: every
//! component that needs account data receives an `Arc<dyn AccountRepository>`.
//! The Postgres implementation backs the server; the in-memory implementation
//! backs the integration tests.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

mod memory;
mod postgres;

pub use memory::InMemoryAccountRepository;
pub use postgres::PgAccountRepository;

/// Role tag carried in token claims. No further authorization policy is
/// derived from it here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Client,
}

/// A durable account record.
///
/// `refresh_token` holds the single currently valid refresh token, or `None`
/// after logout. Every successful issue overwrites it.
#[derive(Clone, Debug)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
    pub refresh_token: Option<String>,
}

/// Fields required to create an account. The id is assigned by the repository.
#[derive(Clone, Debug)]
pub struct NewAccount {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

/// Outcome when attempting to create a new account.
#[derive(Debug)]
pub enum CreateOutcome {
    Created(Account),
    Conflict,
}

/// Sanitized account view returned to callers. Never carries the password
/// hash or the stored refresh token.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub is_active: bool,
}

impl From<&Account> for Profile {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            name: account.name.clone(),
            email: account.email.clone(),
            role: account.role,
            is_active: account.is_active,
        }
    }
}

/// Persistence contract consumed by the auth core.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>>;

    /// Create an account; a duplicate email yields `CreateOutcome::Conflict`
    /// rather than an error.
    async fn create(&self, account: NewAccount) -> Result<CreateOutcome>;

    /// Overwrite the stored refresh token. `None` revokes the active session.
    async fn update_refresh_token(&self, id: Uuid, token: Option<&str>) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_role_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&UserRole::Admin).ok().as_deref(),
            Some("\"admin\"")
        );
        assert_eq!(
            serde_json::to_string(&UserRole::Client).ok().as_deref(),
            Some("\"client\"")
        );
    }

    #[test]
    fn profile_never_exposes_secrets() {
        let account = Account {
            id: Uuid::new_v4(),
            name: "Alice".to_string(),
            phone: "+15550100".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$2b$10$hash".to_string(),
            role: UserRole::Client,
            is_active: true,
            refresh_token: Some("token".to_string()),
        };
        let profile = Profile::from(&account);
        let json = serde_json::to_value(&profile).ok();
        assert!(json.is_some());
        if let Some(json) = json {
            assert_eq!(json.get("email").and_then(|v| v.as_str()), Some("alice@example.com"));
            assert_eq!(json.get("isActive").and_then(serde_json::Value::as_bool), Some(true));
            assert!(json.get("passwordHash").is_none());
            assert!(json.get("refreshToken").is_none());
        }
    }

    #[test]
    fn create_outcome_debug_names() {
        assert_eq!(format!("{:?}", CreateOutcome::Conflict), "Conflict");
    }
}
