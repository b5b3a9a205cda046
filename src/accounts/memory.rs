//! In-memory account repository used by the integration tests.

use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use super::{Account, AccountRepository, CreateOutcome, NewAccount};

/// Keyed by account id; email uniqueness is enforced by a linear scan, which
/// is fine at test scale.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: DashMap<Uuid, Account>,
}

impl InMemoryAccountRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the active flag; the repository trait intentionally has no
    /// deactivation operation, tests use this directly.
    pub fn set_active(&self, id: Uuid, is_active: bool) {
        if let Some(mut entry) = self.accounts.get_mut(&id) {
            entry.is_active = is_active;
        }
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        Ok(self
            .accounts
            .iter()
            .find(|entry| entry.value().email == email)
            .map(|entry| entry.value().clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>> {
        Ok(self.accounts.get(&id).map(|entry| entry.value().clone()))
    }

    async fn create(&self, account: NewAccount) -> Result<CreateOutcome> {
        if self.find_by_email(&account.email).await?.is_some() {
            return Ok(CreateOutcome::Conflict);
        }
        let created = Account {
            id: Uuid::new_v4(),
            name: account.name,
            phone: account.phone,
            email: account.email,
            password_hash: account.password_hash,
            role: account.role,
            is_active: true,
            refresh_token: None,
        };
        self.accounts.insert(created.id, created.clone());
        Ok(CreateOutcome::Created(created))
    }

    async fn update_refresh_token(&self, id: Uuid, token: Option<&str>) -> Result<()> {
        if let Some(mut entry) = self.accounts.get_mut(&id) {
            entry.refresh_token = token.map(str::to_string);
        }
        Ok(())
    }
}
