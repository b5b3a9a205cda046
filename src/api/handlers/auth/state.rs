//! Shared auth state handed to handlers via `Extension`.

use std::sync::Arc;

use crate::auth::{AuthConfig, AuthService};

pub struct AuthState {
    config: AuthConfig,
    service: Arc<AuthService>,
}

impl AuthState {
    pub fn new(config: AuthConfig, service: Arc<AuthService>) -> Self {
        Self { config, service }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn service(&self) -> &AuthService {
        &self.service
    }
}
