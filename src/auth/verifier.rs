// Credential verification: login/password to an explicit authentication result

use std::sync::Arc;
use tracing::debug;

use crate::auth::{
    error::AuthError,
    models::{AuthOutcome, Principal},
    password::PasswordService,
    repository::CredentialStore,
};

#[derive(Clone)]
pub struct CredentialVerifier {
    store: Arc<dyn CredentialStore>,
}

impl CredentialVerifier {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Check a login/password pair.
    ///
    /// Unknown logins, soft-deleted accounts and wrong passwords all come back
    /// as `AuthOutcome::Rejected` so callers cannot tell them apart. `Err` is
    /// reserved for failures of the store or of the stored hash.
    pub async fn authenticate(&self, login: &str, password: &str) -> Result<AuthOutcome, AuthError> {
        let account = match self.store.find_by_login(login).await? {
            Some(account) => account,
            None => {
                debug!("Login attempt for unknown account");
                return Ok(AuthOutcome::Rejected);
            }
        };

        if account.deleted {
            debug!("Login attempt for deleted account id {}", account.id);
            return Ok(AuthOutcome::Rejected);
        }

        let password_ok = PasswordService::verify_password_blocking(
            password.to_string(),
            account.password_hash.clone(),
        )
        .await?;
        if !password_ok {
            debug!("Password mismatch for account id {}", account.id);
            return Ok(AuthOutcome::Rejected);
        }

        Ok(AuthOutcome::Authenticated(Principal {
            roles: account.role_types(),
            subject: account.login,
        }))
    }
}
