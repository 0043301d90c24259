// Role resolution: requested role tags to persisted roles

use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::auth::{
    error::AuthError,
    models::{Role, RoleType},
    repository::CredentialStore,
};

/// Maps role tags sent at sign-up to role rows.
///
/// Unrecognized or absent tags fall back to the default user role. A role
/// that is missing from storage is a configuration error; roles are
/// reference data and are never created here.
#[derive(Clone)]
pub struct RoleResolver {
    store: Arc<dyn CredentialStore>,
}

impl RoleResolver {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Resolve a single requested tag
    pub async fn resolve(&self, tag: Option<&str>) -> Result<Role, AuthError> {
        let role_type = match tag {
            Some(tag) => RoleType::from_tag(tag).unwrap_or_else(|| {
                warn!(
                    "Unrecognized role tag '{}', falling back to {}",
                    tag,
                    RoleType::DEFAULT
                );
                RoleType::DEFAULT
            }),
            None => RoleType::DEFAULT,
        };

        self.load(role_type).await
    }

    /// Resolve a set of requested tags, each independently.
    ///
    /// An absent or empty set yields just the default role, so every account
    /// holds at least one role.
    pub async fn resolve_all(&self, tags: Option<&[String]>) -> Result<BTreeSet<Role>, AuthError> {
        let mut roles = BTreeSet::new();

        match tags {
            Some(tags) if !tags.is_empty() => {
                for tag in tags {
                    roles.insert(self.resolve(Some(tag.as_str())).await?);
                }
            }
            _ => {
                roles.insert(self.load(RoleType::DEFAULT).await?);
            }
        }

        Ok(roles)
    }

    async fn load(&self, role_type: RoleType) -> Result<Role, AuthError> {
        let role = self.store.find_role(role_type).await?.ok_or_else(|| {
            error!("Role {} is not defined in the roles table", role_type);
            AuthError::ConfigError(format!("role {} is not defined", role_type))
        })?;

        debug!("Resolved role {} (id {})", role.role, role.id);
        Ok(role)
    }
}
