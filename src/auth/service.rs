// Authentication service - business logic layer

use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::auth::{
    error::AuthError,
    models::{
        AuthOutcome, LoginRequest, LoginResponse, MessageResponse, NewAccount, RegisterRequest,
        SignUpRequest,
    },
    password::PasswordService,
    repository::CredentialStore,
    roles::RoleResolver,
    token::TokenService,
    verifier::CredentialVerifier,
};

/// Authentication service coordinating sign-up and login.
///
/// Holds no per-request state; every call stands alone.
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    role_resolver: RoleResolver,
    verifier: CredentialVerifier,
    token_service: TokenService,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(store: Arc<dyn CredentialStore>, token_service: TokenService) -> Self {
        Self {
            role_resolver: RoleResolver::new(store.clone()),
            verifier: CredentialVerifier::new(store.clone()),
            store,
            token_service,
        }
    }

    pub fn token_service(&self) -> &TokenService {
        &self.token_service
    }

    /// Register a new account
    ///
    /// This method:
    /// 1. Validates the request
    /// 2. Rejects a login that is already taken
    /// 3. Resolves the requested role tag
    /// 4. Hashes the password and inserts the account
    pub async fn register(&self, request: SignUpRequest) -> Result<MessageResponse, AuthError> {
        // 1. Validate request
        request.validate()?;

        // 2. Fast-path duplicate check; the unique constraint is the real guard
        if self.store.login_exists(&request.login).await? {
            warn!("Sign-up rejected, login already taken");
            return Err(AuthError::LoginTaken);
        }

        // 3. Resolve role
        let role = self.role_resolver.resolve(Some(request.role.as_str())).await?;

        // 4. Hash and insert
        let password_hash = PasswordService::hash_password_blocking(request.password).await?;
        let account = self
            .store
            .create_account(NewAccount {
                last_name: request.last_name,
                first_name: request.first_name,
                login: request.login,
                email: None,
                password_hash,
                deleted: request.deleted.unwrap_or(false),
                roles: BTreeSet::from([role]),
            })
            .await?;

        info!("Registered account id {} with role {}", account.id, role.role);
        Ok(MessageResponse::new("new user added with success"))
    }

    /// Register an account from a username, an email and a set of role tags
    ///
    /// Each tag is resolved on its own and the account keeps every distinct
    /// role. The username becomes the login.
    pub async fn register_with_roles(
        &self,
        request: RegisterRequest,
    ) -> Result<MessageResponse, AuthError> {
        request.validate()?;

        if self.store.login_exists(&request.username).await? {
            warn!("Registration rejected, username already taken");
            return Err(AuthError::LoginTaken);
        }
        if self.store.email_exists(&request.email).await? {
            warn!("Registration rejected, email already taken");
            return Err(AuthError::EmailTaken);
        }

        let roles = self.role_resolver.resolve_all(request.role.as_deref()).await?;

        let password_hash = PasswordService::hash_password_blocking(request.password).await?;
        let account = self
            .store
            .create_account(NewAccount {
                last_name: String::new(),
                first_name: String::new(),
                login: request.username,
                email: Some(request.email),
                password_hash,
                deleted: false,
                roles,
            })
            .await?;

        info!(
            "Registered account id {} with roles {:?}",
            account.id,
            account.role_types()
        );
        Ok(MessageResponse::new("user registered successfully"))
    }

    /// Log an account in and issue a bearer token
    ///
    /// Failures other than bad input or bad credentials come back as
    /// `AuthError::LoginFailed`.
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AuthError> {
        self.try_login(request)
            .await
            .map_err(AuthError::into_login_failure)
    }

    async fn try_login(&self, request: LoginRequest) -> Result<LoginResponse, AuthError> {
        request.validate()?;

        let principal = match self
            .verifier
            .authenticate(&request.login, &request.password)
            .await?
        {
            AuthOutcome::Authenticated(principal) => principal,
            AuthOutcome::Rejected => return Err(AuthError::InvalidCredentials),
        };

        let role = principal.role_claim();
        let token = self.token_service.generate_token(&principal.subject, &role)?;

        debug!("Issued token for {} with role claim {}", principal.subject, role);
        Ok(LoginResponse {
            token,
            username: principal.subject,
            role,
            message: "Authentication successful".to_string(),
        })
    }
}
