// Bearer-token extractor for protected routes

use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use tracing::debug;

use crate::auth::{error::AuthError, models::RoleType, token::TokenService};

/// Identity carried by a valid bearer token.
///
/// Handlers that need the caller take this as a parameter; nothing is kept
/// in ambient request state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub subject: String,
    pub roles: Vec<RoleType>,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    TokenService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AuthError::MissingToken)?
            .to_str()
            .map_err(|_| AuthError::InvalidToken)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidToken)?;

        let token_service = TokenService::from_ref(state);
        let claims = token_service.validate_token(token)?;

        // A token whose role claim names an unknown role is not ours
        let roles = claims
            .role
            .split(',')
            .filter(|r| !r.is_empty())
            .map(|r| r.parse::<RoleType>().map_err(|_| AuthError::InvalidToken))
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Authenticated request for {}", claims.sub);
        Ok(AuthenticatedUser {
            subject: claims.sub,
            roles,
        })
    }
}
