// JWT token generation and validation service

use crate::auth::error::AuthError;
use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

/// Default token lifetime: 24 hours
pub const DEFAULT_TOKEN_DURATION: i64 = 86_400;

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,  // login
    pub role: String, // comma-joined role authorities
    pub iat: i64,
    pub exp: i64,
}

/// Token service for JWT operations (HS256)
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    token_duration: i64, // in seconds
}

impl TokenService {
    /// Create a new TokenService with secret key and token lifetime in seconds
    pub fn new(secret: String, token_duration: i64) -> Self {
        Self {
            secret,
            token_duration,
        }
    }

    pub fn token_duration(&self) -> i64 {
        self.token_duration
    }

    /// Issue a token for `subject` carrying the `role` claim, stamped now
    pub fn generate_token(&self, subject: &str, role: &str) -> Result<String, AuthError> {
        self.generate_token_at(subject, role, Utc::now().timestamp())
    }

    /// Issue a token with an explicit issued-at timestamp.
    ///
    /// Identical inputs produce an identical token.
    pub fn generate_token_at(
        &self,
        subject: &str,
        role: &str,
        issued_at: i64,
    ) -> Result<String, AuthError> {
        let claims = Claims {
            sub: subject.to_string(),
            role: role.to_string(),
            iat: issued_at,
            exp: issued_at + self.token_duration,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenGenerationError(e.to_string()))
    }

    /// Verify signature and expiry and return the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::default();

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => AuthError::InvalidToken,
        })
    }
}
