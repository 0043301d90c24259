// Authentication error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;
use tracing::{debug, error, warn};

/// Authentication error types
///
/// Every variant maps to one HTTP status. Internal variants carry the cause
/// for logging only; clients get a generic message.
#[derive(Debug)]
pub enum AuthError {
    /// Request DTO failed validation; lists each offending field
    ValidationError(validator::ValidationErrors),
    /// Body that is not a JSON object of the expected shape
    MalformedRequest(String),
    /// Unknown login, wrong password or soft-deleted account
    InvalidCredentials,
    InvalidToken,
    ExpiredToken,
    MissingToken,
    /// Login already registered
    LoginTaken,
    /// Email already registered
    EmailTaken,
    DatabaseError(String),
    PasswordHashError(String),
    TokenGenerationError(String),
    /// Reference data or settings the service cannot run without
    ConfigError(String),
    /// Unexpected failure while logging in; carries the cause for the log
    LoginFailed(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::ValidationError(errors) => write!(f, "Validation error: {}", errors),
            AuthError::MalformedRequest(msg) => write!(f, "Malformed request: {}", msg),
            AuthError::InvalidCredentials => write!(f, "Invalid login or password"),
            AuthError::InvalidToken => write!(f, "Invalid token"),
            AuthError::ExpiredToken => write!(f, "Token has expired"),
            AuthError::MissingToken => write!(f, "Missing authentication token"),
            AuthError::LoginTaken => write!(f, "Login already taken"),
            AuthError::EmailTaken => write!(f, "Email already taken"),
            AuthError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AuthError::PasswordHashError(msg) => write!(f, "Password hashing error: {}", msg),
            AuthError::TokenGenerationError(msg) => write!(f, "Token generation error: {}", msg),
            AuthError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AuthError::LoginFailed(msg) => write!(f, "Login failed: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

/// JSON body of every error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::ValidationError(errors) => debug!("Validation error: {:?}", errors),
            AuthError::MalformedRequest(msg) => debug!("Malformed request body: {}", msg),
            AuthError::InvalidCredentials => warn!("Rejected login attempt"),
            AuthError::InvalidToken => warn!("Invalid token attempt"),
            AuthError::ExpiredToken => warn!("Expired token attempt"),
            AuthError::MissingToken => warn!("Missing token in request"),
            AuthError::LoginTaken => warn!("Sign-up attempt with an existing login"),
            AuthError::EmailTaken => warn!("Sign-up attempt with an existing email"),
            AuthError::DatabaseError(msg) => error!("Database error in auth: {}", msg),
            AuthError::PasswordHashError(msg) => error!("Password hashing error: {}", msg),
            AuthError::TokenGenerationError(msg) => error!("Token generation error: {}", msg),
            AuthError::ConfigError(msg) => error!("Authentication configuration error: {}", msg),
            AuthError::LoginFailed(msg) => error!("Login failed unexpectedly: {}", msg),
        }

        let details = match &self {
            AuthError::ValidationError(errors) => {
                Some(serde_json::to_value(errors).unwrap_or(serde_json::json!({})))
            }
            _ => None,
        };

        let body = ErrorResponse {
            error: self.error_title().to_string(),
            message: self.error_message(),
            details,
        };

        (self.status_code(), Json(body)).into_response()
    }
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AuthError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::ExpiredToken => StatusCode::UNAUTHORIZED,
            AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            AuthError::LoginTaken => StatusCode::BAD_REQUEST,
            AuthError::EmailTaken => StatusCode::BAD_REQUEST,
            AuthError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::PasswordHashError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::TokenGenerationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::LoginFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short machine-friendly title used as the `error` field
    pub fn error_title(&self) -> &'static str {
        match self {
            AuthError::ValidationError(_) => "Validation failed",
            AuthError::MalformedRequest(_) => "Malformed request",
            AuthError::InvalidCredentials => "Invalid credentials",
            AuthError::InvalidToken | AuthError::ExpiredToken | AuthError::MissingToken => {
                "Unauthorized"
            }
            AuthError::LoginTaken => "Login taken",
            AuthError::EmailTaken => "Email taken",
            AuthError::DatabaseError(_)
            | AuthError::PasswordHashError(_)
            | AuthError::TokenGenerationError(_)
            | AuthError::ConfigError(_) => "Internal server error",
            AuthError::LoginFailed(_) => "Authentication failed",
        }
    }

    /// Get a descriptive error message for this error
    /// This message is safe to send to clients (no sensitive data)
    pub fn error_message(&self) -> String {
        match self {
            AuthError::ValidationError(_) => "Request validation failed".to_string(),
            AuthError::MalformedRequest(msg) => msg.clone(),
            AuthError::InvalidCredentials => "Username or password incorrect".to_string(),
            AuthError::InvalidToken => "Invalid token".to_string(),
            AuthError::ExpiredToken => "Token has expired".to_string(),
            AuthError::MissingToken => "Missing authentication token".to_string(),
            AuthError::LoginTaken => "the login is already taken".to_string(),
            AuthError::EmailTaken => "the email is already taken".to_string(),
            AuthError::DatabaseError(_)
            | AuthError::PasswordHashError(_)
            | AuthError::TokenGenerationError(_)
            | AuthError::ConfigError(_)
            | AuthError::LoginFailed(_) => "An unexpected error occurred".to_string(),
        }
    }

    /// Fold internal failures of the login flow into `LoginFailed`.
    ///
    /// Client-facing outcomes such as bad credentials pass through unchanged.
    pub fn into_login_failure(self) -> Self {
        match self {
            AuthError::DatabaseError(_)
            | AuthError::PasswordHashError(_)
            | AuthError::TokenGenerationError(_)
            | AuthError::ConfigError(_) => AuthError::LoginFailed(self.to_string()),
            other => other,
        }
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(error: sqlx::Error) -> Self {
        AuthError::DatabaseError(error.to_string())
    }
}

impl From<axum::extract::rejection::JsonRejection> for AuthError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        AuthError::MalformedRequest(rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for AuthError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AuthError::ValidationError(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::LoginTaken.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AuthError::ConfigError("x".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AuthError::DatabaseError("x".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_errors_do_not_leak_cause() {
        let errors = vec![
            AuthError::DatabaseError("relation \"users\" does not exist".to_string()),
            AuthError::PasswordHashError("invalid PHC string".to_string()),
            AuthError::TokenGenerationError("bad key".to_string()),
            AuthError::ConfigError("role USER_ROLE missing".to_string()),
        ];

        for error in errors {
            let message = error.error_message();
            assert_eq!(message, "An unexpected error occurred");
            assert_eq!(error.error_title(), "Internal server error");
        }
    }

    #[test]
    fn test_credentials_error_is_generic() {
        let error = AuthError::InvalidCredentials;
        assert_eq!(error.error_title(), "Invalid credentials");
        assert_eq!(error.error_message(), "Username or password incorrect");
    }

    #[test]
    fn test_login_failure_keeps_client_errors() {
        let folded = AuthError::PasswordHashError("invalid PHC string".to_string()).into_login_failure();
        assert!(matches!(folded, AuthError::LoginFailed(_)));
        assert_eq!(folded.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(folded.error_title(), "Authentication failed");
        assert_eq!(folded.error_message(), "An unexpected error occurred");

        assert!(matches!(
            AuthError::InvalidCredentials.into_login_failure(),
            AuthError::InvalidCredentials
        ));
    }

    #[test]
    fn test_taken_email_is_bad_request() {
        let error = AuthError::EmailTaken;
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(error.error_message(), "the email is already taken");
    }
}
