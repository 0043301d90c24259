// Account, role and request/response models for authentication

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::error::AuthError;
use crate::validation::validate_not_blank;

/// Role tags persisted in the `roles` table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleType {
    UserRole,
    AdminRole,
    ModeratorRole,
}

impl RoleType {
    /// Role assigned when a requested tag is absent or unrecognized
    pub const DEFAULT: RoleType = RoleType::UserRole;

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleType::UserRole => "USER_ROLE",
            RoleType::AdminRole => "ADMIN_ROLE",
            RoleType::ModeratorRole => "MODERATOR_ROLE",
        }
    }

    /// Map a role tag sent by a client to a role type.
    ///
    /// Matching is case-sensitive. Both the upper-case tags (`ADMIN`,
    /// `MODERATOR`) and the short lower-case tags (`admin`, `mod`) are
    /// accepted. Returns `None` for anything else so the caller can decide
    /// on a fallback.
    pub fn from_tag(tag: &str) -> Option<RoleType> {
        match tag {
            "ADMIN" | "admin" => Some(RoleType::AdminRole),
            "MODERATOR" | "mod" => Some(RoleType::ModeratorRole),
            "USER" | "user" => Some(RoleType::UserRole),
            _ => None,
        }
    }
}

impl fmt::Display for RoleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A role name that is none of the persisted role types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for RoleType {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER_ROLE" => Ok(RoleType::UserRole),
            "ADMIN_ROLE" => Ok(RoleType::AdminRole),
            "MODERATOR_ROLE" => Ok(RoleType::ModeratorRole),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Persisted role entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Role {
    pub id: i64,
    pub role: RoleType,
}

/// Raw row of the `roles` table
#[derive(Debug, FromRow)]
pub struct RoleRow {
    pub id: i64,
    pub role: String,
}

impl TryFrom<RoleRow> for Role {
    type Error = AuthError;

    fn try_from(row: RoleRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse::<RoleType>()
            .map_err(|e| AuthError::ConfigError(format!("{} in roles table", e)))?;
        Ok(Role { id: row.id, role })
    }
}

/// User account with the roles it holds
#[derive(Debug, Clone)]
pub struct Account {
    pub id: i64,
    pub last_name: String,
    pub first_name: String,
    pub login: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub deleted: bool,
    pub roles: BTreeSet<Role>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Role types in role id order
    pub fn role_types(&self) -> Vec<RoleType> {
        self.roles.iter().map(|r| r.role).collect()
    }
}

/// Raw row of the `users` table
#[derive(Debug, FromRow)]
pub struct AccountRow {
    pub id: i64,
    pub last_name: String,
    pub first_name: String,
    pub login: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
}

impl AccountRow {
    /// Attach the role rows loaded from `user_roles`
    pub fn with_roles(self, roles: Vec<RoleRow>) -> Result<Account, AuthError> {
        let roles = roles
            .into_iter()
            .map(Role::try_from)
            .collect::<Result<BTreeSet<_>, _>>()?;

        Ok(Account {
            id: self.id,
            last_name: self.last_name,
            first_name: self.first_name,
            login: self.login,
            email: self.email,
            password_hash: self.password_hash,
            deleted: self.deleted,
            roles,
            created_at: self.created_at,
        })
    }
}

/// Account about to be inserted; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub last_name: String,
    pub first_name: String,
    pub login: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub deleted: bool,
    pub roles: BTreeSet<Role>,
}

/// Identity established by a successful credential check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub subject: String,
    pub roles: Vec<RoleType>,
}

impl Principal {
    /// Role authorities joined into the single `role` claim, e.g. `ADMIN_ROLE`
    pub fn role_claim(&self) -> String {
        self.roles
            .iter()
            .map(RoleType::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Result of checking a login/password pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Authenticated(Principal),
    Rejected,
}

// Absent string fields deserialize as empty so that validation, not the JSON
// extractor, reports them alongside blank ones.

/// Registration request DTO
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SignUpRequest {
    #[schema(example = "Doe")]
    #[serde(default)]
    #[validate(custom = "validate_not_blank")]
    pub last_name: String,
    #[schema(example = "Jane")]
    #[serde(default)]
    #[validate(custom = "validate_not_blank")]
    pub first_name: String,
    #[schema(example = "jdoe")]
    #[serde(default)]
    #[validate(custom = "validate_not_blank")]
    pub login: String,
    #[serde(default)]
    #[validate(custom = "validate_not_blank")]
    pub password: String,
    #[schema(example = false)]
    #[serde(default)]
    #[validate(required)]
    pub deleted: Option<bool>,
    /// Requested role tag, e.g. `ADMIN`; unrecognized tags get the user role
    #[schema(example = "ADMIN")]
    #[serde(default)]
    #[validate(custom = "validate_not_blank")]
    pub role: String,
}

/// Registration with a username, an email and a set of role tags
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "jdoe")]
    #[serde(default)]
    #[validate(custom = "validate_not_blank")]
    pub username: String,
    #[schema(example = "jdoe@example.com")]
    #[serde(default)]
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    #[validate(custom = "validate_not_blank")]
    pub password: String,
    /// Requested role tags, e.g. `["admin", "mod"]`; absent or empty means user
    #[schema(example = json!(["admin", "mod"]))]
    #[serde(default)]
    pub role: Option<Vec<String>>,
}

/// Login request DTO
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "jdoe")]
    #[serde(default)]
    #[validate(custom = "validate_not_blank")]
    pub login: String,
    #[serde(default)]
    #[validate(custom = "validate_not_blank")]
    pub password: String,
}

/// Successful login payload; the token is also sent as a bearer header
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    #[schema(example = "jdoe")]
    pub username: String,
    #[schema(example = "ADMIN_ROLE")]
    pub role: String,
    #[schema(example = "Authentication successful")]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Identity carried by the caller's bearer token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MeResponse {
    #[schema(example = "jdoe")]
    pub username: String,
    #[schema(example = json!(["ADMIN_ROLE"]))]
    pub roles: Vec<String>,
}
