// Authentication module
// Account registration and JWT login backed by a credential store

pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod roles;
pub mod service;
pub mod token;
pub mod verifier;

// Re-export commonly used types
pub use handlers::{login_handler, me_handler, register_handler, register_with_roles_handler};
pub use models::{
    LoginRequest, LoginResponse, MeResponse, MessageResponse, RegisterRequest, RoleType,
    SignUpRequest,
};
pub use repository::{CredentialStore, PgCredentialStore};
pub use service::AuthService;
pub use token::TokenService;
