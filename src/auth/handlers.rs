// HTTP handlers for authentication endpoints

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::auth::{
    error::AuthError,
    extract::ValidatedJson,
    middleware::AuthenticatedUser,
    models::{
        LoginRequest, LoginResponse, MeResponse, MessageResponse, RegisterRequest, SignUpRequest,
    },
    service::AuthService,
};

/// Register a new account
/// POST /api/auth/signup
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignUpRequest,
    responses(
        (status = 200, description = "Account created", body = MessageResponse),
        (status = 400, description = "Login already taken or invalid input", body = String, example = json!({"error": "Login taken", "message": "the login is already taken"})),
        (status = 500, description = "Internal server error")
    ),
    tag = "auth"
)]
pub async fn register_handler(
    State(service): State<Arc<AuthService>>,
    ValidatedJson(request): ValidatedJson<SignUpRequest>,
) -> Result<Json<MessageResponse>, AuthError> {
    tracing::debug!("Sign-up request received");

    let response = service.register(request).await?;
    Ok(Json(response))
}

/// Register an account with an email and a set of role tags
/// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = MessageResponse),
        (status = 400, description = "Username or email already taken or invalid input", body = String, example = json!({"error": "Email taken", "message": "the email is already taken"})),
        (status = 500, description = "Internal server error")
    ),
    tag = "auth"
)]
pub async fn register_with_roles_handler(
    State(service): State<Arc<AuthService>>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<Json<MessageResponse>, AuthError> {
    tracing::debug!("Registration request received");

    let response = service.register_with_roles(request).await?;
    Ok(Json(response))
}

/// Log in and receive a bearer token
/// POST /api/auth/login
///
/// The token is returned in the body and in the `Authorization` header.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse,
            headers(("Authorization" = String, description = "Bearer <token>"))),
        (status = 401, description = "Bad credentials", body = String, example = json!({"error": "Invalid credentials", "message": "Username or password incorrect"})),
        (status = 500, description = "Authentication failed", body = String, example = json!({"error": "Authentication failed", "message": "An unexpected error occurred"}))
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(service): State<Arc<AuthService>>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AuthError> {
    tracing::debug!("Login request received");

    let response: LoginResponse = service.login(request).await?;
    let bearer = format!("Bearer {}", response.token);

    tracing::info!("Successful login for {}", response.username);
    Ok(([(header::AUTHORIZATION, bearer)], Json(response)))
}

/// Identity of the caller
/// GET /api/auth/me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Identity carried by the bearer token", body = MeResponse),
        (status = 401, description = "Missing, invalid or expired token")
    ),
    tag = "auth"
)]
pub async fn me_handler(user: AuthenticatedUser) -> Json<MeResponse> {
    Json(MeResponse {
        username: user.subject,
        roles: user.roles.iter().map(|r| r.to_string()).collect(),
    })
}
