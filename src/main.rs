mod auth;
mod config;
mod db;
mod error;
mod validation;

use axum::{
    extract::FromRef,
    http::header,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use auth::{
    login_handler, me_handler, register_handler, register_with_roles_handler, AuthService,
    CredentialStore, LoginRequest, LoginResponse, MeResponse, MessageResponse, PgCredentialStore,
    RegisterRequest, SignUpRequest, TokenService,
};
use config::AppConfig;
use error::StartupError;

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::handlers::register_handler,
        auth::handlers::register_with_roles_handler,
        auth::handlers::login_handler,
        auth::handlers::me_handler,
    ),
    components(
        schemas(
            SignUpRequest,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            MessageResponse,
            MeResponse
        )
    ),
    tags(
        (name = "auth", description = "Account registration and login")
    ),
    info(
        title = "Annotation Auth API",
        version = "0.1.0",
        description = "Registration and JWT login for the text-annotation platform"
    )
)]
struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
struct AppState {
    auth: Arc<AuthService>,
}

impl AppState {
    fn new(store: Arc<dyn CredentialStore>, token_service: TokenService) -> Self {
        Self {
            auth: Arc::new(AuthService::new(store, token_service)),
        }
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

impl FromRef<AppState> for TokenService {
    fn from_ref(state: &AppState) -> Self {
        state.auth.token_service().clone()
    }
}

/// Creates and configures the application router
/// Maps the auth endpoints to their handlers and adds CORS and request tracing
fn create_router(state: AppState) -> Router {
    // Any origin may call the API; browsers may read the bearer header
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([header::AUTHORIZATION])
        .max_age(Duration::from_secs(3600));

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // API routes
        .route("/api/auth/signup", post(register_handler))
        .route("/api/auth/register", post(register_with_roles_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/me", get(me_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn run() -> Result<(), StartupError> {
    let config = AppConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database_url, config.database_max_connections).await?;

    db::run_migrations(&db_pool).await?;
    db::ensure_default_role(&db_pool).await?;

    let token_service = TokenService::new(config.jwt_secret.clone(), config.jwt_expiration);
    tracing::info!("Issuing tokens valid for {} seconds", token_service.token_duration());

    let store: Arc<dyn CredentialStore> = Arc::new(PgCredentialStore::new(db_pool));
    let app = create_router(AppState::new(store, token_service));

    let addr = config.bind_address();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Annotation auth API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Annotation auth API - Starting...");

    if let Err(e) = run().await {
        tracing::error!("Startup failed: {}", e);
        std::process::exit(1);
    }
}
