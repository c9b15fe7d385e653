use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
};
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::{AppConfig, CorsConfig},
    database,
    error::{AppError, Result},
    routes,
    utils::jwt::JwtKeys,
};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub jwt: JwtKeys,
    pub secure_cookies: bool,
}

impl AppState {
    pub fn new(db: PgPool, config: &AppConfig) -> Self {
        Self {
            db,
            jwt: JwtKeys::new(&config.auth.jwt_secret, config.auth.token_ttl_seconds),
            secure_cookies: config.environment.secure_cookies(),
        }
    }
}

pub async fn build(config: &AppConfig) -> Result<Router> {
    let pool = database::create_pool(&config.database).await?;
    let state = AppState::new(pool, config);

    build_router(state, &config.cors, config.server.max_body_size)
}

/// Full application router with CORS, tracing and body limit layers applied.
pub fn build_router(state: AppState, cors: &CorsConfig, max_body_size: usize) -> Result<Router> {
    let allowed_origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| AppError::ConfigError(format!("Invalid CORS origin: {}", origin)))
        })
        .collect::<Result<Vec<_>>>()?;

    // Browsers send the session cookie only when credentials are allowed.
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
        .allow_credentials(true)
        .allow_origin(allowed_origins);

    let app = routes::create_router(state.clone())
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}
