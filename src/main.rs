//! Restaurant Order Service - Main Application Entry Point
//!
//! This is a REST API server for multi-tenant restaurant order management. It provides a small public order API authenticated with scoped API keys, plus staff PIN login, email OTP verification, and owner-side key administration.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Authentication**: API keys (SHA-256 hashed, origin-restricted) and HMAC-signed staff sessions
//! - **Throttling**: in-process fixed-window rate limiter
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Build HTTP router with routes and middleware
//! 5. Start server on configured port

mod config;
mod db;
mod error;
mod handlers;
mod middleware;
mod models;
mod services;
mod state;

use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, patch, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{services::rate_limit::RateLimiter, services::session::SessionSigner, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Create database pool
    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    // Run migrations
    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    // Assemble shared state: pool, rate limiter, session signer.
    // Everything handlers need is injected here; nothing reads the
    // environment past this point.
    let state = AppState::new(
        pool,
        RateLimiter::new(),
        SessionSigner::new(&config.session_secret, config.session_ttl_minutes),
    );

    // Keyed routes (public order API, X-API-Key header)
    let keyed_routes = Router::new()
        .route("/api/v1/orders", post(handlers::orders::create_order))
        .route("/api/v1/orders", get(handlers::orders::list_orders))
        .route("/api/v1/orders/{id}", get(handlers::orders::get_order))
        .route(
            "/api/v1/orders/{id}/status",
            patch(handlers::orders::update_order_status),
        )
        .route("/api/v1/menu", get(handlers::menu::list_menu))
        // Validate the key, throttle, and stamp per-key CORS headers
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::api_key::api_key_middleware,
        ));

    // Management routes (staff session bearer token, owner role)
    let management_routes = Router::new()
        .route("/api/v1/keys", post(handlers::api_keys::create_key))
        .route("/api/v1/keys", get(handlers::api_keys::list_keys))
        .route("/api/v1/keys/{id}", delete(handlers::api_keys::revoke_key))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::session::staff_session_middleware,
        ));

    // Public routes (no authentication, rate limited inside). These are
    // called from browsers before any key exists, so CORS is wide open
    // here; keyed routes get per-key CORS from their middleware instead.
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/api/v1/auth/staff/login", post(handlers::auth::staff_login))
        .route("/api/v1/auth/otp/request", post(handlers::auth::request_otp))
        .route("/api/v1/auth/otp/verify", post(handlers::auth::verify_otp))
        .layer(CorsLayer::permissive());

    let app = public_routes
        .merge(keyed_routes)
        .merge(management_routes)
        // Add distributed tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        // Share state with all handlers via State extraction
        .with_state(state);

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Start serving HTTP requests
    // ConnectInfo exposes the client address for per-IP login throttling
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
