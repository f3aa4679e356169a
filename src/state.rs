//! Shared application state.
//!
//! Everything a handler needs is carried here explicitly: the database
//! pool, the in-process rate limiter, and the session-token signer, all
//! injected via Axum's `State` extractor. Nothing reads the environment
//! after startup.

use std::sync::Arc;

use crate::{db::DbPool, services::rate_limit::RateLimiter, services::session::SessionSigner};

/// State shared across all request handlers.
///
/// Cloning is cheap: the pool is internally reference-counted and the
/// limiter and signer are behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: DbPool,

    /// Fixed-window rate limiter.
    ///
    /// Counters are process-local; when running multiple instances the
    /// same identifier can accrue a window per instance. Swapping in a
    /// shared counter store only requires replacing this value.
    pub limiter: Arc<RateLimiter>,

    /// HMAC signer for staff session tokens
    pub sessions: Arc<SessionSigner>,
}

impl AppState {
    /// Assemble shared state from its already-constructed parts.
    pub fn new(pool: DbPool, limiter: RateLimiter, sessions: SessionSigner) -> Self {
        Self {
            pool,
            limiter: Arc::new(limiter),
            sessions: Arc::new(sessions),
        }
    }
}
