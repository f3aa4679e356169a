//! HTTP middleware components.
//!
//! Middleware are functions that run before route handlers.
//! They can:
//! - Authenticate requests
//! - Rate limit callers
//! - Modify request/response (e.g. CORS headers)
//! - Short-circuit requests (reject unauthorized)

/// API key authentication middleware for the public order API
pub mod api_key;
/// Staff session authentication middleware for management routes
pub mod session;
