//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Performs business logic (database queries, validation)
//! 3. Returns HTTP response (JSON, status code)

/// API key management endpoints (owner session)
pub mod api_keys;
/// Staff PIN login and email OTP endpoints
pub mod auth;
/// Health check endpoint
pub mod health;
/// Menu read endpoint (keyed)
pub mod menu;
/// Public order API endpoints (keyed)
pub mod orders;
