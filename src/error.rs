//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// This enum represents all possible errors that can occur in the application.
/// Each variant maps to a specific HTTP status code and error message.
///
/// # Error Categories
///
/// - **Validation**: request body or parameters have the wrong shape (400)
/// - **Authentication**: missing or bad credential (API key, PIN, OTP) (401)
/// - **Authorization**: valid credential, but insufficient permission or disallowed origin (403)
/// - **Not found**: requested resource doesn't exist or belongs to another restaurant (404)
/// - **Rate limit**: too many attempts within the window (429)
/// - **Upstream**: database/network failure, surfaced as a generic 500
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    ///
    /// This wraps any sqlx::Error using the `#[from]` attribute, which
    /// automatically implements `From<sqlx::Error> for AppError`.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// API key is missing, malformed, unknown, or inactive.
    ///
    /// Returns HTTP 401 Unauthorized. Malformed and unknown keys share one
    /// variant so the response never reveals whether a prefix exists.
    #[error("Invalid API key")]
    InvalidApiKey,

    /// API key exists and matched, but is past its expiry timestamp.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("API key has expired")]
    ApiKeyExpired,

    /// Request origin is not in the key's allowed-origin list.
    ///
    /// Returns HTTP 403 Forbidden.
    #[error("Origin not allowed for this API key")]
    OriginDenied,

    /// API key is valid but lacks the permission required by the route.
    ///
    /// Returns HTTP 403 Forbidden.
    /// The String names the missing permission.
    #[error("Missing permission: {0}")]
    MissingPermission(String),

    /// Staff PIN or OTP code did not match.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Staff session token is missing, malformed, tampered, or expired.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("Invalid or expired session")]
    InvalidSession,

    /// Requested order does not exist or belongs to a different restaurant.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Order not found")]
    OrderNotFound,

    /// Referenced menu item does not exist, is unavailable, or belongs to
    /// a different restaurant.
    ///
    /// Returns HTTP 422 Unprocessable Entity.
    /// The String identifies the offending item.
    #[error("Menu item unavailable: {0}")]
    MenuItemUnavailable(String),

    /// Requested API key record does not exist for this restaurant.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("API key not found")]
    ApiKeyNotFound,

    /// Order status change violates the allowed transition flow.
    ///
    /// Returns HTTP 422 Unprocessable Entity.
    #[error("Invalid status transition")]
    InvalidStatusTransition,

    /// Too many requests for this identifier within the current window.
    ///
    /// Returns HTTP 429 Too Many Requests with a `Retry-After` header.
    #[error("Rate limit exceeded")]
    RateLimited { retry_after_secs: u64 },

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    /// The String contains details about what was invalid.
    #[error("Invalid request")]
    InvalidRequest(String),
}

/// Convert AppError into an HTTP response.
///
/// This implementation allows Axum handlers to return `Result<T, AppError>`
/// and have errors automatically converted to proper HTTP responses.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `InvalidApiKey` / `ApiKeyExpired` / `InvalidCredentials` / `InvalidSession` → 401 Unauthorized
/// - `OriginDenied` / `MissingPermission` → 403 Forbidden
/// - `OrderNotFound` / `ApiKeyNotFound` → 404 Not Found
/// - `MenuItemUnavailable` / `InvalidStatusTransition` → 422 Unprocessable Entity
/// - `RateLimited` → 429 Too Many Requests (with Retry-After)
/// - `InvalidRequest` → 400 Bad Request
/// - `Database` → 500 Internal Server Error (hides details from client)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map each error variant to (HTTP status, error code, message)
        let (status, code, message) = match self {
            AppError::InvalidApiKey => (
                StatusCode::UNAUTHORIZED,
                "invalid_api_key",
                self.to_string(),
            ),
            AppError::ApiKeyExpired => (
                StatusCode::UNAUTHORIZED,
                "api_key_expired",
                self.to_string(),
            ),
            AppError::OriginDenied => {
                (StatusCode::FORBIDDEN, "origin_denied", self.to_string())
            }
            AppError::MissingPermission(_) => (
                StatusCode::FORBIDDEN,
                "missing_permission",
                self.to_string(),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                self.to_string(),
            ),
            AppError::InvalidSession => {
                (StatusCode::UNAUTHORIZED, "invalid_session", self.to_string())
            }
            AppError::OrderNotFound => {
                (StatusCode::NOT_FOUND, "order_not_found", self.to_string())
            }
            AppError::ApiKeyNotFound => {
                (StatusCode::NOT_FOUND, "api_key_not_found", self.to_string())
            }
            AppError::MenuItemUnavailable(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "menu_item_unavailable",
                self.to_string(),
            ),
            AppError::InvalidStatusTransition => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "invalid_status_transition",
                self.to_string(),
            ),
            AppError::RateLimited { retry_after_secs } => {
                // 429 carries a Retry-After header computed from the
                // remaining window time
                let body = Json(json!({
                    "error": {
                        "code": "rate_limited",
                        "message": "Too many requests, slow down"
                    }
                }));
                return (
                    StatusCode::TOO_MANY_REQUESTS,
                    [(header::RETRY_AFTER, retry_after_secs.to_string())],
                    body,
                )
                    .into_response();
            }
            AppError::InvalidRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
            AppError::Database(ref e) => {
                // Log the real cause, return a generic message to the client
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        // Build JSON response body
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        // Return the response with status code and JSON body
        (status, body).into_response()
    }
}
