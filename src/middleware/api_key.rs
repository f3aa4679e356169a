//! API key authentication middleware.
//!
//! This middleware intercepts every keyed request to:
//! 1. Extract the API key from the `X-API-Key` header
//! 2. Validate it (format, hash, expiry, origin allow-list)
//! 3. Enforce the key's per-minute rate limit
//! 4. Inject the validated key context into the request
//! 5. Stamp the response with the key's CORS allow-origin

use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::{HeaderValue, header},
    middleware::Next,
    response::Response,
};

use crate::{
    error::AppError,
    services::api_keys::{self, ValidatedKey},
    state::AppState,
};

/// Header carrying the API key.
const API_KEY_HEADER: &str = "X-API-Key";

/// Per-key rate limit window.
const KEY_WINDOW: Duration = Duration::from_secs(60);

/// API key authentication middleware function.
///
/// # Flow
///
/// 1. Extract `X-API-Key: rk_live_...` header from the request
/// 2. Run the key validator (malformed keys never reach the database)
/// 3. Count the request against the key's `rate_limit_per_minute`
/// 4. If valid: inject `ValidatedKey` into request extensions, call the
///    next handler, then attach `Access-Control-Allow-Origin`
/// 5. If not: return a structured 401/403/429 error
///
/// # CORS
///
/// The allow-origin header is computed per request from the key's
/// allow-list: `*` for unrestricted keys, the echoed (and already matched)
/// request origin otherwise, with `Vary: Origin` so caches don't mix
/// responses across origins.
pub async fn api_key_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Step 1: extract the key header
    let presented = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::InvalidApiKey)?
        .to_string();

    let origin = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|h| h.to_str().ok())
        .map(ToString::to_string);

    // Step 2: validate (structured rejections map to 401/403)
    let key: ValidatedKey = api_keys::validate_key(&state.pool, &presented, origin.as_deref())
        .await?
        .map_err(AppError::from)?;

    // Step 3: per-key fixed-window throttle
    let identifier = format!("key:{}", key.api_key_id);
    if let Err(retry) = state.limiter.check(
        &identifier,
        key.rate_limit_per_minute.max(1) as u32,
        KEY_WINDOW,
    ) {
        return Err(AppError::RateLimited {
            retry_after_secs: retry.as_secs_ceil(),
        });
    }

    // Step 4: response CORS policy, decided before the key moves into
    // the request extensions
    let allow_origin = if key.allowed_origins.is_empty() {
        HeaderValue::from_static("*")
    } else {
        // Non-empty list: the origin matched during validation
        origin
            .as_deref()
            .and_then(|o| HeaderValue::from_str(o).ok())
            .ok_or(AppError::OriginDenied)?
    };
    let restricted = !key.allowed_origins.is_empty();

    // Step 5: hand the validated context to the route handlers
    request.extensions_mut().insert(key);

    let mut response = next.run(request).await;

    response
        .headers_mut()
        .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin);
    if restricted {
        response
            .headers_mut()
            .insert(header::VARY, HeaderValue::from_static("Origin"));
    }

    Ok(response)
}
